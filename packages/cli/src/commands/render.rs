use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_compiler_html::{render_json, CompileOptions};
use pagesmith_workspace::Config;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page document (.json) to render
    pub file: PathBuf,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides the configured publish directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Title to use when the document has none
    #[arg(long)]
    pub default_title: Option<String>,

    /// Emit HTML without indentation or newlines
    #[arg(long)]
    pub compact: bool,
}

pub fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let input = cwd.join(&args.file);
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Cannot read {}", input.display()))?;

    let mut settings = Map::new();
    if let Some(title) = &args.default_title {
        settings.insert("defaultTitle".to_string(), Value::String(title.clone()));
    }

    let options = CompileOptions {
        pretty: !args.compact,
        ..CompileOptions::default()
    };
    let html = render_json(&source, &settings, options)
        .with_context(|| format!("Cannot render {}", args.file.display()))?;

    if args.stdout {
        println!("{}", html);
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(dir) => cwd.join(dir),
        None => Config::load(cwd)?.get_publish_dir(cwd),
    };
    fs::create_dir_all(&out_dir)?;

    let output = out_dir.join(output_name(&args.file));
    fs::write(&output, &html)?;
    tracing::debug!(bytes = html.len(), output = %output.display(), "page rendered");

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.file.display(),
        output.display()
    );
    Ok(())
}

fn output_name(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "index".to_string());
    format!("{}.html", stem)
}
