use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_document::{Block, BlockIdGenerator, BlockKind, EditorDocument};
use pagesmith_workspace::{Config, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for page documents
    #[arg(long, default_value = "pages")]
    pub pages_dir: String,

    /// Port for the local server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagesmith project...".bright_blue().bold()
    );

    let pages_dir = cwd.join(&args.pages_dir);
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created {}/", "✓".green(), args.pages_dir);
    }

    let example_file = pages_dir.join("home.json");
    if !example_file.exists() {
        fs::write(&example_file, example_document()?)?;
        println!("  {} Created {}/home.json", "✓".green(), args.pages_dir);
    }

    let mut config = Config::default();
    if let Some(port) = args.port {
        config.port = port;
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/home.json", args.pages_dir);
    println!("  2. Run: pagesmith render {}/home.json", args.pages_dir);
    println!("  3. Run: pagesmith-server to serve the editing API");

    Ok(())
}

fn example_document() -> Result<String> {
    let mut ids = BlockIdGenerator::new();
    let mut doc = EditorDocument::new("Home");
    let blocks = doc.editable_blocks();
    blocks.push(Block::new(BlockKind::Hero, &mut ids));
    blocks.push(Block::new(BlockKind::Text, &mut ids));

    Ok(doc.to_json_pretty()?)
}
