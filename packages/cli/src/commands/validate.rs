use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_document::{DocumentError, EditorDocument};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Page documents (.json) to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat unknown block types as errors
    #[arg(long)]
    pub strict: bool,
}

/// What a document check found
#[derive(Debug, Default, PartialEq)]
pub struct Report {
    pub sections: usize,
    pub blocks: usize,
    pub unknown_types: Vec<String>,
    pub duplicate_ids: Vec<String>,
}

impl Report {
    fn is_valid(&self, strict: bool) -> bool {
        self.duplicate_ids.is_empty() && (!strict || self.unknown_types.is_empty())
    }
}

pub fn check_document(source: &str) -> Result<Report, DocumentError> {
    let doc = EditorDocument::from_json(source)?;

    let mut unknown_types: Vec<String> = Vec::new();
    for block in doc.sections.iter().flat_map(|section| section.blocks.iter()) {
        if block.is_unknown() && !unknown_types.iter().any(|t| t == block.type_name()) {
            unknown_types.push(block.type_name().to_string());
        }
    }

    Ok(Report {
        sections: doc.sections.len(),
        blocks: doc.block_ids().len(),
        unknown_types,
        duplicate_ids: doc.duplicate_block_ids(),
    })
}

pub fn validate(args: ValidateArgs, cwd: &Path) -> Result<()> {
    println!("{}", "🔍 Validating page documents...".bright_blue().bold());

    let mut error_count = 0;

    for file in &args.files {
        let path = cwd.join(file);
        let report = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|source| check_document(&source).map_err(anyhow::Error::from));

        match report {
            Ok(report) => {
                for block_type in &report.unknown_types {
                    println!(
                        "  {} {} - unknown block type \"{}\" (kept as-is)",
                        "⚠️".yellow(),
                        file.display(),
                        block_type
                    );
                }
                for id in &report.duplicate_ids {
                    eprintln!(
                        "  {} {} - duplicate block id \"{}\"",
                        "✗".red(),
                        file.display(),
                        id
                    );
                }

                if report.is_valid(args.strict) {
                    println!(
                        "  {} {} ({} section(s), {} block(s))",
                        "✓".green(),
                        file.display(),
                        report.sections,
                        report.blocks
                    );
                } else {
                    error_count += 1;
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), file.display(), e);
            }
        }
    }

    println!();
    if error_count > 0 {
        return Err(anyhow!("{} of {} file(s) invalid", error_count, args.files.len()));
    }

    println!("{}", "✅ All documents valid".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_unknown_and_duplicates() {
        let report = check_document(
            r#"{
                "version": 1,
                "title": "T",
                "sections": [
                    {"id": "sec_1", "blocks": [
                        {"id": "a", "type": "text", "props": {"text": "x"}},
                        {"id": "b", "type": "carousel", "props": {}}
                    ]},
                    {"id": "sec_2", "blocks": [
                        {"id": "a", "type": "carousel"}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(report.sections, 2);
        assert_eq!(report.blocks, 3);
        assert_eq!(report.unknown_types, vec!["carousel"]);
        assert_eq!(report.duplicate_ids, vec!["a"]);
        assert!(!report.is_valid(false));
    }

    #[test]
    fn test_strict_rejects_unknown_types() {
        let report = check_document(
            r#"{"version": 1, "sections": [{"id": "s", "blocks": [{"id": "x", "type": "map"}]}]}"#,
        )
        .unwrap();

        assert!(report.is_valid(false));
        assert!(!report.is_valid(true));
    }

    #[test]
    fn test_validate_fails_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), r#"{"version": 3}"#).unwrap();
        fs::write(dir.path().join("good.json"), r#"{"version": 1}"#).unwrap();

        let good = ValidateArgs {
            files: vec![PathBuf::from("good.json")],
            strict: false,
        };
        assert!(validate(good, dir.path()).is_ok());

        let mixed = ValidateArgs {
            files: vec![PathBuf::from("good.json"), PathBuf::from("bad.json")],
            strict: false,
        };
        assert!(validate(mixed, dir.path()).is_err());
    }
}
