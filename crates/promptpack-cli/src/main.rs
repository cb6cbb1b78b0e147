#![deny(unsafe_code)]

//! promptpack CLI — one-shot context bundle assembly.
//!
//! The bundle text goes to stdout; logs and degradation notes go to stderr
//! so the output stays pipeable.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use promptpack_config::AppConfig;
use promptpack_core::gateway::FileEntry;
use promptpack_core::{
    assembler, format_file_size, ContextBundle, Gateway, LineCountCache, LocalGateway, SizeTier,
};

/// Assemble custom instructions and selected file contents into one prompt
/// context.
#[derive(Parser)]
#[command(name = "promptpack", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "promptpack.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a bundle and print it to stdout.
    Bundle {
        /// Project directory to read files from.
        #[arg(long)]
        dir: PathBuf,

        /// Files to include, as paths relative to the directory.
        files: Vec<String>,

        /// Include every file the directory listing returns.
        #[arg(long, conflicts_with = "files")]
        all: bool,

        /// Also place the bundle on the system clipboard.
        #[arg(long)]
        copy: bool,
    },

    /// List the files a directory exposes after exclusions.
    Files {
        /// Project directory to list.
        #[arg(long)]
        dir: PathBuf,

        /// Fetch line counts and print the size tier summary.
        #[arg(long)]
        counts: bool,
    },

    /// Show or replace the stored custom instructions.
    Instructions {
        /// Replace the stored instructions with this text.
        #[arg(long)]
        set: Option<String>,
    },

    /// Print the stored exclusion rules.
    Exclusions,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Bundle {
            dir,
            files,
            all,
            copy,
        } => cmd_bundle(&cli.config, &dir, &files, all, copy).await?,
        Commands::Files { dir, counts } => cmd_files(&cli.config, &dir, counts).await?,
        Commands::Instructions { set } => cmd_instructions(&cli.config, set).await?,
        Commands::Exclusions => cmd_exclusions(&cli.config).await?,
        Commands::Config { show } => cmd_config(&cli.config, show).await?,
    }

    Ok(())
}

async fn cmd_bundle(
    config_path: &Path,
    dir: &Path,
    files: &[String],
    all: bool,
    copy: bool,
) -> Result<()> {
    let gateway = gateway_from(config_path).await?;
    let bundle = assemble_bundle(&gateway, dir, files, all).await?;

    if let Some(note) = &bundle.note {
        eprintln!("Note: {note}");
    }

    let text = bundle.clipboard_text();
    if copy {
        let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
        clipboard
            .set_text(text.clone())
            .context("failed to write to clipboard")?;
        info!("bundle copied to clipboard");
    }
    println!("{text}");
    Ok(())
}

/// Browse the directory, resolve the selection, and assemble the bundle.
async fn assemble_bundle(
    gateway: &dyn Gateway,
    dir: &Path,
    files: &[String],
    all: bool,
) -> Result<ContextBundle> {
    let listing = gateway
        .browse_directory(dir.to_path_buf())
        .await
        .context("failed to browse directory")?;

    let selected: Vec<PathBuf> = if all {
        listing
            .files
            .iter()
            .map(|entry| entry.path.clone())
            .collect()
    } else {
        resolve_selection(&listing.files, files)?
    };

    Ok(assembler::assemble(gateway, &selected, dir).await?)
}

/// Map relative names from the command line to absolute listing paths.
fn resolve_selection(available: &[FileEntry], requested: &[String]) -> Result<Vec<PathBuf>> {
    let mut selected = Vec::with_capacity(requested.len());
    for name in requested {
        match available.iter().find(|entry| entry.relative_path == *name) {
            Some(entry) => selected.push(entry.path.clone()),
            None => bail!("file not in the directory listing: {name}"),
        }
    }
    Ok(selected)
}

async fn cmd_files(config_path: &Path, dir: &Path, counts: bool) -> Result<()> {
    let gateway = gateway_from(config_path).await?;
    let listing = gateway
        .browse_directory(dir.to_path_buf())
        .await
        .context("failed to browse directory")?;

    if listing.files.is_empty() {
        println!("(no files found)");
        return Ok(());
    }

    if counts {
        let selected: Vec<PathBuf> = listing
            .files
            .iter()
            .map(|entry| entry.path.clone())
            .collect();
        let mut cache = LineCountCache::new();
        let total = cache.recalculate_total(&gateway, dir, &selected).await;

        for entry in &listing.files {
            println!(
                "{:>8}  {} ({})",
                cache.get(&entry.path).unwrap_or(0),
                entry.relative_path,
                format_file_size(entry.size_bytes)
            );
        }
        println!("{} lines total ({})", total, SizeTier::for_total(total).label());
    } else {
        for entry in &listing.files {
            println!(
                "{} ({})",
                entry.relative_path,
                format_file_size(entry.size_bytes)
            );
        }
    }
    Ok(())
}

async fn cmd_instructions(config_path: &Path, set: Option<String>) -> Result<()> {
    let gateway = gateway_from(config_path).await?;
    match set {
        Some(text) => {
            let saved = gateway.save_custom_instructions(text).await?;
            println!("{}", saved.message);
        }
        None => {
            let resp = gateway.custom_instructions().await?;
            if resp.instructions.is_empty() {
                eprintln!("(no custom instructions stored)");
            } else {
                println!("{}", resp.instructions);
            }
        }
    }
    Ok(())
}

async fn cmd_exclusions(config_path: &Path) -> Result<()> {
    let gateway = gateway_from(config_path).await?;
    let rules = gateway.exclusions().await?;

    if rules.is_empty() {
        println!("(no exclusion rules stored)");
        return Ok(());
    }
    print_rule_section("Directories", &rules.exclude_dirs);
    print_rule_section("Files", &rules.exclude_files);
    print_rule_section("Patterns", &rules.exclude_patterns);
    Ok(())
}

fn print_rule_section(title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    println!("{title}:");
    for entry in entries {
        println!("  {entry}");
    }
}

async fn cmd_config(config_path: &Path, show: bool) -> Result<()> {
    let config = load_config(config_path).await?;
    if show {
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

async fn gateway_from(config_path: &Path) -> Result<LocalGateway> {
    let config = load_config(config_path).await?;
    Ok(LocalGateway::new(&config.storage.data_dir)
        .with_follow_symlinks(config.browse.follow_symlinks))
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        Ok(AppConfig::load(path).await?)
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use promptpack_test_utils::ProjectBuilder;

    fn entry(relative: &str) -> FileEntry {
        FileEntry {
            name: relative.rsplit('/').next().unwrap_or(relative).to_string(),
            path: PathBuf::from(format!("/project/{relative}")),
            relative_path: relative.to_string(),
            size_bytes: 1,
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_all_conflicts_with_file_list() {
        let result = Cli::try_parse_from(["promptpack", "bundle", "--dir", "/p", "--all", "a.rs"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_selection_maps_relative_names() {
        let available = vec![entry("src/main.rs"), entry("README.md")];
        let selected =
            resolve_selection(&available, &["README.md".to_string()]).unwrap();
        assert_eq!(selected, vec![PathBuf::from("/project/README.md")]);
    }

    #[test]
    fn test_resolve_selection_preserves_request_order() {
        let available = vec![entry("a.rs"), entry("b.rs")];
        let selected = resolve_selection(
            &available,
            &["b.rs".to_string(), "a.rs".to_string()],
        )
        .unwrap();
        assert_eq!(
            selected,
            vec![PathBuf::from("/project/b.rs"), PathBuf::from("/project/a.rs")]
        );
    }

    #[test]
    fn test_resolve_selection_rejects_unknown_names() {
        let available = vec![entry("a.rs")];
        let err = resolve_selection(&available, &["missing.rs".to_string()]).unwrap_err();
        assert!(err.to_string().contains("missing.rs"));
    }

    #[tokio::test]
    async fn test_bundle_all_includes_every_file() {
        let project = ProjectBuilder::new()
            .file("src/main.rs", "fn main() {}\n")
            .file("README.md", "# readme\n");
        let data_dir = tempfile::tempdir().unwrap();
        let gateway = LocalGateway::new(data_dir.path());

        let bundle = assemble_bundle(&gateway, project.root(), &[], true)
            .await
            .unwrap();

        assert_eq!(bundle.files.len(), 2);
        let text = bundle.clipboard_text();
        assert!(text.contains("File: src/main.rs"), "{text}");
        assert!(text.contains("File: README.md"), "{text}");
    }

    #[tokio::test]
    async fn test_bundle_by_relative_name() {
        let project = ProjectBuilder::new()
            .file("src/main.rs", "fn main() {}\n")
            .file("README.md", "# readme\n");
        let data_dir = tempfile::tempdir().unwrap();
        let gateway = LocalGateway::new(data_dir.path());

        let bundle = assemble_bundle(
            &gateway,
            project.root(),
            &["README.md".to_string()],
            false,
        )
        .await
        .unwrap();

        assert_eq!(bundle.files.len(), 1);
        assert!(bundle.clipboard_text().starts_with("File: README.md"));
    }
}
