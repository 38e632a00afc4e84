use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retrodisc::{AssetSource, GcDisc};
use varia_core::{create_asset_id_files, Game};

#[derive(Parser)]
#[command(name = "varia", about = "Asset ID tooling for Retro engine game discs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate asset ID lookup tables from a disc image.
    GenIds {
        /// Target game (currently only "echoes").
        #[arg(long)]
        game: String,
        /// Path to the disc image.
        #[arg(long)]
        iso: PathBuf,
        /// Output directory. Defaults to `generated/<game>` under the
        /// workspace root.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print disc header fields and a per-PAK resource summary.
    Info {
        /// Path to the disc image.
        #[arg(long)]
        iso: PathBuf,
    },
}

/// Find the workspace root by walking up from `start` through ancestor
/// directories looking for a `Cargo.toml` with a `[workspace]` section.
fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let manifest = dir.join("Cargo.toml");
        if manifest.exists() {
            if let Ok(content) = std::fs::read_to_string(&manifest) {
                if content.contains("[workspace]") {
                    return Some(dir);
                }
            }
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn default_output_dir(game: Game) -> PathBuf {
    let base = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_workspace_root(&cwd))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("generated").join(game.slug())
}

fn open_source(iso: &Path) -> Result<AssetSource<BufReader<File>>> {
    let file = File::open(iso)
        .with_context(|| format!("failed to open disc image: {}", iso.display()))?;
    let disc = GcDisc::new(BufReader::new(file))
        .with_context(|| format!("failed to parse disc image: {}", iso.display()))?;
    AssetSource::scan(disc).context("failed to index PAK archives")
}

fn cmd_gen_ids(game: &str, iso: &Path, output: Option<&Path>) -> Result<()> {
    let game: Game = game.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(game));

    let mut source = open_source(iso)?;
    eprintln!(
        "[gen] indexed {} assets from {}",
        source.asset_count(),
        iso.display()
    );
    create_asset_id_files(&mut source, game, &output)?;
    println!("Generated asset ID tables in {}", output.display());
    Ok(())
}

fn cmd_info(iso: &Path) -> Result<()> {
    let source = open_source(iso)?;
    let header = source.header();
    println!("Game:    {} ({})", header.game_title, header.game_code_str());
    println!("Maker:   {}", String::from_utf8_lossy(&header.maker_code));
    println!("Disc:    {} rev {}", header.disc_id, header.version);
    println!("Assets:  {}", source.asset_count());
    println!("PAKs:");
    for pak in source.paks() {
        println!(
            "  - {} ({} resources, {} named)",
            pak.path, pak.resources, pak.named
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::GenIds { game, iso, output } => cmd_gen_ids(game, iso, output.as_deref()),
        Command::Info { iso } => cmd_info(iso),
    }
}
