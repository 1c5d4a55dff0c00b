use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use ratlas_core::{AtlasMerger, MergeRequest, NetworkVocabulary};
use ratlas_io::{
    read_label_volume, read_lookup_table, read_reference_grid, write_label_volume,
    write_lookup_table,
};

const MERGED_VOLUME_PATH: &str = "mergedAtlas.nii.gz";
const LOOKUP_TABLE_PATH: &str = "lut.tsv";

#[derive(Parser)]
#[command(name = "ratlas-merge")]
#[command(about = "Merge discrete-labeled atlases into one non-overlapping volume")]
struct Cli {
    /// Atlases to merge, the first being the base
    #[arg(short, long, num_args = 1.., required = true)]
    atlases: Vec<PathBuf>,

    /// Volume with the voxel grid wanted for the output
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Lookup table with columns "regions" and "index" to seed the
    /// combined table
    #[arg(short, long)]
    tsv: Option<PathBuf>,

    /// One name tag per atlas after the base, to mark where regions come
    /// from (e.g. subcortical or cerebellar); defaults to filename stems
    #[arg(short, long, num_args = 1..)]
    names: Option<Vec<String>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    if cli.atlases.len() == 1 {
        warn!("only one atlas supplied, nothing to merge");
        return Ok(());
    }

    let (base, base_header) = read_label_volume(&cli.atlases[0])?;
    let mut atlases = vec![base];
    for path in &cli.atlases[1..] {
        let (volume, _) = read_label_volume(path)?;
        atlases.push(volume);
    }

    let reference = cli
        .reference
        .as_deref()
        .map(read_reference_grid)
        .transpose()?;
    let seed_rows = cli.tsv.as_deref().map(read_lookup_table).transpose()?;
    let names = match cli.names {
        Some(names) => names,
        None => cli.atlases[1..].iter().map(|p| name_tag(p)).collect(),
    };

    let merger = AtlasMerger::new(NetworkVocabulary::schaefer_17());
    let outcome = merger.merge(MergeRequest {
        atlases,
        names,
        reference,
        seed_rows,
    })?;

    if let Some(rows) = &outcome.lookup {
        write_lookup_table(LOOKUP_TABLE_PATH, rows)?;
        info!("wrote lookup table to {}", LOOKUP_TABLE_PATH);
    }
    write_label_volume(MERGED_VOLUME_PATH, &outcome.volume, &base_header)?;
    info!("wrote merged atlas to {}", MERGED_VOLUME_PATH);

    Ok(())
}

/// The input filename up to the first `.`, e.g. `sub.nii.gz` -> `sub`.
fn name_tag(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.split('.').next().unwrap_or(name).to_string())
        .unwrap_or_else(|| path.display().to_string())
}
