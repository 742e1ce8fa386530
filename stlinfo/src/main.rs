use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rayon::prelude::*;
use stlview::stl::{DEFAULT_VERTEX_TOLERANCE, LoadOptions, load};
use tracing_subscriber::EnvFilter;

mod report;

/// Loads STL files the way the viewer does and prints what came out.
#[derive(Parser, Debug)]
#[command(name = "stlinfo", version)]
struct Cli {
    /// STL files to load
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Keep the model where the file puts it
    #[arg(long)]
    no_center: bool,

    /// Scale the model so its longest side measures 2
    #[arg(long)]
    normalize: bool,

    /// Ignore stored normals and derive them from the winding
    #[arg(long)]
    recompute_normals: bool,

    /// Emit one vertex per corner instead of welding
    #[arg(long)]
    no_merge: bool,

    /// Distance under which two corners are welded
    #[arg(long, default_value_t = DEFAULT_VERTEX_TOLERANCE)]
    tolerance: f32,

    /// Log every pipeline stage
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> LoadOptions {
        LoadOptions::default()
            .with_auto_center(!self.no_center)
            .with_auto_normalize(self.normalize)
            .with_recompute_normals(self.recompute_normals)
            .with_merge_vertices(!self.no_merge)
            .with_vertex_tolerance(self.tolerance)
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let options = cli.options();
    tracing::debug!(?options, files = cli.files.len(), "loading");
    let results: Vec<_> = cli.files.par_iter().map(|path| load(path, &options)).collect();

    let mut out = io::stdout().lock();
    for (path, result) in cli.files.iter().zip(&results) {
        report::write(&mut out, path, result).context("failed to write report")?;
    }
    out.flush()?;

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "some files failed to load");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::parse_from(["stlinfo", "--no-center", "--normalize", "--no-merge", "--tolerance", "0.5", "a.stl"]);
        let options = cli.options();
        assert!(!options.auto_center);
        assert!(options.auto_normalize);
        assert!(!options.recompute_normals);
        assert!(!options.merge_vertices);
        assert_eq!(options.vertex_tolerance, 0.5);
        assert_eq!(cli.files, vec![PathBuf::from("a.stl")]);
    }

    #[test]
    fn defaults_match_library() {
        let cli = Cli::parse_from(["stlinfo", "a.stl", "b.stl"]);
        assert_eq!(cli.options(), LoadOptions::default());
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn at_least_one_file_is_required() {
        assert!(Cli::try_parse_from(["stlinfo"]).is_err());
    }
}
