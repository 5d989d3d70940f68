use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use chordmap::cli::{build_registry, execute, CliArgs};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    chordmap::tracing::init(args.verbose);

    let layers = args.layers();
    let registry = build_registry(&layers);
    tracing::info!(
        "Registry ready: {} keymaps from {} layers",
        registry.keymaps().count(),
        layers.len()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&args.command, &registry, &mut out).context("command failed")?;
    out.flush()?;
    Ok(())
}
