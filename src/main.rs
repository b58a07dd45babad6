mod bench;
mod cli;
mod config;
mod logging;
mod render;

use std::error::Error;
use std::io;

use clap::Parser;
use spinbench_timeline::TimelineSet;

use crate::cli::Args;
use crate::config::BenchConfig;
use crate::render::Renderer;
use crate::render::text::TextRenderer;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;

    let mut cfg = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            BenchConfig::load_from_path(path)?
        }
        None => BenchConfig::default(),
    };
    args.apply(&mut cfg);
    log::debug!("effective config: {:?}", cfg);

    let mut set = bench::run_all(&cfg)?;
    log::info!("Preparing to display...");

    if args.gui {
        return run_gui(&mut set, cfg.frame_ms);
    }

    // Headless: play through (or for --frames ticks) and print the final state.
    let mut frames = 0u64;
    while args.frames.is_none_or(|limit| frames < limit) && set.tick() {
        frames += 1;
    }
    log::info!("played {} frames", frames);
    let mut renderer = TextRenderer::new(io::stdout().lock(), args.columns);
    renderer.draw(&set.frames()?)?;
    Ok(())
}

#[cfg(feature = "gui")]
fn run_gui(set: &mut TimelineSet, frame_ms: u64) -> Result<(), Box<dyn Error>> {
    render::gui::run(set, frame_ms)
}

#[cfg(not(feature = "gui"))]
fn run_gui(_set: &mut TimelineSet, _frame_ms: u64) -> Result<(), Box<dyn Error>> {
    Err("spinbench was built without the `gui` feature".into())
}
