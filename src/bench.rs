use std::error::Error;

use spinbench_collect::{CollectConfig, Collection, collect};
use spinbench_timeline::config::expected_bins;
use spinbench_timeline::{
    PlaybackCursor, Rgb, Timeline, TimelineConfig, TimelineSet, resolve_palette,
};

use crate::config::BenchConfig;

/// Collects every configured run and builds its timeline. One palette is
/// shared so a worker keeps its color across charts.
pub fn run_all(cfg: &BenchConfig) -> Result<TimelineSet, Box<dyn Error>> {
    cfg.check()?;
    let palette = resolve_palette(cfg.colors.as_deref(), cfg.workers, cfg.seed)?;
    let bins = expected_bins(cfg.duration_s, cfg.bin_size_ns);
    let mut set = TimelineSet::new();
    for run in &cfg.runs {
        let collection = collect(&CollectConfig {
            workers: cfg.workers,
            bins,
            bin_size_ns: cfg.bin_size_ns,
            strategy: run.strategy,
            workload: run.workload(),
        })?;
        log::info!("Data collection complete!");
        set.push(timeline_for(cfg, collection, &palette)?);
    }
    Ok(set)
}

pub fn timeline_for(
    cfg: &BenchConfig,
    collection: Collection,
    palette: &[Rgb],
) -> Result<Timeline, Box<dyn Error>> {
    let title = collection.config.title();
    let row_label = collection.config.strategy.instance_name();
    let tl_cfg = TimelineConfig::new(cfg.bin_size_ns, cfg.duration_s, palette.to_vec())
        .with_avg_iteration_ns(collection.stats.iteration_ns_or_zero())
        .with_fill_mode(cfg.fill_mode)
        .with_merge_threshold(cfg.merge_threshold);
    let step = PlaybackCursor::step_for(cfg.display_s, cfg.frame_s(), cfg.duration_s);
    let timeline = Timeline::new(title, collection.grid, tl_cfg, step)?;
    Ok(timeline.with_row_label(row_label))
}
