use proptest::prelude::*;
use spinbench_timeline::{
    Direction, FillMode, HistogramAggregator, IntervalBuilder, OccupancyGrid, PlaybackCursor, Rgb,
    TimelineConfig,
};

const BIN_NS: u64 = 200_000;

fn arb_mode() -> impl Strategy<Value = FillMode> {
    prop_oneof![Just(FillMode::Partial), Just(FillMode::FullThenPartial)]
}

/// (bins, workers, row-major counts)
fn arb_grid() -> impl Strategy<Value = (usize, usize, Vec<u64>)> {
    (1usize..40, 1usize..5).prop_flat_map(|(bins, workers)| {
        let cell = prop_oneof![3 => Just(0u64), 5 => 0u64..40, 1 => 40u64..400];
        (
            Just(bins),
            Just(workers),
            prop::collection::vec(cell, bins * workers),
        )
    })
}

/// `tail_ns` is how far the run reaches into its last bin, in `1..=BIN_NS`.
fn setup(
    bins: usize,
    workers: usize,
    counts: Vec<u64>,
    avg_ns: f64,
    mode: FillMode,
    threshold: f64,
    tail_ns: u64,
) -> (IntervalBuilder, OccupancyGrid) {
    let colors = (0..workers).map(|w| Rgb::new(16 + w as u8, 128, 255)).collect();
    let duration = ((bins as u64 - 1) * BIN_NS + tail_ns) as f64 / 1e9;
    let cfg = TimelineConfig::new(BIN_NS, duration, colors)
        .with_avg_iteration_ns(avg_ns)
        .with_fill_mode(mode)
        .with_merge_threshold(threshold);
    let builder = IntervalBuilder::new(cfg).unwrap();
    let grid = OccupancyGrid::from_row_major(bins, workers, counts).unwrap();
    (builder, grid)
}

proptest! {
    // Output bars are non-empty, sorted, disjoint per worker and end inside the timeline
    #[test]
    fn intervals_are_well_formed(
        (bins, workers, counts) in arb_grid(),
        avg_ns in 0.0f64..20_000.0,
        mode in arb_mode(),
        threshold in 0.05f64..0.95,
        tail_ns in 1u64..=BIN_NS,
    ) {
        let (builder, grid) = setup(bins, workers, counts, avg_ns, mode, threshold, tail_ns);
        let duration = builder.config().duration_s;
        let out = builder.build(&grid).unwrap();
        for iv in &out {
            prop_assert!(iv.width > 0.0);
            prop_assert!(iv.start >= 0.0);
            prop_assert!(iv.end() <= duration);
            prop_assert!(iv.row >= 1 && iv.row <= workers);
        }
        // grouped by worker in worker order
        prop_assert!(out.windows(2).all(|w| w[0].row <= w[1].row));
        for row in 1..=workers {
            let mine: Vec<_> = out.iter().filter(|i| i.row == row).collect();
            for pair in mine.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
                prop_assert!(pair[0].end() <= pair[1].start + 1e-12);
            }
        }
    }

    // Building twice gives the same bars
    #[test]
    fn build_is_idempotent(
        (bins, workers, counts) in arb_grid(),
        avg_ns in 0.0f64..20_000.0,
        mode in arb_mode(),
    ) {
        let (builder, grid) = setup(bins, workers, counts, avg_ns, mode, 0.9, BIN_NS);
        prop_assert_eq!(builder.build(&grid).unwrap(), builder.build(&grid).unwrap());
    }

    // A worker that never counted draws nothing
    #[test]
    fn idle_workers_draw_nothing(
        (bins, workers, mut counts) in arb_grid(),
        mode in arb_mode(),
        idle in 0usize..5,
    ) {
        let idle = idle % workers;
        for bin in 0..bins {
            counts[bin * workers + idle] = 0;
        }
        let (builder, grid) = setup(bins, workers, counts, 5_000.0, mode, 0.9, BIN_NS / 3);
        let out = builder.build(&grid).unwrap();
        prop_assert!(out.iter().all(|i| i.row != idle + 1));
    }

    // Cumulative counts never decrease as the cursor moves right
    #[test]
    fn histogram_is_monotone(
        (bins, workers, counts) in arb_grid(),
        a in 0.0f64..0.01,
        b in 0.0f64..0.01,
    ) {
        let grid = OccupancyGrid::from_row_major(bins, workers, counts).unwrap();
        let h = HistogramAggregator::new(BIN_NS, workers).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let c_lo = h.cumulative_counts(&grid, lo).unwrap();
        let c_hi = h.cumulative_counts(&grid, hi).unwrap();
        prop_assert!(c_lo.iter().zip(&c_hi).all(|(l, h)| l <= h));
        let full = h.cumulative_counts(&grid, f64::MAX).unwrap();
        for w in 0..workers {
            prop_assert_eq!(full[w], grid.column(w).sum::<u64>());
        }
    }

    // No sequence of ticks and jumps moves the cursor outside [0, duration]
    #[test]
    fn cursor_stays_in_bounds(
        duration in 0.01f64..10.0,
        step in 0.0001f64..2.0,
        ops in prop::collection::vec(0u8..5, 0..200),
    ) {
        let mut c = PlaybackCursor::new(duration, step).unwrap();
        for op in ops {
            match op {
                0 => { c.tick(); }
                1 => { c.advance(Direction::Forward, true); }
                2 => { c.advance(Direction::Backward, false); }
                3 => { c.toggle_pause(); }
                _ => { c.jump(Direction::Forward); }
            }
            prop_assert!(c.position() >= 0.0 && c.position() <= duration);
            let (start, width) = c.cover();
            prop_assert!(width >= 0.0);
            prop_assert_eq!(start, c.position());
        }
    }
}
