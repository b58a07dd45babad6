use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::error::TimelineError;

/// Darkest channel value handed out by the random palette; keeps bars visible on black.
pub const CHANNEL_MIN: u8 = 0x10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// One color per worker, each channel uniform in `[CHANNEL_MIN, 255]`.
/// A seed makes the palette reproducible; `None` draws from OS entropy.
pub fn random_palette(workers: usize, seed: Option<u64>) -> Vec<Rgb> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    (0..workers)
        .map(|_| {
            Rgb::new(
                rng.gen_range(CHANNEL_MIN..=u8::MAX),
                rng.gen_range(CHANNEL_MIN..=u8::MAX),
                rng.gen_range(CHANNEL_MIN..=u8::MAX),
            )
        })
        .collect()
}

/// Uses the explicit colors when given, otherwise generates them.
pub fn resolve_palette(
    colors: Option<&[Rgb]>,
    workers: usize,
    seed: Option<u64>,
) -> Result<Vec<Rgb>, TimelineError> {
    match colors {
        Some(c) if c.len() == workers => Ok(c.to_vec()),
        Some(c) => Err(TimelineError::ColorCountMismatch {
            expected: workers,
            actual: c.len(),
        }),
        None => Ok(random_palette(workers, seed)),
    }
}
