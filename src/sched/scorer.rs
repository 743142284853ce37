//! Weighted price/carbon scoring of a single generator-hour.

use super::types::{GenerationProfile, Generator, UNAVAILABLE};

/// Outcome of scoring one hour of the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HourScore<'a> {
    /// Lowest combined score in the hour and the generator that achieves it.
    Available { score: f64, generator: &'a Generator },
    /// Hour outside the horizon, or no scorable generator in it.
    Unavailable,
}

impl<'a> HourScore<'a> {
    pub fn score(&self) -> Option<f64> {
        match *self {
            Self::Available { score, .. } => Some(score),
            Self::Unavailable => None,
        }
    }

    /// Name of the chosen generator, or [`UNAVAILABLE`].
    pub fn generator_name(&self) -> &'a str {
        match *self {
            Self::Available { generator, .. } => &generator.name,
            Self::Unavailable => UNAVAILABLE,
        }
    }
}

/// Scores hours of a profile as `price + carbon_weight * carbon`.
///
/// Holds only shared references, so it is cheap to copy and has no side
/// effects: identical inputs always produce identical scores.
#[derive(Debug, Clone, Copy)]
pub struct HourlyScorer<'a> {
    profile: &'a GenerationProfile,
    carbon_weight: f64,
}

impl<'a> HourlyScorer<'a> {
    pub fn new(profile: &'a GenerationProfile, carbon_weight: f64) -> Self {
        Self {
            profile,
            carbon_weight,
        }
    }

    pub fn profile(&self) -> &'a GenerationProfile {
        self.profile
    }

    /// Lowest-scoring generator at `hour`.
    ///
    /// Ties keep the first generator in slot order. Generators with a missing
    /// price or carbon value, and NaN scores, never win.
    pub fn score(&self, hour: usize) -> HourScore<'a> {
        let mut best: Option<(f64, &'a Generator)> = None;
        for generator in self.profile.generators(hour) {
            let Some(score) = generator.combined_score(self.carbon_weight) else {
                continue;
            };
            let better = match best {
                Some((best_score, _)) => score < best_score,
                None => !score.is_nan(),
            };
            if better {
                best = Some((score, generator));
            }
        }

        match best {
            Some((score, generator)) => HourScore::Available { score, generator },
            None => HourScore::Unavailable,
        }
    }
}
