// Valuation engine: weekly projections, category win probabilities, and
// marginal expected wins for draft candidates.

pub mod category;
pub mod marginal;
pub mod projection;
pub mod ranking;
pub mod stats;
pub mod wins;

use thiserror::Error;

use crate::config::{Config, ReplacementBaselines};
use crate::draft::roster::RosterError;
use category::CategorySet;
use stats::StatsError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("team `{team}` projects zero innings pitched; ERA and WHIP are undefined")]
    ZeroInnings { team: String },
}

/// Read-only valuation context: category distributions, replacement
/// baselines, and the season length. Roster state is always passed in.
#[derive(Debug, Clone)]
pub struct Valuator {
    pub categories: CategorySet,
    pub replacement: ReplacementBaselines,
    pub num_weeks: u32,
}

impl Valuator {
    pub fn new(categories: CategorySet, replacement: ReplacementBaselines, num_weeks: u32) -> Self {
        Valuator {
            categories,
            replacement,
            num_weeks,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Valuator::new(
            config.categories.clone(),
            config.replacement.clone(),
            config.league.num_weeks,
        )
    }
}
