// Expected weekly category wins against the league-average opponent.

use std::collections::BTreeMap;

use serde::Serialize;

use super::category::{CategoryGroup, CategoryId};
use super::projection::{RosterView, WeeklyProjection};
use super::stats::win_probability;
use super::{ValuationError, Valuator};
use crate::draft::pool::PlayerPool;
use crate::draft::roster::Team;

/// Per-category win probabilities and their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedWins {
    pub per_category: BTreeMap<CategoryId, f64>,
    pub total: f64,
}

impl ExpectedWins {
    pub fn get(&self, id: CategoryId) -> Option<f64> {
        self.per_category.get(&id).copied()
    }

    pub fn group_total(&self, group: CategoryGroup) -> f64 {
        self.per_category
            .iter()
            .filter(|(id, _)| id.group() == group)
            .map(|(_, p)| p)
            .sum()
    }
}

impl Valuator {
    /// Win probability in every category of `projection`, scored against the
    /// category's weekly league average.
    pub fn expected_wins_for(&self, projection: &WeeklyProjection) -> Result<ExpectedWins, ValuationError> {
        let mut per_category = BTreeMap::new();
        let mut total = 0.0;
        for cat in self.categories.iter() {
            let Some(value) = projection.get(cat.id) else {
                continue;
            };
            let p = win_probability(
                value,
                cat.weekly_avg,
                cat.weekly_sd,
                cat.direction.lower_is_better(),
            )?;
            per_category.insert(cat.id, p);
            total += p;
        }
        Ok(ExpectedWins {
            per_category,
            total,
        })
    }

    pub fn expected_wins_view(&self, view: &RosterView<'_>) -> Result<ExpectedWins, ValuationError> {
        self.expected_wins_for(&self.project(view)?)
    }

    pub fn expected_wins(&self, team: &Team, pool: &PlayerPool) -> Result<ExpectedWins, ValuationError> {
        self.expected_wins_view(&RosterView::of(team, pool)?)
    }
}
