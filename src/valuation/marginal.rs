// Marginal expected wins of adding one candidate to a team.
//
// Evaluation never touches the league: the candidate is placed into a copy of
// the team's resolved roster and both versions are projected side by side.

use serde::Serialize;
use tracing::debug;

use super::category::CategoryId;
use super::projection::RosterView;
use super::wins::ExpectedWins;
use super::{ValuationError, Valuator};
use crate::draft::player::{Player, Position};
use crate::draft::pool::PlayerPool;
use crate::draft::roster::{League, RosterError};

/// Ranking key used for candidates with no open slot of their kind. Far below
/// any real delta, which is bounded by the number of categories.
pub const NO_SLOT_SENTINEL: f64 = -999.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum MarginalValue {
    /// Change in total expected weekly wins.
    Delta(f64),
    /// Every slot of the candidate's kind is already filled.
    NoOpenSlot,
}

impl MarginalValue {
    pub fn ranking_key(&self) -> f64 {
        match self {
            MarginalValue::Delta(d) => *d,
            MarginalValue::NoOpenSlot => NO_SLOT_SENTINEL,
        }
    }

    pub fn delta(&self) -> Option<f64> {
        match self {
            MarginalValue::Delta(d) => Some(*d),
            MarginalValue::NoOpenSlot => None,
        }
    }
}

/// Expected wins with and without a candidate, and where the candidate landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub slot: Position,
    pub before: ExpectedWins,
    pub after: ExpectedWins,
}

impl Evaluation {
    pub fn delta(&self) -> f64 {
        self.after.total - self.before.total
    }

    pub fn category_delta(&self, id: CategoryId) -> f64 {
        self.after.get(id).unwrap_or(0.0) - self.before.get(id).unwrap_or(0.0)
    }
}

impl Valuator {
    /// Evaluate `candidate` against `team_id`'s current roster.
    ///
    /// The candidate takes the first empty slot of its kind, not the slot that
    /// would score best. `Ok(None)` means no such slot is open. A candidate
    /// already rostered anywhere in the league is an error.
    pub fn evaluate(
        &self,
        league: &League,
        pool: &PlayerPool,
        team_id: &str,
        candidate: &Player,
    ) -> Result<Option<Evaluation>, ValuationError> {
        if let Some(owner) = league.owner_of(&candidate.name) {
            return Err(RosterError::AlreadyRostered {
                name: candidate.name.clone(),
                team: owner.id.clone(),
            }
            .into());
        }
        let team = league.team(team_id)?;
        let view = RosterView::of(team, pool)?;
        let before = self.expected_wins_view(&view)?;
        self.evaluate_against(&view, &before, candidate)
    }

    /// Same as `evaluate`, reusing an already computed baseline. Callers
    /// are responsible for `candidate` not being rostered.
    pub(crate) fn evaluate_against(
        &self,
        view: &RosterView<'_>,
        before: &ExpectedWins,
        candidate: &Player,
    ) -> Result<Option<Evaluation>, ValuationError> {
        let Some((slot, speculative)) = view.with_candidate(candidate) else {
            debug!(
                "team '{}': no open {} slot for '{}'",
                view.team_id,
                candidate.kind(),
                candidate.name
            );
            return Ok(None);
        };
        let after = self.expected_wins_view(&speculative)?;
        debug!(
            "team '{}': '{}' at {} -> {:+.4}",
            view.team_id,
            candidate.name,
            slot,
            after.total - before.total
        );
        Ok(Some(Evaluation {
            slot,
            before: before.clone(),
            after,
        }))
    }

    pub fn marginal_value(
        &self,
        league: &League,
        pool: &PlayerPool,
        team_id: &str,
        candidate: &Player,
    ) -> Result<MarginalValue, ValuationError> {
        Ok(match self.evaluate(league, pool, team_id, candidate)? {
            Some(eval) => MarginalValue::Delta(eval.delta()),
            None => MarginalValue::NoOpenSlot,
        })
    }
}
