// Weekly category projections for a roster, with replacement-level fill for
// empty slots.

use std::collections::BTreeMap;

use serde::Serialize;

use super::category::CategoryId;
use super::{ValuationError, Valuator};
use crate::draft::player::{PitchingLine, Player, PlayerKind, Position};
use crate::draft::pool::PlayerPool;
use crate::draft::roster::{RosterError, Seat, Team};

/// A team's roster resolved against the pool. Cheap to copy, so speculative
/// changes are made on a copy rather than on the team itself.
#[derive(Debug, Clone)]
pub struct RosterView<'a> {
    pub team_id: &'a str,
    pub seats: Vec<Seat<'a>>,
}

impl<'a> RosterView<'a> {
    pub fn of(team: &'a Team, pool: &'a PlayerPool) -> Result<Self, RosterError> {
        Ok(RosterView {
            team_id: &team.id,
            seats: team.resolve(pool)?,
        })
    }

    /// Copy of this view with `candidate` in the first empty slot of its kind,
    /// plus that slot's label. `None` when every such slot is filled.
    pub fn with_candidate(&self, candidate: &'a Player) -> Option<(Position, RosterView<'a>)> {
        let kind = candidate.kind();
        let idx = self
            .seats
            .iter()
            .position(|s| s.player.is_none() && s.position.slot_kind() == kind)?;
        let mut speculative = self.clone();
        speculative.seats[idx].player = Some(candidate);
        Some((self.seats[idx].position, speculative))
    }

    fn seats_of(&self, kind: PlayerKind) -> impl Iterator<Item = &Seat<'a>> {
        self.seats
            .iter()
            .filter(move |s| s.position.slot_kind() == kind)
    }
}

/// One weekly value per category, iterated in canonical category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyProjection {
    pub values: BTreeMap<CategoryId, f64>,
}

impl WeeklyProjection {
    pub fn get(&self, id: CategoryId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    fn merge(mut self, other: WeeklyProjection) -> Self {
        self.values.extend(other.values);
        self
    }
}

impl Valuator {
    /// Hitting categories for the view's nine hitter slots.
    ///
    /// Counting stats are season totals summed across slots and divided by
    /// the number of weeks. OBP is the unweighted mean of the slot OBPs, so
    /// each slot is exactly 1/9 of team OBP regardless of plate appearances.
    pub fn project_hitting(&self, view: &RosterView<'_>) -> WeeklyProjection {
        let weeks = f64::from(self.num_weeks);
        let baseline = &self.replacement.hitter;

        let (mut r, mut hr, mut rbi, mut so, mut tb, mut sb, mut obp) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let mut slots = 0usize;
        for seat in view.seats_of(PlayerKind::Hitter) {
            let line = seat.player.and_then(Player::hitting).unwrap_or(baseline);
            r += line.r;
            hr += line.hr;
            rbi += line.rbi;
            so += line.so;
            tb += line.tb;
            sb += line.sb;
            obp += line.obp;
            slots += 1;
        }
        let team_obp = if slots == 0 {
            baseline.obp
        } else {
            obp / slots as f64
        };

        WeeklyProjection {
            values: BTreeMap::from([
                (CategoryId::Runs, r / weeks),
                (CategoryId::HomeRuns, hr / weeks),
                (CategoryId::RunsBattedIn, rbi / weeks),
                (CategoryId::StolenBases, sb / weeks),
                (CategoryId::BatterStrikeouts, so / weeks),
                (CategoryId::TotalBases, tb / weeks),
                (CategoryId::OnBasePct, team_obp),
            ]),
        }
    }

    /// Pitching categories for the view's SP and RP slots.
    ///
    /// Slot lines are already weekly, so counting categories are plain sums.
    /// ERA and WHIP are derived from the summed earned runs, walks plus hits,
    /// and innings.
    pub fn project_pitching(&self, view: &RosterView<'_>) -> Result<WeeklyProjection, ValuationError> {
        let starters = view.seats_of(PlayerKind::StarterPitcher).map(|s| {
            s.player
                .and_then(Player::pitching)
                .unwrap_or(&self.replacement.sp_per_start)
        });
        let relievers = view.seats_of(PlayerKind::ReliefPitcher).map(|s| {
            s.player
                .and_then(Player::pitching)
                .unwrap_or(&self.replacement.rp_per_slot)
        });

        let total = starters.chain(relievers).fold(PitchingLine::default(), |acc, line| acc + *line);

        let (Some(era), Some(whip)) = (total.era(), total.whip()) else {
            return Err(ValuationError::ZeroInnings {
                team: view.team_id.to_string(),
            });
        };

        Ok(WeeklyProjection {
            values: BTreeMap::from([
                (CategoryId::Losses, total.l),
                (CategoryId::Saves, total.sv),
                (CategoryId::PitcherStrikeouts, total.k),
                (CategoryId::Holds, total.hld),
                (CategoryId::Era, era),
                (CategoryId::Whip, whip),
                (CategoryId::QualityStarts, total.qs),
            ]),
        })
    }

    /// All fourteen categories.
    pub fn project(&self, view: &RosterView<'_>) -> Result<WeeklyProjection, ValuationError> {
        Ok(self.project_hitting(view).merge(self.project_pitching(view)?))
    }

    pub fn project_team(&self, team: &Team, pool: &PlayerPool) -> Result<WeeklyProjection, ValuationError> {
        self.project(&RosterView::of(team, pool)?)
    }
}
