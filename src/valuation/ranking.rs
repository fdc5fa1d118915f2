// Ranking the available player list by marginal value, and the per-category
// "who helps most here" view built on top of it.

use std::cmp::Ordering;

use serde::Serialize;

use super::category::CategoryId;
use super::marginal::{Evaluation, MarginalValue};
use super::projection::RosterView;
use super::{ValuationError, Valuator};
use crate::draft::player::{Player, PlayerKind, Position};
use crate::draft::pool::PlayerPool;
use crate::draft::roster::League;

/// One row of the available-player ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub name: String,
    pub kind: PlayerKind,
    pub positions: Vec<Position>,
    pub value: MarginalValue,
    /// Slot the player would take on the target roster.
    pub slot: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeader {
    pub name: String,
    pub gain: f64,
}

/// Current win probability in one category and the candidates that raise it most.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNeed {
    pub category: CategoryId,
    pub current: f64,
    pub leaders: Vec<CategoryLeader>,
}

/// Descending by value, `NoOpenSlot` after every real delta. Stable, so
/// equal values keep pool order.
fn by_value_desc(a: &MarginalValue, b: &MarginalValue) -> Ordering {
    match (a, b) {
        (MarginalValue::Delta(x), MarginalValue::Delta(y)) => y.total_cmp(x),
        (MarginalValue::Delta(_), MarginalValue::NoOpenSlot) => Ordering::Less,
        (MarginalValue::NoOpenSlot, MarginalValue::Delta(_)) => Ordering::Greater,
        (MarginalValue::NoOpenSlot, MarginalValue::NoOpenSlot) => Ordering::Equal,
    }
}

impl Valuator {
    /// Evaluate every unrostered pool player against `team_id`, best first.
    fn evaluate_available<'p>(
        &self,
        league: &League,
        pool: &'p PlayerPool,
        team_id: &str,
    ) -> Result<Vec<(&'p Player, Option<Evaluation>)>, ValuationError> {
        let team = league.team(team_id)?;
        let view = RosterView::of(team, pool)?;
        let before = self.expected_wins_view(&view)?;

        let mut evaluated = league
            .available(pool)
            .into_iter()
            .map(|player| Ok((player, self.evaluate_against(&view, &before, player)?)))
            .collect::<Result<Vec<_>, ValuationError>>()?;

        evaluated.sort_by(|(_, a), (_, b)| by_value_desc(&value_of(a), &value_of(b)));
        Ok(evaluated)
    }

    /// Marginal value of every available player for `team_id`, sorted
    /// descending. Players with no open slot of their kind come last.
    pub fn rank_available(
        &self,
        league: &League,
        pool: &PlayerPool,
        team_id: &str,
    ) -> Result<Vec<RankedPlayer>, ValuationError> {
        let ranked = self
            .evaluate_available(league, pool, team_id)?
            .into_iter()
            .map(|(player, eval)| RankedPlayer {
                name: player.name.clone(),
                kind: player.kind(),
                positions: player.positions.clone(),
                value: value_of(&eval),
                slot: eval.map(|e| e.slot),
            })
            .collect();
        Ok(ranked)
    }

    /// `rank_available` narrowed to players whose name contains `term`,
    /// ignoring case. Ranks are kept relative to each other.
    pub fn search_available(
        &self,
        league: &League,
        pool: &PlayerPool,
        team_id: &str,
        term: &str,
    ) -> Result<Vec<RankedPlayer>, ValuationError> {
        let needle = term.trim().to_lowercase();
        let mut ranked = self.rank_available(league, pool, team_id)?;
        ranked.retain(|row| row.name.to_lowercase().contains(&needle));
        Ok(ranked)
    }

    /// For each category, the `per_category` players among the top
    /// `shortlist` of the overall ranking with the largest gain in that
    /// category's win probability. Candidates without an open slot are skipped.
    pub fn category_needs(
        &self,
        league: &League,
        pool: &PlayerPool,
        team_id: &str,
        shortlist: usize,
        per_category: usize,
    ) -> Result<Vec<CategoryNeed>, ValuationError> {
        let team = league.team(team_id)?;
        let current = self.expected_wins(team, pool)?;
        let evaluated: Vec<(&Player, Evaluation)> = self
            .evaluate_available(league, pool, team_id)?
            .into_iter()
            .take(shortlist)
            .filter_map(|(player, eval)| eval.map(|e| (player, e)))
            .collect();

        let needs = self
            .categories
            .iter()
            .map(|cat| {
                let mut leaders: Vec<CategoryLeader> = evaluated
                    .iter()
                    .map(|(player, eval)| CategoryLeader {
                        name: player.name.clone(),
                        gain: eval.category_delta(cat.id),
                    })
                    .collect();
                leaders.sort_by(|a, b| b.gain.total_cmp(&a.gain));
                leaders.truncate(per_category);
                CategoryNeed {
                    category: cat.id,
                    current: current.get(cat.id).unwrap_or(0.0),
                    leaders,
                }
            })
            .collect();
        Ok(needs)
    }
}

fn value_of(eval: &Option<Evaluation>) -> MarginalValue {
    match eval {
        Some(e) => MarginalValue::Delta(e.delta()),
        None => MarginalValue::NoOpenSlot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::{HittingLine, PitchingLine};
    use crate::draft::roster::Team;
    use crate::valuation::marginal::NO_SLOT_SENTINEL;
    use crate::valuation::test_support::{approx_eq, replacement, star_hitter_line, valuator};

    fn pool() -> PlayerPool {
        let average = replacement().hitter;
        let speedster = HittingLine {
            sb: 60.0,
            r: 85.0,
            ..average
        };
        PlayerPool::new(vec![
            Player::hitter("Average Joe", vec![Position::FirstBase], average),
            Player::hitter("Star", vec![Position::ShortStop], star_hitter_line()),
            Player::hitter("Speedster", vec![Position::CenterField], speedster),
            Player::reliever(
                "Closer",
                PitchingLine {
                    ip: 2.6,
                    l: 0.1,
                    sv: 0.9,
                    k: 3.4,
                    er: 0.8,
                    wh: 2.6,
                    ..Default::default()
                },
            ),
        ])
    }

    #[test]
    fn ranks_descending_and_skips_rostered() {
        let v = valuator();
        let pool = pool();
        let mut league = League::new(vec![
            Team::new("mine", "My Team", 2, 1),
            Team::new("rival", "Rival", 2, 1),
        ]);
        league.draft("rival", "Speedster", &pool).unwrap();

        let ranked = v.rank_available(&league, &pool, "mine").unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(!names.contains(&"Speedster"));
        assert_eq!(names[0], "Star");
        for pair in ranked.windows(2) {
            assert!(pair[0].value.ranking_key() >= pair[1].value.ranking_key());
        }

        let joe = ranked.iter().find(|r| r.name == "Average Joe").unwrap();
        assert!(approx_eq(joe.value.ranking_key(), 0.0, 1e-12));
        assert_eq!(joe.slot, Some(Position::Catcher));
    }

    #[test]
    fn no_open_slot_sorts_last() {
        let v = valuator();
        let pool = pool();
        let league = League::new(vec![Team::new("mine", "My Team", 1, 0)]);
        // A terrible hitter still outranks a reliever who has nowhere to go.
        let mut players: Vec<Player> = pool.iter().cloned().collect();
        players.push(Player::hitter(
            "Liability",
            vec![],
            HittingLine {
                so: 250.0,
                obp: 0.250,
                ..HittingLine::default()
            },
        ));
        let pool = PlayerPool::new(players);

        let ranked = v.rank_available(&league, &pool, "mine").unwrap();
        let last = ranked.last().unwrap();
        assert_eq!(last.name, "Closer");
        assert_eq!(last.value, MarginalValue::NoOpenSlot);
        assert_eq!(last.value.ranking_key(), NO_SLOT_SENTINEL);
        assert_eq!(last.slot, None);

        let liability = &ranked[ranked.len() - 2];
        assert_eq!(liability.name, "Liability");
        assert!(liability.value.ranking_key() < 0.0);
    }

    #[test]
    fn category_needs_favour_the_specialist() {
        let v = valuator();
        let pool = pool();
        let league = League::new(vec![Team::new("mine", "My Team", 2, 1)]);

        let needs = v.category_needs(&league, &pool, "mine", 50, 2).unwrap();
        assert_eq!(needs.len(), 14);
        assert_eq!(needs[0].category, CategoryId::Runs);

        let sb = needs
            .iter()
            .find(|n| n.category == CategoryId::StolenBases)
            .unwrap();
        assert_eq!(sb.leaders.len(), 2);
        assert_eq!(sb.leaders[0].name, "Speedster");
        assert!(sb.leaders[0].gain > sb.leaders[1].gain);

        let saves = needs.iter().find(|n| n.category == CategoryId::Saves).unwrap();
        assert_eq!(saves.leaders[0].name, "Closer");
        assert!(saves.current > 0.0 && saves.current < 1.0);
    }

    #[test]
    fn search_matches_substring_ignoring_case() {
        let v = valuator();
        let pool = pool();
        let mut league = League::new(vec![
            Team::new("mine", "My Team", 2, 1),
            Team::new("rival", "Rival", 2, 1),
        ]);

        let hits = v.search_available(&league, &pool, "mine", "  STAR").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Star");
        assert!(matches!(hits[0].value, MarginalValue::Delta(d) if d > 0.3));

        // "e" matches several players; order follows the full ranking.
        let hits = v.search_available(&league, &pool, "mine", "e").unwrap();
        let full = v.rank_available(&league, &pool, "mine").unwrap();
        let expected: Vec<&str> = full
            .iter()
            .map(|r| r.name.as_str())
            .filter(|n| n.to_lowercase().contains('e'))
            .collect();
        let got: Vec<&str> = hits.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(got, expected);

        // Rostered players never show up.
        league.draft("rival", "Star", &pool).unwrap();
        assert!(v.search_available(&league, &pool, "mine", "star").unwrap().is_empty());
        assert!(v.search_available(&league, &pool, "mine", "nobody").unwrap().is_empty());
    }

    #[test]
    fn shortlist_limits_candidates() {
        let v = valuator();
        let pool = pool();
        let league = League::new(vec![Team::new("mine", "My Team", 2, 1)]);
        let needs = v.category_needs(&league, &pool, "mine", 1, 5).unwrap();
        for need in needs {
            assert!(need.leaders.len() <= 1);
        }
    }
}
