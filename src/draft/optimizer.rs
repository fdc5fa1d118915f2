// Hitter slot assignment: most-constrained-first greedy.
//
// Not a matching solver. A hitter whose only open options were taken by
// earlier, equally constrained hitters is reported rather than dropped.

use tracing::debug;

use super::player::{Player, PlayerKind, Position};
use super::pool::PlayerPool;
use super::roster::{RosterError, Team};

/// Reassign the team's rostered hitters to hitter slots. Pitcher slots are untouched.
///
/// Hitters are placed in ascending order of eligible-slot count (stable, so
/// ties keep their current roster order). Each takes the first open slot among
/// its declared positions, in declared order, falling back to the universal
/// slot. If some hitter cannot be seated the roster is left exactly as it was
/// and `NoEligibleSlot` names that hitter.
pub fn optimize(team: &mut Team, pool: &PlayerPool) -> Result<(), RosterError> {
    let mut hitters: Vec<(&Player, Vec<Position>)> = Vec::new();
    for slot in team.slots.iter().filter(|s| s.position.is_hitter()) {
        let Some(name) = &slot.player else {
            continue;
        };
        let player = pool.get(name).ok_or_else(|| RosterError::UnknownPlayer {
            team: team.id.clone(),
            slot: slot.position,
            name: name.clone(),
        })?;
        if player.kind() != PlayerKind::Hitter {
            return Err(RosterError::SlotKindMismatch {
                team: team.id.clone(),
                slot: slot.position,
                name: name.clone(),
                kind: player.kind(),
            });
        }
        hitters.push((player, player.eligible_slots()));
    }

    hitters.sort_by_key(|(_, eligible)| eligible.len());

    let before = team.slots.clone();
    for slot in team.slots.iter_mut().filter(|s| s.position.is_hitter()) {
        slot.player = None;
    }

    for (player, eligible) in &hitters {
        let open = |pos: Position| {
            team.slots
                .iter()
                .position(|s| s.position == pos && s.player.is_none())
        };
        let target = eligible
            .iter()
            .filter(|pos| !pos.is_universal())
            .find_map(|&pos| open(pos))
            .or_else(|| open(Position::Utility));

        match target {
            Some(i) => {
                debug!(
                    "team '{}': {} -> {}",
                    team.id, player.name, team.slots[i].position
                );
                team.slots[i].player = Some(player.name.clone());
            }
            None => {
                team.slots = before;
                return Err(RosterError::NoEligibleSlot {
                    team: team.id.clone(),
                    name: player.name.clone(),
                });
            }
        }
    }

    Ok(())
}
