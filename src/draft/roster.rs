// Team rosters, league-wide roster state, and draft pick placement.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::optimizer;
use super::player::{Player, PlayerKind, Position, HITTER_SLOTS};
use super::pool::PlayerPool;
use crate::config::{LeagueConfig, TeamConfig};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterError {
    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    #[error("player `{0}` is not in the player pool")]
    NotInPool(String),

    #[error("team `{team}` slot {slot} references unknown player `{name}`")]
    UnknownPlayer {
        team: String,
        slot: Position,
        name: String,
    },

    #[error("player `{name}` is rostered more than once (teams `{first}` and `{second}`)")]
    DuplicatePlayer {
        name: String,
        first: String,
        second: String,
    },

    #[error("team `{team}`: {kind} `{name}` cannot occupy a {slot} slot")]
    SlotKindMismatch {
        team: String,
        slot: Position,
        name: String,
        kind: PlayerKind,
    },

    #[error("player `{name}` is already rostered by team `{team}`")]
    AlreadyRostered { name: String, team: String },

    #[error("team `{team}` has no open {kind} slot for `{name}`")]
    NoOpenSlot {
        team: String,
        name: String,
        kind: PlayerKind,
    },

    #[error("team `{team}`: `{name}` cannot be seated in any eligible hitter slot")]
    NoEligibleSlot { team: String, name: String },

    #[error("player `{name}` is not on team `{team}`")]
    NotOnTeam { name: String, team: String },
}

/// A single slot on a team's roster. The label never changes; only occupancy does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSlot {
    pub position: Position,
    /// Name of the occupying player, if any.
    pub player: Option<String>,
}

/// A roster slot with its occupant looked up in the pool.
#[derive(Debug, Clone, Copy)]
pub struct Seat<'a> {
    pub position: Position,
    pub player: Option<&'a Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub slots: Vec<RosterSlot>,
}

impl Team {
    /// A team with the nine hitter slots followed by the given pitcher slots.
    pub fn new(id: &str, name: &str, sp_slots: usize, rp_slots: usize) -> Self {
        let pitchers = std::iter::repeat(Position::StartingPitcher)
            .take(sp_slots)
            .chain(std::iter::repeat(Position::ReliefPitcher).take(rp_slots));
        let slots = HITTER_SLOTS
            .iter()
            .copied()
            .chain(pitchers)
            .map(|position| RosterSlot {
                position,
                player: None,
            })
            .collect();
        Team {
            id: id.to_string(),
            name: name.to_string(),
            slots,
        }
    }

    /// Index of the first empty slot that a player of `kind` may fill.
    pub fn first_empty_slot(&self, kind: PlayerKind) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.player.is_none() && s.position.slot_kind() == kind)
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.player.as_deref() == Some(name))
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.slot_of(name).is_some()
    }

    pub fn slot_count(&self, kind: PlayerKind) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position.slot_kind() == kind)
            .count()
    }

    pub fn empty_count(&self, kind: PlayerKind) -> usize {
        self.slots
            .iter()
            .filter(|s| s.player.is_none() && s.position.slot_kind() == kind)
            .count()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    /// Look every occupant up in the pool.
    ///
    /// Fails on a name missing from the pool, a player sitting in a slot of
    /// the wrong kind, or a player holding two slots; each means the roster
    /// state is corrupt.
    pub fn resolve<'a>(&self, pool: &'a PlayerPool) -> Result<Vec<Seat<'a>>, RosterError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut seats = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let player = match &slot.player {
                None => None,
                Some(name) => {
                    if !seen.insert(name.as_str()) {
                        return Err(RosterError::DuplicatePlayer {
                            name: name.clone(),
                            first: self.id.clone(),
                            second: self.id.clone(),
                        });
                    }
                    let player = pool.get(name).ok_or_else(|| RosterError::UnknownPlayer {
                        team: self.id.clone(),
                        slot: slot.position,
                        name: name.clone(),
                    })?;
                    if player.kind() != slot.position.slot_kind() {
                        return Err(RosterError::SlotKindMismatch {
                            team: self.id.clone(),
                            slot: slot.position,
                            name: name.clone(),
                            kind: player.kind(),
                        });
                    }
                    Some(player)
                }
            };
            seats.push(Seat {
                position: slot.position,
                player,
            });
        }
        Ok(seats)
    }

    pub fn remove_player(&mut self, name: &str) -> bool {
        match self.slot_of(name) {
            Some(i) => {
                self.slots[i].player = None;
                true
            }
            None => false,
        }
    }
}

/// Every team's roster. This is the roster store handed to the valuation
/// engine; nothing else holds roster state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct League {
    teams: Vec<Team>,
}

impl League {
    pub fn new(teams: Vec<Team>) -> Self {
        League { teams }
    }

    /// Build empty rosters for every configured team.
    pub fn from_config(config: &LeagueConfig) -> Self {
        let teams = config
            .teams
            .iter()
            .map(|t| Team::new(&t.id, &t.name, config.roster.sp_slots, config.roster.rp_slots))
            .collect::<Vec<_>>();
        info!(
            "Created {} teams ({} SP / {} RP slots each)",
            teams.len(),
            config.roster.sp_slots,
            config.roster.rp_slots
        );
        League { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: &str) -> Result<&Team, RosterError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| RosterError::UnknownTeam(id.to_string()))
    }

    pub fn team_mut(&mut self, id: &str) -> Result<&mut Team, RosterError> {
        self.teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RosterError::UnknownTeam(id.to_string()))
    }

    /// The team currently rostering `name`, if any.
    pub fn owner_of(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_player(name))
    }

    /// Check the league-wide roster invariants: every occupant exists in the
    /// pool, sits in a slot of its own kind, and appears at most once.
    pub fn validate(&self, pool: &PlayerPool) -> Result<(), RosterError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for team in &self.teams {
            team.resolve(pool)?;
            for name in team.slots.iter().filter_map(|s| s.player.as_deref()) {
                if let Some(first) = seen.insert(name, team.id.as_str()) {
                    return Err(RosterError::DuplicatePlayer {
                        name: name.to_string(),
                        first: first.to_string(),
                        second: team.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Pool players not rostered by any team, in pool order.
    pub fn available<'a>(&self, pool: &'a PlayerPool) -> Vec<&'a Player> {
        pool.iter()
            .filter(|p| self.owner_of(&p.name).is_none())
            .collect()
    }

    /// Record a draft pick and return the slot the player ends up in.
    ///
    /// Pitchers take the first open slot of their kind. Hitters take any open
    /// hitter slot, after which the hitter side is re-optimized; if the
    /// optimizer cannot seat everyone the pick is undone.
    pub fn draft(
        &mut self,
        team_id: &str,
        name: &str,
        pool: &PlayerPool,
    ) -> Result<Position, RosterError> {
        let player = pool
            .get(name)
            .ok_or_else(|| RosterError::NotInPool(name.to_string()))?;
        if let Some(owner) = self.owner_of(name) {
            return Err(RosterError::AlreadyRostered {
                name: name.to_string(),
                team: owner.id.clone(),
            });
        }

        let team = self.team_mut(team_id)?;
        let kind = player.kind();
        let idx = team
            .first_empty_slot(kind)
            .ok_or_else(|| RosterError::NoOpenSlot {
                team: team_id.to_string(),
                name: name.to_string(),
                kind,
            })?;

        let before = team.slots.clone();
        team.slots[idx].player = Some(player.name.clone());

        if kind == PlayerKind::Hitter {
            if let Err(e) = optimizer::optimize(team, pool) {
                team.slots = before;
                warn!("could not seat '{}' on team '{}': {}", name, team_id, e);
                return Err(match e {
                    RosterError::NoEligibleSlot { .. } => RosterError::NoEligibleSlot {
                        team: team_id.to_string(),
                        name: name.to_string(),
                    },
                    other => other,
                });
            }
        }

        let position = team
            .slot_of(name)
            .map(|i| team.slots[i].position)
            .unwrap_or(team.slots[idx].position);
        info!("Team '{}' drafted '{}' into {}", team_id, name, position);
        Ok(position)
    }

    /// Remove a player from a team's roster.
    pub fn release(&mut self, team_id: &str, name: &str) -> Result<(), RosterError> {
        let team = self.team_mut(team_id)?;
        if team.remove_player(name) {
            info!("Team '{}' released '{}'", team_id, name);
            Ok(())
        } else {
            Err(RosterError::NotOnTeam {
                name: name.to_string(),
                team: team_id.to_string(),
            })
        }
    }

    /// Apply the configured keepers. Keepers that cannot be placed are skipped
    /// with a warning. Returns the number placed.
    pub fn load_keepers(&mut self, teams: &[TeamConfig], pool: &PlayerPool) -> usize {
        let mut placed = 0;
        for team in teams {
            for keeper in &team.keepers {
                let Some(player) = pool.find(keeper) else {
                    warn!("keeper '{}' for team '{}' is not in the pool", keeper, team.id);
                    continue;
                };
                let name = player.name.clone();
                match self.draft(&team.id, &name, pool) {
                    Ok(_) => placed += 1,
                    Err(e) => warn!("skipping keeper '{}' for team '{}': {}", name, team.id, e),
                }
            }
        }
        info!("Loaded {} keepers", placed);
        placed
    }
}
