// League-wide player pool and loaders for the normalized projection CSVs.
//
// Hitter rows carry season totals and a comma-separated eligibility list.
// Pitcher rows carry weekly components (`*_wk` columns) and a Type column
// (SP/RP) that decides which roster slots the pitcher can fill.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::player::{HittingLine, PitchingLine, Player, PlayerKind, Position};

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

/// Every draftable player, in load order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<Player>,
    index: HashMap<String, usize>,
}

impl PlayerPool {
    /// Build a pool keyed by name.
    ///
    /// A repeated name of the same kind keeps the first occurrence. A name
    /// already taken by a player of another kind (a hitter and a pitcher who
    /// share a name) is kept under `"<name> (<kind>)"`, e.g. `"Will Smith (RP)"`.
    pub fn new(players: Vec<Player>) -> Self {
        let mut pool = PlayerPool::default();
        for mut player in players {
            if let Some(&i) = pool.index.get(&player.name) {
                let existing = pool.players[i].kind();
                if existing == player.kind() {
                    warn!("duplicate player '{}' in pool, keeping first entry", player.name);
                    continue;
                }
                let renamed = format!("{} ({})", player.name, player.kind());
                if pool.index.contains_key(&renamed) {
                    warn!("duplicate player '{}' in pool, keeping first entry", renamed);
                    continue;
                }
                warn!(
                    "{} '{}' shares a name with a {}; listed as '{}'",
                    player.kind(),
                    player.name,
                    existing,
                    renamed
                );
                player.name = renamed;
            }
            pool.index.insert(player.name.clone(), pool.players.len());
            pool.players.push(player);
        }
        pool
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.index.get(name).map(|&i| &self.players[i])
    }

    /// Case-insensitive exact-name lookup, for user-typed names.
    pub fn find(&self, name: &str) -> Option<&Player> {
        self.get(name).or_else(|| {
            let needle = name.trim();
            self.players
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(needle))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn count_kind(&self, kind: PlayerKind) -> usize {
        self.players.iter().filter(|p| p.kind() == kind).count()
    }
}

// ---------------------------------------------------------------------------
// Raw CSV rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawHitter {
    Name: String,
    #[serde(default)]
    PA: f64,
    R: f64,
    HR: f64,
    RBI: f64,
    SO: f64,
    TB: f64,
    SB: f64,
    OBP: f64,
    #[serde(default, alias = "Position", alias = "POS")]
    Pos: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitcher {
    Name: String,
    #[serde(alias = "POS")]
    Type: String,
    IP_wk: f64,
    #[serde(default)]
    L_wk: f64,
    #[serde(default)]
    SV_wk: f64,
    #[serde(default)]
    HLD_wk: f64,
    #[serde(default)]
    K_wk: f64,
    #[serde(default)]
    QS_wk: f64,
    ER_wk: f64,
    WH_wk: f64,
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn all_non_negative(values: &[f64]) -> bool {
    values.iter().all(|&v| v >= 0.0)
}

fn load_hitters_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut hitters = Vec::new();
    for result in reader.deserialize::<RawHitter>() {
        match result {
            Ok(raw) => {
                let name = raw.Name.trim();
                let values = [raw.PA, raw.R, raw.HR, raw.RBI, raw.SO, raw.TB, raw.SB, raw.OBP];
                if !all_finite(&values) {
                    warn!("skipping hitter '{}': non-finite stat value", name);
                    continue;
                }
                if !all_non_negative(&values) || raw.OBP > 1.0 {
                    warn!("skipping hitter '{}': negative count or OBP outside [0, 1]", name);
                    continue;
                }
                let (positions, unknown) = Position::parse_eligibility(&raw.Pos);
                if !unknown.is_empty() {
                    warn!("hitter '{}': ignoring unknown positions {:?}", name, unknown);
                }
                hitters.push(Player::hitter(
                    name,
                    positions,
                    HittingLine {
                        pa: raw.PA,
                        r: raw.R,
                        hr: raw.HR,
                        rbi: raw.RBI,
                        so: raw.SO,
                        tb: raw.TB,
                        sb: raw.SB,
                        obp: raw.OBP,
                    },
                ));
            }
            Err(e) => {
                warn!("skipping malformed hitter row: {}", e);
            }
        }
    }
    Ok(hitters)
}

fn load_pitchers_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pitchers = Vec::new();
    for result in reader.deserialize::<RawPitcher>() {
        match result {
            Ok(raw) => {
                let name = raw.Name.trim();
                let values = [
                    raw.IP_wk, raw.L_wk, raw.SV_wk, raw.HLD_wk, raw.K_wk, raw.QS_wk, raw.ER_wk,
                    raw.WH_wk,
                ];
                if !all_finite(&values) {
                    warn!("skipping pitcher '{}': non-finite stat value", name);
                    continue;
                }
                if raw.IP_wk <= 0.0 || !all_non_negative(&values) {
                    warn!(
                        "skipping pitcher '{}': IP_wk must be > 0 and components >= 0",
                        name
                    );
                    continue;
                }
                let line = PitchingLine {
                    ip: raw.IP_wk,
                    l: raw.L_wk,
                    sv: raw.SV_wk,
                    hld: raw.HLD_wk,
                    k: raw.K_wk,
                    qs: raw.QS_wk,
                    er: raw.ER_wk,
                    wh: raw.WH_wk,
                };
                match raw.Type.trim().to_uppercase().as_str() {
                    "SP" => pitchers.push(Player::starter(name, line)),
                    "RP" => pitchers.push(Player::reliever(name, line)),
                    other => {
                        warn!("skipping pitcher '{}': unknown Type '{}'", name, other);
                    }
                }
            }
            Err(e) => {
                warn!("skipping malformed pitcher row: {}", e);
            }
        }
    }
    Ok(pitchers)
}

fn open(path: &Path) -> Result<std::fs::File, PoolError> {
    std::fs::File::open(path).map_err(|e| PoolError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_hitters(path: &Path) -> Result<Vec<Player>, PoolError> {
    load_hitters_from_reader(open(path)?).map_err(|e| PoolError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_pitchers(path: &Path) -> Result<Vec<Player>, PoolError> {
    load_pitchers_from_reader(open(path)?).map_err(|e| PoolError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load both CSVs into a single pool, hitters first.
///
/// Names are the roster keys. A pitcher sharing a hitter's name is renamed
/// with a kind suffix; see `PlayerPool::new`.
pub fn load_pool(hitters_path: &Path, pitchers_path: &Path) -> Result<PlayerPool, PoolError> {
    let hitters = load_hitters(hitters_path)?;
    let pitchers = load_pitchers(pitchers_path)?;

    if hitters.is_empty() {
        return Err(PoolError::Validation(
            "hitter CSV produced zero valid rows".into(),
        ));
    }
    if pitchers.is_empty() {
        return Err(PoolError::Validation(
            "pitcher CSV produced zero valid rows".into(),
        ));
    }

    info!(
        "Loaded pool: {} hitters, {} pitchers",
        hitters.len(),
        pitchers.len()
    );
    Ok(PlayerPool::new(hitters.into_iter().chain(pitchers).collect()))
}
