// Pick log: the draft picks made so far, kept in `config/picks.toml` so the
// board carries over between runs.
//
// ```toml
// [[picks]]
// team = "team_3"
// player = "Aaron Judge"
// ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::pool::PlayerPool;
use super::roster::League;

#[derive(Debug, Error)]
pub enum PickLogError {
    #[error("failed to access pick log {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse pick log {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize pick log: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedPick {
    pub team: String,
    pub player: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickLog {
    #[serde(default)]
    pub picks: Vec<RecordedPick>,
}

impl PickLog {
    /// Read the log at `path`. A missing file is an empty log.
    pub fn load(path: &Path) -> Result<Self, PickLogError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PickLog::default()),
            Err(source) => {
                return Err(PickLogError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| PickLogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), PickLogError> {
        let text = toml::to_string(self)?;
        let io_err = |source: std::io::Error| PickLogError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, text).map_err(io_err)
    }

    /// Append one pick to the log at `path`.
    pub fn append(path: &Path, pick: RecordedPick) -> Result<(), PickLogError> {
        let mut log = PickLog::load(path)?;
        log.picks.push(pick);
        log.save(path)
    }

    /// Remove and return the most recent pick in the log at `path`.
    pub fn pop(path: &Path) -> Result<Option<RecordedPick>, PickLogError> {
        let mut log = PickLog::load(path)?;
        let last = log.picks.pop();
        if last.is_some() {
            log.save(path)?;
        }
        Ok(last)
    }

    /// Draft every logged pick into `league`, in order. Picks that no longer
    /// apply (player gone from the pool, already rostered, no open slot) are
    /// skipped with a warning. Returns how many were placed.
    pub fn replay(&self, league: &mut League, pool: &PlayerPool) -> usize {
        let mut placed = 0;
        for pick in &self.picks {
            let Some(player) = pool.find(&pick.player) else {
                warn!("logged pick '{}' for team '{}' is not in the pool", pick.player, pick.team);
                continue;
            };
            let name = player.name.clone();
            match league.draft(&pick.team, &name, pool) {
                Ok(_) => placed += 1,
                Err(e) => warn!("skipping logged pick '{}' for team '{}': {}", name, pick.team, e),
            }
        }
        info!("Replayed {} of {} logged picks", placed, self.picks.len());
        placed
    }
}
