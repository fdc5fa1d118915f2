// Roster state: players and the pool they come from, team rosters with the
// hitter slot optimizer, and the persisted pick log.

pub mod optimizer;
pub mod picks;
pub mod player;
pub mod pool;
pub mod roster;
