// Players, positions, and the stat lines the valuation engine consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Roster slot labels. Hitter slots first, then pitcher slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    Utility,
    StartingPitcher,
    ReliefPitcher,
}

/// The nine hitter slots every team carries, in roster order.
pub const HITTER_SLOTS: [Position; 9] = [
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::Utility,
];

impl Position {
    /// Parse a single position label.
    ///
    /// "UT", "UTIL" and "DH" all map to the universal `Utility` slot. Generic
    /// "OF" is not a single slot; use `parse_eligibility` for that.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "3B" => Some(Position::ThirdBase),
            "SS" => Some(Position::ShortStop),
            "LF" => Some(Position::LeftField),
            "CF" => Some(Position::CenterField),
            "RF" => Some(Position::RightField),
            "UT" | "UTIL" | "DH" => Some(Position::Utility),
            "SP" => Some(Position::StartingPitcher),
            "RP" => Some(Position::ReliefPitcher),
            _ => None,
        }
    }

    /// Parse a comma-separated eligibility list such as `"1B,OF,UT"`.
    ///
    /// `OF` expands to LF, CF, RF. Unknown labels are returned separately so the
    /// caller can decide whether to warn.
    pub fn parse_eligibility(s: &str) -> (Vec<Position>, Vec<String>) {
        let mut positions = Vec::new();
        let mut unknown = Vec::new();
        for label in s.split(|c| c == ',' || c == '/').map(str::trim) {
            if label.is_empty() {
                continue;
            }
            if label.eq_ignore_ascii_case("OF") {
                positions.extend([
                    Position::LeftField,
                    Position::CenterField,
                    Position::RightField,
                ]);
            } else if let Some(pos) = Position::from_str_pos(label) {
                positions.push(pos);
            } else {
                unknown.push(label.to_string());
            }
        }
        (positions, unknown)
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::Utility => "UTIL",
            Position::StartingPitcher => "SP",
            Position::ReliefPitcher => "RP",
        }
    }

    pub fn is_hitter(&self) -> bool {
        !matches!(self, Position::StartingPitcher | Position::ReliefPitcher)
    }

    /// The slot any hitter may fill.
    pub fn is_universal(&self) -> bool {
        matches!(self, Position::Utility)
    }

    /// Which kind of player may occupy a slot with this label.
    pub fn slot_kind(&self) -> PlayerKind {
        match self {
            Position::StartingPitcher => PlayerKind::StarterPitcher,
            Position::ReliefPitcher => PlayerKind::ReliefPitcher,
            _ => PlayerKind::Hitter,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    Hitter,
    StarterPitcher,
    ReliefPitcher,
}

impl PlayerKind {
    pub fn display_str(&self) -> &'static str {
        match self {
            PlayerKind::Hitter => "H",
            PlayerKind::StarterPitcher => "SP",
            PlayerKind::ReliefPitcher => "RP",
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Season-total hitting projection. OBP is a rate, everything else a count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HittingLine {
    #[serde(default)]
    pub pa: f64,
    pub r: f64,
    pub hr: f64,
    pub rbi: f64,
    pub so: f64,
    pub tb: f64,
    pub sb: f64,
    pub obp: f64,
}

/// Weekly pitching components.
///
/// Starters carry a per-start line already scaled to their weekly share of
/// starts; relievers carry a per-slot weekly line. ERA and WHIP are derived
/// from `er`, `wh` (walks + hits) and `ip` when lines are combined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitchingLine {
    pub ip: f64,
    #[serde(default)]
    pub l: f64,
    #[serde(default)]
    pub sv: f64,
    #[serde(default)]
    pub hld: f64,
    #[serde(default)]
    pub k: f64,
    #[serde(default)]
    pub qs: f64,
    pub er: f64,
    pub wh: f64,
}

impl std::ops::Add for PitchingLine {
    type Output = PitchingLine;

    fn add(self, other: PitchingLine) -> PitchingLine {
        PitchingLine {
            ip: self.ip + other.ip,
            l: self.l + other.l,
            sv: self.sv + other.sv,
            hld: self.hld + other.hld,
            k: self.k + other.k,
            qs: self.qs + other.qs,
            er: self.er + other.er,
            wh: self.wh + other.wh,
        }
    }
}

impl PitchingLine {
    /// `None` when the line has no innings.
    pub fn era(&self) -> Option<f64> {
        (self.ip > 0.0).then(|| self.er * 9.0 / self.ip)
    }

    pub fn whip(&self) -> Option<f64> {
        (self.ip > 0.0).then(|| self.wh / self.ip)
    }
}

/// A player's projection. The variant fixes the player's kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Projection {
    Hitter(HittingLine),
    StarterPitcher(PitchingLine),
    ReliefPitcher(PitchingLine),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub projection: Projection,
    /// Declared eligible positions, in declared order. Empty for pitchers.
    pub positions: Vec<Position>,
}

impl Player {
    pub fn hitter(name: &str, positions: Vec<Position>, line: HittingLine) -> Self {
        Player {
            name: name.to_string(),
            projection: Projection::Hitter(line),
            positions,
        }
    }

    pub fn starter(name: &str, line: PitchingLine) -> Self {
        Player {
            name: name.to_string(),
            projection: Projection::StarterPitcher(line),
            positions: vec![],
        }
    }

    pub fn reliever(name: &str, line: PitchingLine) -> Self {
        Player {
            name: name.to_string(),
            projection: Projection::ReliefPitcher(line),
            positions: vec![],
        }
    }

    pub fn kind(&self) -> PlayerKind {
        match self.projection {
            Projection::Hitter(_) => PlayerKind::Hitter,
            Projection::StarterPitcher(_) => PlayerKind::StarterPitcher,
            Projection::ReliefPitcher(_) => PlayerKind::ReliefPitcher,
        }
    }

    pub fn hitting(&self) -> Option<&HittingLine> {
        match &self.projection {
            Projection::Hitter(line) => Some(line),
            _ => None,
        }
    }

    pub fn pitching(&self) -> Option<&PitchingLine> {
        match &self.projection {
            Projection::StarterPitcher(line) | Projection::ReliefPitcher(line) => Some(line),
            Projection::Hitter(_) => None,
        }
    }

    /// Slots this hitter may occupy: declared non-universal hitter positions
    /// (deduplicated, in declared order) followed by the universal slot.
    /// Pitchers get an empty list.
    pub fn eligible_slots(&self) -> Vec<Position> {
        if self.kind() != PlayerKind::Hitter {
            return vec![];
        }
        let mut slots: Vec<Position> = Vec::with_capacity(self.positions.len() + 1);
        for &pos in &self.positions {
            if pos.is_hitter() && !pos.is_universal() && !slots.contains(&pos) {
                slots.push(pos);
            }
        }
        slots.push(Position::Utility);
        slots
    }
}
