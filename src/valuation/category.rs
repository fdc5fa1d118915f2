// Scoring categories and the validated category configuration set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// One scored head-to-head category.
///
/// Variant order is the canonical display and iteration order: hitting
/// categories first, then pitching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryId {
    #[serde(rename = "R")]
    Runs,
    #[serde(rename = "HR")]
    HomeRuns,
    #[serde(rename = "RBI")]
    RunsBattedIn,
    #[serde(rename = "SB")]
    StolenBases,
    #[serde(rename = "SO")]
    BatterStrikeouts,
    #[serde(rename = "TB")]
    TotalBases,
    #[serde(rename = "OBP")]
    OnBasePct,
    #[serde(rename = "L")]
    Losses,
    #[serde(rename = "SV")]
    Saves,
    #[serde(rename = "K")]
    PitcherStrikeouts,
    #[serde(rename = "HLD")]
    Holds,
    #[serde(rename = "ERA")]
    Era,
    #[serde(rename = "WHIP")]
    Whip,
    #[serde(rename = "QS")]
    QualityStarts,
}

/// Whether a category is scored from the hitter or the pitcher side of a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryGroup {
    Hitting,
    Pitching,
}

impl CategoryId {
    pub const ALL: [CategoryId; 14] = [
        CategoryId::Runs,
        CategoryId::HomeRuns,
        CategoryId::RunsBattedIn,
        CategoryId::StolenBases,
        CategoryId::BatterStrikeouts,
        CategoryId::TotalBases,
        CategoryId::OnBasePct,
        CategoryId::Losses,
        CategoryId::Saves,
        CategoryId::PitcherStrikeouts,
        CategoryId::Holds,
        CategoryId::Era,
        CategoryId::Whip,
        CategoryId::QualityStarts,
    ];

    /// Parse a category abbreviation as it appears in categories.toml.
    pub fn from_str_id(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "R" => Some(CategoryId::Runs),
            "HR" => Some(CategoryId::HomeRuns),
            "RBI" => Some(CategoryId::RunsBattedIn),
            "SB" => Some(CategoryId::StolenBases),
            "SO" => Some(CategoryId::BatterStrikeouts),
            "TB" => Some(CategoryId::TotalBases),
            "OBP" => Some(CategoryId::OnBasePct),
            "L" => Some(CategoryId::Losses),
            "SV" => Some(CategoryId::Saves),
            "K" => Some(CategoryId::PitcherStrikeouts),
            "HLD" | "HD" => Some(CategoryId::Holds),
            "ERA" => Some(CategoryId::Era),
            "WHIP" => Some(CategoryId::Whip),
            "QS" => Some(CategoryId::QualityStarts),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            CategoryId::Runs => "R",
            CategoryId::HomeRuns => "HR",
            CategoryId::RunsBattedIn => "RBI",
            CategoryId::StolenBases => "SB",
            CategoryId::BatterStrikeouts => "SO",
            CategoryId::TotalBases => "TB",
            CategoryId::OnBasePct => "OBP",
            CategoryId::Losses => "L",
            CategoryId::Saves => "SV",
            CategoryId::PitcherStrikeouts => "K",
            CategoryId::Holds => "HLD",
            CategoryId::Era => "ERA",
            CategoryId::Whip => "WHIP",
            CategoryId::QualityStarts => "QS",
        }
    }

    pub fn group(&self) -> CategoryGroup {
        match self {
            CategoryId::Runs
            | CategoryId::HomeRuns
            | CategoryId::RunsBattedIn
            | CategoryId::StolenBases
            | CategoryId::BatterStrikeouts
            | CategoryId::TotalBases
            | CategoryId::OnBasePct => CategoryGroup::Hitting,
            _ => CategoryGroup::Pitching,
        }
    }

    /// Rate categories are shown with three decimals.
    pub fn is_rate(&self) -> bool {
        matches!(self, CategoryId::OnBasePct | CategoryId::Era | CategoryId::Whip)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
}

impl Direction {
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Direction::Lower)
    }
}

/// Weekly distribution parameters for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryConfig {
    pub id: CategoryId,
    pub direction: Direction,
    pub weekly_sd: f64,
    pub weekly_avg: f64,
}

/// The complete, validated set of scoring categories.
///
/// Always holds every `CategoryId` exactly once, iterated in `CategoryId::ALL`
/// order regardless of the order they were declared in.
#[derive(Debug, Clone)]
pub struct CategorySet {
    categories: Vec<CategoryConfig>,
}

impl CategorySet {
    pub fn new(mut configs: Vec<CategoryConfig>) -> Result<Self, ConfigError> {
        configs.sort_by_key(|c| c.id);

        for pair in configs.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(ConfigError::ValidationError {
                    field: format!("categories.{}", pair[0].id),
                    message: "declared more than once".into(),
                });
            }
        }

        for id in CategoryId::ALL {
            if !configs.iter().any(|c| c.id == id) {
                return Err(ConfigError::ValidationError {
                    field: format!("categories.{id}"),
                    message: "category is missing".into(),
                });
            }
        }

        for c in &configs {
            if !(c.weekly_sd.is_finite() && c.weekly_sd > 0.0) {
                return Err(ConfigError::ValidationError {
                    field: format!("categories.{}.weekly_sd", c.id),
                    message: format!("must be finite and > 0, got {}", c.weekly_sd),
                });
            }
            if !c.weekly_avg.is_finite() {
                return Err(ConfigError::ValidationError {
                    field: format!("categories.{}.weekly_avg", c.id),
                    message: format!("must be finite, got {}", c.weekly_avg),
                });
            }
        }

        Ok(CategorySet { categories: configs })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryConfig> {
        self.categories.iter()
    }

    pub fn get(&self, id: CategoryId) -> &CategoryConfig {
        // Construction guarantees every id is present, sorted by id.
        &self.categories[id as usize]
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
