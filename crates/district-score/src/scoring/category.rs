use super::ScoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CATEGORY_COUNT: usize = 8;

/// Closed set of scoring categories, in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Safety,
    Walkability,
    Transport,
    Medical,
    Social,
    CultureWelfare,
    WalkSports,
    Nature,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; CATEGORY_COUNT] = [
        CategoryKey::Safety,
        CategoryKey::Walkability,
        CategoryKey::Transport,
        CategoryKey::Medical,
        CategoryKey::Social,
        CategoryKey::CultureWelfare,
        CategoryKey::WalkSports,
        CategoryKey::Nature,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Safety => "safety",
            CategoryKey::Walkability => "walkability",
            CategoryKey::Transport => "transport",
            CategoryKey::Medical => "medical",
            CategoryKey::Social => "social",
            CategoryKey::CultureWelfare => "culture_welfare",
            CategoryKey::WalkSports => "walk_sports",
            CategoryKey::Nature => "nature",
        }
    }

    /// Hyphenated form used in route paths (`/culture-welfare-priority`).
    pub fn slug(self) -> &'static str {
        match self {
            CategoryKey::CultureWelfare => "culture-welfare",
            CategoryKey::WalkSports => "walk-sports",
            other => other.as_str(),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn category(self) -> &'static Category {
        &CATEGORY_MAP[self.index()]
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = ScoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| ScoreError::Validation(format!("unknown category '{}'", value.trim())))
    }
}

/// Indicator columns sharing a polarity, plus the phrases used to describe them.
#[derive(Debug)]
pub struct Category {
    pub key: CategoryKey,
    pub name: &'static str,
    pub columns: &'static [&'static str],
    /// Lower raw values are better.
    pub invert: bool,
    pub label: &'static str,
    pub shortfall_label: &'static str,
    pub title: &'static str,
    pub unit: &'static str,
}

const HIGHER_IS_BETTER: &str = "index (higher is better)";
const LOWER_IS_BETTER: &str = "index (lower is better)";

pub static CATEGORY_MAP: [Category; CATEGORY_COUNT] = [
    Category {
        key: CategoryKey::Safety,
        name: "Safety",
        columns: &["crime_rate", "senior_pedestrian_accidents"],
        invert: true,
        label: "safest",
        shortfall_label: "least safe",
        title: "Safest districts for seniors",
        unit: LOWER_IS_BETTER,
    },
    Category {
        key: CategoryKey::Walkability,
        name: "Walkability",
        columns: &["sidewalk_ratio", "crosswalk_density"],
        invert: false,
        label: "most walkable",
        shortfall_label: "least walkable",
        title: "Most walkable districts",
        unit: HIGHER_IS_BETTER,
    },
    Category {
        key: CategoryKey::Transport,
        name: "Public transport",
        columns: &[
            "bus_stop_density",
            "subway_station_density",
            "low_floor_bus_ratio",
        ],
        invert: false,
        label: "best-connected",
        shortfall_label: "least connected",
        title: "Best-connected districts by public transport",
        unit: HIGHER_IS_BETTER,
    },
    Category {
        key: CategoryKey::Medical,
        name: "Medical access",
        columns: &["hospital_density", "pharmacy_density"],
        invert: false,
        label: "most medically accessible",
        shortfall_label: "least medically accessible",
        title: "Districts with the best medical access",
        unit: HIGHER_IS_BETTER,
    },
    Category {
        key: CategoryKey::Social,
        name: "Social life",
        columns: &["senior_center_density", "senior_club_density"],
        invert: false,
        label: "most socially active",
        shortfall_label: "least socially active",
        title: "Most socially active districts",
        unit: HIGHER_IS_BETTER,
    },
    Category {
        key: CategoryKey::CultureWelfare,
        name: "Culture & welfare",
        columns: &["welfare_facility_density", "cultural_facility_density"],
        invert: false,
        label: "most culturally enriched",
        shortfall_label: "least culturally enriched",
        title: "Districts richest in culture and welfare facilities",
        unit: HIGHER_IS_BETTER,
    },
    Category {
        key: CategoryKey::WalkSports,
        name: "Walking & sports",
        columns: &["walking_trail_length", "sports_facility_density"],
        invert: false,
        label: "most active",
        shortfall_label: "least active",
        title: "Best districts for walking and sports",
        unit: HIGHER_IS_BETTER,
    },
    Category {
        key: CategoryKey::Nature,
        name: "Nature",
        columns: &["park_area_ratio", "green_space_ratio"],
        invert: false,
        label: "greenest",
        shortfall_label: "least green",
        title: "Greenest districts",
        unit: HIGHER_IS_BETTER,
    },
];

/// Polarity of a raw column. Columns no category declares are taken as higher-is-better.
pub fn column_inverted(column: &str) -> bool {
    CATEGORY_MAP
        .iter()
        .find(|category| category.columns.contains(&column))
        .map(|category| category.invert)
        .unwrap_or(false)
}
