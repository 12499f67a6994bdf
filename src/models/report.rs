use serde::{Deserialize, Serialize};

use super::ForecastDay;

/// Coarse compass heading produced by a classification policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub fn as_str(&self) -> &'static str {
        match self {
            Heading::North => "N",
            Heading::East => "E",
            Heading::South => "S",
            Heading::West => "W",
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which wind table a report renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// Date, speed, gust and four-point direction
    Wind,
    /// Compact east/west table with the flight-path marker
    #[default]
    Easterly,
}

impl ReportStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStyle::Wind => "wind",
            ReportStyle::Easterly => "easterly",
        }
    }
}

impl std::fmt::Display for ReportStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominant {
    East,
    West,
    Mixed,
}

impl Dominant {
    pub fn from_counts(east: usize, west: usize) -> Self {
        if east > west {
            Dominant::East
        } else if west > east {
            Dominant::West
        } else {
            Dominant::Mixed
        }
    }

    /// Label used in the analysis line; east carries the plane marker
    pub fn label(&self) -> &'static str {
        match self {
            Dominant::East => "E ✈️",
            Dominant::West => "W",
            Dominant::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for Dominant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EasterlySummary {
    pub east_count: usize,
    pub west_count: usize,
    pub dominant: Dominant,
}

impl EasterlySummary {
    pub fn new(east_count: usize, total: usize) -> Self {
        let west_count = total.saturating_sub(east_count);
        Self {
            east_count,
            west_count,
            dominant: Dominant::from_counts(east_count, west_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub day: ForecastDay,
    pub heading: Heading,
    pub easterly: bool,
}

/// One cycle's classified wind forecast
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub style: ReportStyle,
    pub rows: Vec<ReportRow>,
    pub summary: EasterlySummary,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dates on which the easterly flag flips relative to the previous day
    pub fn direction_changes(&self) -> Vec<chrono::NaiveDate> {
        self.rows
            .windows(2)
            .filter(|pair| pair[0].easterly != pair[1].easterly)
            .map(|pair| pair[1].day.date)
            .collect()
    }
}
