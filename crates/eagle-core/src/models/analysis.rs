use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of land-cover change the user asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeTarget {
    #[default]
    LandUse,
    Deforestation,
    Vegetation,
    Urban,
    Water,
}

impl ChangeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeTarget::LandUse => "land-use",
            ChangeTarget::Deforestation => "deforestation",
            ChangeTarget::Vegetation => "vegetation",
            ChangeTarget::Urban => "urban",
            ChangeTarget::Water => "water",
        }
    }

    /// Map free-form wording ("urban expansion", "NDVI change") onto a target.
    ///
    /// Anything unrecognised falls back to [`ChangeTarget::LandUse`].
    pub fn from_loose(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        if text.contains("defor") || text.contains("forest loss") || text.contains("logging") {
            ChangeTarget::Deforestation
        } else if text.contains("veget") || text.contains("ndvi") || text.contains("green") {
            ChangeTarget::Vegetation
        } else if text.contains("urban") || text.contains("built") || text.contains("city") {
            ChangeTarget::Urban
        } else if text.contains("water") || text.contains("flood") {
            ChangeTarget::Water
        } else {
            ChangeTarget::LandUse
        }
    }
}

impl fmt::Display for ChangeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of a date range a loosely specified date belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parse `YYYY-MM-DD` or a bare year.
///
/// A bare year resolves to January 1st for [`DateBound::Start`] and
/// December 31st for [`DateBound::End`]. Anything else yields `None`.
pub fn parse_date_lenient(text: &str, bound: DateBound) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if text.len() == 4 {
        let year: i32 = text.parse().ok()?;
        return match bound {
            DateBound::Start => NaiveDate::from_ymd_opt(year, 1, 1),
            DateBound::End => NaiveDate::from_ymd_opt(year, 12, 31),
        };
    }
    None
}

/// Structured interpretation of a query, produced once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub target: ChangeTarget,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: String,
    /// Set when the summary came from a fallback path
    #[serde(default)]
    pub degraded: bool,
}

impl AnalysisResult {
    pub fn meta(&self) -> AnalysisMeta {
        AnalysisMeta {
            target: self.target,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// The subset of an analysis the inference stage needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub target: ChangeTarget,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<&AnalysisResult> for AnalysisMeta {
    fn from(analysis: &AnalysisResult) -> Self {
        analysis.meta()
    }
}
