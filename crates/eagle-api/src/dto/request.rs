use eagle_core::models::{parse_date_lenient, AnalysisMeta, BBox, ChangeTarget, DateBound};
use eagle_core::Result;
use serde::Deserialize;

/// `POST /api/query` body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: Option<String>,
}

impl QueryRequest {
    /// The query text, if present and non-blank
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// `POST /api/run-inference` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInferenceRequest {
    pub bbox: Option<Vec<f64>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub target: Option<String>,
}

impl RunInferenceRequest {
    pub fn bbox(&self) -> Result<BBox> {
        BBox::from_slice(self.bbox.as_deref().unwrap_or_default())
    }

    pub fn meta(&self) -> AnalysisMeta {
        AnalysisMeta {
            target: self.target.as_deref().map(ChangeTarget::from_loose).unwrap_or_default(),
            start_date: self
                .start_date
                .as_deref()
                .and_then(|d| parse_date_lenient(d, DateBound::Start)),
            end_date: self.end_date.as_deref().and_then(|d| parse_date_lenient(d, DateBound::End)),
        }
    }
}
