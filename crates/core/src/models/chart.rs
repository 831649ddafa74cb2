use serde::{Deserialize, Serialize};

use crate::api::endpoints;
use crate::errors::ClientError;

/// Colours cycled across chart segments.
pub const PALETTE: [&str; 6] = [
    "#007bff", "#28a745", "#dc3545", "#ffc107", "#17a2b8", "#6610f2",
];

/// Which spending summary to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Totals grouped by class name
    Category,
    /// Totals grouped by date
    Time,
}

impl ChartKind {
    /// Endpoint serving this summary.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            ChartKind::Category => endpoints::PLOT_BY_CATEGORY,
            ChartKind::Time => endpoints::PLOT_OVER_TIME,
        }
    }

    #[must_use]
    pub fn style(&self) -> ChartStyle {
        match self {
            ChartKind::Category => ChartStyle::Pie,
            ChartKind::Time => ChartStyle::Line,
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("Spending by {self}")
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Category => write!(f, "category"),
            ChartKind::Time => write!(f, "time"),
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "category" => Ok(ChartKind::Category),
            "time" => Ok(ChartKind::Time),
            other => Err(ClientError::Validation(format!(
                "Unknown chart kind '{other}': expected 'category' or 'time'"
            ))),
        }
    }
}

/// Presentation mode handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Proportional breakdown
    Pie,
    /// Trend over an ordered axis
    Line,
}

/// Aggregated series as returned by the `/plot/*` endpoints.
///
/// Ephemeral: fetched fresh on every render, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    #[serde(rename = "data")]
    pub values: Vec<f64>,
}

impl ChartDataset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels and values must pair up one-to-one.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.labels.len() != self.values.len() {
            return Err(ClientError::Deserialization(format!(
                "Chart data has {} labels but {} values",
                self.labels.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub style: ChartStyle,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub palette: &'static [&'static str],
}

impl ChartSpec {
    pub fn from_dataset(kind: ChartKind, dataset: ChartDataset) -> Self {
        Self {
            kind,
            style: kind.style(),
            title: kind.title(),
            labels: dataset.labels,
            values: dataset.values,
            palette: &PALETTE,
        }
    }

    /// Colour for the segment at `index`, wrapping around the palette.
    #[must_use]
    pub fn color_for(&self, index: usize) -> &'static str {
        self.palette[index % self.palette.len()]
    }
}
