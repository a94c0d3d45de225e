//! Analysis results returned by the oracle stage

/// Outcome of analyzing one normalized input
///
/// Positionally associated with its input: in any sequence returned by the
/// analyzer, element `i` belongs to input `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    /// The oracle's natural-language report
    Report(String),

    /// Why the oracle call failed for this item
    Error(String),
}

impl AnalysisResult {
    /// Whether the oracle produced a report
    pub fn is_report(&self) -> bool {
        matches!(self, AnalysisResult::Report(_))
    }

    /// Whether the oracle call failed
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResult::Error(_))
    }

    /// The report or error text
    pub fn text(&self) -> &str {
        match self {
            AnalysisResult::Report(text) | AnalysisResult::Error(text) => text,
        }
    }

    /// Short status label used in persisted output
    pub fn status(&self) -> &'static str {
        match self {
            AnalysisResult::Report(_) => "report",
            AnalysisResult::Error(_) => "error",
        }
    }
}
