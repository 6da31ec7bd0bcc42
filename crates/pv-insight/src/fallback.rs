//! Rule-based fallback insight
//!
//! When the remote model is unavailable after retries, the endpoint answers
//! with a deterministic sentence keyed on score thresholds instead of
//! failing the whole request.

/// Score at or above which a site counts as "good".
pub const GOOD_SCORE: f64 = 90.0;

/// Score below which a site counts as "poor".
pub const POOR_SCORE: f64 = 50.0;

/// Deterministic substitute for a model-generated insight.
pub fn fallback_insight(average_score: Option<f64>) -> String {
    match average_score {
        None => {
            "No performance data has been collected yet. Run an analysis to get started."
                .to_string()
        }
        Some(avg) if avg >= GOOD_SCORE => format!(
            "Your monitored sites are performing well with an average score of {:.0}. \
             Keep an eye on Largest Contentful Paint to stay in the green.",
            avg
        ),
        Some(avg) if avg >= POOR_SCORE => format!(
            "Your monitored sites average a score of {:.0}, which leaves room for \
             improvement. Reducing render-blocking resources is usually the quickest win.",
            avg
        ),
        Some(avg) => format!(
            "Your monitored sites average a score of {:.0}, which is poor. Prioritize \
             image optimization and script deferral on the slowest pages.",
            avg
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert!(fallback_insight(Some(95.0)).contains("performing well"));
        assert!(fallback_insight(Some(90.0)).contains("performing well"));
        assert!(fallback_insight(Some(89.9)).contains("room for"));
        assert!(fallback_insight(Some(50.0)).contains("room for"));
        assert!(fallback_insight(Some(49.9)).contains("poor"));
    }

    #[test]
    fn test_no_data_sentence() {
        assert!(fallback_insight(None).contains("No performance data"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(fallback_insight(Some(72.0)), fallback_insight(Some(72.0)));
    }
}
