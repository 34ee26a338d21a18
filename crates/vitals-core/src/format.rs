//! Display helpers shared by every host view

use crate::types::{MetricName, MetricSample, Rating};

/// Placeholder shown before a metric has been measured
pub const LOADING: &str = "Loading...";

/// Human-readable description of what a metric measures
pub fn describe(name: MetricName) -> &'static str {
    match name {
        MetricName::Lcp => "Largest Contentful Paint (loading)",
        MetricName::Fid => "First Input Delay (interactivity)",
        MetricName::Cls => "Cumulative Layout Shift (visual stability)",
    }
}

/// Format a raw value: three decimals for CLS, whole milliseconds otherwise
pub fn format_value(name: MetricName, value: f64) -> String {
    match name {
        MetricName::Cls => format!("{:.3}", value),
        MetricName::Lcp | MetricName::Fid => format!("{}ms", value.round()),
    }
}

/// Format an optional sample, falling back to the loading placeholder
pub fn format_sample(name: MetricName, sample: Option<&MetricSample>) -> String {
    match sample {
        Some(sample) => format_value(name, sample.value()),
        None => LOADING.to_string(),
    }
}

/// Status tone a host uses to colour a rating badge
pub fn status_tone(rating: Option<Rating>) -> &'static str {
    match rating {
        Some(Rating::Good) => "success",
        Some(Rating::NeedsImprovement) => "warning",
        Some(Rating::Poor) => "error",
        None => "default",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(MetricName::Cls, 0.08), "0.080");
        assert_eq!(format_value(MetricName::Cls, 0.0), "0.000");
        assert_eq!(format_value(MetricName::Lcp, 2600.0), "2600ms");
        assert_eq!(format_value(MetricName::Lcp, 1799.6), "1800ms");
        assert_eq!(format_value(MetricName::Fid, 49.4), "49ms");
    }

    #[test]
    fn test_format_sample_loading() {
        assert_eq!(format_sample(MetricName::Fid, None), "Loading...");
        let sample = MetricSample::new(MetricName::Fid, 50.0);
        assert_eq!(format_sample(MetricName::Fid, Some(&sample)), "50ms");
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(status_tone(Some(Rating::Good)), "success");
        assert_eq!(status_tone(Some(Rating::NeedsImprovement)), "warning");
        assert_eq!(status_tone(Some(Rating::Poor)), "error");
        assert_eq!(status_tone(None), "default");
    }

    #[test]
    fn test_describe() {
        assert!(describe(MetricName::Cls).contains("visual stability"));
    }
}
