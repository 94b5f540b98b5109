//! ISO-8601 style duration conversion.

use anyhow::{anyhow, Result};
use regex::Regex;

/// Converts the service's structured duration strings (`PT1H5M30S`, any
/// component may be absent) into fractional minutes.
pub struct DurationParser {
    pattern: Regex,
}

impl DurationParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?")
                .map_err(|e| anyhow!("invalid duration pattern: {e}"))?,
        })
    }

    /// `hours*60 + minutes + seconds/60`; absent components count as 0.
    /// Returns `None` for text that does not carry the `PT` shape at all.
    pub fn to_minutes(&self, text: &str) -> Option<f64> {
        let caps = self.pattern.captures(text)?;
        let component = |i: usize| -> f64 {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        Some(component(1) * 60.0 + component(2) + component(3) / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_full_duration() {
        let parser = DurationParser::new().unwrap();
        assert_eq!(parser.to_minutes("PT1H5M30S"), Some(65.5));
    }

    #[test]
    fn absent_components_default_to_zero() {
        let parser = DurationParser::new().unwrap();
        assert_eq!(parser.to_minutes("PT4M"), Some(4.0));
        assert_eq!(parser.to_minutes("PT2H"), Some(120.0));
        assert_eq!(parser.to_minutes("PT45S"), Some(0.75));
    }

    #[test]
    fn rejects_text_without_duration_shape() {
        let parser = DurationParser::new().unwrap();
        assert_eq!(parser.to_minutes("ninety minutes"), None);
    }
}
