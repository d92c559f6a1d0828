//! JSON-lines input parsing.

use crate::models::Journey;

/// Parses one input line into a journey.
///
/// Returns `None` for lines that carry no record (blank or `#` comments).
pub fn parse_journey_line(line: &str) -> Option<Result<Journey, serde_json::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        assert!(parse_journey_line("").is_none());
        assert!(parse_journey_line("   \t").is_none());
        assert!(parse_journey_line("# exported 2024-01-01").is_none());
    }

    #[test]
    fn test_parses_journey_with_defaults() {
        let line = r#"  {"user_id": 4, "location": "Kazan", "start_time": "2024-02-01T10:00:00Z", "end_time": "2024-02-02T10:00:00Z"}  "#;
        let journey = parse_journey_line(line).unwrap().unwrap();
        assert_eq!(journey.id, 0);
        assert_eq!(journey.user_id, 4);
        assert_eq!(journey.location, "Kazan");
        assert!(journey.description.is_empty());
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        assert!(parse_journey_line("{\"user_id\": 4").unwrap().is_err());
        assert!(parse_journey_line(r#"{"user_id": "x"}"#).unwrap().is_err());
    }
}
