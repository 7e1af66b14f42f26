//! Formatting helpers for presenting workflow state.

use time::OffsetDateTime;

pub fn display_or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

/// Compact UTC stamp for the report panel, e.g. `2026-08-07 14:03 UTC`.
pub fn format_report_stamp(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02} UTC",
        at.year(),
        at.month() as u8,
        at.day(),
        at.hour(),
        at.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_placeholder_covers_missing_and_empty() {
        assert_eq!(display_or_dash(None), "-");
        assert_eq!(display_or_dash(Some("")), "-");
        assert_eq!(display_or_dash(Some("4.0 μm")), "4.0 μm");
    }
}
