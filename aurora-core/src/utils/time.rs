use chrono::{NaiveDate, NaiveDateTime};

use crate::Error;

/// Format used wherever a message or alert time is shown.
pub const TIMESTAMP_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn timestamp_label(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_LABEL_FORMAT).to_string()
}

/// Parse an optional `YYYY-MM-DD` filter. Blank means "no filter".
pub fn parse_date_filter(raw: Option<&str>) -> Result<Option<NaiveDate>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("date '{s}' is not YYYY-MM-DD: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_drops_seconds() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        assert_eq!(timestamp_label(ts), "2024-01-02 09:05");
    }

    #[test]
    fn date_filter() {
        assert_eq!(parse_date_filter(None).unwrap(), None);
        assert_eq!(parse_date_filter(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_date_filter(Some("2024-01-02")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert!(parse_date_filter(Some("02/01/2024")).is_err());
    }
}
