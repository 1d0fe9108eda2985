use chrono::{DateTime, NaiveDate, Utc};

/// A single scalar value of a warehouse row.
///
/// [`Cell`] is the tagged representation of the loosely-typed values returned by the
/// source API, validated against a destination column type at mapping time.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Date(NaiveDate),
    TimestampTz(DateTime<Utc>),
}

impl Cell {
    /// Returns whether this cell holds a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Renders the cell as the canonical text used for staged-key comparison.
    ///
    /// Primary-key values are staged as text and matched against the destination
    /// column cast to text, so this rendering must agree with how Postgres renders
    /// the same value. The warehouse connection pins `datestyle=ISO` and
    /// `TimeZone=UTC`, which is what the date and timestamp arms assume.
    pub fn to_key_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(value) => value.to_string(),
            Cell::I64(value) => value.to_string(),
            Cell::F64(value) => value.to_string(),
            Cell::String(value) => value.clone(),
            Cell::Date(value) => value.format("%Y-%m-%d").to_string(),
            // DateTime<Utc> always renders with the "+00" suffix Postgres uses for UTC.
            Cell::TimestampTz(value) => format!("{}+00", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_key_text_rendering() {
        assert_eq!(Cell::I64(42).to_key_text(), "42");
        assert_eq!(Cell::F64(1.5).to_key_text(), "1.5");
        assert_eq!(Cell::Bool(true).to_key_text(), "true");
        assert_eq!(Cell::String("SO-1001".to_string()).to_key_text(), "SO-1001");
        assert_eq!(Cell::Null.to_key_text(), "");

        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(Cell::Date(date).to_key_text(), "2026-08-30");

        let timestamp = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        assert_eq!(
            Cell::TimestampTz(timestamp).to_key_text(),
            "2026-08-30 12:00:00+00"
        );
    }

    #[test]
    fn test_whole_floats_render_without_fraction() {
        // A float key "1.0" staged via Rust matches the Postgres text rendering "1".
        assert_eq!(Cell::F64(1.0).to_key_text(), "1");
    }
}
