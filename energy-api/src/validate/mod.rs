//! Stateless request validation. Everything here runs before the store is
//! touched; a rejection never has side effects beyond a metrics counter.

pub mod requests;

use energy_client::domain::{date_format, DateRange};
use time::Date;
use uuid::Uuid;

pub use requests::{
    CreateGeneratorRequest, CreateProductionRequest, CreateTypeRequest, UpdateGeneratorRequest,
    UpdateProductionRequest, UpdateTypeRequest,
};

pub const TYPE_NAME_MAX: usize = 20;
pub const TYPE_DESCRIPTION_MAX: usize = 80;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

pub fn reject(field: &'static str, reason: impl Into<String>) -> ValidationError {
    metrics::counter!("api_validation_rejected_total", "field" => field).increment(1);
    ValidationError {
        field,
        reason: reason.into(),
    }
}

/// Query parameters arrive as `Option<String>`; blank means absent.
pub fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_uuid(field: &'static str, raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| reject(field, "must be a valid UUID"))
}

pub fn parse_optional_uuid(field: &'static str, raw: Option<&str>) -> Result<Option<Uuid>, ValidationError> {
    present(raw).map(|s| parse_uuid(field, s)).transpose()
}

/// Accepts `true` / `false` in any letter case; anything else is rejected.
pub fn parse_bool_flag(field: &'static str, raw: Option<&str>) -> Result<Option<bool>, ValidationError> {
    match present(raw) {
        None => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(s) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(_) => Err(reject(field, "must be true or false")),
    }
}

pub fn parse_date(field: &'static str, raw: &str) -> Result<Date, ValidationError> {
    date_format::parse_date(raw.trim()).map_err(|_| reject(field, "must be a calendar date formatted YYYY-MM-DD"))
}

pub fn parse_optional_date(field: &'static str, raw: Option<&str>) -> Result<Option<Date>, ValidationError> {
    present(raw).map(|s| parse_date(field, s)).transpose()
}

/// Independent, inclusive bounds. Both absent means unbounded; an inverted
/// range is accepted and simply matches nothing.
pub fn date_range(
    start_field: &'static str,
    start: Option<&str>,
    end_field: &'static str,
    end: Option<&str>,
) -> Result<DateRange, ValidationError> {
    Ok(DateRange::new(
        parse_optional_date(start_field, start)?,
        parse_optional_date(end_field, end)?,
    ))
}

/// Analytics ranges: `end` defaults to `today`, `start` stays open if absent.
pub fn analytics_range(start: Option<&str>, end: Option<&str>, today: Date) -> Result<DateRange, ValidationError> {
    let range = date_range("start", start, "end", end)?;
    Ok(DateRange::new(range.start, Some(range.end.unwrap_or(today))))
}

/// Trimmed, non-empty, at most `max` characters.
pub fn required_text(field: &'static str, raw: Option<String>, max: usize) -> Result<String, ValidationError> {
    let value = raw.ok_or_else(|| reject(field, "is required"))?;
    bounded_text(field, value, max)
}

pub fn bounded_text(field: &'static str, raw: String, max: usize) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(reject(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > max {
        return Err(reject(field, format!("must be at most {max} characters, got {len}")));
    }
    Ok(value.to_string())
}

/// Strictly positive and finite.
pub fn capacity(raw: f64) -> Result<f64, ValidationError> {
    if raw.is_finite() && raw > 0.0 {
        Ok(raw)
    } else {
        Err(reject("capacity", "must be greater than 0"))
    }
}

/// Zero is a valid production figure.
pub fn production_mw(raw: f64) -> Result<f64, ValidationError> {
    if raw.is_finite() && raw >= 0.0 {
        Ok(raw)
    } else {
        Err(reject("productionMw", "must be greater than or equal to 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn uuid_must_parse() {
        assert!(parse_uuid("id", "not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid("id", &id.to_string()).unwrap(), id);
        assert_eq!(parse_optional_uuid("typeId", Some("")).unwrap(), None);
    }

    #[test]
    fn bool_flags_accept_only_true_or_false() {
        assert_eq!(parse_bool_flag("renewable", Some("true")).unwrap(), Some(true));
        assert_eq!(parse_bool_flag("renewable", Some("FALSE")).unwrap(), Some(false));
        assert_eq!(parse_bool_flag("renewable", None).unwrap(), None);
        let err = parse_bool_flag("renewable", Some("1")).unwrap_err();
        assert_eq!(err.field, "renewable");
        assert!(parse_bool_flag("renewable", Some("yes")).is_err());
    }

    #[test]
    fn text_is_trimmed_and_bounded_by_characters() {
        assert_eq!(required_text("name", Some("  Solar ".into()), 20).unwrap(), "Solar");
        assert!(required_text("name", None, 20).is_err());
        assert!(required_text("name", Some("   ".into()), 20).is_err());
        assert!(required_text("name", Some("a".repeat(21)), 20).is_err());
        // 20 multi-byte characters still fit.
        assert!(required_text("name", Some("é".repeat(20)), 20).is_ok());
    }

    #[test]
    fn numeric_bounds() {
        assert!(capacity(0.0).is_err());
        assert!(capacity(-1.0).is_err());
        assert!(capacity(f64::NAN).is_err());
        assert_eq!(capacity(0.5).unwrap(), 0.5);
        assert_eq!(production_mw(0.0).unwrap(), 0.0);
        assert!(production_mw(-0.01).is_err());
    }

    #[test]
    fn date_ranges_accept_either_bound() {
        let range = date_range("startDate", Some("2025-01-01"), "endDate", None).unwrap();
        assert_eq!(range, DateRange::new(Some(date!(2025 - 01 - 01)), None));
        assert_eq!(date_range("startDate", None, "endDate", None).unwrap(), DateRange::unbounded());
        let inverted = date_range("startDate", Some("2025-02-01"), "endDate", Some("2025-01-01")).unwrap();
        assert!(!inverted.contains(date!(2025 - 01 - 15)));
        assert!(date_range("startDate", Some("01-01-2025"), "endDate", None).is_err());
    }

    #[test]
    fn analytics_end_defaults_to_today() {
        let today = date!(2025 - 06 - 30);
        let range = analytics_range(Some("2025-06-01"), None, today).unwrap();
        assert_eq!(range, DateRange::new(Some(date!(2025 - 06 - 01)), Some(today)));

        let open = analytics_range(None, None, today).unwrap();
        assert_eq!(open, DateRange::new(None, Some(today)));

        let future = analytics_range(Some("2025-07-01"), None, today).unwrap();
        assert_eq!(future, DateRange::new(Some(date!(2025 - 07 - 01)), Some(today)));
        assert!(!future.contains(today));
    }
}
