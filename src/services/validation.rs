//! Form field validation and sanitization
//!
//! A field is described by a [`FieldRule`]: an ordered list of [`Step`]s run
//! one after another over the submitted value. Sanitizing steps rewrite the
//! value, checks leave it alone and may report a message. Every failing check
//! is reported, in declaration order; nothing short-circuits.
//!
//! This layer never talks to the store and never fails: it always yields the
//! sanitized values together with a (possibly empty) error list.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

/// A single field-level failure
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Sanitized value the failure was reported against
    pub value: String,
}

impl FieldError {
    pub fn to_view(&self) -> Value {
        json!({
            "field": self.field,
            "message": self.message,
            "value": self.value,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Strip leading and trailing whitespace
    Trim,
    /// Replace markup-significant characters with HTML entities
    Escape,
    MinLength(usize, &'static str),
    /// ASCII letters and digits only; empty values fail
    Alphanumeric(&'static str),
    /// Parseable as an ISO-8601 date or date-time
    Iso8601(&'static str),
    OneOf(&'static [&'static str], &'static str),
}

impl Step {
    /// Run this step: the value to hand to the next step, plus a failure message
    pub fn apply(&self, value: String) -> (String, Option<&'static str>) {
        match *self {
            Step::Trim => (value.trim().to_string(), None),
            Step::Escape => (escape(&value), None),
            Step::MinLength(min, message) => {
                let failed = value.chars().count() < min;
                (value, failed.then_some(message))
            }
            Step::Alphanumeric(message) => {
                let ok = !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric());
                (value, (!ok).then_some(message))
            }
            Step::Iso8601(message) => {
                let failed = parse_iso8601(&value).is_none();
                (value, failed.then_some(message))
            }
            Step::OneOf(allowed, message) => {
                let failed = !allowed.contains(&value.as_str());
                (value, failed.then_some(message))
            }
        }
    }
}

/// Validation rule for one form field
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    optional: bool,
    steps: Vec<Step>,
}

impl FieldRule {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            optional: false,
            steps: Vec::new(),
        }
    }

    /// Skip every step when the submitted value is absent or blank
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn trim(self) -> Self {
        self.step(Step::Trim)
    }

    pub fn escape(self) -> Self {
        self.step(Step::Escape)
    }

    pub fn min_length(self, min: usize, message: &'static str) -> Self {
        self.step(Step::MinLength(min, message))
    }

    pub fn alphanumeric(self, message: &'static str) -> Self {
        self.step(Step::Alphanumeric(message))
    }

    pub fn iso8601(self, message: &'static str) -> Self {
        self.step(Step::Iso8601(message))
    }

    pub fn one_of(self, allowed: &'static [&'static str], message: &'static str) -> Self {
        self.step(Step::OneOf(allowed, message))
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Run the pipeline over a submitted value
    pub fn run(&self, raw: Option<&str>) -> (String, Vec<FieldError>) {
        let raw = raw.unwrap_or_default();
        if self.optional && raw.trim().is_empty() {
            return (String::new(), Vec::new());
        }

        let mut value = raw.to_string();
        let mut messages = Vec::new();
        for step in &self.steps {
            let (next, failure) = step.apply(value);
            value = next;
            messages.extend(failure);
        }

        let errors = messages
            .into_iter()
            .map(|message| FieldError {
                field: self.field.to_string(),
                message: message.to_string(),
                value: value.clone(),
            })
            .collect();

        (value, errors)
    }
}

/// Collects the failures of several fields of one submission
#[derive(Debug, Default)]
pub struct Validation {
    errors: Vec<FieldError>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a scalar field and return its sanitized value
    pub fn field(&mut self, rule: &FieldRule, raw: Option<&str>) -> String {
        let (value, errors) = rule.run(raw);
        self.errors.extend(errors);
        value
    }

    /// Validate an optional date field
    ///
    /// Blank input yields `None` without error; a value that fails the rule
    /// also yields `None`, with the failure recorded.
    pub fn date(&mut self, rule: &FieldRule, raw: Option<&str>) -> Option<NaiveDate> {
        let (value, errors) = rule.run(raw);
        let failed = !errors.is_empty();
        self.errors.extend(errors);
        if failed || value.is_empty() {
            return None;
        }
        parse_iso8601(&value)
    }

    /// Apply a rule to every value of a multi-valued field
    pub fn each(&mut self, rule: &FieldRule, raws: &[String]) -> Vec<String> {
        raws.iter()
            .map(|raw| self.field(rule, Some(raw.as_str())))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Escape the characters that could smuggle markup into a rendered page
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Parse an ISO-8601 date, or the date part of a date-time
///
/// Besides `YYYY-MM-DD` and full date-times this takes the reduced forms
/// `YYYY` and `YYYY-MM` (first day of the period), the basic form `YYYYMMDD`
/// and ordinal dates `YYYY-DDD`.
pub fn parse_iso8601(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    parse_short_date(value)
}

fn parse_short_date(value: &str) -> Option<NaiveDate> {
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());

    match value.split_once('-') {
        None if digits(value, 4) => NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1),
        None if digits(value, 8) => NaiveDate::from_ymd_opt(
            value[..4].parse().ok()?,
            value[4..6].parse().ok()?,
            value[6..].parse().ok()?,
        ),
        Some((year, month)) if digits(year, 4) && digits(month, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        Some((year, day)) if digits(year, 4) && digits(day, 3) => {
            NaiveDate::from_yo_opt(year.parse().ok()?, day.parse().ok()?)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_name_rule() -> FieldRule {
        FieldRule::new("first_name")
            .trim()
            .escape()
            .min_length(1, "First name must be specified")
            .alphanumeric("First name has non-alphanumeric characters.")
    }

    #[test]
    fn test_trims_before_checking() {
        let (value, errors) = first_name_rule().run(Some("  Isaac  "));
        assert_eq!(value, "Isaac");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_value_reports_every_failing_check() {
        let (value, errors) = first_name_rule().run(Some("   "));
        assert_eq!(value, "");
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "First name must be specified",
                "First name has non-alphanumeric characters."
            ]
        );
        assert!(errors.iter().all(|e| e.field == "first_name"));
    }

    #[test]
    fn test_missing_field_counts_as_empty() {
        let (_, errors) = first_name_rule().run(None);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_escape_runs_before_alphanumeric_check() {
        let (value, errors) = first_name_rule().run(Some("<b>Bob</b>"));
        assert_eq!(value, "&lt;b&gt;Bob&lt;&#x2F;b&gt;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "First name has non-alphanumeric characters.");
    }

    #[test]
    fn test_escape_covers_markup_characters() {
        assert_eq!(escape(r#"a&b"c'd`e\f"#), "a&amp;b&quot;c&#x27;d&#96;e&#x5C;f");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn test_min_length_counts_characters() {
        let rule = FieldRule::new("name")
            .trim()
            .min_length(3, "Genre name must contain at least 3 characters");
        assert_eq!(rule.run(Some("SF")).1.len(), 1);
        assert!(rule.run(Some("Épo")).1.is_empty());
    }

    #[test]
    fn test_optional_date_skips_blank_values() {
        let rule = FieldRule::new("date_of_birth")
            .optional()
            .trim()
            .iso8601("Invalid date of birth");
        let mut validation = Validation::new();
        assert_eq!(validation.date(&rule, None), None);
        assert_eq!(validation.date(&rule, Some("")), None);
        assert_eq!(validation.date(&rule, Some("   ")), None);
        assert!(validation.is_valid());
    }

    #[test]
    fn test_optional_date_parses_and_rejects() {
        let rule = FieldRule::new("date_of_birth")
            .optional()
            .trim()
            .iso8601("Invalid date of birth");
        let mut validation = Validation::new();
        assert_eq!(
            validation.date(&rule, Some("1920-01-02")),
            NaiveDate::from_ymd_opt(1920, 1, 2)
        );
        assert_eq!(validation.date(&rule, Some("not a date")), None);

        let errors = validation.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "date_of_birth");
        assert_eq!(errors[0].message, "Invalid date of birth");
        assert_eq!(errors[0].value, "not a date");
    }

    #[test]
    fn test_iso8601_accepts_date_times() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_iso8601("2024-03-05T10:20:30Z"), expected);
        assert_eq!(parse_iso8601("2024-03-05T10:20:30+02:00"), expected);
        assert_eq!(parse_iso8601("2024-03-05T10:20:30"), expected);
        assert_eq!(parse_iso8601("2024-02-30"), None);
        assert_eq!(parse_iso8601("05/03/2024"), None);
    }

    #[test]
    fn test_iso8601_accepts_reduced_and_basic_forms() {
        assert_eq!(parse_iso8601("1920"), NaiveDate::from_ymd_opt(1920, 1, 1));
        assert_eq!(parse_iso8601("1920-03"), NaiveDate::from_ymd_opt(1920, 3, 1));
        assert_eq!(parse_iso8601("19200305"), NaiveDate::from_ymd_opt(1920, 3, 5));
        assert_eq!(parse_iso8601("1920-065"), NaiveDate::from_ymd_opt(1920, 3, 5));
        assert_eq!(parse_iso8601("1920-13"), None);
        assert_eq!(parse_iso8601("19201305"), None);
        assert_eq!(parse_iso8601("192"), None);
        assert_eq!(parse_iso8601("1920-3"), None);
    }

    #[test]
    fn test_one_of() {
        const STATUSES: &[&str] = &["Available", "Loaned"];
        let rule = FieldRule::new("status").trim().one_of(STATUSES, "Invalid status");
        assert!(rule.run(Some(" Loaned ")).1.is_empty());
        assert_eq!(rule.run(Some("Lost")).1[0].message, "Invalid status");
    }

    #[test]
    fn test_each_sanitizes_every_value_in_order() {
        let rule = FieldRule::new("genre").escape();
        let mut validation = Validation::new();
        let values = validation.each(&rule, &["a<b".to_string(), "c".to_string()]);
        assert_eq!(values, vec!["a&lt;b".to_string(), "c".to_string()]);
        assert!(validation.is_valid());
    }

    #[test]
    fn test_errors_keep_field_order() {
        let mut validation = Validation::new();
        let title = FieldRule::new("title").trim().min_length(1, "Title must not be empty.");
        let isbn = FieldRule::new("isbn").trim().min_length(1, "ISBN must not be empty.");
        validation.field(&title, Some(""));
        validation.field(&isbn, Some(""));
        let fields: Vec<_> = validation
            .into_errors()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["title", "isbn"]);
    }
}
