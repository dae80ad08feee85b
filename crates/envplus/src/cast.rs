//! String to typed-value conversions
//!
//! The set of casters is closed: each one is a unit-like type implementing
//! the sealed [`Cast`] trait, tagged by the type it produces. The engine
//! accepts any of them through [`Env::get`](crate::Env::get).

use std::path::PathBuf;

use serde_json::Value;

use crate::error::CastError;

/// Values accepted as boolean true (case-insensitive)
pub const TRUE_VALUES: &[&str] = &["true", "1", "t", "yes", "y", "on"];

/// Values accepted as boolean false (case-insensitive)
pub const FALSE_VALUES: &[&str] = &["false", "0", "f", "no", "n", "off"];

mod sealed {
    pub trait Sealed {}
}

/// A conversion from a raw string to a typed value
pub trait Cast: sealed::Sealed {
    /// The produced type
    type Output;

    /// Convert a raw value, failing on malformed input
    fn cast(&self, raw: &str) -> Result<Self::Output, CastError>;
}

/// Identity conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct Str;

/// Base-10 signed integer
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

/// IEEE double
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

/// Boolean from [`TRUE_VALUES`] / [`FALSE_VALUES`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

/// Delimited list with each item trimmed
#[derive(Debug, Clone)]
pub struct List<'a> {
    delimiter: &'a str,
}

/// Any JSON value
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

/// Absolute URL
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

/// Filesystem path
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPath;

impl<'a> List<'a> {
    /// Split on `delimiter` instead of the default comma
    pub fn new(delimiter: &'a str) -> Self {
        Self { delimiter }
    }

    /// The separator items are split on
    pub fn delimiter(&self) -> &str {
        self.delimiter
    }
}

impl Default for List<'_> {
    fn default() -> Self {
        Self::new(",")
    }
}

impl sealed::Sealed for Str {}
impl sealed::Sealed for Integer {}
impl sealed::Sealed for Float {}
impl sealed::Sealed for Boolean {}
impl sealed::Sealed for List<'_> {}
impl sealed::Sealed for Json {}
impl sealed::Sealed for Url {}
impl sealed::Sealed for FsPath {}

impl Cast for Str {
    type Output = String;

    fn cast(&self, raw: &str) -> Result<String, CastError> {
        Ok(raw.to_string())
    }
}

impl Cast for Integer {
    type Output = i64;

    fn cast(&self, raw: &str) -> Result<i64, CastError> {
        Ok(raw.parse::<i64>()?)
    }
}

impl Cast for Float {
    type Output = f64;

    fn cast(&self, raw: &str) -> Result<f64, CastError> {
        Ok(raw.parse::<f64>()?)
    }
}

impl Cast for Boolean {
    type Output = bool;

    fn cast(&self, raw: &str) -> Result<bool, CastError> {
        to_bool(raw)
    }
}

impl Cast for List<'_> {
    type Output = Vec<String>;

    fn cast(&self, raw: &str) -> Result<Vec<String>, CastError> {
        to_list(raw, self.delimiter)
    }
}

impl Cast for Json {
    type Output = Value;

    fn cast(&self, raw: &str) -> Result<Value, CastError> {
        to_json(raw)
    }
}

impl Cast for Url {
    type Output = url::Url;

    fn cast(&self, raw: &str) -> Result<url::Url, CastError> {
        to_url(raw)
    }
}

impl Cast for FsPath {
    type Output = PathBuf;

    fn cast(&self, raw: &str) -> Result<PathBuf, CastError> {
        to_path(raw)
    }
}

/// Convert a string to a boolean
pub fn to_bool(raw: &str) -> Result<bool, CastError> {
    let lower = raw.to_lowercase();
    if TRUE_VALUES.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSE_VALUES.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(CastError::Boolean(raw.to_string()))
    }
}

/// Split a delimited string, trimming each item
///
/// An empty string yields an empty list.
pub fn to_list(raw: &str, delimiter: &str) -> Result<Vec<String>, CastError> {
    if delimiter.is_empty() {
        return Err(CastError::EmptyDelimiter);
    }
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    Ok(raw
        .split(delimiter)
        .map(|item| item.trim().to_string())
        .collect())
}

/// Parse a JSON document
pub fn to_json(raw: &str) -> Result<Value, CastError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parse an absolute URL
pub fn to_url(raw: &str) -> Result<url::Url, CastError> {
    if raw.is_empty() {
        return Err(CastError::Empty);
    }
    Ok(url::Url::parse(raw)?)
}

/// Wrap a string as a path
pub fn to_path(raw: &str) -> Result<PathBuf, CastError> {
    if raw.is_empty() {
        return Err(CastError::Empty);
    }
    Ok(PathBuf::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_bool_accepts_known_spellings() {
        for raw in ["true", "TRUE", "1", "t", "Yes", "y", "on"] {
            assert!(to_bool(raw).unwrap(), "{raw} should be true");
        }
        for raw in ["false", "False", "0", "f", "NO", "n", "off"] {
            assert!(!to_bool(raw).unwrap(), "{raw} should be false");
        }
    }

    #[test]
    fn test_to_bool_rejects_unknown() {
        for raw in ["maybe", "", " true", "2"] {
            assert!(matches!(to_bool(raw), Err(CastError::Boolean(_))), "{raw:?}");
        }
    }

    #[test]
    fn test_integer_cast() {
        assert_eq!(Integer.cast("123").unwrap(), 123);
        assert_eq!(Integer.cast("-42").unwrap(), -42);
        assert!(matches!(Integer.cast("test_value"), Err(CastError::Integer(_))));
        assert!(matches!(Integer.cast("12abc"), Err(CastError::Integer(_))));
        assert!(matches!(Integer.cast("1.5"), Err(CastError::Integer(_))));
    }

    #[test]
    fn test_float_cast() {
        assert_eq!(Float.cast("3.25").unwrap(), 3.25);
        assert_eq!(Float.cast("10").unwrap(), 10.0);
        assert!(matches!(Float.cast("ten"), Err(CastError::Float(_))));
    }

    #[test]
    fn test_to_list() {
        assert_eq!(to_list("a,b,c", ",").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(to_list(" a , b ,c ", ",").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(
            to_list("1.1.1.1;2.2.2.2", ";").unwrap(),
            vec!["1.1.1.1", "2.2.2.2"]
        );
        assert!(to_list("", ",").unwrap().is_empty());
        assert!(matches!(to_list("a", ""), Err(CastError::EmptyDelimiter)));
    }

    #[test]
    fn test_list_default_delimiter() {
        let list = List::default();
        assert_eq!(list.delimiter(), ",");
        assert_eq!(list.cast("x,y").unwrap(), vec!["x", "y"]);

        assert_eq!(List::new(";").delimiter(), ";");
    }

    #[test]
    fn test_to_json() {
        assert_eq!(to_json("{\"a\": 1}").unwrap(), json!({"a": 1}));
        assert_eq!(to_json("[1, 2]").unwrap(), json!([1, 2]));
        assert!(matches!(to_json("{a: 1"), Err(CastError::Json(_))));
    }

    #[test]
    fn test_to_url() {
        let url = to_url("https://api.example.com/v1?debug=1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.example.com"));
        assert_eq!(url.path(), "/v1");
        assert_eq!(url.query(), Some("debug=1"));

        assert!(matches!(to_url(""), Err(CastError::Empty)));
        assert!(matches!(to_url("not a url"), Err(CastError::Url(_))));
    }

    #[test]
    fn test_to_path() {
        assert_eq!(to_path("/var/log").unwrap(), PathBuf::from("/var/log"));
        assert!(matches!(to_path(""), Err(CastError::Empty)));
    }

    #[test]
    fn test_str_is_identity() {
        assert_eq!(Str.cast("  spaced  ").unwrap(), "  spaced  ");
    }
}
