//! `${NAME}` placeholder expansion

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Replace every `${NAME}` in `raw` with `lookup(NAME)`
///
/// Placeholders the lookup cannot resolve are left exactly as written.
/// Expansion is a single pass: text produced by a substitution is never
/// scanned again, so self-referencing values cannot loop.
///
/// # Example
///
/// ```
/// use envplus::expand;
///
/// let lookup = |name: &str| (name == "HOST").then(|| "localhost".to_string());
/// assert_eq!(expand("http://${HOST}/${PATH}", lookup), "http://localhost/${PATH}");
/// ```
pub fn expand<F>(raw: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<String>,
{
    if !raw.contains("${") {
        return Cow::Borrowed(raw);
    }

    PLACEHOLDER.replace_all(raw, |caps: &Captures<'_>| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
}
