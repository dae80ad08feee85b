//! Parser for `KEY=value` source files
//!
//! Supports the common dotenv dialect:
//! - blank lines and `#` comment lines are skipped
//! - an optional `export ` prefix before the key
//! - unquoted values are trimmed, and a `#` preceded by whitespace starts a comment
//! - single-quoted values are taken literally
//! - double-quoted values understand `\n`, `\t`, `\r`, `\"` and `\\`, and may span lines
//!
//! `${NAME}` placeholders are kept as written. Expansion happens at lookup
//! time against the merged view, not while reading a single file.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{EnvError, EnvResult};

/// Key/value pairs read from one source file
pub type SourceMap = HashMap<String, String>;

/// Parse the contents of a source file
///
/// `path` is only used to label errors. A key repeated within the same file
/// keeps its last value.
pub fn parse(content: &str, path: &Path) -> EnvResult<SourceMap> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut map = SourceMap::new();
    let mut lines = content.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    while let Some((line_no, line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let body = trimmed
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(trimmed);

        let Some((key, raw)) = body.split_once('=') else {
            return Err(EnvError::parse(
                path,
                line_no,
                format!("expected KEY=value, found '{}'", trimmed),
            ));
        };

        let key = key.trim_end();
        if !is_valid_key(key) {
            return Err(EnvError::parse(
                path,
                line_no,
                format!("invalid key '{}'", key),
            ));
        }

        let value = match raw.trim_start().chars().next() {
            Some('\'') => single_quoted(raw.trim_start(), path, line_no)?,
            Some('"') => double_quoted(raw.trim_start(), &mut lines, path, line_no)?,
            _ => unquoted(raw),
        };

        map.insert(key.to_string(), value);
    }

    Ok(map)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn unquoted(raw: &str) -> String {
    let mut prev_ws = false;
    for (idx, c) in raw.char_indices() {
        if c == '#' && prev_ws {
            return raw[..idx].trim().to_string();
        }
        prev_ws = c.is_whitespace();
    }
    raw.trim().to_string()
}

fn single_quoted(raw: &str, path: &Path, line_no: usize) -> EnvResult<String> {
    let inner = &raw[1..];
    let Some(end) = inner.find('\'') else {
        return Err(EnvError::parse(path, line_no, "unterminated single-quoted value"));
    };
    check_trailing(&inner[end + 1..], path, line_no)?;
    Ok(inner[..end].to_string())
}

fn double_quoted<'a, I>(
    raw: &'a str,
    lines: &mut I,
    path: &Path,
    start_line: usize,
) -> EnvResult<String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut value = String::new();
    let mut current = &raw[1..];
    let mut line_no = start_line;

    loop {
        let mut chars = current.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    check_trailing(&current[idx + 1..], path, line_no)?;
                    return Ok(value);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, other)) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => value.push('\\'),
                },
                _ => value.push(c),
            }
        }

        match lines.next() {
            Some((next_no, next)) => {
                value.push('\n');
                current = next;
                line_no = next_no;
            }
            None => {
                return Err(EnvError::parse(
                    path,
                    start_line,
                    "unterminated double-quoted value",
                ));
            }
        }
    }
}

fn check_trailing(rest: &str, path: &Path, line_no: usize) -> EnvResult<()> {
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        Ok(())
    } else {
        Err(EnvError::parse(
            path,
            line_no,
            format!("unexpected '{}' after closing quote", rest),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(content: &str) -> SourceMap {
        parse(content, Path::new(".env")).unwrap()
    }

    fn parse_err(content: &str) -> EnvError {
        parse(content, Path::new(".env")).unwrap_err()
    }

    #[test]
    fn test_basic_pairs() {
        let map = parse_ok("TEST_KEY=test_value\nINT_KEY=123\nJSON_KEY={\"a\": 1}");
        assert_eq!(map.len(), 3);
        assert_eq!(map["TEST_KEY"], "test_value");
        assert_eq!(map["INT_KEY"], "123");
        assert_eq!(map["JSON_KEY"], "{\"a\": 1}");
    }

    #[test]
    fn test_comments_blank_lines_and_export() {
        let map = parse_ok("# header\n\n  export HOST = localhost  \n   # indented comment\nPORT=8000 # trailing\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map["HOST"], "localhost");
        assert_eq!(map["PORT"], "8000");
    }

    #[test]
    fn test_hash_without_whitespace_is_kept() {
        let map = parse_ok("COLOR=#ff0000\nANCHOR=page#top\nBLANK= # nothing here");
        assert_eq!(map["COLOR"], "#ff0000");
        assert_eq!(map["ANCHOR"], "page#top");
        assert_eq!(map["BLANK"], "");
    }

    #[test]
    fn test_empty_value() {
        let map = parse_ok("EMPTY=\nQUOTED_EMPTY=\"\"");
        assert_eq!(map["EMPTY"], "");
        assert_eq!(map["QUOTED_EMPTY"], "");
    }

    #[test]
    fn test_placeholders_are_not_interpolated() {
        let map = parse_ok("HOST=localhost\nURL=http://${HOST}/api\nQUOTED=\"${UNSET}\"");
        assert_eq!(map["URL"], "http://${HOST}/api");
        assert_eq!(map["QUOTED"], "${UNSET}");
    }

    #[test]
    fn test_single_quotes_are_literal() {
        let map = parse_ok(r"RAW='a\nb # not a comment' # comment");
        assert_eq!(map["RAW"], r"a\nb # not a comment");
    }

    #[test]
    fn test_double_quote_escapes() {
        let map = parse_ok(r#"MSG="line1\nline2\t\"quoted\" \\ \x""#);
        assert_eq!(map["MSG"], "line1\nline2\t\"quoted\" \\ \\x");
    }

    #[test]
    fn test_multiline_double_quoted() {
        let map = parse_ok("CERT=\"-----BEGIN-----\nabc\n-----END-----\"\nNEXT=1");
        assert_eq!(map["CERT"], "-----BEGIN-----\nabc\n-----END-----");
        assert_eq!(map["NEXT"], "1");
    }

    #[test]
    fn test_repeated_key_keeps_last() {
        let map = parse_ok("K=1\nK=2");
        assert_eq!(map["K"], "2");
    }

    #[test]
    fn test_crlf_and_bom() {
        let map = parse_ok("\u{feff}A=1\r\nB=2\r\n");
        assert_eq!(map["A"], "1");
        assert_eq!(map["B"], "2");
    }

    #[test]
    fn test_missing_equals_is_error() {
        match parse_err("A=1\nnot a binding") {
            EnvError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("expected KEY=value"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_key_is_error() {
        assert!(matches!(parse_err("BAD KEY=1"), EnvError::Parse { line: 1, .. }));
        assert!(matches!(parse_err("=value"), EnvError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unterminated_quotes_are_errors() {
        assert!(matches!(parse_err("A='open"), EnvError::Parse { line: 1, .. }));
        assert!(matches!(parse_err("A=1\nB=\"open\nstill open"), EnvError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_garbage_after_quote_is_error() {
        assert!(matches!(parse_err("A=\"x\" y"), EnvError::Parse { line: 1, .. }));
    }
}
