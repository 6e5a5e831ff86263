//! Environment-agnostic type and format checks shared by every rule.
//!
//! A single [`Predicates`] instance is built lazily by the rule registry and
//! handed to every rule it creates. Apart from the uploaded-file check, which
//! asks the filesystem whether the temporary path exists, all checks are pure.

use chrono::NaiveDate;
use chrono::format::{self, Item, ParseErrorKind, ParseResult, Parsed, StrftimeItems};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;

const NUMERIC_PATTERN: &str = r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$";

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$";

/// Upload error code reported for a successful upload.
pub const UPLOAD_OK: i64 = 0;

/// Type and format predicates over input values.
#[derive(Debug)]
pub struct Predicates {
    numeric: Regex,
    email: Regex,
}

impl Default for Predicates {
    fn default() -> Self {
        Self::new()
    }
}

impl Predicates {
    pub fn new() -> Self {
        Self {
            numeric: Regex::new(NUMERIC_PATTERN).expect("numeric pattern is a valid regex"),
            email: Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"),
        }
    }

    pub fn is_string(&self, value: &Value) -> bool {
        value.is_string()
    }

    /// JSON numbers, or strings holding a decimal/scientific number once
    /// surrounding whitespace is trimmed. Booleans are never numeric.
    pub fn is_numeric(&self, value: &Value) -> bool {
        self.as_number(value).is_some()
    }

    /// The numeric reading of a numeric-like value.
    pub fn as_number(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => self.parse_numeric_str(s),
            _ => None,
        }
    }

    /// Parses a numeric-like string, rejecting `inf`, `nan` and hex forms.
    pub fn parse_numeric_str(&self, s: &str) -> Option<f64> {
        let trimmed = s.trim();
        if !self.numeric.is_match(trimmed) {
            return None;
        }
        trimmed.parse::<f64>().ok()
    }

    /// Numeric-like with no fractional part: `20`, `"20"`, `"20.0"`, `"1e3"`.
    pub fn is_integer(&self, value: &Value) -> bool {
        if let Value::Number(n) = value
            && (n.is_i64() || n.is_u64())
        {
            return true;
        }
        match self.as_number(value) {
            Some(f) => f.is_finite() && f.fract() == 0.0,
            None => false,
        }
    }

    pub fn is_email(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.email.is_match(s))
    }

    /// Arrays and objects both count: an object is an associative array.
    pub fn is_array(&self, value: &Value) -> bool {
        value.is_array() || value.is_object()
    }

    /// The `error` code of an uploaded-file descriptor, if the value carries one.
    pub fn upload_error_code(&self, value: &Value) -> Option<i64> {
        value.as_object()?.get("error")?.as_i64()
    }

    /// Whether `value` describes a successfully uploaded file: string `name`,
    /// `type` and `tmp_name`, integer `error` equal to [`UPLOAD_OK`], integer
    /// `size`, and `tmp_name` naming an existing regular file.
    pub fn is_uploaded_file(&self, value: &Value) -> bool {
        let Some(obj) = value.as_object() else {
            return false;
        };

        let has_string = |key: &str| obj.get(key).is_some_and(Value::is_string);
        let has_integer = |key: &str| obj.get(key).is_some_and(|v| v.is_i64() || v.is_u64());

        if !(has_string("name") && has_string("type") && has_integer("size")) {
            return false;
        }
        if self.upload_error_code(value) != Some(UPLOAD_OK) {
            return false;
        }

        obj.get("tmp_name")
            .and_then(Value::as_str)
            .is_some_and(|path| Path::new(path).is_file())
    }

    /// Whether `subject` matches `pattern` (see [`parse_pattern`] for the
    /// accepted syntax). Returns `None` when the pattern itself is invalid.
    pub fn matches_pattern(&self, subject: &str, pattern: &str) -> Option<bool> {
        parse_pattern(pattern).map(|re| re.is_match(subject))
    }

    /// Whether `subject` parses in full against `format`.
    ///
    /// Formats containing `%` are strftime formats; anything else is read as
    /// a PHP-style date format and translated first. Partial formats such as
    /// `Y-m` or `H` match as long as every field they do carry is valid and
    /// the fields agree with each other. Returns `None` when the format
    /// itself is unusable.
    pub fn matches_datetime_format(&self, subject: &str, format: &str) -> Option<bool> {
        let fmt: Cow<'_, str> = if format.contains('%') {
            Cow::Borrowed(format)
        } else {
            Cow::Owned(translate_datetime_format(format)?)
        };

        let items: Vec<Item<'_>> = StrftimeItems::new(&fmt).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return None;
        }

        let mut parsed = Parsed::new();
        if format::parse(&mut parsed, subject, items.iter()).is_err() {
            return Some(false);
        }
        Some(fields_agree(&parsed))
    }
}

/// Whether the parsed fields describe a real point in time. Groups of
/// fields that are incomplete (a month without a day, an hour without
/// minutes) are not an error on their own.
fn fields_agree(parsed: &Parsed) -> bool {
    fn settled<T>(result: ParseResult<T>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => e.kind() == ParseErrorKind::NotEnough,
        }
    }

    if !(settled(parsed.to_naive_date())
        && settled(parsed.to_naive_time())
        && settled(parsed.to_fixed_offset()))
    {
        return false;
    }

    // Month and day without a year: the day must exist in a leap year.
    match (parsed.year(), parsed.month(), parsed.day()) {
        (None, Some(month), Some(day)) => NaiveDate::from_ymd_opt(2000, month, day).is_some(),
        _ => true,
    }
}

// ─── Patterns ────────────────────────────────────────────────────────────────

/// Compiles a rule pattern.
///
/// A pattern opening with `/` and containing a closing `/` is delimited:
/// the text after the closing delimiter is its flag set. Patterns opening
/// with one of `# ~ ! @ % | +` or `{` are delimited only when a matching
/// closing delimiter is followed by valid flags. Anything else, including
/// patterns opening with `[`, `(` or `.`, is used verbatim.
///
/// Supported flags: `i`, `m`, `s`, `x`, `U` (swap greed) and `u` (no-op,
/// matching is always Unicode-aware).
pub fn parse_pattern(pattern: &str) -> Option<Regex> {
    let (body, flags) = split_delimited(pattern).unwrap_or((pattern, ""));

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'U' => {
                builder.swap_greed(true);
            }
            'u' => {}
            _ => return None,
        }
    }
    builder.build().ok()
}

const PATTERN_FLAGS: &str = "imsxUu";

const PATTERN_DELIMITERS: &[(char, char)] = &[
    ('/', '/'),
    ('#', '#'),
    ('~', '~'),
    ('!', '!'),
    ('@', '@'),
    ('%', '%'),
    ('|', '|'),
    ('+', '+'),
    ('{', '}'),
];

/// Splits `/body/flags` into `(body, flags)`. Returns `None` when the pattern
/// is not delimited.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let open = pattern.chars().next()?;
    let &(_, close) = PATTERN_DELIMITERS.iter().find(|(o, _)| *o == open)?;

    let rest = &pattern[open.len_utf8()..];
    let end = rest.rfind(close)?;
    let flags = &rest[end + close.len_utf8()..];

    // `/` always delimits; its flags are validated when compiling.
    if open != '/' && !flags.chars().all(|c| PATTERN_FLAGS.contains(c)) {
        return None;
    }
    Some((&rest[..end], flags))
}

// ─── Datetime formats ────────────────────────────────────────────────────────

/// Translates a PHP-style date format (`Y-m-d H:i:s`) into a strftime format.
///
/// `\` escapes the following character; unrecognised letters are literals.
/// Returns `None` for tokens chrono cannot parse: `z` (zero-based day of the
/// year), `S`, `t`, `L`, `B` and `I`.
pub fn translate_datetime_format(format: &str) -> Option<String> {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let item = match c {
            'd' | 'j' => "%d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'W' => "%V",
            'F' => "%B",
            'M' => "%b",
            'm' | 'n' => "%m",
            'Y' => "%Y",
            'o' => "%G",
            'y' => "%y",
            'a' | 'A' => "%p",
            'g' | 'h' => "%I",
            'G' | 'H' => "%H",
            'i' => "%M",
            's' => "%S",
            'u' => "%6f",
            'v' => "%3f",
            'e' | 'T' => "%Z",
            'O' => "%z",
            'P' | 'p' => "%:z",
            'U' => "%s",
            'c' => "%Y-%m-%dT%H:%M:%S%:z",
            'r' => "%a, %d %b %Y %H:%M:%S %z",
            '%' => "%%",
            'z' | 'S' | 't' | 'L' | 'B' | 'I' => return None,
            '\\' => {
                match chars.next() {
                    Some('%') => out.push_str("%%"),
                    Some(escaped) => out.push(escaped),
                    None => {}
                }
                continue;
            }
            literal => {
                out.push(literal);
                continue;
            }
        };
        out.push_str(item);
    }

    Some(out)
}
