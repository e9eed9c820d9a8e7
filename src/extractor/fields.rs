//! Ordered field-rule table and keyword scanning
//!
//! Replaces the regex soup of the original scraper with a table of
//! (target field, unit keyword, numeric-suffix policy) entries evaluated
//! sequentially. Overwrite order stays explicit in the caller.

use crate::model::PresenceStatus;

/// Field a rule assigns into the snapshot draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Karma,
    Followers,
    Following,
    Posts,
    Comments,
    Joined,
    Status,
}

/// How a field's value is located inside a display name.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// `<number>[K|M] <keyword>` with the keyword matched case-insensitively.
    /// `reject_if_contains` suppresses the rule when the name also contains
    /// the given substring (disambiguates "following" from "followers").
    CountBefore {
        keyword: &'static str,
        reject_if_contains: Option<&'static str>,
        allow_suffix: bool,
    },
    /// `<Keyword> (<digits>)` with the keyword matched case-sensitively,
    /// e.g. "Posts (10)".
    CountInParens { keyword: &'static str },
    /// `<Keyword> <digits-and-slashes>`, e.g. "Joined 1/30/2026".
    DateAfter { keyword: &'static str },
    /// Whole name equals a presence token (Online/Offline/Away).
    PresenceToken,
}

pub struct FieldRule {
    pub target: FieldTarget,
    pub matcher: Matcher,
}

/// Evaluated top to bottom against every name.
///
/// Karma deliberately takes no K/M suffix while follower counts do; that
/// mirrors how the profile page renders each stat.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        target: FieldTarget::Karma,
        matcher: Matcher::CountBefore {
            keyword: "karma",
            reject_if_contains: None,
            allow_suffix: false,
        },
    },
    FieldRule {
        target: FieldTarget::Followers,
        matcher: Matcher::CountBefore {
            keyword: "follower",
            reject_if_contains: None,
            allow_suffix: true,
        },
    },
    FieldRule {
        target: FieldTarget::Following,
        matcher: Matcher::CountBefore {
            keyword: "following",
            reject_if_contains: Some("follower"),
            allow_suffix: true,
        },
    },
    FieldRule {
        target: FieldTarget::Posts,
        matcher: Matcher::CountInParens { keyword: "Posts" },
    },
    FieldRule {
        target: FieldTarget::Comments,
        matcher: Matcher::CountInParens { keyword: "Comments" },
    },
    FieldRule {
        target: FieldTarget::Joined,
        matcher: Matcher::DateAfter { keyword: "Joined" },
    },
    FieldRule {
        target: FieldTarget::Status,
        matcher: Matcher::PresenceToken,
    },
];

/// Value extracted by a matcher.
#[derive(Debug, Clone)]
pub enum Extracted {
    Count(u64),
    Date(String),
    Presence(PresenceStatus),
}

impl Matcher {
    /// Evaluate this matcher against a single display name.
    ///
    /// Returns the leftmost valid match, or None when the name carries no
    /// recognizable value for the field.
    pub fn eval(&self, name: &str) -> Option<Extracted> {
        match *self {
            Matcher::CountBefore {
                keyword,
                reject_if_contains,
                allow_suffix,
            } => {
                if let Some(excluded) = reject_if_contains {
                    if find_ci(name, excluded, 0).is_some() {
                        return None;
                    }
                }
                count_before_keyword(name, keyword, allow_suffix).map(Extracted::Count)
            }
            Matcher::CountInParens { keyword } => {
                count_in_parens(name, keyword).map(Extracted::Count)
            }
            Matcher::DateAfter { keyword } => {
                date_after_keyword(name, keyword).map(Extracted::Date)
            }
            Matcher::PresenceToken => PresenceStatus::from_token(name).map(Extracted::Presence),
        }
    }
}

/// Case-insensitive (ASCII) substring search starting at byte offset `from`.
pub(crate) fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let nee = needle.as_bytes();
    if nee.is_empty() || hay.len() < nee.len() || from > hay.len() - nee.len() {
        return None;
    }
    (from..=hay.len() - nee.len()).find(|&i| hay[i..i + nee.len()].eq_ignore_ascii_case(nee))
}

/// Case-sensitive substring search starting at byte offset `from`.
pub(crate) fn find_cs(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack.get(from..)?.find(needle).map(|i| i + from)
}

/// Extract the number immediately preceding `keyword` (case-insensitive).
///
/// Accepts `123`, `2.5` forms; with `allow_suffix` a trailing uppercase `K`
/// or `M` scales by 1e3/1e6. Truncates toward zero. Scans every keyword
/// occurrence left to right and returns the first that carries a valid
/// number.
pub(crate) fn count_before_keyword(name: &str, keyword: &str, allow_suffix: bool) -> Option<u64> {
    let bytes = name.as_bytes();
    let mut from = 0;
    while let Some(at) = find_ci(name, keyword, from) {
        from = at + 1;

        // Walk back over whitespace between the number and the keyword.
        let mut end = at;
        while end > 0 && (bytes[end - 1] == b' ' || bytes[end - 1] == b'\t') {
            end -= 1;
        }
        if end == 0 {
            continue;
        }

        // Optional case-sensitive magnitude suffix.
        let mut scale = 1.0_f64;
        let mut num_end = end;
        match bytes[end - 1] {
            b'K' => {
                scale = 1_000.0;
                num_end -= 1;
            }
            b'M' => {
                scale = 1_000_000.0;
                num_end -= 1;
            }
            _ => {}
        }
        if scale != 1.0 && !allow_suffix {
            // "42K karma" parses nothing; karma never renders with a suffix.
            continue;
        }

        // Grab the digits-and-dot run ending at num_end.
        let mut start = num_end;
        while start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.') {
            start -= 1;
        }
        // Trim to the longest well-formed tail (`\d+` or `\d+.\d+`).
        while start < num_end && !is_decimal_number(&name[start..num_end]) {
            start += 1;
        }
        if start == num_end {
            continue;
        }

        let value: f64 = match name[start..num_end].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        return Some((value * scale) as u64);
    }
    None
}

fn is_decimal_number(token: &str) -> bool {
    let mut parts = token.split('.');
    let int_part = parts.next().unwrap_or("");
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match parts.next() {
        None => true,
        Some(frac) => {
            parts.next().is_none()
                && !frac.is_empty()
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

/// Extract the count from a `<Keyword> (<digits>)` form, e.g. "Posts (10)".
pub(crate) fn count_in_parens(name: &str, keyword: &str) -> Option<u64> {
    let bytes = name.as_bytes();
    let mut from = 0;
    while let Some(at) = find_cs(name, keyword, from) {
        from = at + 1;

        let mut i = at + keyword.len();
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'(' {
            continue;
        }
        i += 1;

        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start || i >= bytes.len() || bytes[i] != b')' {
            continue;
        }
        if let Ok(value) = name[digits_start..i].parse() {
            return Some(value);
        }
    }
    None
}

/// Extract the date-ish token after `keyword`, e.g. "Joined 1/30/2026".
pub(crate) fn date_after_keyword(name: &str, keyword: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut from = 0;
    while let Some(at) = find_cs(name, keyword, from) {
        from = at + 1;

        let mut i = at + keyword.len();
        let ws_start = i;
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i == ws_start {
            continue;
        }

        let token_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'/') {
            i += 1;
        }
        if i > token_start {
            return Some(name[token_start..i].to_string());
        }
    }
    None
}
