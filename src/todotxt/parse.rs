//! Header parsing for todo.txt lines.
//!
//! Each function looks at the start of a string, returns what it found and the
//! rest of the string. Nothing here fails: a missing field comes back as `None`
//! together with the untouched input.

use chrono::NaiveDate;

use super::task::Priority;
use super::DATE_LEN;

/// Returns whether the string starts with the completion marker `"x "`, and
/// the rest of the string after it.
pub fn parse_completion(s: &str) -> (bool, &str) {
    match s.strip_prefix("x ") {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

/// Reads a `YYYY-MM-DD` date from the start of the string. A single space
/// after the date is consumed along with it.
pub fn parse_date(s: &str) -> (Option<NaiveDate>, &str) {
    let Some(token) = s.get(..DATE_LEN) else {
        return (None, s);
    };
    let Some(date) = date_token(token) else {
        return (None, s);
    };
    (Some(date), skip_space(&s[DATE_LEN..]))
}

/// Reads a `(X)` priority from the start of the string, `X` being `A`..`Z`.
pub fn parse_priority(s: &str) -> (Option<Priority>, &str) {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'(' || bytes[2] != b')' {
        return (None, s);
    }
    match Priority::try_from(bytes[1] as char) {
        Ok(prio) => (Some(prio), skip_space(&s[3..])),
        Err(_) => (None, s),
    }
}

fn date_token(token: &str) -> Option<NaiveDate> {
    let b = token.as_bytes();
    let shaped = b.iter().enumerate().all(|(i, c)| match i {
        4 | 7 => *c == b'-',
        _ => c.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }

    let year = token[0..4].parse().ok()?;
    let month = token[5..7].parse().ok()?;
    let day = token[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn skip_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}
