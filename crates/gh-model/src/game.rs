//! Game catalog entry.

use serde::{Deserialize, Serialize};

/// A game in the static catalog.
///
/// Games are immutable and loaded wholesale; the rating is kept as the text
/// found in the data file and parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Unique identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Developer studio or person.
    pub developer: String,
    /// Genre / category label.
    pub category: String,
    /// Rating as written in the data file (e.g. `"4.7"`).
    pub ratings: String,
    /// Long description.
    pub description: String,
    /// Cover image URL.
    pub cover_photo: String,
    /// Download page URL.
    pub download_link: String,
}

impl Game {
    /// Parses the rating.
    ///
    /// Parsing is lenient: surrounding whitespace is ignored and the longest
    /// numeric prefix is used, so `"4.5/5"` yields `4.5`. Returns `None` when
    /// no number can be read.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        parse_leading_float(&self.ratings)
    }
}

/// Parses the longest leading decimal number of `input`.
fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok().filter(|value: &f64| value.is_finite())
}
