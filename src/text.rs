//! Text helpers shared by the detectors, the range parser and the local
//! embedder.

use std::str::FromStr;

use rust_decimal::Decimal;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase `text` and strip diacritics.
///
/// Uses compatibility decomposition, so `m²` folds into `m2` and `ñ` into `n`.
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split already-normalized text into alphanumeric tokens.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

/// Value of a Spanish or English number word (one to twelve).
pub fn number_word(word: &str) -> Option<u32> {
    let value = match word {
        "un" | "uno" | "una" | "one" => 1,
        "dos" | "two" => 2,
        "tres" | "three" => 3,
        "cuatro" | "four" => 4,
        "cinco" | "five" => 5,
        "seis" | "six" => 6,
        "siete" | "seven" => 7,
        "ocho" | "eight" => 8,
        "nueve" | "nine" => 9,
        "diez" | "ten" => 10,
        "once" | "eleven" => 11,
        "doce" | "twelve" => 12,
        _ => return None,
    };
    Some(value)
}

/// Parse a written amount such as `10.000`, `1.250,50`, `12,5` or `3000`.
///
/// A separator followed only by three-digit groups is a thousands separator;
/// otherwise it marks the decimals. When both `.` and `,` appear, the last one
/// is the decimal separator.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim().trim_end_matches(['.', ',']);
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let canonical = match (raw.rfind('.'), raw.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (thousands, decimal) = if dot > comma { (',', '.') } else { ('.', ',') };
            raw.replace(thousands, "").replace(decimal, ".")
        }
        (Some(_), None) => single_separator(raw, '.'),
        (None, Some(_)) => single_separator(raw, ','),
        (None, None) => raw.to_string(),
    };

    Decimal::from_str(&canonical).ok()
}

fn single_separator(raw: &str, sep: char) -> String {
    let mut groups = raw.split(sep);
    let head = groups.next().unwrap_or_default();
    let rest: Vec<&str> = groups.collect();
    let grouped = !head.is_empty() && head.len() <= 3 && rest.iter().all(|g| g.len() == 3);
    if grouped {
        raw.replace(sep, "")
    } else if rest.len() == 1 {
        raw.replace(sep, ".")
    } else {
        // e.g. "1.2.3": not a number we can read unambiguously
        String::new()
    }
}
