//! Heading key normalization
//!
//! Headings such as "มาตรา ๑๐๕" or "หมวด 2" are keyed by their number. Thai
//! digits are folded to ASCII and only the leading digit run of the second
//! word is kept, so "มาตรา 12ทวิ" and "มาตรา 12" share the key "12".

/// Offset between a Thai digit (U+0E50..=U+0E59) and its ASCII counterpart
const THAI_ZERO: u32 = '๐' as u32;

/// Build the raw key of a heading: its first two whitespace-separated words
pub fn raw_key(text: &str) -> String {
    text.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Normalize a raw heading key into its canonical form
///
/// # Parameters
/// * `raw` - Raw key, usually the first two words of a heading
///
/// # Returns
/// * The leading digit run of the second word, with Thai digits converted
/// * `raw` unchanged when there is no second word or it has no leading digits
pub fn normalize_key(raw: &str) -> String {
    let Some(number) = raw.split_whitespace().nth(1) else {
        return raw.to_string();
    };

    let digits: String = number
        .chars()
        .map(arabic_digit)
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        raw.to_string()
    } else {
        digits
    }
}

/// Read a normalized key as an article number, if it is numeric
pub fn article_number(key: &str) -> Option<u64> {
    key.parse().ok()
}

/// Convert a Thai digit to ASCII, leaving every other character untouched
fn arabic_digit(c: char) -> char {
    match c {
        '๐'..='๙' => char::from_digit(c as u32 - THAI_ZERO, 10).unwrap_or(c),
        _ => c,
    }
}
