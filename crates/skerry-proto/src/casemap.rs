//! RFC 1459 case mapping.
//!
//! `{}|^` are the lowercase forms of `[]\~`; nicknames and channel names that
//! differ only by this mapping name the same entity.

/// Lowercase a single character under RFC 1459 rules.
#[inline]
pub fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c.to_ascii_lowercase(),
    }
}

/// Lowercase a nickname or channel name under RFC 1459 rules.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Compare two names under RFC 1459 rules.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .chars()
            .zip(b.chars())
            .all(|(x, y)| irc_lower_char(x) == irc_lower_char(y))
}
