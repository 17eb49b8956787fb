//! Identifier sanitizing for user-supplied contract names

/// Turn free text into a Cairo-safe identifier
///
/// Leading characters that cannot start an identifier are dropped, every run
/// of non-word characters is removed and the character following it is
/// upper-cased (`"my token"` → `"myToken"`). With `capitalize` the first
/// character is upper-cased too.
pub fn to_identifier(s: &str, capitalize: bool) -> String {
    let trimmed = s.trim_start_matches(|c: char| !(c.is_ascii_alphabetic() || c == '$' || c == '_'));

    let mut out = String::with_capacity(trimmed.len());
    let mut upper_next = capitalize;
    let mut in_separator = false;

    for c in trimmed.chars() {
        if is_word_char(c) {
            if upper_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
            in_separator = false;
        } else if !in_separator {
            in_separator = true;
            upper_next = true;
        }
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(to_identifier("MyToken", true), "MyToken");
    }

    #[test]
    fn test_capitalize_first_letter() {
        assert_eq!(to_identifier("coin", true), "Coin");
        assert_eq!(to_identifier("coin", false), "coin");
    }

    #[test]
    fn test_separators_camel_case() {
        assert_eq!(to_identifier("my super token", true), "MySuperToken");
        assert_eq!(to_identifier("gold-bar__v2", false), "goldBar__v2");
    }

    #[test]
    fn test_leading_digits_dropped() {
        assert_eq!(to_identifier("42 coins", true), "Coins");
    }

    #[test]
    fn test_nothing_usable_is_empty() {
        assert_eq!(to_identifier("123 !!", true), "");
    }
}
