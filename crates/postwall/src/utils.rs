//! 🔧 Small helpers the page layer leans on.

use crate::errors::FeedError;

/// 🔢 `^[1-9][0-9]*$` — a positive integer with no leading zero, sign or whitespace.
pub fn is_numeric(value: &str) -> bool {
    let mut digits = value.chars();
    match digits.next() {
        Some('1'..='9') => digits.all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// 🎯 Turn a path segment into a post id, or refuse before anyone touches the network.
///
/// Numbers too big for `u64` are refused the same way.
pub fn parse_post_number(value: &str) -> Result<u64, FeedError> {
    if !is_numeric(value) {
        return Err(FeedError::InvalidPostNumber);
    }
    value.parse().map_err(|_| FeedError::InvalidPostNumber)
}

/// 🎩 Title Case For Page Headings.
///
/// Splits on single spaces (so runs of spaces survive), upper-cases the first letter of
/// every word longer than one character and upper-cases one-letter words entirely.
pub fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_only_honest_positive_integers_are_numeric() {
        for the_good in ["1", "2", "10", "100", "9876543210"] {
            assert!(is_numeric(the_good), "{the_good:?} should pass");
        }
        for the_bad in ["", "0", "01", "-1", "+1", "1.0", " 1", "1 ", "abc", "1a", "١"] {
            assert!(!is_numeric(the_bad), "{the_bad:?} should fail");
        }
    }

    #[test]
    fn the_one_where_post_numbers_parse_or_get_turned_away() {
        assert_eq!(parse_post_number("42").expect("💀 42 is fine"), 42);

        for the_bad in ["0", "abc", "", "99999999999999999999999"] {
            let the_error = parse_post_number(the_bad).expect_err("💀 should be refused");
            assert_eq!(the_error.to_string(), "Invalid post number");
        }
    }

    #[test]
    fn the_one_where_headings_get_their_capitals() {
        assert_eq!(title_case("qui est esse"), "Qui Est Esse");
        assert_eq!(title_case("a b cd"), "A B Cd");
        assert_eq!(title_case("double  space"), "Double  Space");
        assert_eq!(title_case(""), "");
    }
}
