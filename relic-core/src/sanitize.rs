//! Markup stripping for outbound text fields.
//!
//! Catalogue names, addresses, and category labels originate from bulk loads
//! and user-adjacent editing, so every query path passes them through
//! [`strip_markup`] before they leave the engine.

/// Remove markup tags from a text field, leaving plain text.
///
/// A `<` only opens a tag when followed by an ASCII letter, `/`, `!`, or
/// `?`; any other `<` is kept literally. A tag truncated at the end of the
/// input is dropped. The function is idempotent: stripping already-clean
/// text is a no-op.
///
/// # Examples
/// ```
/// use relic_core::sanitize::strip_markup;
///
/// assert_eq!(strip_markup("<b>Gyeongbokgung</b>"), "Gyeongbokgung");
/// assert_eq!(strip_markup("1 < 2"), "1 < 2");
/// assert_eq!(strip_markup("plain"), "plain");
/// ```
#[must_use]
pub fn strip_markup(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(current) = chars.next() {
        if current == '<' && chars.peek().copied().is_some_and(opens_tag) {
            for skipped in chars.by_ref() {
                if skipped == '>' {
                    break;
                }
            }
        } else {
            output.push(current);
        }
    }
    output
}

const fn opens_tag(next: char) -> bool {
    next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<b>bold</b>", "bold")]
    #[case("<script>alert('x')</script>", "alert('x')")]
    #[case("<!-- note -->", "")]
    #[case("a <3 b", "a <3 b")]
    #[case("1 < 2 and 3 > 2", "1 < 2 and 3 > 2")]
    #[case("<img src=x onerror=alert(1)>", "")]
    #[case("truncated <b", "truncated ")]
    #[case("", "")]
    fn strips_markup(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_markup(input), expected);
    }

    #[rstest]
    #[case("<b>Sungnyemun</b> Gate")]
    #[case("no markup at all")]
    #[case("a < b <i>c</i>")]
    fn stripping_twice_matches_stripping_once(#[case] input: &str) {
        let once = strip_markup(input);
        assert_eq!(strip_markup(&once), once);
    }
}
