//! ISO 4217 style currency codes.

/// Trims and uppercases `code`, accepting exactly three ASCII letters.
#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    (code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::already_upper("EUR", "EUR")]
    #[case::lowercase("usd", "USD")]
    #[case::padded(" jpy ", "JPY")]
    fn test_accepts_three_letters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_code(input).as_deref(), Some(expected));
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("EU")]
    #[case::too_long("EURO")]
    #[case::digits("E1R")]
    #[case::non_ascii("ÉUR")]
    fn test_rejects_malformed(#[case] input: &str) {
        assert_eq!(normalize_code(input), None);
    }
}
