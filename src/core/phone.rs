/// Country prefix assumed for ten-digit numbers.
pub const DEFAULT_COUNTRY_PREFIX: &str = "+1";

/// Normalize a free-form phone number into international form.
///
/// Input that already starts with `+` is trusted as-is (formatting included).
/// Ten digits get `default_country_prefix`, eleven digits starting with `1`
/// and anything longer than ten digits get a bare `+`. Shorter input is
/// returned trimmed but otherwise untouched, since it may be an extension or
/// a local short code.
pub fn normalize(raw: &str, default_country_prefix: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('+') {
        return trimmed.to_string();
    }

    let digits = digits_only(trimmed);

    match digits.len() {
        10 => format!("{}{}", default_country_prefix, digits),
        11 if digits.starts_with('1') => format!("+{}", digits),
        n if n > 10 => format!("+{}", digits),
        _ => trimmed.to_string(),
    }
}

/// Digits only, for matching numbers regardless of formatting.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        normalize(raw, DEFAULT_COUNTRY_PREFIX)
    }

    #[test]
    fn domestic_numbers_get_country_prefix() {
        assert_eq!(norm("5551234567"), "+15551234567");
        assert_eq!(norm("(555) 123-4567"), "+15551234567");
        assert_eq!(norm("555-123-4567"), "+15551234567");
        assert_eq!(norm("555.123.4567"), "+15551234567");
        assert_eq!(normalize("5551234567", "+44"), "+445551234567");
    }

    #[test]
    fn eleven_digits_with_leading_one() {
        assert_eq!(norm("15551234567"), "+15551234567");
        assert_eq!(norm("1 (555) 123-4567"), "+15551234567");
    }

    #[test]
    fn international_input_is_kept_verbatim() {
        assert_eq!(norm("+15551234567"), "+15551234567");
        assert_eq!(norm("+44 7911 123456"), "+44 7911 123456");
        assert_eq!(norm("  +1 (555) 123-4567 "), "+1 (555) 123-4567");
    }

    #[test]
    fn long_numbers_are_assumed_to_carry_a_country_code() {
        assert_eq!(norm("919876543210"), "+919876543210");
        assert_eq!(norm("44 7911 123456"), "+447911123456");
    }

    #[test]
    fn short_numbers_are_left_alone() {
        assert_eq!(norm("123"), "123");
        assert_eq!(norm(" ext. 4567 "), "ext. 4567");
        assert_eq!(norm("555-1234"), "555-1234");
        assert_eq!(norm(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "5551234567",
            "15551234567",
            "+44 7911 123456",
            "123",
            "919876543210",
            "(555) 123-4567",
            "  ",
            "call me",
            "+",
            "0044 20 7946 0958",
        ];
        for input in inputs {
            let once = norm(input);
            assert_eq!(norm(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("+1 (555) 123-4567"), "15551234567");
    }
}
