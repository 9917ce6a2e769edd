pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match normalize_text(value).to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Reads money columns such as `$12,500.00`; anything unreadable is absent.
pub(crate) fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = normalize_text(value)
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

pub(crate) fn parse_hours(value: &str) -> Option<u32> {
    let cleaned = normalize_text(value);
    cleaned.parse::<u32>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|hours| hours.is_finite() && *hours >= 0.0 && *hours <= f64::from(u32::MAX))
            .map(|hours| hours.round() as u32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_markers_and_whitespace() {
        assert_eq!(normalize_text("\u{feff} Water   Damage "), "Water Damage");
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn amounts_tolerate_currency_formatting() {
        assert_eq!(parse_amount("$12,500.50"), Some(12500.5));
        assert_eq!(parse_amount("800"), Some(800.0));
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn hours_accept_integral_floats() {
        assert_eq!(parse_hours("48"), Some(48));
        assert_eq!(parse_hours("24.0"), Some(24));
        assert_eq!(parse_hours("-3"), None);
    }
}
