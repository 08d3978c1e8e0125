//! Cell-level type coercion shared by the validator and the processor.
//!
//! Both must agree on what counts as null and what parses, otherwise the
//! report would disagree with the loaded table.

/// A cell is null when it is empty or whitespace only.
pub fn is_null(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// Parse a year. Accepts `2023` and float renderings such as `2023.0`.
pub fn parse_year(cell: &str) -> Option<i32> {
    let s = cell.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX)
    {
        Some(value as i32)
    } else {
        None
    }
}

/// Parse a price. Plain numbers parse directly; otherwise currency
/// decoration is dropped (`$1,234.56` → `1234.56`).
pub fn parse_price(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if let Ok(value) = s.parse::<f64>() {
        return value.is_finite().then_some(value);
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed text, or `None` for a null cell.
pub fn parse_text(cell: &str) -> Option<String> {
    let s = cell.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Key used when comparing years across rows: parsed when possible so that
/// `2023` and `2023.0` collide, the trimmed text otherwise.
pub fn year_key(cell: &str) -> String {
    match parse_year(cell) {
        Some(year) => year.to_string(),
        None => cell.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls() {
        assert!(is_null(""));
        assert!(is_null("   "));
        assert!(!is_null("N/A"));
        assert!(!is_null("0"));
    }

    #[test]
    fn years() {
        assert_eq!(parse_year("2023"), Some(2023));
        assert_eq!(parse_year(" 2024 "), Some(2024));
        assert_eq!(parse_year("2023.0"), Some(2023));
        assert_eq!(parse_year("2023.5"), None);
        assert_eq!(parse_year("FY2023"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn prices() {
        assert_eq!(parse_price("150.50"), Some(150.50));
        assert_eq!(parse_price("$150.50"), Some(150.50));
        assert_eq!(parse_price("1,234.56"), Some(1234.56));
        assert_eq!(parse_price("$1,234.56"), Some(1234.56));
        assert_eq!(parse_price("-150.50"), Some(-150.50));
        assert_eq!(parse_price("NT$ 98"), Some(98.0));
    }

    #[test]
    fn unparseable_prices() {
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price("invalid"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn text() {
        assert_eq!(parse_text(" AAPL "), Some("AAPL".to_string()));
        assert_eq!(parse_text("  "), None);
    }

    #[test]
    fn year_keys_collide_across_renderings() {
        assert_eq!(year_key("2023"), year_key("2023.0"));
        assert_eq!(year_key(" FY23 "), "FY23");
    }
}
