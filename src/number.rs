//! Canonical decimal text for numbers.
//!
//! Numbers never leave their textual form: the lexer writes literals with an
//! explicit fractional part, while values produced at runtime drop an exact
//! `.0` so integral results print without a decimal point.

/// Normalize number literal text as it leaves the lexer: `5` becomes `5.0`,
/// `2.50` stays `2.50`.
pub fn literal_text(lexeme: &str) -> String {
    if lexeme.contains('.') {
        lexeme.to_string()
    } else {
        format!("{lexeme}.0")
    }
}

/// Render a runtime number. Integral values lose their fractional part and
/// non-finite results print as `NaN`, `inf` or `-inf`.
pub fn value_text(n: f64) -> String {
    if n == 0.0 {
        // avoid printing "-0"
        return "0".to_string();
    }
    format!("{n}")
}

/// Parse number text (literal or runtime form) and re-render it.
pub fn canonicalize(text: &str) -> Option<String> {
    parse(text).map(value_text)
}

pub fn parse(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
