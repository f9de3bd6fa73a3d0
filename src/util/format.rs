//! Number formatting utilities.

/// Format a cost in USD with four decimal places.
#[must_use]
pub fn format_cost(value: f64) -> String {
    format!("${value:.4}")
}

/// Format a token count compactly (`1.5K`, `2.0M`).
#[must_use]
pub fn format_tokens(value: u64) -> String {
    fn format_compact(value: u64, divisor: u64, suffix: &str) -> String {
        let major = value / divisor;
        let minor = (value % divisor) / (divisor / 10);
        format!("{major}.{minor}{suffix}")
    }

    if value >= 1_000_000 {
        format_compact(value, 1_000_000, "M")
    } else if value >= 1_000 {
        format_compact(value, 1_000, "K")
    } else {
        value.to_string()
    }
}

/// Mask a secret for display, keeping a short prefix and suffix.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_cost_four_decimals() {
        assert_eq!(format_cost(0.0), "$0.0000");
        assert_eq!(format_cost(0.002), "$0.0020");
        assert_eq!(format_cost(1.23456), "$1.2346");
    }

    #[test]
    fn format_tokens_millions() {
        assert_eq!(format_tokens(1_500_000), "1.5M");
    }

    #[test]
    fn format_tokens_thousands() {
        assert_eq!(format_tokens(12_500), "12.5K");
    }

    #[test]
    fn format_tokens_small() {
        assert_eq!(format_tokens(500), "500");
    }

    #[test]
    fn mask_secret_keeps_edges() {
        assert_eq!(mask_secret("sk-abcdef123456wxyz"), "sk-a…wxyz");
        assert_eq!(mask_secret("short"), "*****");
    }
}
