//! Currency display formatting.

/// Format a dollar amount as `$1,234.56` (two decimals, comma-grouped).
pub fn usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let rem = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}.{rem:02}")
    } else {
        format!("${grouped}.{rem:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_amounts() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(9.5), "$9.50");
        assert_eq!(usd(50.0), "$50.00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(usd(10_000.0), "$10,000.00");
        assert_eq!(usd(1_234_567.89), "$1,234,567.89");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(usd(0.005), "$0.01");
        assert_eq!(usd(99.999), "$100.00");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(usd(-1234.5), "-$1,234.50");
    }
}
