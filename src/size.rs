//! Human-readable byte sizes such as `10GB`, `512 KiB` or `1.5g`.
//!
//! Decimal units (`k`, `kb`, `m`, `mb`, ... up to `eb`) are powers of 1000, binary units
//! (`ki`, `kib`, ... up to `eib`) are powers of 1024. A bare number is a count of bytes.
//! Units are case-insensitive and may be separated from the number by whitespace.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("no size given")]
    Empty,
    #[error("{0:?} is not a number")]
    InvalidNumber(String),
    #[error("unknown size unit {0:?}")]
    UnknownUnit(String),
    #[error("{0:?} does not fit in 64 bits")]
    TooLarge(String),
}

fn multiplier(unit: &str) -> Option<u64> {
    let m = match unit {
        "" | "b" => 1,
        "k" | "kb" => 1000,
        "ki" | "kib" => 1 << 10,
        "m" | "mb" => 1000u64.pow(2),
        "mi" | "mib" => 1 << 20,
        "g" | "gb" => 1000u64.pow(3),
        "gi" | "gib" => 1 << 30,
        "t" | "tb" => 1000u64.pow(4),
        "ti" | "tib" => 1 << 40,
        "p" | "pb" => 1000u64.pow(5),
        "pi" | "pib" => 1 << 50,
        "e" | "eb" => 1000u64.pow(6),
        "ei" | "eib" => 1 << 60,
        _ => return None,
    };
    Some(m)
}

/// Parses a size into a number of bytes, truncating fractional bytes.
pub fn parse_size(input: &str) -> Result<u64, SizeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SizeError::Empty);
    }
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let number = number.replace(',', "");
    let unit = unit.trim().to_ascii_lowercase();
    let multiplier = multiplier(&unit).ok_or_else(|| SizeError::UnknownUnit(unit.clone()))?;
    let too_large = || SizeError::TooLarge(input.to_string());

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier).ok_or_else(too_large);
    }
    let value: f64 = number
        .parse()
        .map_err(|_| SizeError::InvalidNumber(number.clone()))?;
    let bytes = value * multiplier as f64;
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(too_large());
    }
    Ok(bytes as u64)
}

#[cfg(test)]
mod test {
    use super::{parse_size, SizeError};

    #[test]
    fn plain_bytes() {
        assert_eq!(parse_size("0"), Ok(0));
        assert_eq!(parse_size("1025"), Ok(1025));
        assert_eq!(parse_size("42 B"), Ok(42));
        assert_eq!(parse_size("1,000,000"), Ok(1_000_000));
    }

    #[test]
    fn decimal_and_binary_units() {
        assert_eq!(parse_size("10GB"), Ok(10_000_000_000));
        assert_eq!(parse_size("10 gb"), Ok(10_000_000_000));
        assert_eq!(parse_size("4k"), Ok(4000));
        assert_eq!(parse_size("4KiB"), Ok(4096));
        assert_eq!(parse_size("1mib"), Ok(1 << 20));
        assert_eq!(parse_size("2Ti"), Ok(2 << 40));
    }

    #[test]
    fn fractions_truncate() {
        assert_eq!(parse_size("1.5GB"), Ok(1_500_000_000));
        assert_eq!(parse_size("0.5KiB"), Ok(512));
        assert_eq!(parse_size("1.0001"), Ok(1));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_size("  "), Err(SizeError::Empty));
        assert_eq!(
            parse_size("12 parsecs"),
            Err(SizeError::UnknownUnit("parsecs".into()))
        );
        assert_eq!(
            parse_size("1.2.3MB"),
            Err(SizeError::InvalidNumber("1.2.3".into()))
        );
        assert!(matches!(parse_size("GB"), Err(SizeError::InvalidNumber(_))));
        assert!(matches!(parse_size("20EB"), Err(SizeError::TooLarge(_))));
        assert!(matches!(
            parse_size("99999999999999999999"),
            Err(SizeError::InvalidNumber(_)) | Err(SizeError::TooLarge(_))
        ));
    }
}
