/// 금액 파싱 (NUMERIC(8, 2) 범위)
// region:    --- Imports
use rust_decimal::Decimal;
use std::str::FromStr;

// endregion: --- Imports

/// 전체 자릿수
pub const MAX_DIGITS: u32 = 8;
/// 소수점 이하 자릿수
pub const DECIMAL_PLACES: u32 = 2;

/// 폼 입력 금액을 소수점 둘째 자리 Decimal로 변환
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("This field is required.".to_string());
    }

    let value = Decimal::from_str(raw).map_err(|_| "Enter a number.".to_string())?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }

    // 입력 그대로의 소수 자릿수 기준 ("3.100"은 세 자리)
    if value.scale() > DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            DECIMAL_PLACES
        ));
    }

    let integer_limit = Decimal::from(10_i64.pow(MAX_DIGITS - DECIMAL_PLACES));
    if value.trunc().abs() >= integer_limit {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            MAX_DIGITS
        ));
    }

    let mut value = value.abs();
    value.rescale(DECIMAL_PLACES);
    Ok(value)
}

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_accepts_two_places() {
        assert_eq!(parse_amount("10.01").unwrap(), dec("10.01"));
        assert_eq!(parse_amount(" 15 ").unwrap().to_string(), "15.00");
        assert_eq!(parse_amount("7.5").unwrap().to_string(), "7.50");
        assert_eq!(parse_amount("3.10").unwrap().to_string(), "3.10");
        assert_eq!(parse_amount("999999.99").unwrap(), dec("999999.99"));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("1.001").is_err());
        assert!(parse_amount("1000000").is_err());
    }

    #[test]
    fn test_parse_amount_counts_trailing_zero_places() {
        assert_eq!(
            parse_amount("3.100").unwrap_err(),
            "Ensure that there are no more than 2 decimal places."
        );
        assert!(parse_amount("10.000").is_err());
        assert_eq!(parse_amount("10.00").unwrap(), dec("10"));
    }
}
// endregion: --- Tests
