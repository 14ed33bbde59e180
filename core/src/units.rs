//! トークン単位変換（整数のwei ⇔ 10進表示）

use crate::error::{CoreError, Result};

/// ERC-20の標準的な小数桁
pub const TOKEN_DECIMALS: u32 = 18;

fn pow10(decimals: u32) -> Result<u128> {
    10u128
        .checked_pow(decimals)
        .ok_or_else(|| CoreError::InvalidInput(format!("Too many decimals: {}", decimals)))
}

/// 整数値を10進文字列に変換（例: 800000000000000000000 → "800.0"）
pub fn format_units(value: u128, decimals: u32) -> String {
    let Ok(base) = pow10(decimals) else {
        return "0.0".to_string();
    };
    let whole = value / base;
    let fraction = value % base;

    if decimals == 0 || fraction == 0 {
        return format!("{}.0", whole);
    }

    let fraction = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// 10進文字列を整数値に変換（空文字は0）
pub fn parse_units(text: &str, decimals: u32) -> Result<u128> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let (whole, raw_fraction) = text.split_once('.').unwrap_or((text, ""));
    let fraction = raw_fraction.trim_end_matches('0');

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && raw_fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(CoreError::InvalidInput(format!("Invalid amount: {}", text)));
    }
    if fraction.len() > decimals as usize {
        return Err(CoreError::InvalidInput(format!(
            "Fractional component exceeds {} decimals: {}",
            decimals, text
        )));
    }

    let overflow = || CoreError::InvalidInput(format!("Amount too large: {}", text));
    let base = pow10(decimals)?;
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| overflow())?
    };
    let fraction_value = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        padded.parse::<u128>().map_err(|_| overflow())?
    };

    whole_value
        .checked_mul(base)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(overflow)
}

/// 比較・クランプ用の浮動小数
pub fn to_float(value: u128, decimals: u32) -> f64 {
    format_units(value, decimals).parse().unwrap_or(0.0)
}

/// min未満はmin、max超はmax（maxの判定が後）
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// 小数点以下切り捨て（例: 344.888 → "344"）
pub fn format_integer(value: u128, decimals: u32) -> String {
    to_float(value, decimals).floor().to_string()
}

/// 小数第2位まで（例: 872.888 → "872.89"）
pub fn format_two_decimals(value: u128, decimals: u32) -> String {
    format!("{:.2}", to_float(value, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(800 * ETHER, TOKEN_DECIMALS), "800.0");
        assert_eq!(format_units(ETHER + ETHER / 2, TOKEN_DECIMALS), "1.5");
        assert_eq!(format_units(1, TOKEN_DECIMALS), "0.000000000000000001");
        assert_eq!(format_units(0, TOKEN_DECIMALS), "0.0");
        assert_eq!(format_units(7, 0), "7.0");
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1.5", TOKEN_DECIMALS).unwrap(), ETHER + ETHER / 2);
        assert_eq!(parse_units("800", TOKEN_DECIMALS).unwrap(), 800 * ETHER);
        assert_eq!(parse_units(".25", TOKEN_DECIMALS).unwrap(), ETHER / 4);
        assert_eq!(parse_units("", TOKEN_DECIMALS).unwrap(), 0);
        assert_eq!(parse_units("2.500", 2).unwrap(), 250);

        assert!(parse_units("1.234", 2).is_err());
        assert!(parse_units("abc", TOKEN_DECIMALS).is_err());
        assert!(parse_units("-1", TOKEN_DECIMALS).is_err());
        assert!(parse_units(".", TOKEN_DECIMALS).is_err());
        assert!(parse_units("1.2.3", TOKEN_DECIMALS).is_err());
    }

    #[test]
    fn test_display_helpers() {
        let value = 344 * ETHER + 888_000_000_000_000_000;
        assert_eq!(format_integer(value, TOKEN_DECIMALS), "344");
        assert_eq!(format_two_decimals(value, TOKEN_DECIMALS), "344.89");
        assert_eq!(to_float(ETHER / 2, TOKEN_DECIMALS), 0.5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.5, 1.0, 10.0), 1.0);
        assert_eq!(clamp(15.0, 1.0, 10.0), 10.0);
        assert_eq!(clamp(5.0, 1.0, 10.0), 5.0);
        // 上限が下限未満なら上限側
        assert_eq!(clamp(5.0, 1.0, 0.0), 0.0);
    }
}
