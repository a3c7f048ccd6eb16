/// 报文字段解析工具
///
/// 交易所把数字都编码成字符串，时间戳则可能是 RFC3339 或毫秒数。
use chrono::DateTime;
use serde_json::Value;

use crate::core::{error::ExchangeError, types::Result};

/// 解析十进制字符串，空串视为 0
pub fn parse_decimal(field: &str, value: &str) -> Result<f64> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    let parsed = cleaned
        .parse::<f64>()
        .map_err(|e| ExchangeError::decoding(field, format!("'{}' 不是数字: {}", value, e)))?;
    if !parsed.is_finite() {
        return Err(ExchangeError::decoding(
            field,
            format!("'{}' 不是有限数字", value),
        ));
    }
    Ok(parsed)
}

/// 数组元素可能是字符串也可能是数字
pub fn value_to_f64(field: &str, value: &Value) -> Result<f64> {
    match value {
        Value::String(s) => parse_decimal(field, s),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExchangeError::decoding(field, format!("数字越界: {}", n))),
        other => Err(ExchangeError::decoding(
            field,
            format!("期望数字或字符串, 实际为 {}", other),
        )),
    }
}

/// RFC3339 优先，退化到整数毫秒
pub fn parse_timestamp_millis(value: &str) -> Option<i64> {
    let cleaned = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(date.timestamp_millis());
    }
    cleaned.parse::<i64>().ok()
}

/// 严格版本，解析失败返回 DecodingError
pub fn require_timestamp_millis(field: &str, value: &str) -> Result<i64> {
    parse_timestamp_millis(value)
        .ok_or_else(|| ExchangeError::decoding(field, format!("无效的时间戳: '{}'", value)))
}

pub fn require_timestamp_secs(field: &str, value: &str) -> Result<i64> {
    require_timestamp_millis(field, value).map(|ms| ms.div_euclid(1000))
}

/// 按固定小数位格式化数量/价格
pub fn format_decimal(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// 小数位数，"0.001" -> 3，"1" -> 0
pub fn decimal_places(step: &str) -> u32 {
    match step.trim().split_once('.') {
        Some((_, fraction)) => fraction.len() as u32,
        None => 0,
    }
}
