use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::core::{error::ExchangeError, types::Result};

/// v5 通用外层结构 `{code, msg, data}`
#[derive(Debug, Deserialize)]
struct Envelope {
    code: Value,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

/// 旧版写操作的返回结构
#[derive(Debug, Deserialize)]
pub struct LegacyResult {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub error_code: Value,
    #[serde(default)]
    pub error_message: String,
}

pub(crate) fn code_to_string(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 校验 v5 外层结构，code 为 "0" 才返回 data，否则不再解析 data
pub fn validate_envelope(raw: &str) -> Result<Value> {
    let envelope: Envelope =
        serde_json::from_str(raw).map_err(|e| ExchangeError::decoding("envelope", e))?;

    let code = code_to_string(&envelope.code);
    if code != "0" {
        return Err(ExchangeError::ApiError {
            code,
            message: envelope.msg,
        });
    }
    Ok(envelope.data)
}

/// 校验外层结构后把 data 解析成目标类型
pub fn decode_data<T: DeserializeOwned>(context: &str, raw: &str) -> Result<T> {
    let data = validate_envelope(raw)?;
    serde_json::from_value(data).map_err(|e| ExchangeError::decoding(context, e))
}

/// 旧版读接口直接返回数组或对象，没有外层结构
pub fn decode_legacy<T: DeserializeOwned>(context: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| ExchangeError::decoding(context, e))
}

/// 旧版写接口以 result 字段判定成败
pub fn check_legacy_result(result: &LegacyResult) -> Result<()> {
    if result.result {
        Ok(())
    } else {
        Err(ExchangeError::ApiError {
            code: code_to_string(&result.error_code),
            message: result.error_message.clone(),
        })
    }
}

/// 期望至少一个元素的查询，空列表视为未找到
pub fn first_or_not_found<T>(items: Vec<T>, what: impl Into<String>) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::NotFound(what.into()))
}
