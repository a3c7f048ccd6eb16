use crate::core::error::ExchangeError;
use crate::core::types::ApiVersion;
use serde::{Deserialize, Serialize};
use std::fs;

/// OKEx 适配器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OkexConfig {
    pub base_url: String,
    /// 交易对分隔符，OKEx 使用 "-"
    pub symbol_separator: String,
    pub default_depth_size: u32,
    /// `Exchange` trait 下单、撤单时使用的接口代际
    pub api_version: ApiVersion,
    pub request_timeout_secs: u64,
}

impl Default for OkexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.okx.com".to_string(),
            symbol_separator: "-".to_string(),
            default_depth_size: 20,
            api_version: ApiVersion::V5,
            request_timeout_secs: 30,
        }
    }
}

impl OkexConfig {
    /// 从YAML文件加载配置
    pub fn from_file(path: &str) -> Result<Self, ExchangeError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ExchangeError::ConfigError(format!("读取配置文件失败: {}", e)))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ExchangeError> {
        let config: OkexConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ExchangeError> {
        if self.base_url.trim().is_empty() {
            return Err(ExchangeError::ConfigError("base_url 不能为空".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ExchangeError::ConfigError(
                "request_timeout_secs 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config = OkexConfig::from_yaml_str("api_version: legacy\ndefault_depth_size: 50\n").unwrap();
        assert_eq!(config.api_version, ApiVersion::Legacy);
        assert_eq!(config.default_depth_size, 50);
        assert_eq!(config.symbol_separator, "-");
        assert_eq!(config.base_url, "https://www.okx.com");
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let err = OkexConfig::from_yaml_str("api_version: [").unwrap_err();
        assert!(matches!(err, ExchangeError::YamlError(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = OkexConfig::from_yaml_str("request_timeout_secs: 0").unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = OkexConfig::from_file("/nonexistent/okex.yml").unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigError(_)));
    }
}
