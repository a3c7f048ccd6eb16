use crate::core::{
    config::OkexConfig,
    error::ExchangeError,
    types::{CurrencyPair, Result},
};

/// 产品ID的大小写
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolCase {
    Upper,
    Lower,
}

/// 接口族，决定产品ID使用的大小写
///
/// v5 下单要求大写，v5 行情与旧版接口使用小写。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    V5Trade,
    V5Market,
    Legacy,
}

impl EndpointFamily {
    pub fn case(&self) -> SymbolCase {
        match self {
            EndpointFamily::V5Trade => SymbolCase::Upper,
            EndpointFamily::V5Market | EndpointFamily::Legacy => SymbolCase::Lower,
        }
    }
}

/// 交易对格式转换器
#[derive(Debug, Clone)]
pub struct SymbolConverter {
    separator: String,
}

impl Default for SymbolConverter {
    fn default() -> Self {
        Self::new("-")
    }
}

impl SymbolConverter {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
        }
    }

    pub fn from_config(config: &OkexConfig) -> Self {
        Self::new(&config.symbol_separator)
    }

    /// 规范交易对 -> 产品ID：先做 USD->USDT 改写，再统一大小写，最后拼接
    pub fn to_instrument_id(&self, pair: &CurrencyPair, case: SymbolCase) -> String {
        let pair = pair.adapt_usd_to_usdt();
        let symbol = format!("{}{}{}", pair.base, self.separator, pair.quote);
        match case {
            SymbolCase::Upper => symbol.to_uppercase(),
            SymbolCase::Lower => symbol.to_lowercase(),
        }
    }

    pub fn resolve(&self, pair: &CurrencyPair, family: EndpointFamily) -> String {
        self.to_instrument_id(pair, family.case())
    }

    /// 产品ID -> 规范交易对，如 "btc-usdt" -> BTC/USDT
    pub fn from_instrument_id(&self, inst_id: &str) -> Result<CurrencyPair> {
        let parts: Vec<&str> = inst_id.split(self.separator.as_str()).collect();
        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(ExchangeError::ValidationError {
                field: "instId".to_string(),
                reason: format!("无效的产品ID: {}", inst_id),
            });
        }
        Ok(CurrencyPair::new(parts[0], parts[1]))
    }
}
