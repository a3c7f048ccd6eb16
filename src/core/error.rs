use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("网络请求错误: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("传输层错误: {0}")]
    TransportError(String),

    #[error("JSON序列化错误: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("YAML配置错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// 交易所返回的业务错误，code 原样保留
    #[error("API错误: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("数据解析错误: {context} - {reason}")]
    DecodingError { context: String, reason: String },

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("深度数据为空: {0}")]
    EmptyDepth(String),

    #[error("无法识别的订单状态: {0}")]
    UnrecognizedState(String),

    #[error("不支持的订单方向: {0}")]
    UnsupportedSide(String),

    #[error("不支持的订单类型: {order_type} ({reason})")]
    UnsupportedOrderType { order_type: String, reason: String },

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("参数验证错误: {field} - {reason}")]
    ValidationError { field: String, reason: String },
}

impl ExchangeError {
    pub fn decoding(context: impl Into<String>, reason: impl ToString) -> Self {
        ExchangeError::DecodingError {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// 判断错误是否可以由调用方重试（本库内部从不重试）
    pub fn is_retryable(&self) -> bool {
        match self {
            ExchangeError::NetworkError(_) => true,
            ExchangeError::TransportError(_) => true,
            ExchangeError::ApiError { code, .. } => code
                .parse::<u16>()
                .map(|c| (500..600).contains(&c))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// 调用方在下单前就能发现的契约错误
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ExchangeError::UnsupportedSide(_)
                | ExchangeError::UnsupportedOrderType { .. }
                | ExchangeError::ValidationError { .. }
        )
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExchangeError::NetworkError(_) => ErrorSeverity::Warning,
            ExchangeError::TransportError(_) => ErrorSeverity::Warning,
            ExchangeError::NotFound(_) => ErrorSeverity::Info,
            ExchangeError::EmptyDepth(_) => ErrorSeverity::Info,
            ExchangeError::UnrecognizedState(_) => ErrorSeverity::Critical,
            ExchangeError::ConfigError(_) => ErrorSeverity::Critical,
            ExchangeError::YamlError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// 获取用户友好的错误描述
    pub fn user_friendly_message(&self) -> String {
        match self {
            ExchangeError::NetworkError(_) | ExchangeError::TransportError(_) => {
                "网络连接问题，请检查网络状态".to_string()
            }
            ExchangeError::ApiError { code, message } => {
                format!("交易所拒绝请求 (code={}): {}", code, message)
            }
            ExchangeError::UnrecognizedState(state) => {
                format!("交易所返回了未知的订单状态 {}，已停止解析", state)
            }
            ExchangeError::NotFound(what) => format!("{}不存在或已过期", what),
            _ => self.to_string(),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Info,     // 信息性错误，通常不影响操作
    Warning,  // 警告性错误，调用方可以重试
    Error,    // 一般错误，需要调用方处理
    Critical, // 严重错误，下游记账可能受影响
}
