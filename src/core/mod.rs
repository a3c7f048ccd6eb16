// 核心模块 - 规范模型、错误、配置与传输接口
pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod types;

pub use client::{BaseClient, HttpBaseClient, HttpMethod, RequestSigner};
pub use config::*;
pub use error::*;
pub use exchange::*;
pub use types::*;
