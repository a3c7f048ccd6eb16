// 工具模块 - 通用工具函数
pub mod logger;
pub mod order_id;
pub mod parse;
pub mod symbol;

pub use logger::init_logger;
pub use order_id::{generate_client_order_id, new_client_order_id, CLIENT_ORDER_ID_LEN};
pub use symbol::*;
