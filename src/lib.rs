pub mod core;
pub mod exchanges;
pub mod utils;

// 选择性导出，避免命名冲突
pub use crate::core::{client::*, config::*, error::*, exchange::*, types::*};
pub use exchanges::*;
pub use utils::*;
