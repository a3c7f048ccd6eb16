// 交易所实现
pub mod okex;

// 导出交易所实现
pub use okex::{KlineOptions, OkexSpot};
