/// 客户端订单ID生成器
///
/// OKEx 的 clOrdId / client_oid 最长 32 位，只允许字母和数字。
/// 使用操作系统随机源，多个调用方并发生成时不会撞号。
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// OKEx 客户端订单ID长度
pub const CLIENT_ORDER_ID_LEN: usize = 32;

/// 生成指定长度的字母数字随机串
pub fn generate_client_order_id(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成一个新的 32 位客户端订单ID
pub fn new_client_order_id() -> String {
    generate_client_order_id(CLIENT_ORDER_ID_LEN)
}
