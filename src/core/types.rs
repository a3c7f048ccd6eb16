/// 统一的类型定义模块
/// 交易所无关的规范模型，所有适配器都产出这些值类型
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::core::error::ExchangeError;

// ============= 基础类型定义 =============

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// API 代际：旧版 v3 接口与 v5 接口
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    Legacy,
    V5,
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion::V5
    }
}

/// 币种代码，构造时统一转为大写
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Currency(code.trim().to_uppercase())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn usd() -> Self {
        Currency::new("USD")
    }

    pub fn usdt() -> Self {
        Currency::new("USDT")
    }

    /// USD 改写为 USDT，其他币种原样返回
    pub fn adapt_usd_to_usdt(&self) -> Self {
        if *self == Currency::usd() {
            Currency::usdt()
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 交易对 (base, quote)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: Currency::new(base),
            quote: Currency::new(quote),
        }
    }

    pub fn adapt_usd_to_usdt(&self) -> Self {
        Self {
            base: self.base.adapt_usd_to_usdt(),
            quote: self.quote.adapt_usd_to_usdt(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// 解析标准格式 "BTC/USDT"
impl FromStr for CurrencyPair {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(ExchangeError::ValidationError {
                field: "currency_pair".to_string(),
                reason: format!("无效的交易对格式: {}，应为 BASE/QUOTE 格式", s),
            });
        }
        Ok(CurrencyPair::new(parts[0], parts[1]))
    }
}

// ============= 订单相关 =============

/// 订单方向（含市价买卖）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
    BuyMarket,
    SellMarket,
}

impl TradeSide {
    pub fn is_market(&self) -> bool {
        matches!(self, TradeSide::BuyMarket | TradeSide::SellMarket)
    }

    /// 交易所报文里的方向字段
    pub fn wire_side(&self) -> &'static str {
        match self {
            TradeSide::Buy | TradeSide::BuyMarket => "buy",
            TradeSide::Sell | TradeSide::SellMarket => "sell",
        }
    }

    /// 解析交易所报文里的方向，只认小写的 buy / sell
    pub fn from_wire(s: &str) -> Result<Self> {
        match s {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(ExchangeError::UnsupportedSide(other.to_string())),
        }
    }

    /// 对应的市价方向
    pub fn to_market(self) -> Self {
        match self {
            TradeSide::Buy | TradeSide::BuyMarket => TradeSide::BuyMarket,
            TradeSide::Sell | TradeSide::SellMarket => TradeSide::SellMarket,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
            TradeSide::BuyMarket => "BUY_MARKET",
            TradeSide::SellMarket => "SELL_MARKET",
        };
        f.write_str(s)
    }
}

/// 规范名称解析，不区分大小写
impl FromStr for TradeSide {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            "buy_market" => Ok(TradeSide::BuyMarket),
            "sell_market" => Ok(TradeSide::SellMarket),
            _ => Err(ExchangeError::UnsupportedSide(s.to_string())),
        }
    }
}

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Unfinished,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl TradeStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, TradeStatus::Filled | TradeStatus::Cancelled)
    }
}

/// 下单类型提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderTypeHint {
    Limit,
    Market,
    PostOnly,
    Fok,
    Ioc,
}

impl OrderTypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderTypeHint::Limit => "limit",
            OrderTypeHint::Market => "market",
            OrderTypeHint::PostOnly => "post_only",
            OrderTypeHint::Fok => "fok",
            OrderTypeHint::Ioc => "ioc",
        }
    }
}

impl FromStr for OrderTypeHint {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "limit" => Ok(OrderTypeHint::Limit),
            "market" => Ok(OrderTypeHint::Market),
            "post_only" => Ok(OrderTypeHint::PostOnly),
            "fok" => Ok(OrderTypeHint::Fok),
            "ioc" => Ok(OrderTypeHint::Ioc),
            _ => Err(ExchangeError::UnsupportedOrderType {
                order_type: s.to_string(),
                reason: "未知的订单类型".to_string(),
            }),
        }
    }
}

/// 订单
///
/// 身份由 (cid, order_id) 组成：cid 在首次请求前由客户端生成，
/// order_id 由交易所分配。状态到达 PartiallyFilled / Filled 后
/// 应满足 `deal_amount <= amount`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub cid: String,
    pub order_id: String,
    pub side: TradeSide,
    pub price: f64,
    pub amount: f64,
    pub avg_price: f64,
    pub deal_amount: f64,
    pub fee: f64,
    pub status: TradeStatus,
    pub currency: CurrencyPair,
    /// 毫秒时间戳，解析失败时为 0
    pub order_time: i64,
}

impl Order {
    pub fn new(currency: CurrencyPair, side: TradeSide, price: f64, amount: f64) -> Self {
        Self {
            cid: String::new(),
            order_id: String::new(),
            side,
            price,
            amount,
            avg_price: 0.0,
            deal_amount: 0.0,
            fee: 0.0,
            status: TradeStatus::Unfinished,
            currency,
            order_time: 0,
        }
    }
}

/// 下单确认（旧版接口逐笔返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderAck {
    pub client_oid: String,
    pub order_id: String,
    pub result: bool,
    pub error_code: String,
    pub error_message: String,
}

// ============= 行情数据 =============

/// 行情数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub pair: CurrencyPair,
    pub last: f64,
    pub high: f64,
    pub low: f64,
    /// 卖一价
    pub sell: f64,
    /// 买一价
    pub buy: f64,
    pub vol: f64,
    /// 毫秒时间戳
    pub date: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRecord {
    pub price: f64,
    pub amount: f64,
}

/// 深度快照：卖盘按价格从高到低，买盘保持交易所原序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    pub pair: CurrencyPair,
    /// 毫秒时间戳
    pub utime: i64,
    pub ask_list: Vec<DepthRecord>,
    pub bid_list: Vec<DepthRecord>,
}

/// K线周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlinePeriod {
    Min1,
    Min3,
    Min5,
    Min15,
    Min30,
    Min60,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
    Month1,
}

/// K线数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    pub pair: CurrencyPair,
    /// 秒级时间戳
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub vol: f64,
}

/// 公共成交记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub tid: i64,
    pub side: TradeSide,
    pub amount: f64,
    pub price: f64,
    /// 秒级时间戳
    pub date: i64,
    pub pair: CurrencyPair,
}

/// 交易对精度信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPrecision {
    pub symbol: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub price_precision: u32,
    pub amount_precision: u32,
    pub min_amount: f64,
}

// ============= 账户管理 =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAccount {
    pub currency: Currency,
    /// 可用数量
    pub amount: f64,
    /// 冻结数量
    pub frozen_amount: f64,
}

/// 账户：币种到子账户的映射，键唯一
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub sub_accounts: HashMap<Currency, SubAccount>,
}

/// 交易账户余额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub ccy: String,
    pub avail_bal: f64,
    pub cash_bal: f64,
    pub frozen_bal: f64,
    pub ord_frozen: f64,
}

/// 资金账户余额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub ccy: String,
    pub avail_bal: f64,
    pub bal: f64,
    pub frozen_bal: f64,
}

/// 资金划转请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub ccy: String,
    pub amount: f64,
    /// 0：账户内划转 1：母账户转子账户 2：子账户转母账户
    pub transfer_type: String,
    pub from: String,
    pub to: String,
}

/// 资金划转结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    pub transfer_id: String,
    pub ccy: String,
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// 提币请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub ccy: String,
    pub chain: String,
    pub amount: f64,
    /// 3：站内 4：链上地址
    pub dest: String,
    pub to_addr: String,
    pub pwd: String,
    pub fee: f64,
}

/// 提币申请结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalResult {
    pub withdrawal_id: String,
    pub ccy: String,
    pub chain: String,
    pub amount: f64,
}

// ============= 充值提现 =============

/// 币种信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub ccy: String,
    pub name: String,
    pub chain: String,
    pub can_deposit: bool,
    pub can_withdraw: bool,
    pub can_internal: bool,
    pub min_withdraw: f64,
    pub min_fee: f64,
    pub max_fee: f64,
}

/// 充值地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub ccy: String,
    pub chain: String,
    pub address: String,
    pub contract_address: String,
    pub to: String,
    pub selected: bool,
}
