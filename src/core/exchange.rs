use crate::core::types::{
    Account, CurrencyPair, Depth, Kline, KlinePeriod, Order, OrderTypeHint, Result, Ticker, Trade,
};
use async_trait::async_trait;

/// 交易所通用接口trait
///
/// 与具体交易所、具体接口代际无关，调用方只依赖规范模型。
#[async_trait]
pub trait Exchange: Send + Sync {
    /// 获取交易所名称
    fn name(&self) -> &str;

    /// 获取现货账户
    async fn get_account(&self) -> Result<Account>;

    /// 获取行情信息
    async fn get_ticker(&self, pair: &CurrencyPair) -> Result<Ticker>;

    /// 获取深度，size 为 0 时使用默认档数
    async fn get_depth(&self, size: u32, pair: &CurrencyPair) -> Result<Depth>;

    /// 获取K线，size 为 0 时不截断
    async fn get_kline_records(
        &self,
        pair: &CurrencyPair,
        period: KlinePeriod,
        size: usize,
    ) -> Result<Vec<Kline>>;

    /// 获取公共成交记录
    async fn get_trades(&self, pair: &CurrencyPair, limit: u32) -> Result<Vec<Trade>>;

    async fn limit_buy(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order>;

    async fn limit_sell(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order>;

    /// 市价买入，price 在部分接口代际下表示计价币花费
    async fn market_buy(&self, pair: &CurrencyPair, amount: f64, price: f64) -> Result<Order>;

    async fn market_sell(&self, pair: &CurrencyPair, amount: f64) -> Result<Order>;

    /// 取消订单
    async fn cancel_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<bool>;

    /// 获取订单状态
    async fn get_one_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<Order>;

    /// 获取活跃订单
    async fn get_unfinish_orders(&self, pair: &CurrencyPair) -> Result<Vec<Order>>;

    /// 获取订单历史
    async fn get_order_history(&self, pair: &CurrencyPair) -> Result<Vec<Order>>;
}

/// 为Box<dyn Exchange>实现Exchange trait
#[async_trait]
impl Exchange for Box<dyn Exchange> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    async fn get_account(&self) -> Result<Account> {
        self.as_ref().get_account().await
    }

    async fn get_ticker(&self, pair: &CurrencyPair) -> Result<Ticker> {
        self.as_ref().get_ticker(pair).await
    }

    async fn get_depth(&self, size: u32, pair: &CurrencyPair) -> Result<Depth> {
        self.as_ref().get_depth(size, pair).await
    }

    async fn get_kline_records(
        &self,
        pair: &CurrencyPair,
        period: KlinePeriod,
        size: usize,
    ) -> Result<Vec<Kline>> {
        self.as_ref().get_kline_records(pair, period, size).await
    }

    async fn get_trades(&self, pair: &CurrencyPair, limit: u32) -> Result<Vec<Trade>> {
        self.as_ref().get_trades(pair, limit).await
    }

    async fn limit_buy(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order> {
        self.as_ref().limit_buy(pair, price, amount, hint).await
    }

    async fn limit_sell(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order> {
        self.as_ref().limit_sell(pair, price, amount, hint).await
    }

    async fn market_buy(&self, pair: &CurrencyPair, amount: f64, price: f64) -> Result<Order> {
        self.as_ref().market_buy(pair, amount, price).await
    }

    async fn market_sell(&self, pair: &CurrencyPair, amount: f64) -> Result<Order> {
        self.as_ref().market_sell(pair, amount).await
    }

    async fn cancel_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<bool> {
        self.as_ref().cancel_order(order_id, pair).await
    }

    async fn get_one_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<Order> {
        self.as_ref().get_one_order(order_id, pair).await
    }

    async fn get_unfinish_orders(&self, pair: &CurrencyPair) -> Result<Vec<Order>> {
        self.as_ref().get_unfinish_orders(pair).await
    }

    async fn get_order_history(&self, pair: &CurrencyPair) -> Result<Vec<Order>> {
        self.as_ref().get_order_history(pair).await
    }
}
