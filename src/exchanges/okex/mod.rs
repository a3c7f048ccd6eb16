/// OKEx 现货适配器
///
/// 同时覆盖旧版 v3 与 v5 两代接口：下单、撤单、订单查询、行情、账户与资金划转。
/// 签名、发送、限速都交给 [`BaseClient`]，这里只负责报文的构造与解析。
pub mod account;
pub mod envelope;
pub mod market;
pub mod order;
pub mod request;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{
    client::{BaseClient, HttpBaseClient, HttpMethod},
    config::OkexConfig,
    error::ExchangeError,
    exchange::Exchange,
    types::{
        Account, AccountBalance, ApiVersion, AssetBalance, CurrencyInfo, CurrencyPair,
        DepositAddress, Depth, Kline, KlinePeriod, Order, OrderTypeHint, PlaceOrderAck, Result,
        SymbolPrecision, Ticker, Trade, TradeSide, TransferRequest, TransferResult,
        WithdrawalRequest, WithdrawalResult,
    },
};
use crate::utils::symbol::{EndpointFamily, SymbolConverter};

pub use request::{OrderRequestBuilder, OrderRequestParam};

/// K线查询的可选时间范围（ISO 8601）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KlineOptions {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// OKEx 现货网关
pub struct OkexSpot {
    client: Arc<dyn BaseClient>,
    converter: SymbolConverter,
    builder: OrderRequestBuilder,
    config: OkexConfig,
}

impl OkexSpot {
    pub fn new(config: OkexConfig, client: Arc<dyn BaseClient>) -> Self {
        let converter = SymbolConverter::from_config(&config);
        Self {
            client,
            builder: OrderRequestBuilder::new(converter.clone()),
            converter,
            config,
        }
    }

    /// 使用默认的 reqwest 客户端
    pub fn from_config(config: OkexConfig) -> Result<Self> {
        let client = HttpBaseClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &OkexConfig {
        &self.config
    }

    async fn get(&self, path: &str) -> Result<String> {
        self.client.do_request(HttpMethod::Get, path, "").await
    }

    fn build_body<T: Serialize>(&self, param: &T) -> Result<String> {
        let value = serde_json::to_value(param)?;
        self.client.build_request_body(&value)
    }

    async fn post(&self, path: &str, body: &str) -> Result<String> {
        self.client.do_request(HttpMethod::Post, path, body).await
    }

    fn instrument_id(&self, pair: &CurrencyPair, family: EndpointFamily) -> String {
        self.converter.resolve(pair, family)
    }

    // ============= 下单与撤单 =============

    /// 下单，成功后回填 cid 与交易所订单号
    pub async fn place_order(
        &self,
        order: Order,
        hint: OrderTypeHint,
        version: ApiVersion,
    ) -> Result<Order> {
        let param = self.builder.build(&order, hint, version)?;
        let body = self.build_body(&param.to_value()?)?;
        log::debug!("下单请求: {} {}", param.path(), body);

        // 回报可能不带 cid，以发出去的为准
        let mut order = order;
        order.cid = param.client_order_id().to_string();

        let raw = self.post(param.path(), &body).await?;
        let placed = match version {
            ApiVersion::Legacy => order::apply_place_ack_legacy(order, &raw)?,
            ApiVersion::V5 => order::apply_place_ack_v5(order, &raw)?,
        };

        log::info!(
            "下单成功: {} {} cid={} order_id={}",
            placed.currency,
            placed.side,
            placed.cid,
            placed.order_id
        );
        Ok(placed)
    }

    pub async fn limit_buy(
        &self,
        version: ApiVersion,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order> {
        let order = Order::new(pair.clone(), TradeSide::Buy, price, amount);
        self.place_order(order, hint.unwrap_or(OrderTypeHint::Limit), version)
            .await
    }

    pub async fn limit_sell(
        &self,
        version: ApiVersion,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order> {
        let order = Order::new(pair.clone(), TradeSide::Sell, price, amount);
        self.place_order(order, hint.unwrap_or(OrderTypeHint::Limit), version)
            .await
    }

    /// 旧版接口用 price 作为计价币花费，v5 用 amount 作为数量
    pub async fn market_buy(
        &self,
        version: ApiVersion,
        pair: &CurrencyPair,
        amount: f64,
        price: f64,
    ) -> Result<Order> {
        let order = Order::new(pair.clone(), TradeSide::BuyMarket, price, amount);
        self.place_order(order, OrderTypeHint::Market, version).await
    }

    pub async fn market_sell(
        &self,
        version: ApiVersion,
        pair: &CurrencyPair,
        amount: f64,
    ) -> Result<Order> {
        let order = Order::new(pair.clone(), TradeSide::SellMarket, 0.0, amount);
        self.place_order(order, OrderTypeHint::Market, version).await
    }

    /// 旧版批量下单
    pub async fn batch_place_orders(
        &self,
        orders: &[Order],
        hint: OrderTypeHint,
    ) -> Result<Vec<PlaceOrderAck>> {
        if orders.is_empty() {
            return Err(ExchangeError::ValidationError {
                field: "orders".to_string(),
                reason: "批量下单不能为空".to_string(),
            });
        }

        let params = self.builder.build_legacy_batch(orders, hint)?;
        let body = self.build_body(&params)?;
        log::debug!("批量下单请求: {}", body);

        let raw = self.post(request::LEGACY_BATCH_ORDERS_PATH, &body).await?;
        order::decode_batch_acks(&raw)
    }

    /// 撤单，旧版接口的 order_id 也可以是客户端订单ID
    pub async fn cancel_order(
        &self,
        version: ApiVersion,
        order_id: &str,
        pair: &CurrencyPair,
    ) -> Result<bool> {
        match version {
            ApiVersion::Legacy => {
                let path = format!(
                    "/api/spot/v3/cancel_orders/{}",
                    urlencoding::encode(order_id)
                );
                let body = self.build_body(&self.builder.build_legacy_cancel(pair))?;
                let raw = self.post(&path, &body).await?;
                order::decode_legacy_cancel(&raw)
            }
            ApiVersion::V5 => {
                let body = self.build_body(&self.builder.build_v5_cancel(order_id, pair))?;
                let raw = self.post(request::V5_CANCEL_ORDER_PATH, &body).await?;
                order::decode_cancel_v5(&raw)
            }
        }
    }

    // ============= 订单查询（v5） =============

    pub async fn get_one_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<Order> {
        let path = format!(
            "/api/v5/trade/order?ordId={}&instId={}",
            urlencoding::encode(order_id),
            self.instrument_id(pair, EndpointFamily::V5Trade)
        );
        let raw = self.get(&path).await?;
        order::decode_order(&raw, order_id, pair)
    }

    pub async fn get_unfinish_orders(
        &self,
        pair: &CurrencyPair,
        ord_type: OrderTypeHint,
    ) -> Result<Vec<Order>> {
        let path = format!(
            "/api/v5/trade/orders-pending?ordType={}&instType=SPOT&instId={}",
            ord_type.as_str(),
            self.instrument_id(pair, EndpointFamily::V5Trade)
        );
        let raw = self.get(&path).await?;
        order::decode_orders(&raw, pair)
    }

    pub async fn get_order_history(
        &self,
        pair: &CurrencyPair,
        ord_type: OrderTypeHint,
    ) -> Result<Vec<Order>> {
        let path = format!(
            "/api/v5/trade/orders-history?ordType={}&instType=SPOT&instId={}",
            ord_type.as_str(),
            self.instrument_id(pair, EndpointFamily::V5Trade)
        );
        let raw = self.get(&path).await?;
        order::decode_orders(&raw, pair)
    }

    // ============= 行情 =============

    pub async fn get_ticker(&self, pair: &CurrencyPair) -> Result<Ticker> {
        let path = format!(
            "/api/v5/market/ticker?instId={}",
            self.instrument_id(pair, EndpointFamily::V5Market)
        );
        let raw = self.get(&path).await?;
        market::decode_ticker(&raw, pair)
    }

    pub async fn get_depth(&self, size: u32, pair: &CurrencyPair) -> Result<Depth> {
        let size = if size == 0 {
            self.config.default_depth_size
        } else {
            size
        };
        let path = format!(
            "/api/v5/market/books?instId={}&sz={}",
            self.instrument_id(pair, EndpointFamily::V5Market),
            size
        );
        let raw = self.get(&path).await?;
        market::decode_depth(&raw, pair)
    }

    pub async fn get_kline_records(
        &self,
        pair: &CurrencyPair,
        period: KlinePeriod,
        size: usize,
        options: &KlineOptions,
    ) -> Result<Vec<Kline>> {
        let mut path = format!(
            "/api/spot/v3/instruments/{}/candles?granularity={}",
            self.instrument_id(pair, EndpointFamily::Legacy),
            market::granularity(period)
        );
        if let Some(start) = &options.start {
            path.push_str(&format!("&start={}", urlencoding::encode(start)));
        }
        if let Some(end) = &options.end {
            path.push_str(&format!("&end={}", urlencoding::encode(end)));
        }

        let raw = self.get(&path).await?;
        market::decode_klines(&raw, pair, size)
    }

    /// 整个交易所的公共成交，不是个人成交
    pub async fn get_trades(&self, pair: &CurrencyPair, limit: u32) -> Result<Vec<Trade>> {
        let path = format!(
            "/api/spot/v3/instruments/{}/trades?limit={}",
            self.instrument_id(pair, EndpointFamily::Legacy),
            limit
        );
        let raw = self.get(&path).await?;
        market::decode_trades(&raw, pair)
    }

    pub async fn get_currencies_precision(&self) -> Result<Vec<SymbolPrecision>> {
        let raw = self.get("/api/spot/v3/instruments").await?;
        market::decode_instruments(&raw)
    }

    // ============= 账户与资金 =============

    pub async fn get_account(&self) -> Result<Account> {
        let raw = self.get("/api/spot/v3/accounts").await?;
        account::decode_legacy_account(&raw)
    }

    pub async fn get_account_balance(
        &self,
        ccys: &[&str],
    ) -> Result<HashMap<String, AccountBalance>> {
        let path = format!(
            "/api/v5/account/balance?ccy={}",
            account::join_currencies(ccys)?
        );
        let raw = self.get(&path).await?;
        account::decode_account_balances(&raw)
    }

    pub async fn get_asset_balances(&self, ccys: &[&str]) -> Result<Vec<AssetBalance>> {
        let path = format!(
            "/api/v5/asset/balances?ccy={}",
            account::join_currencies(ccys)?
        );
        let raw = self.get(&path).await?;
        account::decode_asset_balances(&raw)
    }

    /// 资金划转，交易所没有返回确认时 panic
    pub async fn transfer(&self, req: &TransferRequest) -> Result<TransferResult> {
        let body = self.build_body(&account::TransferParamV5::from(req))?;
        log::info!("资金划转: {}", body);
        let raw = self.post("/api/v5/asset/transfer", &body).await?;
        account::decode_transfer_ack(&raw, &body)
    }

    /// 提币，交易所没有返回确认时 panic
    pub async fn withdrawal(&self, req: &WithdrawalRequest) -> Result<WithdrawalResult> {
        let body = self.build_body(&account::WithdrawalParamV5::from(req))?;
        log::info!("提币申请: {} {} -> {}", req.amount, req.ccy, req.to_addr);
        let raw = self.post("/api/v5/asset/withdrawal", &body).await?;
        account::decode_withdrawal_ack(&raw, &format!("ccy={} chain={}", req.ccy, req.chain))
    }

    pub async fn get_currencies(&self) -> Result<Vec<CurrencyInfo>> {
        let raw = self.get("/api/v5/asset/currencies").await?;
        account::decode_currencies(&raw)
    }

    pub async fn get_deposit_address(&self, ccy: &str) -> Result<Vec<DepositAddress>> {
        let path = format!(
            "/api/v5/asset/deposit-address?ccy={}",
            urlencoding::encode(ccy)
        );
        let raw = self.get(&path).await?;
        account::decode_deposit_addresses(&raw)
    }
}

/// 交易类接口使用配置里的 api_version，活跃订单与历史按限价单查询
#[async_trait]
impl Exchange for OkexSpot {
    fn name(&self) -> &str {
        "okex"
    }

    async fn get_account(&self) -> Result<Account> {
        OkexSpot::get_account(self).await
    }

    async fn get_ticker(&self, pair: &CurrencyPair) -> Result<Ticker> {
        OkexSpot::get_ticker(self, pair).await
    }

    async fn get_depth(&self, size: u32, pair: &CurrencyPair) -> Result<Depth> {
        OkexSpot::get_depth(self, size, pair).await
    }

    async fn get_kline_records(
        &self,
        pair: &CurrencyPair,
        period: KlinePeriod,
        size: usize,
    ) -> Result<Vec<Kline>> {
        OkexSpot::get_kline_records(self, pair, period, size, &KlineOptions::default()).await
    }

    async fn get_trades(&self, pair: &CurrencyPair, limit: u32) -> Result<Vec<Trade>> {
        OkexSpot::get_trades(self, pair, limit).await
    }

    async fn limit_buy(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order> {
        OkexSpot::limit_buy(self, self.config.api_version, pair, price, amount, hint).await
    }

    async fn limit_sell(
        &self,
        pair: &CurrencyPair,
        price: f64,
        amount: f64,
        hint: Option<OrderTypeHint>,
    ) -> Result<Order> {
        OkexSpot::limit_sell(self, self.config.api_version, pair, price, amount, hint).await
    }

    async fn market_buy(&self, pair: &CurrencyPair, amount: f64, price: f64) -> Result<Order> {
        OkexSpot::market_buy(self, self.config.api_version, pair, amount, price).await
    }

    async fn market_sell(&self, pair: &CurrencyPair, amount: f64) -> Result<Order> {
        OkexSpot::market_sell(self, self.config.api_version, pair, amount).await
    }

    async fn cancel_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<bool> {
        OkexSpot::cancel_order(self, self.config.api_version, order_id, pair).await
    }

    async fn get_one_order(&self, order_id: &str, pair: &CurrencyPair) -> Result<Order> {
        OkexSpot::get_one_order(self, order_id, pair).await
    }

    async fn get_unfinish_orders(&self, pair: &CurrencyPair) -> Result<Vec<Order>> {
        OkexSpot::get_unfinish_orders(self, pair, OrderTypeHint::Limit).await
    }

    async fn get_order_history(&self, pair: &CurrencyPair) -> Result<Vec<Order>> {
        OkexSpot::get_order_history(self, pair, OrderTypeHint::Limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::MockClient;
    use crate::core::types::TradeStatus;
    use serde_json::{json, Value};

    fn spot(client: &Arc<MockClient>) -> OkexSpot {
        OkexSpot::new(OkexConfig::default(), client.clone())
    }

    fn btc_usd() -> CurrencyPair {
        CurrencyPair::new("BTC", "USD")
    }

    fn body_of(client: &MockClient) -> Value {
        serde_json::from_str(&client.last_request().body).unwrap()
    }

    const V5_ACK: &str = r#"{"code":"0","msg":"","data":[{"ordId":"312269865356374016","tag":"","sCode":"0","sMsg":""}]}"#;

    #[tokio::test]
    async fn test_v5_limit_buy_flow() {
        let client = Arc::new(MockClient::new().respond(V5_ACK));
        let order = spot(&client)
            .limit_buy(ApiVersion::V5, &btc_usd(), 42000.0, 0.01, None)
            .await
            .unwrap();

        assert_eq!(order.order_id, "312269865356374016");
        assert_eq!(order.status, TradeStatus::Unfinished);

        let request = client.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/api/v5/trade/order");
        let body = body_of(&client);
        // 回报里没有 clOrdId，订单上保留发出去的那个
        assert_eq!(order.cid.len(), 32);
        assert_eq!(body["clOrdId"], order.cid.as_str());
        assert_eq!(body["instId"], "BTC-USDT");
        assert_eq!(body["px"], "42000.00000");
        assert_eq!(body["sz"], "0.01000");
        assert_eq!(body["ordType"], "limit");
        assert_eq!(body["side"], "buy");
    }

    #[tokio::test]
    async fn test_v5_market_buy_has_no_price() {
        let client = Arc::new(MockClient::new().respond(V5_ACK));
        spot(&client)
            .market_buy(ApiVersion::V5, &btc_usd(), 10.0, 0.0)
            .await
            .unwrap();
        let body = body_of(&client);
        assert_eq!(body["sz"], "10.00000");
        assert_eq!(body["tdMode"], "cash");
        assert!(body.get("px").is_none());
    }

    #[tokio::test]
    async fn test_legacy_market_buy_uses_notional() {
        let client = Arc::new(MockClient::new().respond(
            r#"{"client_oid":"","order_id":"2510789768709120","result":true,"error_code":"","error_message":""}"#,
        ));
        let order = spot(&client)
            .market_buy(ApiVersion::Legacy, &btc_usd(), 1.0, 100.0)
            .await
            .unwrap();
        assert_eq!(order.order_id, "2510789768709120");
        assert_eq!(order.side, TradeSide::BuyMarket);

        assert_eq!(client.last_request().path, "/api/spot/v3/orders");
        let body = body_of(&client);
        assert_eq!(body["client_oid"], order.cid.as_str());
        assert!(!order.cid.is_empty());
        assert_eq!(body["notional"], json!(100.0));
        assert_eq!(body["instrument_id"], "btc-usdt");
        assert!(body.get("size").is_none());
    }

    #[tokio::test]
    async fn test_round_trip_client_order_id() {
        let builder = OrderRequestBuilder::default();
        let order = Order::new(btc_usd(), TradeSide::Sell, 50000.0, 0.2);
        let param = builder.build(&order, OrderTypeHint::Limit, ApiVersion::V5).unwrap();
        let sent = param.client_order_id().to_string();

        let ack = json!({
            "code": "0",
            "msg": "",
            "data": [{"clOrdId": sent, "ordId": "1", "sCode": "0", "sMsg": ""}]
        });
        let placed = order::apply_place_ack_v5(order, &ack.to_string()).unwrap();
        assert_eq!(placed.cid, sent);
    }

    #[tokio::test]
    async fn test_echoed_client_order_id_must_match_sent() {
        let client = Arc::new(MockClient::new().respond(
            r#"{"code":"0","msg":"","data":[{"clOrdId":"someoneelse","ordId":"1","sCode":"0","sMsg":""}]}"#,
        ));
        let result = spot(&client)
            .limit_sell(ApiVersion::V5, &btc_usd(), 50000.0, 0.2, None)
            .await;
        assert!(matches!(
            result,
            Err(ExchangeError::DecodingError { context, .. }) if context == "place_order"
        ));
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_order_is_rejected_before_network() {
        let client = Arc::new(MockClient::new());
        let order = Order::new(btc_usd(), TradeSide::SellMarket, 0.0, 1.0);
        let err = spot(&client)
            .place_order(order, OrderTypeHint::Limit, ApiVersion::V5)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::UnsupportedOrderType { .. }));
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_order_paths() {
        let client = Arc::new(
            MockClient::new()
                .respond(r#"{"client_oid":"","order_id":"123","result":true}"#)
                .respond(r#"{"code":"0","msg":"","data":[{"clOrdId":"","ordId":"123","sCode":"0","sMsg":""}]}"#),
        );
        let spot = spot(&client);
        assert!(spot.cancel_order(ApiVersion::Legacy, "123", &btc_usd()).await.unwrap());
        assert!(spot.cancel_order(ApiVersion::V5, "123", &btc_usd()).await.unwrap());

        let requests = client.requests();
        assert_eq!(requests[0].path, "/api/spot/v3/cancel_orders/123");
        assert_eq!(
            serde_json::from_str::<Value>(&requests[0].body).unwrap(),
            json!({"instrument_id": "btc-usdt"})
        );
        assert_eq!(requests[1].path, "/api/v5/trade/cancel-order");
        assert_eq!(
            serde_json::from_str::<Value>(&requests[1].body).unwrap(),
            json!({"instId": "BTC-USDT", "ordId": "123"})
        );
    }

    #[tokio::test]
    async fn test_order_query_paths() {
        let order = r#"{"code":"0","msg":"","data":[{"instId":"BTC-USDT","ordId":"123","clOrdId":"c","px":"10","sz":"2","ordType":"limit","side":"sell","accFillSz":"2","avgPx":"10","state":"filled","fee":"0","uTime":"1597026383085"}]}"#;
        let client = Arc::new(MockClient::new().respond(order).respond(order).respond(order));
        let spot = spot(&client);

        let one = spot.get_one_order("123", &btc_usd()).await.unwrap();
        assert_eq!(one.status, TradeStatus::Filled);
        assert_eq!(one.currency, btc_usd());
        spot.get_unfinish_orders(&btc_usd(), OrderTypeHint::Limit).await.unwrap();
        spot.get_order_history(&btc_usd(), OrderTypeHint::Market).await.unwrap();

        let paths: Vec<String> = client.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/api/v5/trade/order?ordId=123&instId=BTC-USDT",
                "/api/v5/trade/orders-pending?ordType=limit&instType=SPOT&instId=BTC-USDT",
                "/api/v5/trade/orders-history?ordType=market&instType=SPOT&instId=BTC-USDT",
            ]
        );
    }

    #[tokio::test]
    async fn test_envelope_error_is_surfaced() {
        let client = Arc::new(
            MockClient::new().respond(r#"{"code":"1","msg":"Operation failed","data":"garbage"}"#),
        );
        let err = spot(&client).get_ticker(&btc_usd()).await.unwrap_err();
        match err {
            ExchangeError::ApiError { code, message } => {
                assert_eq!(code, "1");
                assert_eq!(message, "Operation failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(client.last_request().path, "/api/v5/market/ticker?instId=btc-usdt");
    }

    #[tokio::test]
    async fn test_transport_error_is_propagated() {
        let client = Arc::new(
            MockClient::new().fail(ExchangeError::TransportError("connection reset".into())),
        );
        let err = spot(&client).get_account().await.unwrap_err();
        assert!(matches!(err, ExchangeError::TransportError(msg) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn test_market_data_paths() {
        let client = Arc::new(
            MockClient::new()
                .respond(r#"{"code":"0","msg":"","data":[{"asks":[["1","1"]],"bids":[],"ts":"1597026383085"}]}"#)
                .respond(r#"[["2019-03-19T16:00:00.000Z","1","2","0.5","1.5","10"]]"#)
                .respond(r#"[]"#)
                .respond(r#"[]"#),
        );
        let spot = spot(&client);

        spot.get_depth(0, &btc_usd()).await.unwrap();
        let options = KlineOptions {
            start: Some("2019-03-19T16:00:00.000Z".to_string()),
            end: None,
        };
        let klines = spot
            .get_kline_records(&btc_usd(), KlinePeriod::Min1, 10, &options)
            .await
            .unwrap();
        assert_eq!(klines.len(), 1);
        assert!(spot.get_trades(&btc_usd(), 50).await.unwrap().is_empty());
        assert!(spot.get_currencies_precision().await.unwrap().is_empty());

        let paths: Vec<String> = client.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/api/v5/market/books?instId=btc-usdt&sz=20",
                "/api/spot/v3/instruments/btc-usdt/candles?granularity=60&start=2019-03-19T16%3A00%3A00.000Z",
                "/api/spot/v3/instruments/btc-usdt/trades?limit=50",
                "/api/spot/v3/instruments",
            ]
        );
    }

    #[tokio::test]
    async fn test_balance_queries() {
        let client = Arc::new(MockClient::new().respond(
            r#"{"code":"0","msg":"","data":[{"details":[{"ccy":"BTC","availBal":"1","cashBal":"1","frozenBal":"0","ordFrozen":"0"}]}]}"#,
        ));
        let spot = spot(&client);

        let balances = spot.get_account_balance(&["BTC", "ETH"]).await.unwrap();
        assert_eq!(balances["BTC"].avail_bal, 1.0);
        assert_eq!(client.last_request().path, "/api/v5/account/balance?ccy=BTC,ETH");

        let err = spot.get_asset_balances(&[]).await.unwrap_err();
        assert!(matches!(err, ExchangeError::ValidationError { .. }));
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_flow() {
        let client = Arc::new(MockClient::new().respond(
            r#"{"code":"0","msg":"","data":[{"transId":"754147","ccy":"USDT","amt":"10","from":"6","to":"18"}]}"#,
        ));
        let req = TransferRequest {
            ccy: "USDT".into(),
            amount: 10.0,
            transfer_type: "0".into(),
            from: "6".into(),
            to: "18".into(),
        };
        let result = spot(&client).transfer(&req).await.unwrap();
        assert_eq!(result.transfer_id, "754147");
        assert_eq!(client.last_request().path, "/api/v5/asset/transfer");
        assert_eq!(body_of(&client)["amt"], "10");
    }

    #[tokio::test]
    async fn test_withdrawal_and_asset_queries() {
        let client = Arc::new(
            MockClient::new()
                .respond(r#"{"code":"0","msg":"","data":[{"amt":"0.1","wdId":"67485","ccy":"BTC","chain":"BTC-Bitcoin"}]}"#)
                .respond(r#"{"code":"0","msg":"","data":[]}"#)
                .respond(r#"{"code":"0","msg":"","data":[]}"#),
        );
        let spot = spot(&client);
        let req = WithdrawalRequest {
            ccy: "BTC".into(),
            chain: "BTC-Bitcoin".into(),
            amount: 0.1,
            dest: "4".into(),
            to_addr: "addr".into(),
            pwd: "secret".into(),
            fee: 0.0005,
        };
        assert_eq!(spot.withdrawal(&req).await.unwrap().withdrawal_id, "67485");
        assert_eq!(body_of(&client)["toAddr"], "addr");

        assert!(spot.get_currencies().await.unwrap().is_empty());
        assert!(spot.get_deposit_address("BTC").await.unwrap().is_empty());

        let paths: Vec<String> = client.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "/api/v5/asset/withdrawal",
                "/api/v5/asset/currencies",
                "/api/v5/asset/deposit-address?ccy=BTC",
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_place_orders() {
        let client = Arc::new(MockClient::new().respond(
            r#"{"btc-usdt":[{"client_oid":"keep","order_id":"1","result":true,"error_code":"","error_message":""}]}"#,
        ));
        let mut first = Order::new(btc_usd(), TradeSide::Buy, 1.0, 1.0);
        first.cid = "keep".to_string();
        let acks = spot(&client)
            .batch_place_orders(&[first], OrderTypeHint::Limit)
            .await
            .unwrap();
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].client_oid, "keep");

        assert_eq!(client.last_request().path, "/api/spot/v3/batch_orders");
        let body = body_of(&client);
        assert_eq!(body[0]["client_oid"], "keep");
        assert_eq!(body[0]["type"], "limit");

        let empty = spot(&client).batch_place_orders(&[], OrderTypeHint::Limit).await;
        assert!(matches!(empty, Err(ExchangeError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_exchange_trait_uses_configured_version() {
        let client = Arc::new(MockClient::new().respond(
            r#"{"client_oid":"","order_id":"9","result":true,"error_code":"","error_message":""}"#,
        ));
        let config = OkexConfig {
            api_version: ApiVersion::Legacy,
            ..OkexConfig::default()
        };
        let exchange: Box<dyn Exchange> = Box::new(OkexSpot::new(config, client.clone()));
        assert_eq!(exchange.name(), "okex");

        let order = exchange
            .limit_sell(&btc_usd(), 30000.0, 0.5, Some(OrderTypeHint::PostOnly))
            .await
            .unwrap();
        assert_eq!(order.order_id, "9");
        assert_eq!(client.last_request().path, "/api/spot/v3/orders");
        let body = body_of(&client);
        assert_eq!(body["order_type"], 1);
        assert_eq!(body["client_oid"], order.cid.as_str());
    }
}
