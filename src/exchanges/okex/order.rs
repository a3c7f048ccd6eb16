/// 订单报文解析
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::core::{
    error::ExchangeError,
    types::{CurrencyPair, Order, PlaceOrderAck, Result, TradeSide, TradeStatus},
};
use crate::exchanges::okex::envelope::{
    check_legacy_result, code_to_string, decode_data, decode_legacy, first_or_not_found,
    LegacyResult,
};
use crate::utils::parse::{parse_decimal, parse_timestamp_millis};

/// v5 订单查询结果
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponseV5 {
    #[serde(rename = "instId", default)]
    pub inst_id: String,
    #[serde(rename = "ordId")]
    pub ord_id: String,
    #[serde(rename = "clOrdId", default)]
    pub cl_ord_id: String,
    #[serde(default)]
    pub px: String,
    #[serde(default)]
    pub sz: String,
    #[serde(rename = "ordType")]
    pub ord_type: String,
    pub side: String,
    #[serde(rename = "accFillSz", default)]
    pub acc_fill_sz: String,
    #[serde(rename = "avgPx", default)]
    pub avg_px: String,
    pub state: String,
    #[serde(default)]
    pub fee: String,
    #[serde(rename = "uTime", default)]
    pub u_time: String,
}

/// v5 下单返回，每个元素带自己的 sCode
#[derive(Debug, Clone, Deserialize)]
struct PlaceOrderResponseV5 {
    #[serde(rename = "ordId", default)]
    ord_id: String,
    #[serde(rename = "clOrdId", default)]
    cl_ord_id: String,
    #[serde(rename = "sCode")]
    s_code: String,
    #[serde(rename = "sMsg", default)]
    s_msg: String,
}

/// 旧版下单返回
#[derive(Debug, Clone, Deserialize)]
struct PlaceOrderResponse {
    #[serde(default)]
    client_oid: String,
    #[serde(default)]
    order_id: String,
    #[serde(default)]
    result: bool,
    #[serde(default)]
    error_code: Value,
    #[serde(default)]
    error_message: String,
}

impl PlaceOrderResponse {
    fn into_ack(self) -> PlaceOrderAck {
        PlaceOrderAck {
            error_code: code_to_string(&self.error_code),
            client_oid: self.client_oid,
            order_id: self.order_id,
            result: self.result,
            error_message: self.error_message,
        }
    }
}

/// 订单状态映射，区分大小写，不认识的状态直接报错
pub fn parse_order_state(state: &str) -> Result<TradeStatus> {
    match state {
        "canceled" => Ok(TradeStatus::Cancelled),
        "live" => Ok(TradeStatus::Unfinished),
        "partially_filled" => Ok(TradeStatus::PartiallyFilled),
        "filled" => Ok(TradeStatus::Filled),
        other => Err(ExchangeError::UnrecognizedState(other.to_string())),
    }
}

/// 把 v5 订单转换成规范订单
///
/// 市价单的 amount 取累计成交数量，与下单时的报文形状对应。
/// uTime 解析失败只记录日志，order_time 保持 0。
pub fn adapt_order(raw: OrderResponseV5, pair: &CurrencyPair) -> Result<Order> {
    let status = parse_order_state(&raw.state)?;

    let is_market = raw.ord_type == "market";
    let side = TradeSide::from_wire(&raw.side)
        .map_err(|e| ExchangeError::decoding("order.side", e))?;
    let side = if is_market { side.to_market() } else { side };

    let deal_amount = parse_decimal("order.accFillSz", &raw.acc_fill_sz)?;
    let amount = if is_market {
        deal_amount
    } else {
        parse_decimal("order.sz", &raw.sz)?
    };

    let order_time = match parse_timestamp_millis(&raw.u_time) {
        Some(ms) => ms,
        None => {
            log::error!("解析订单时间失败: ordId={}, uTime='{}'", raw.ord_id, raw.u_time);
            0
        }
    };

    Ok(Order {
        cid: raw.cl_ord_id,
        order_id: raw.ord_id,
        side,
        price: parse_decimal("order.px", &raw.px)?,
        amount,
        avg_price: parse_decimal("order.avgPx", &raw.avg_px)?,
        deal_amount,
        fee: parse_decimal("order.fee", &raw.fee)?,
        status,
        currency: pair.clone(),
        order_time,
    })
}

/// 单笔订单查询，空列表视为未找到
pub fn decode_order(raw: &str, order_id: &str, pair: &CurrencyPair) -> Result<Order> {
    let orders: Vec<OrderResponseV5> = decode_data("order", raw)?;
    let order = first_or_not_found(orders, format!("订单 {} ({})", order_id, pair))?;
    adapt_order(order, pair)
}

/// 订单列表查询，空列表返回空
pub fn decode_orders(raw: &str, pair: &CurrencyPair) -> Result<Vec<Order>> {
    let orders: Vec<OrderResponseV5> = decode_data("orders", raw)?;
    orders
        .into_iter()
        .map(|order| adapt_order(order, pair))
        .collect()
}

/// 下单时已写入的 cid 优先，回报没带 cid 时才采用回报的值，
/// 两边都非空且不一致视为报文错误
fn reconcile_client_oid(order: &mut Order, echoed: String) -> Result<()> {
    if echoed.is_empty() {
        return Ok(());
    }
    if order.cid.is_empty() {
        order.cid = echoed;
        return Ok(());
    }
    if order.cid != echoed {
        return Err(ExchangeError::decoding(
            "place_order",
            format!("回报的 cid {} 与下单的 cid {} 不一致", echoed, order.cid),
        ));
    }
    Ok(())
}

/// v5 下单确认：回填交易所订单号
pub fn apply_place_ack_v5(mut order: Order, raw: &str) -> Result<Order> {
    let acks: Vec<PlaceOrderResponseV5> = decode_data("place_order", raw)?;
    let ack = acks
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::decoding("place_order", "下单返回为空"))?;

    if ack.s_code != "0" {
        return Err(ExchangeError::ApiError {
            code: ack.s_code,
            message: ack.s_msg,
        });
    }

    reconcile_client_oid(&mut order, ack.cl_ord_id)?;
    order.order_id = ack.ord_id;
    Ok(order)
}

/// 旧版下单确认
pub fn apply_place_ack_legacy(mut order: Order, raw: &str) -> Result<Order> {
    let ack = decode_legacy::<PlaceOrderResponse>("place_order", raw)?.into_ack();
    if !ack.result {
        return Err(ExchangeError::ApiError {
            code: ack.error_code,
            message: ack.error_message,
        });
    }

    reconcile_client_oid(&mut order, ack.client_oid)?;
    order.order_id = ack.order_id;
    Ok(order)
}

/// 旧版批量下单返回 `{instrument_id: [ack, ...]}`，展开成一个列表
pub fn decode_batch_acks(raw: &str) -> Result<Vec<PlaceOrderAck>> {
    let grouped: HashMap<String, Vec<PlaceOrderResponse>> = decode_legacy("batch_orders", raw)?;
    Ok(grouped
        .into_values()
        .flatten()
        .map(PlaceOrderResponse::into_ack)
        .collect())
}

/// 旧版撤单返回
pub fn decode_legacy_cancel(raw: &str) -> Result<bool> {
    let result: LegacyResult = decode_legacy("cancel_order", raw)?;
    check_legacy_result(&result)?;
    Ok(true)
}

/// v5 撤单返回
pub fn decode_cancel_v5(raw: &str) -> Result<bool> {
    let acks: Vec<PlaceOrderResponseV5> = decode_data("cancel_order", raw)?;
    let ack = acks
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::decoding("cancel_order", "撤单返回为空"))?;
    if ack.s_code != "0" {
        return Err(ExchangeError::ApiError {
            code: ack.s_code,
            message: ack.s_msg,
        });
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> CurrencyPair {
        CurrencyPair::new("BTC", "USDT")
    }

    fn order_json(state: &str, ord_type: &str, side: &str, u_time: &str) -> String {
        format!(
            r#"{{"code":"0","msg":"","data":[{{"instId":"BTC-USDT","ordId":"312269865356374016","clOrdId":"b1","px":"999","sz":"3","ordType":"{}","side":"{}","accFillSz":"1.5","avgPx":"998.5","state":"{}","fee":"-0.0015","uTime":"{}"}}]}}"#,
            ord_type, side, state, u_time
        )
    }

    #[test]
    fn test_state_mapping_is_total_on_known_states() {
        assert_eq!(parse_order_state("canceled").unwrap(), TradeStatus::Cancelled);
        assert_eq!(parse_order_state("live").unwrap(), TradeStatus::Unfinished);
        assert_eq!(parse_order_state("partially_filled").unwrap(), TradeStatus::PartiallyFilled);
        assert_eq!(parse_order_state("filled").unwrap(), TradeStatus::Filled);
    }

    #[test]
    fn test_unknown_state_is_an_error() {
        assert!(matches!(
            parse_order_state("expired"),
            Err(ExchangeError::UnrecognizedState(s)) if s == "expired"
        ));
        // 区分大小写
        assert!(parse_order_state("Filled").is_err());

        let raw = order_json("mmp_canceled", "limit", "buy", "1614585600123");
        assert!(matches!(
            decode_order(&raw, "1", &pair()),
            Err(ExchangeError::UnrecognizedState(_))
        ));
    }

    #[test]
    fn test_limit_order_decoding() {
        let raw = order_json("partially_filled", "limit", "buy", "1614585600123");
        let order = decode_order(&raw, "312269865356374016", &pair()).unwrap();
        assert_eq!(order.side, TradeSide::Buy);
        assert_eq!(order.cid, "b1");
        assert_eq!(order.order_id, "312269865356374016");
        assert_eq!(order.price, 999.0);
        assert_eq!(order.amount, 3.0);
        assert_eq!(order.deal_amount, 1.5);
        assert_eq!(order.avg_price, 998.5);
        assert_eq!(order.fee, -0.0015);
        assert_eq!(order.status, TradeStatus::PartiallyFilled);
        assert_eq!(order.order_time, 1_614_585_600_123);
        assert!(order.deal_amount <= order.amount);
    }

    #[test]
    fn test_market_order_amount_is_filled_size() {
        let raw = order_json("filled", "market", "sell", "2021-03-01T08:00:00.000Z");
        let order = decode_order(&raw, "1", &pair()).unwrap();
        assert_eq!(order.side, TradeSide::SellMarket);
        assert_eq!(order.amount, 1.5);
        assert_eq!(order.deal_amount, 1.5);
        assert_eq!(order.order_time, 1_614_585_600_000);

        let raw = order_json("filled", "market", "buy", "");
        assert_eq!(decode_order(&raw, "1", &pair()).unwrap().side, TradeSide::BuyMarket);
    }

    #[test]
    fn test_bad_timestamp_degrades_to_zero() {
        let raw = order_json("live", "limit", "sell", "not-a-time");
        let order = decode_order(&raw, "1", &pair()).unwrap();
        assert_eq!(order.order_time, 0);
        assert_eq!(order.status, TradeStatus::Unfinished);
    }

    #[test]
    fn test_empty_results() {
        let raw = r#"{"code":"0","msg":"","data":[]}"#;
        assert!(matches!(decode_order(raw, "42", &pair()), Err(ExchangeError::NotFound(_))));
        assert!(decode_orders(raw, &pair()).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_field_type_is_decoding_error() {
        let raw = r#"{"code":"0","msg":"","data":[{"ordId":"1","ordType":"limit","side":"buy","state":"live","px":"abc"}]}"#;
        assert!(matches!(
            decode_order(raw, "1", &pair()),
            Err(ExchangeError::DecodingError { context, .. }) if context == "order.px"
        ));
        let raw = r#"{"code":"0","msg":"","data":[{"ordId":"1"}]}"#;
        assert!(matches!(decode_orders(raw, &pair()), Err(ExchangeError::DecodingError { .. })));
    }

    #[test]
    fn test_v5_place_ack() {
        let order = Order::new(pair(), TradeSide::Buy, 1.0, 1.0);
        let raw = r#"{"code":"0","msg":"","data":[{"clOrdId":"abc","ordId":"9","tag":"","sCode":"0","sMsg":""}]}"#;
        let placed = apply_place_ack_v5(order.clone(), raw).unwrap();
        assert_eq!(placed.cid, "abc");
        assert_eq!(placed.order_id, "9");

        let raw = r#"{"code":"1","msg":"Operation failed","data":[{"clOrdId":"abc","ordId":"","sCode":"51008","sMsg":"Insufficient balance"}]}"#;
        assert!(matches!(
            apply_place_ack_v5(order.clone(), raw),
            Err(ExchangeError::ApiError { code, .. }) if code == "1"
        ));

        let raw = r#"{"code":"0","msg":"","data":[{"clOrdId":"abc","ordId":"","sCode":"51008","sMsg":"Insufficient balance"}]}"#;
        assert!(matches!(
            apply_place_ack_v5(order, raw),
            Err(ExchangeError::ApiError { code, message }) if code == "51008" && message == "Insufficient balance"
        ));
    }

    #[test]
    fn test_legacy_place_ack() {
        let order = Order::new(pair(), TradeSide::Sell, 1.0, 1.0);
        let raw = r#"{"client_oid":"c1","order_id":"2","result":true,"error_code":"","error_message":""}"#;
        let placed = apply_place_ack_legacy(order.clone(), raw).unwrap();
        assert_eq!((placed.cid.as_str(), placed.order_id.as_str()), ("c1", "2"));

        let raw = r#"{"client_oid":"c1","order_id":"-1","result":false,"error_code":"33017","error_message":"Greater than the maximum available balance"}"#;
        assert!(matches!(
            apply_place_ack_legacy(order, raw),
            Err(ExchangeError::ApiError { code, .. }) if code == "33017"
        ));
    }

    #[test]
    fn test_place_ack_keeps_sent_client_oid() {
        let mut order = Order::new(pair(), TradeSide::Buy, 1.0, 1.0);
        order.cid = "sent1".to_string();

        // 回报里没有 clOrdId
        let raw = r#"{"code":"0","msg":"","data":[{"ordId":"9","sCode":"0","sMsg":""}]}"#;
        let placed = apply_place_ack_v5(order.clone(), raw).unwrap();
        assert_eq!(placed.cid, "sent1");
        assert_eq!(placed.order_id, "9");

        let raw = r#"{"client_oid":"","order_id":"2","result":true}"#;
        let placed = apply_place_ack_legacy(order.clone(), raw).unwrap();
        assert_eq!(placed.cid, "sent1");
        assert_eq!(placed.order_id, "2");

        let raw = r#"{"code":"0","msg":"","data":[{"clOrdId":"sent1","ordId":"9","sCode":"0","sMsg":""}]}"#;
        assert_eq!(apply_place_ack_v5(order.clone(), raw).unwrap().cid, "sent1");
    }

    #[test]
    fn test_place_ack_with_different_client_oid_is_rejected() {
        let mut order = Order::new(pair(), TradeSide::Sell, 1.0, 1.0);
        order.cid = "sent1".to_string();

        let raw = r#"{"code":"0","msg":"","data":[{"clOrdId":"other","ordId":"9","sCode":"0","sMsg":""}]}"#;
        assert!(matches!(
            apply_place_ack_v5(order.clone(), raw),
            Err(ExchangeError::DecodingError { context, .. }) if context == "place_order"
        ));

        let raw = r#"{"client_oid":"other","order_id":"2","result":true}"#;
        assert!(matches!(
            apply_place_ack_legacy(order, raw),
            Err(ExchangeError::DecodingError { context, .. }) if context == "place_order"
        ));
    }

    #[test]
    fn test_order_side_accepts_only_wire_names() {
        for bad in ["Buy", "BUY_MARKET", "buy_market", "hold"] {
            let raw = order_json("live", "limit", bad, "1614585600123");
            assert!(
                matches!(
                    decode_order(&raw, "1", &pair()),
                    Err(ExchangeError::DecodingError { context, .. }) if context == "order.side"
                ),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_legacy_numeric_error_code() {
        let raw = r#"{"client_oid":"","order_id":"-1","result":false,"error_code":33017,"error_message":"balance"}"#;
        assert!(matches!(
            apply_place_ack_legacy(Order::new(pair(), TradeSide::Buy, 1.0, 1.0), raw),
            Err(ExchangeError::ApiError { code, .. }) if code == "33017"
        ));
        let raw = r#"{"client_oid":"","order_id":"-1","result":false,"error_message":"balance"}"#;
        assert!(matches!(
            apply_place_ack_legacy(Order::new(pair(), TradeSide::Buy, 1.0, 1.0), raw),
            Err(ExchangeError::ApiError { code, .. }) if code.is_empty()
        ));
    }

    #[test]
    fn test_batch_acks_are_flattened() {
        let raw = r#"{"btc-usdt":[{"client_oid":"a","order_id":"1","result":true,"error_code":"","error_message":""},{"client_oid":"b","order_id":"2","result":true,"error_code":"","error_message":""}],"eth-usdt":[{"client_oid":"c","order_id":"-1","result":false,"error_code":33017,"error_message":"balance"}]}"#;
        let mut acks = decode_batch_acks(raw).unwrap();
        acks.sort_by(|a, b| a.client_oid.cmp(&b.client_oid));
        assert_eq!(acks.len(), 3);
        assert_eq!(acks[0].order_id, "1");
        assert!(!acks[2].result);
        assert_eq!(acks[2].error_code, "33017");
    }

    #[test]
    fn test_cancel_responses() {
        assert!(decode_legacy_cancel(r#"{"client_oid":"","order_id":"1","result":true}"#).unwrap());
        assert!(decode_legacy_cancel(r#"{"result":false,"error_code":"33014","error_message":"Order does not exist"}"#).is_err());

        assert!(decode_cancel_v5(r#"{"code":"0","msg":"","data":[{"clOrdId":"","ordId":"1","sCode":"0","sMsg":""}]}"#).unwrap());
        assert!(matches!(
            decode_cancel_v5(r#"{"code":"0","msg":"","data":[{"ordId":"1","sCode":"51400","sMsg":"Cancellation failed"}]}"#),
            Err(ExchangeError::ApiError { code, .. }) if code == "51400"
        ));
    }
}
