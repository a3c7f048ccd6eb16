/// 下单请求构造
///
/// 同一个规范订单在两代接口下的报文形状不同：
/// 旧版市价买单用 notional 表示计价币花费，v5 市价单一律用 sz。
use serde::Serialize;

use crate::core::{
    error::ExchangeError,
    types::{ApiVersion, CurrencyPair, Order, OrderTypeHint, Result, TradeSide},
};
use crate::utils::{
    order_id::new_client_order_id,
    parse::format_decimal,
    symbol::{EndpointFamily, SymbolConverter},
};

pub const LEGACY_PLACE_ORDER_PATH: &str = "/api/spot/v3/orders";
pub const LEGACY_BATCH_ORDERS_PATH: &str = "/api/spot/v3/batch_orders";
pub const V5_PLACE_ORDER_PATH: &str = "/api/v5/trade/order";
pub const V5_CANCEL_ORDER_PATH: &str = "/api/v5/trade/cancel-order";

/// v5 价格、数量统一保留 5 位小数
const V5_DECIMALS: usize = 5;

// 旧版 order_type 取值
const ORDER_FEATURE_ORDINARY: i32 = 0;
const ORDER_FEATURE_POST_ONLY: i32 = 1;
const ORDER_FEATURE_FOK: i32 = 2;
const ORDER_FEATURE_IOC: i32 = 3;

/// 旧版下单参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceOrderParam {
    pub client_oid: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub side: String,
    pub instrument_id: String,
    pub order_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<f64>,
}

/// v5 下单参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderParamV5 {
    #[serde(rename = "instId")]
    pub inst_id: String,
    #[serde(rename = "tdMode")]
    pub td_mode: String,
    #[serde(rename = "clOrdId")]
    pub cl_ord_id: String,
    pub side: String,
    #[serde(rename = "ordType")]
    pub ord_type: String,
    pub sz: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px: Option<String>,
}

/// 按接口代际区分的下单参数
#[derive(Debug, Clone, PartialEq)]
pub enum OrderRequestParam {
    Legacy(PlaceOrderParam),
    V5(OrderParamV5),
}

impl OrderRequestParam {
    pub fn version(&self) -> ApiVersion {
        match self {
            OrderRequestParam::Legacy(_) => ApiVersion::Legacy,
            OrderRequestParam::V5(_) => ApiVersion::V5,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            OrderRequestParam::Legacy(_) => LEGACY_PLACE_ORDER_PATH,
            OrderRequestParam::V5(_) => V5_PLACE_ORDER_PATH,
        }
    }

    pub fn client_order_id(&self) -> &str {
        match self {
            OrderRequestParam::Legacy(p) => &p.client_oid,
            OrderRequestParam::V5(p) => &p.cl_ord_id,
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        let value = match self {
            OrderRequestParam::Legacy(p) => serde_json::to_value(p)?,
            OrderRequestParam::V5(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }
}

/// 旧版撤单参数，订单号放在路径里
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyCancelParam {
    pub instrument_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelParamV5 {
    #[serde(rename = "instId")]
    pub inst_id: String,
    #[serde(rename = "ordId")]
    pub ord_id: String,
}

/// 市价方向只能配 market，限价方向不能配 market
fn check_side_hint(side: TradeSide, hint: OrderTypeHint) -> Result<()> {
    let is_market_hint = hint == OrderTypeHint::Market;
    if side.is_market() && !is_market_hint {
        return Err(ExchangeError::UnsupportedOrderType {
            order_type: hint.as_str().to_string(),
            reason: format!("{} 只能使用 market 类型", side),
        });
    }
    if !side.is_market() && is_market_hint {
        return Err(ExchangeError::UnsupportedOrderType {
            order_type: hint.as_str().to_string(),
            reason: format!("{} 不能使用 market 类型", side),
        });
    }
    Ok(())
}

/// 下单请求构造器
#[derive(Debug, Clone, Default)]
pub struct OrderRequestBuilder {
    converter: SymbolConverter,
}

impl OrderRequestBuilder {
    pub fn new(converter: SymbolConverter) -> Self {
        Self { converter }
    }

    /// 每次调用都会生成新的客户端订单ID
    pub fn build(
        &self,
        order: &Order,
        hint: OrderTypeHint,
        version: ApiVersion,
    ) -> Result<OrderRequestParam> {
        match version {
            ApiVersion::Legacy => {
                let param = self.build_legacy(order, hint, new_client_order_id())?;
                Ok(OrderRequestParam::Legacy(param))
            }
            ApiVersion::V5 => Ok(OrderRequestParam::V5(self.build_v5(order, hint)?)),
        }
    }

    pub fn build_legacy(
        &self,
        order: &Order,
        hint: OrderTypeHint,
        client_oid: String,
    ) -> Result<PlaceOrderParam> {
        check_side_hint(order.side, hint)?;

        let mut param = PlaceOrderParam {
            client_oid,
            kind: String::new(),
            side: order.side.wire_side().to_string(),
            instrument_id: self.converter.resolve(&order.currency, EndpointFamily::Legacy),
            order_type: ORDER_FEATURE_ORDINARY,
            price: None,
            size: None,
            notional: None,
        };

        match order.side {
            TradeSide::Buy | TradeSide::Sell => {
                param.price = Some(order.price);
                param.size = Some(order.amount);
            }
            TradeSide::SellMarket => param.size = Some(order.amount),
            // 旧版市价买单的花费金额取自 price
            TradeSide::BuyMarket => param.notional = Some(order.price),
        }

        match hint {
            OrderTypeHint::Limit | OrderTypeHint::Market => param.kind = hint.as_str().to_string(),
            OrderTypeHint::PostOnly => param.order_type = ORDER_FEATURE_POST_ONLY,
            OrderTypeHint::Fok => param.order_type = ORDER_FEATURE_FOK,
            OrderTypeHint::Ioc => param.order_type = ORDER_FEATURE_IOC,
        }

        Ok(param)
    }

    pub fn build_v5(&self, order: &Order, hint: OrderTypeHint) -> Result<OrderParamV5> {
        check_side_hint(order.side, hint)?;

        let px = match order.side {
            TradeSide::Buy | TradeSide::Sell => Some(format_decimal(order.price, V5_DECIMALS)),
            TradeSide::BuyMarket | TradeSide::SellMarket => None,
        };

        Ok(OrderParamV5 {
            inst_id: self.converter.resolve(&order.currency, EndpointFamily::V5Trade),
            td_mode: "cash".to_string(),
            cl_ord_id: new_client_order_id(),
            side: order.side.wire_side().to_string(),
            ord_type: hint.as_str().to_string(),
            sz: format_decimal(order.amount, V5_DECIMALS),
            px,
        })
    }

    /// 批量下单：已有 cid 的订单沿用，没有的补一个
    pub fn build_legacy_batch(
        &self,
        orders: &[Order],
        hint: OrderTypeHint,
    ) -> Result<Vec<PlaceOrderParam>> {
        orders
            .iter()
            .map(|order| {
                let cid = if order.cid.is_empty() {
                    new_client_order_id()
                } else {
                    order.cid.clone()
                };
                self.build_legacy(order, hint, cid)
            })
            .collect()
    }

    pub fn build_legacy_cancel(&self, pair: &CurrencyPair) -> LegacyCancelParam {
        LegacyCancelParam {
            instrument_id: self.converter.resolve(pair, EndpointFamily::Legacy),
        }
    }

    pub fn build_v5_cancel(&self, order_id: &str, pair: &CurrencyPair) -> CancelParamV5 {
        CancelParamV5 {
            inst_id: self.converter.resolve(pair, EndpointFamily::V5Trade),
            ord_id: order_id.to_string(),
        }
    }
}
