/// 行情报文解析：ticker、深度、K线、成交、交易对精度
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};

use crate::core::{
    error::ExchangeError,
    types::{
        CurrencyPair, Depth, DepthRecord, Kline, KlinePeriod, Result, SymbolPrecision, Ticker,
        Trade, TradeSide,
    },
};
use crate::exchanges::okex::envelope::{decode_data, decode_legacy, first_or_not_found};
use crate::utils::parse::{
    decimal_places, parse_decimal, require_timestamp_millis, require_timestamp_secs, value_to_f64,
};

/// 表里没有的周期按 30 分钟处理
pub const DEFAULT_GRANULARITY: u32 = 1800;

/// K线周期对应的秒数
pub fn granularity(period: KlinePeriod) -> u32 {
    match period {
        KlinePeriod::Min1 => 60,
        KlinePeriod::Min3 => 180,
        KlinePeriod::Min5 => 300,
        KlinePeriod::Min15 => 900,
        KlinePeriod::Min30 => 1800,
        KlinePeriod::Hour1 | KlinePeriod::Min60 => 3600,
        KlinePeriod::Hour2 => 7200,
        KlinePeriod::Hour4 => 14400,
        KlinePeriod::Hour6 => 21600,
        KlinePeriod::Day1 => 86400,
        KlinePeriod::Week1 => 604800,
        _ => DEFAULT_GRANULARITY,
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponseV5 {
    last: String,
    #[serde(rename = "askPx", default)]
    ask_px: String,
    #[serde(rename = "bidPx", default)]
    bid_px: String,
    #[serde(rename = "high24h", default)]
    high_24h: String,
    #[serde(rename = "low24h", default)]
    low_24h: String,
    #[serde(rename = "volCcy24h", default)]
    vol_ccy_24h: String,
    ts: String,
}

pub fn decode_ticker(raw: &str, pair: &CurrencyPair) -> Result<Ticker> {
    let tickers: Vec<TickerResponseV5> = decode_data("ticker", raw)?;
    let ticker = first_or_not_found(tickers, format!("交易对 {} 的行情", pair))?;

    let date = require_timestamp_millis("ticker.ts", &ticker.ts)?;
    Ok(Ticker {
        pair: pair.clone(),
        last: parse_decimal("ticker.last", &ticker.last)?,
        high: parse_decimal("ticker.high24h", &ticker.high_24h)?,
        low: parse_decimal("ticker.low24h", &ticker.low_24h)?,
        sell: parse_decimal("ticker.askPx", &ticker.ask_px)?,
        buy: parse_decimal("ticker.bidPx", &ticker.bid_px)?,
        vol: parse_decimal("ticker.volCcy24h", &ticker.vol_ccy_24h)?,
        date: date.max(0) as u64,
    })
}

#[derive(Debug, Deserialize)]
struct BookResponseV5 {
    #[serde(default)]
    asks: Vec<Vec<Value>>,
    #[serde(default)]
    bids: Vec<Vec<Value>>,
    ts: String,
}

/// `[price, amount, ...]`，多出来的元素忽略
fn depth_record(field: &str, level: &[Value]) -> Result<DepthRecord> {
    match level {
        [price, amount, ..] => Ok(DepthRecord {
            price: value_to_f64(field, price)?,
            amount: value_to_f64(field, amount)?,
        }),
        _ => Err(ExchangeError::decoding(
            field,
            format!("深度档位至少需要两个元素, 实际为 {}", level.len()),
        )),
    }
}

/// 卖盘按价格从高到低排序，买盘保持原序
pub fn decode_depth(raw: &str, pair: &CurrencyPair) -> Result<Depth> {
    let books: Vec<BookResponseV5> = decode_data("depth", raw)?;
    let book = books
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::EmptyDepth(pair.to_string()))?;

    let mut ask_list = book
        .asks
        .iter()
        .map(|level| depth_record("depth.asks", level))
        .collect::<Result<Vec<_>>>()?;
    let bid_list = book
        .bids
        .iter()
        .map(|level| depth_record("depth.bids", level))
        .collect::<Result<Vec<_>>>()?;

    ask_list.sort_by(|a, b| b.price.total_cmp(&a.price));

    Ok(Depth {
        pair: pair.clone(),
        utime: require_timestamp_millis("depth.ts", &book.ts)?,
        ask_list,
        bid_list,
    })
}

fn value_to_timestamp_secs(field: &str, value: &Value) -> Result<i64> {
    match value {
        Value::String(s) => require_timestamp_secs(field, s),
        Value::Number(n) => require_timestamp_secs(field, &n.to_string()),
        other => Err(ExchangeError::decoding(
            field,
            format!("无效的时间戳: {}", other),
        )),
    }
}

/// 旧版K线：`[time, open, high, low, close, volume]`
pub fn decode_klines(raw: &str, pair: &CurrencyPair, size: usize) -> Result<Vec<Kline>> {
    let rows: Vec<Vec<Value>> = decode_legacy("kline", raw)?;

    let mut klines = rows
        .iter()
        .map(|row| match row.as_slice() {
            [ts, open, high, low, close, vol, ..] => Ok(Kline {
                pair: pair.clone(),
                timestamp: value_to_timestamp_secs("kline.time", ts)?,
                open: value_to_f64("kline.open", open)?,
                high: value_to_f64("kline.high", high)?,
                low: value_to_f64("kline.low", low)?,
                close: value_to_f64("kline.close", close)?,
                vol: value_to_f64("kline.volume", vol)?,
            }),
            _ => Err(ExchangeError::decoding(
                "kline",
                format!("K线需要 6 个元素, 实际为 {}", row.len()),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    if size > 0 {
        klines.truncate(size);
    }
    Ok(klines)
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct LegacyTrade {
    timestamp: String,
    #[serde_as(as = "DisplayFromStr")]
    trade_id: i64,
    #[serde_as(as = "DisplayFromStr")]
    price: f64,
    #[serde_as(as = "DisplayFromStr")]
    size: f64,
    side: String,
}

pub fn decode_trades(raw: &str, pair: &CurrencyPair) -> Result<Vec<Trade>> {
    let trades: Vec<LegacyTrade> = decode_legacy("trades", raw)?;
    trades
        .into_iter()
        .map(|trade| {
            let side = TradeSide::from_wire(&trade.side)
                .map_err(|e| ExchangeError::decoding("trades.side", e))?;
            Ok(Trade {
                tid: trade.trade_id,
                side,
                amount: trade.size,
                price: trade.price,
                date: require_timestamp_secs("trades.timestamp", &trade.timestamp)?,
                pair: pair.clone(),
            })
        })
        .collect()
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct LegacyInstrument {
    instrument_id: String,
    base_currency: String,
    quote_currency: String,
    #[serde_as(as = "DisplayFromStr")]
    min_size: f64,
    size_increment: String,
    tick_size: String,
}

/// 精度取 tick_size / size_increment 的小数位数
pub fn decode_instruments(raw: &str) -> Result<Vec<SymbolPrecision>> {
    let instruments: Vec<LegacyInstrument> = decode_legacy("instruments", raw)?;
    Ok(instruments
        .into_iter()
        .map(|inst| SymbolPrecision {
            price_precision: decimal_places(&inst.tick_size),
            amount_precision: decimal_places(&inst.size_increment),
            min_amount: inst.min_size,
            symbol: inst.instrument_id,
            base_currency: inst.base_currency,
            quote_currency: inst.quote_currency,
        })
        .collect())
}
