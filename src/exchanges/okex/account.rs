/// 账户、资金划转与充提报文
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};
use std::collections::HashMap;

use crate::core::{
    error::ExchangeError,
    types::{
        Account, AccountBalance, AssetBalance, Currency, CurrencyInfo, DepositAddress, Result,
        SubAccount, TransferRequest, TransferResult, WithdrawalRequest, WithdrawalResult,
    },
};
use crate::exchanges::okex::envelope::{decode_data, decode_legacy, validate_envelope};
use crate::utils::parse::{parse_decimal, value_to_f64};

/// 多币种查询参数用逗号拼接，不允许为空
pub fn join_currencies(ccys: &[&str]) -> Result<String> {
    let ccys: Vec<&str> = ccys
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if ccys.is_empty() {
        return Err(ExchangeError::ValidationError {
            field: "ccy".to_string(),
            reason: "至少需要一个币种".to_string(),
        });
    }
    Ok(ccys.join(","))
}

// ============= 旧版现货账户 =============

#[serde_as]
#[derive(Debug, Deserialize)]
struct LegacyAccountEntry {
    currency: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    available: f64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    hold: f64,
}

pub fn decode_legacy_account(raw: &str) -> Result<Account> {
    let entries: Vec<LegacyAccountEntry> = decode_legacy("accounts", raw)?;
    let mut account = Account::default();
    for entry in entries {
        let currency = Currency::new(&entry.currency);
        account.sub_accounts.insert(
            currency.clone(),
            SubAccount {
                currency,
                amount: entry.available,
                frozen_amount: entry.hold,
            },
        );
    }
    Ok(account)
}

// ============= v5 交易账户余额 =============

#[derive(Debug, Deserialize)]
struct BalanceContainer {
    #[serde(default)]
    details: Vec<BalanceDetail>,
}

#[derive(Debug, Deserialize)]
struct BalanceDetail {
    ccy: String,
    #[serde(rename = "availBal", default)]
    avail_bal: String,
    #[serde(rename = "cashBal", default)]
    cash_bal: String,
    #[serde(rename = "frozenBal", default)]
    frozen_bal: String,
    #[serde(rename = "ordFrozen", default)]
    ord_frozen: String,
}

/// 外层账户数组套 details 数组，拍平成 币种 -> 余额
pub fn decode_account_balances(raw: &str) -> Result<HashMap<String, AccountBalance>> {
    let containers: Vec<BalanceContainer> = decode_data("account_balance", raw)?;

    let mut balances = HashMap::new();
    for detail in containers.into_iter().flat_map(|c| c.details) {
        let balance = AccountBalance {
            avail_bal: parse_decimal("balance.availBal", &detail.avail_bal)?,
            cash_bal: parse_decimal("balance.cashBal", &detail.cash_bal)?,
            frozen_bal: parse_decimal("balance.frozenBal", &detail.frozen_bal)?,
            ord_frozen: parse_decimal("balance.ordFrozen", &detail.ord_frozen)?,
            ccy: detail.ccy,
        };
        balances.insert(balance.ccy.clone(), balance);
    }
    Ok(balances)
}

// ============= v5 资金账户 =============

#[derive(Debug, Deserialize)]
struct AssetBalanceResponse {
    ccy: String,
    #[serde(rename = "availBal", default)]
    avail_bal: String,
    #[serde(default)]
    bal: Value,
    #[serde(rename = "frozenBal", default)]
    frozen_bal: String,
}

pub fn decode_asset_balances(raw: &str) -> Result<Vec<AssetBalance>> {
    let balances: Vec<AssetBalanceResponse> = decode_data("asset_balances", raw)?;
    balances
        .into_iter()
        .map(|b| {
            let bal = match &b.bal {
                Value::Null => 0.0,
                other => value_to_f64("asset.bal", other)?,
            };
            Ok(AssetBalance {
                avail_bal: parse_decimal("asset.availBal", &b.avail_bal)?,
                bal,
                frozen_bal: parse_decimal("asset.frozenBal", &b.frozen_bal)?,
                ccy: b.ccy,
            })
        })
        .collect()
}

/// 资金划转参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferParamV5 {
    pub ccy: String,
    pub amt: String,
    #[serde(rename = "type")]
    pub transfer_type: String,
    pub from: String,
    pub to: String,
}

impl From<&TransferRequest> for TransferParamV5 {
    fn from(req: &TransferRequest) -> Self {
        Self {
            ccy: req.ccy.clone(),
            amt: req.amount.to_string(),
            transfer_type: req.transfer_type.clone(),
            from: req.from.clone(),
            to: req.to.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TransferResponseV5 {
    #[serde(rename = "transId")]
    trans_id: String,
    ccy: String,
    amt: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

/// 提币参数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalParamV5 {
    pub ccy: String,
    pub chain: String,
    pub amt: String,
    pub dest: String,
    #[serde(rename = "toAddr")]
    pub to_addr: String,
    pub pwd: String,
    pub fee: String,
}

impl From<&WithdrawalRequest> for WithdrawalParamV5 {
    fn from(req: &WithdrawalRequest) -> Self {
        Self {
            ccy: req.ccy.clone(),
            chain: req.chain.clone(),
            amt: req.amount.to_string(),
            dest: req.dest.clone(),
            to_addr: req.to_addr.clone(),
            pwd: req.pwd.clone(),
            fee: req.fee.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WithdrawalResponseV5 {
    #[serde(rename = "wdId")]
    wd_id: String,
    ccy: String,
    #[serde(default)]
    chain: String,
    amt: String,
}

/// 资金操作的确认必须存在
///
/// 缺少确认时无法判断资金是否已经移动，直接 panic，不能当作成功处理。
fn first_acknowledgement(context: &str, raw: &str, request_body: &str) -> Result<Value> {
    let data = validate_envelope(raw)?;
    match data {
        Value::Array(mut items) if !items.is_empty() => Ok(items.swap_remove(0)),
        Value::Null | Value::Array(_) => {
            panic!("{} 没有返回确认, 请求体: {}", context, request_body)
        }
        other => Err(ExchangeError::decoding(
            context,
            format!("确认数据不是数组: {}", other),
        )),
    }
}

pub fn decode_transfer_ack(raw: &str, request_body: &str) -> Result<TransferResult> {
    let ack = first_acknowledgement("transfer", raw, request_body)?;
    let ack: TransferResponseV5 =
        serde_json::from_value(ack).map_err(|e| ExchangeError::decoding("transfer", e))?;
    Ok(TransferResult {
        amount: parse_decimal("transfer.amt", &ack.amt)?,
        transfer_id: ack.trans_id,
        ccy: ack.ccy,
        from: ack.from,
        to: ack.to,
    })
}

pub fn decode_withdrawal_ack(raw: &str, request_body: &str) -> Result<WithdrawalResult> {
    let ack = first_acknowledgement("withdrawal", raw, request_body)?;
    let ack: WithdrawalResponseV5 =
        serde_json::from_value(ack).map_err(|e| ExchangeError::decoding("withdrawal", e))?;
    Ok(WithdrawalResult {
        amount: parse_decimal("withdrawal.amt", &ack.amt)?,
        withdrawal_id: ack.wd_id,
        ccy: ack.ccy,
        chain: ack.chain,
    })
}

// ============= 币种与充值地址 =============

#[derive(Debug, Deserialize)]
struct CurrencyResponse {
    ccy: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    chain: String,
    #[serde(rename = "canDep", default)]
    can_dep: bool,
    #[serde(rename = "canWd", default)]
    can_wd: bool,
    #[serde(rename = "canInternal", default)]
    can_internal: bool,
    #[serde(rename = "minWd", default)]
    min_wd: String,
    #[serde(rename = "minFee", default)]
    min_fee: String,
    #[serde(rename = "maxFee", default)]
    max_fee: String,
}

pub fn decode_currencies(raw: &str) -> Result<Vec<CurrencyInfo>> {
    let currencies: Vec<CurrencyResponse> = decode_data("currencies", raw)?;
    currencies
        .into_iter()
        .map(|c| {
            Ok(CurrencyInfo {
                min_withdraw: parse_decimal("currency.minWd", &c.min_wd)?,
                min_fee: parse_decimal("currency.minFee", &c.min_fee)?,
                max_fee: parse_decimal("currency.maxFee", &c.max_fee)?,
                ccy: c.ccy,
                name: c.name,
                chain: c.chain,
                can_deposit: c.can_dep,
                can_withdraw: c.can_wd,
                can_internal: c.can_internal,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct DepositAddressResponse {
    ccy: String,
    #[serde(default)]
    chain: String,
    addr: String,
    #[serde(rename = "ctAddr", default)]
    ct_addr: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    selected: bool,
}

pub fn decode_deposit_addresses(raw: &str) -> Result<Vec<DepositAddress>> {
    let addresses: Vec<DepositAddressResponse> = decode_data("deposit_address", raw)?;
    Ok(addresses
        .into_iter()
        .map(|a| DepositAddress {
            ccy: a.ccy,
            chain: a.chain,
            address: a.addr,
            contract_address: a.ct_addr,
            to: a.to,
            selected: a.selected,
        })
        .collect())
}
