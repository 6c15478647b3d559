// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::JournalError;

static TICKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9./-]{0,9}$").expect("static ticker pattern"));

pub const OTHER_LABEL: &str = "Other";

/// Option strategy of a journal entry. Anything outside the fixed list is kept
/// verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionType {
    CallOption,
    PutOption,
    CoveredCall,
    CashCoveredCall,
    CashSecuredPut,
    PmccCallOption,
    PmccCoveredCall,
    Custom(String),
}

impl OptionType {
    pub const KNOWN: [OptionType; 7] = [
        OptionType::CallOption,
        OptionType::PutOption,
        OptionType::CoveredCall,
        OptionType::CashCoveredCall,
        OptionType::CashSecuredPut,
        OptionType::PmccCallOption,
        OptionType::PmccCoveredCall,
    ];

    pub fn label(&self) -> &str {
        match self {
            OptionType::CallOption => "Call option",
            OptionType::PutOption => "Put option",
            OptionType::CoveredCall => "Covered call",
            OptionType::CashCoveredCall => "Cash covered call",
            OptionType::CashSecuredPut => "Cash secured put",
            OptionType::PmccCallOption => "PMCC call option",
            OptionType::PmccCoveredCall => "PMCC covered call",
            OptionType::Custom(s) => s.as_str(),
        }
    }

    /// Parses a stored or imported label. Known labels match case-insensitively;
    /// anything else becomes `Custom`.
    pub fn from_label(raw: &str) -> OptionType {
        let raw = raw.trim();
        Self::KNOWN
            .iter()
            .find(|k| k.label().eq_ignore_ascii_case(raw))
            .cloned()
            .unwrap_or_else(|| OptionType::Custom(raw.to_string()))
    }

    /// Resolves the picker value into the effective type. `"Other"` defers to
    /// the accompanying free-text value.
    pub fn resolve(selected: &str, custom: Option<&str>) -> Result<OptionType, JournalError> {
        if selected.trim().eq_ignore_ascii_case(OTHER_LABEL) {
            let custom = custom.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
                JournalError::validation("option_type", "custom option type required for 'Other'")
            })?;
            return Ok(OptionType::from_label(custom));
        }
        if selected.trim().is_empty() {
            return Err(JournalError::validation("option_type", "option type is empty"));
        }
        Ok(OptionType::from_label(selected))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, OptionType::Custom(_))
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OptionType {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OptionType {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(OptionType::from_label(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Closed => "closed",
        }
    }

    pub fn parse(raw: &str) -> Result<TradeStatus, JournalError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(TradeStatus::Open),
            "closed" => Ok(TradeStatus::Closed),
            other => Err(JournalError::validation(
                "status",
                format!("unknown status '{}', expected open|closed", other),
            )),
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: i64,
    pub owner_id: String,
    pub ticker: String,
    pub account: String,
    pub option_type: OptionType,
    pub contracts: i64,
    pub cost: Decimal, // per contract premium
    pub strike_price: Decimal,
    pub price_at_purchase: Decimal,
    pub trading_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
    pub status: TradeStatus,
    pub realized_pl: Option<Decimal>,
    pub unrealized_pl: Option<Decimal>,
    pub pmcc_calc: Option<Decimal>,
    pub expected_return: Option<Decimal>,
    pub audited: bool,
    pub exercised: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    pub ticker: String,
    pub account: String,
    pub option_type: OptionType,
    pub contracts: i64,
    pub cost: Decimal,
    pub strike_price: Decimal,
    pub price_at_purchase: Decimal,
    pub trading_date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub status: TradeStatus,
    pub closed_date: Option<NaiveDate>,
    pub realized_pl: Option<Decimal>,
    pub unrealized_pl: Option<Decimal>,
    pub pmcc_calc: Option<Decimal>,
    pub expected_return: Option<Decimal>,
    pub audited: bool,
    pub exercised: bool,
}

impl NewTrade {
    pub fn open(
        ticker: &str,
        account: &str,
        option_type: OptionType,
        contracts: i64,
        cost: Decimal,
        strike_price: Decimal,
        trading_date: NaiveDate,
    ) -> NewTrade {
        NewTrade {
            ticker: ticker.to_string(),
            account: account.to_string(),
            option_type,
            contracts,
            cost,
            strike_price,
            price_at_purchase: Decimal::ZERO,
            trading_date,
            expiration_date: None,
            status: TradeStatus::Open,
            closed_date: None,
            realized_pl: None,
            unrealized_pl: None,
            pmcc_calc: None,
            expected_return: None,
            audited: false,
            exercised: false,
        }
    }

    pub fn validate(&self) -> Result<(), JournalError> {
        validate_contracts(self.contracts)?;
        validate_non_negative("cost", self.cost)?;
        validate_non_negative("strike_price", self.strike_price)?;
        if self.account.trim().is_empty() {
            return Err(JournalError::validation("account", "account is empty"));
        }
        validate_expiration(&self.option_type, self.expiration_date)?;
        match (self.status, self.closed_date) {
            (TradeStatus::Closed, None) => Err(JournalError::validation(
                "closed_date",
                "closed trades need a closed date",
            )),
            (TradeStatus::Open, Some(_)) => Err(JournalError::validation(
                "closed_date",
                "open trades cannot carry a closed date",
            )),
            _ => Ok(()),
        }
    }
}

/// Partial set of columns sent to the store. `None` leaves a column untouched;
/// nullable columns use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeUpdate {
    pub ticker: Option<String>,
    pub account: Option<String>,
    pub option_type: Option<OptionType>,
    pub contracts: Option<i64>,
    pub cost: Option<Decimal>,
    pub strike_price: Option<Decimal>,
    pub price_at_purchase: Option<Decimal>,
    pub trading_date: Option<NaiveDate>,
    pub expiration_date: Option<Option<NaiveDate>>,
    pub closed_date: Option<Option<NaiveDate>>,
    pub status: Option<TradeStatus>,
    pub realized_pl: Option<Option<Decimal>>,
    pub unrealized_pl: Option<Option<Decimal>>,
    pub pmcc_calc: Option<Option<Decimal>>,
    pub expected_return: Option<Option<Decimal>>,
    pub audited: Option<bool>,
    pub exercised: Option<bool>,
}

impl TradeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == TradeUpdate::default()
    }

    pub fn apply_to(&self, rec: &mut TradeRecord) {
        if let Some(v) = &self.ticker {
            rec.ticker = v.clone();
        }
        if let Some(v) = &self.account {
            rec.account = v.clone();
        }
        if let Some(v) = &self.option_type {
            rec.option_type = v.clone();
        }
        if let Some(v) = self.contracts {
            rec.contracts = v;
        }
        if let Some(v) = self.cost {
            rec.cost = v;
        }
        if let Some(v) = self.strike_price {
            rec.strike_price = v;
        }
        if let Some(v) = self.price_at_purchase {
            rec.price_at_purchase = v;
        }
        if let Some(v) = self.trading_date {
            rec.trading_date = v;
        }
        if let Some(v) = self.expiration_date {
            rec.expiration_date = v;
        }
        if let Some(v) = self.closed_date {
            rec.closed_date = v;
        }
        if let Some(v) = self.status {
            rec.status = v;
        }
        if let Some(v) = self.realized_pl {
            rec.realized_pl = v;
        }
        if let Some(v) = self.unrealized_pl {
            rec.unrealized_pl = v;
        }
        if let Some(v) = self.pmcc_calc {
            rec.pmcc_calc = v;
        }
        if let Some(v) = self.expected_return {
            rec.expected_return = v;
        }
        if let Some(v) = self.audited {
            rec.audited = v;
        }
        if let Some(v) = self.exercised {
            rec.exercised = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeField {
    Ticker,
    Account,
    OptionType,
    Contracts,
    Cost,
    StrikePrice,
    PriceAtPurchase,
    TradingDate,
    ExpirationDate,
    RealizedPl,
    UnrealizedPl,
    Audited,
    Exercised,
}

impl TradeField {
    pub fn parse(raw: &str) -> Result<TradeField, JournalError> {
        let f = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ticker" => TradeField::Ticker,
            "account" => TradeField::Account,
            "option_type" | "type" => TradeField::OptionType,
            "contracts" => TradeField::Contracts,
            "cost" => TradeField::Cost,
            "strike_price" | "strike" => TradeField::StrikePrice,
            "price_at_purchase" => TradeField::PriceAtPurchase,
            "trading_date" => TradeField::TradingDate,
            "expiration_date" | "expiration" => TradeField::ExpirationDate,
            "realized_pl" => TradeField::RealizedPl,
            "unrealized_pl" => TradeField::UnrealizedPl,
            "audited" => TradeField::Audited,
            "exercised" => TradeField::Exercised,
            other => {
                return Err(JournalError::validation(
                    "field",
                    format!("'{}' is not an editable field", other),
                ));
            }
        };
        Ok(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Ticker(String),
    Account(String),
    /// Picker value plus the free-text box shown when "Other" is picked.
    OptionType {
        selected: String,
        custom: Option<String>,
    },
    Contracts(i64),
    Cost(Decimal),
    StrikePrice(Decimal),
    PriceAtPurchase(Decimal),
    TradingDate(NaiveDate),
    ExpirationDate(Option<NaiveDate>),
    RealizedPl(Option<Decimal>),
    UnrealizedPl(Option<Decimal>),
    Audited(bool),
    Exercised(bool),
}

impl FieldEdit {
    pub fn field(&self) -> TradeField {
        match self {
            FieldEdit::Ticker(_) => TradeField::Ticker,
            FieldEdit::Account(_) => TradeField::Account,
            FieldEdit::OptionType { .. } => TradeField::OptionType,
            FieldEdit::Contracts(_) => TradeField::Contracts,
            FieldEdit::Cost(_) => TradeField::Cost,
            FieldEdit::StrikePrice(_) => TradeField::StrikePrice,
            FieldEdit::PriceAtPurchase(_) => TradeField::PriceAtPurchase,
            FieldEdit::TradingDate(_) => TradeField::TradingDate,
            FieldEdit::ExpirationDate(_) => TradeField::ExpirationDate,
            FieldEdit::RealizedPl(_) => TradeField::RealizedPl,
            FieldEdit::UnrealizedPl(_) => TradeField::UnrealizedPl,
            FieldEdit::Audited(_) => TradeField::Audited,
            FieldEdit::Exercised(_) => TradeField::Exercised,
        }
    }

    /// Builds an edit from raw text, e.g. CLI `--field cost --value 2.50`.
    /// An empty value clears nullable fields.
    pub fn parse(field: &str, value: &str, custom: Option<&str>) -> Result<FieldEdit, JournalError> {
        let value = value.trim();
        let field = TradeField::parse(field)?;
        let edit = match field {
            TradeField::Ticker => FieldEdit::Ticker(normalize_ticker(value)?),
            TradeField::Account => FieldEdit::Account(value.to_string()),
            TradeField::OptionType => FieldEdit::OptionType {
                selected: value.to_string(),
                custom: custom.map(|s| s.to_string()),
            },
            TradeField::Contracts => FieldEdit::Contracts(value.parse::<i64>().map_err(|_| {
                JournalError::validation("contracts", format!("invalid integer '{}'", value))
            })?),
            TradeField::Cost => FieldEdit::Cost(parse_amount("cost", value)?),
            TradeField::StrikePrice => FieldEdit::StrikePrice(parse_amount("strike_price", value)?),
            TradeField::PriceAtPurchase => {
                FieldEdit::PriceAtPurchase(parse_amount("price_at_purchase", value)?)
            }
            TradeField::TradingDate => FieldEdit::TradingDate(parse_iso("trading_date", value)?),
            TradeField::ExpirationDate => FieldEdit::ExpirationDate(if value.is_empty() {
                None
            } else {
                Some(parse_iso("expiration_date", value)?)
            }),
            TradeField::RealizedPl => FieldEdit::RealizedPl(parse_optional("realized_pl", value)?),
            TradeField::UnrealizedPl => {
                FieldEdit::UnrealizedPl(parse_optional("unrealized_pl", value)?)
            }
            TradeField::Audited => FieldEdit::Audited(parse_flag("audited", value)?),
            TradeField::Exercised => FieldEdit::Exercised(parse_flag("exercised", value)?),
        };
        Ok(edit)
    }
}

pub fn normalize_ticker(raw: &str) -> Result<String, JournalError> {
    let t = raw.trim().to_uppercase();
    if !TICKER_RE.is_match(&t) {
        return Err(JournalError::validation(
            "ticker",
            format!("invalid ticker '{}'", raw.trim()),
        ));
    }
    Ok(t)
}

pub fn validate_contracts(contracts: i64) -> Result<(), JournalError> {
    if contracts < 1 {
        return Err(JournalError::validation(
            "contracts",
            format!("contracts must be at least 1, got {}", contracts),
        ));
    }
    Ok(())
}

/// Listed option types must carry an expiration; custom ones may not have one.
pub fn validate_expiration(
    option_type: &OptionType,
    expiration_date: Option<NaiveDate>,
) -> Result<(), JournalError> {
    if !option_type.is_custom() && expiration_date.is_none() {
        return Err(JournalError::validation(
            "expiration_date",
            format!("'{}' trades need an expiration date", option_type),
        ));
    }
    Ok(())
}

pub fn validate_non_negative(field: &'static str, v: Decimal) -> Result<(), JournalError> {
    if v < Decimal::ZERO {
        return Err(JournalError::validation(
            field,
            format!("{} must not be negative, got {}", field, v),
        ));
    }
    Ok(())
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, JournalError> {
    raw.parse::<Decimal>()
        .map_err(|_| JournalError::validation(field, format!("invalid decimal '{}'", raw)))
}

fn parse_optional(field: &'static str, raw: &str) -> Result<Option<Decimal>, JournalError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_amount(field, raw).map(Some)
}

fn parse_iso(field: &'static str, raw: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        JournalError::validation(field, format!("invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

/// Accepts `true`/`false` and the `Yes`/`No` the exporter writes.
pub fn parse_flag(field: &'static str, raw: &str) -> Result<bool, JournalError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" | "" => Ok(false),
        other => Err(JournalError::validation(
            field,
            format!("invalid boolean '{}'", other),
        )),
    }
}
