// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::JournalError;
use crate::models::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Ticker,
    Account,
    OptionType,
    Status,
    Contracts,
    Cost,
    StrikePrice,
    PriceAtPurchase,
    TradingDate,
    ExpirationDate,
    ClosedDate,
    RealizedPl,
    UnrealizedPl,
    PmccCalc,
    ExpectedReturn,
    Audited,
    Exercised,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortField {
    pub fn parse(raw: &str) -> Result<SortField, JournalError> {
        let f = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ticker" => SortField::Ticker,
            "account" => SortField::Account,
            "option_type" | "type" => SortField::OptionType,
            "status" => SortField::Status,
            "contracts" => SortField::Contracts,
            "cost" => SortField::Cost,
            "strike_price" | "strike" => SortField::StrikePrice,
            "price_at_purchase" => SortField::PriceAtPurchase,
            "trading_date" | "date" => SortField::TradingDate,
            "expiration_date" | "expiration" => SortField::ExpirationDate,
            "closed_date" => SortField::ClosedDate,
            "realized_pl" => SortField::RealizedPl,
            "unrealized_pl" => SortField::UnrealizedPl,
            "pmcc_calc" => SortField::PmccCalc,
            "expected_return" => SortField::ExpectedReturn,
            "audited" => SortField::Audited,
            "exercised" => SortField::Exercised,
            other => {
                return Err(JournalError::validation(
                    "sort",
                    format!("cannot sort by '{}'", other),
                ));
            }
        };
        Ok(f)
    }

    fn key(self, t: &TradeRecord) -> SortKey {
        match self {
            SortField::TradingDate => SortKey::Date(Some(t.trading_date)),
            SortField::ExpirationDate => SortKey::Date(t.expiration_date),
            SortField::ClosedDate => SortKey::Date(t.closed_date),
            SortField::Ticker => SortKey::Text(t.ticker.to_lowercase()),
            SortField::Account => SortKey::Text(t.account.to_lowercase()),
            SortField::OptionType => SortKey::Text(t.option_type.label().to_lowercase()),
            SortField::Status => SortKey::Text(t.status.as_str().to_string()),
            SortField::Contracts => SortKey::Number(Decimal::from(t.contracts)),
            SortField::Cost => SortKey::Number(t.cost),
            SortField::StrikePrice => SortKey::Number(t.strike_price),
            SortField::PriceAtPurchase => SortKey::Number(t.price_at_purchase),
            SortField::RealizedPl => SortKey::Number(t.realized_pl.unwrap_or_default()),
            SortField::UnrealizedPl => SortKey::Number(t.unrealized_pl.unwrap_or_default()),
            SortField::PmccCalc => SortKey::Number(t.pmcc_calc.unwrap_or_default()),
            SortField::ExpectedReturn => SortKey::Number(t.expected_return.unwrap_or_default()),
            SortField::Audited => SortKey::Number(Decimal::from(t.audited as i64)),
            SortField::Exercised => SortKey::Number(Decimal::from(t.exercised as i64)),
        }
    }
}

impl SortDirection {
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

// Missing dates sort before any real date.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Date(Option<NaiveDate>),
    Text(String),
    Number(Decimal),
}

pub fn compare(a: &TradeRecord, b: &TradeRecord, field: SortField, dir: SortDirection) -> Ordering {
    dir.apply(field.key(a).cmp(&field.key(b)))
}

/// Sorted copy of `trades`. Equal keys keep their input order.
pub fn sort_trades(trades: &[TradeRecord], field: SortField, dir: SortDirection) -> Vec<TradeRecord> {
    let mut out = trades.to_vec();
    out.sort_by(|a, b| compare(a, b, field, dir));
    out
}

/// Status ascending, then most recent trading date first.
pub fn default_display_order(trades: &[TradeRecord]) -> Vec<TradeRecord> {
    let mut out = trades.to_vec();
    out.sort_by(|a, b| {
        compare(a, b, SortField::Status, SortDirection::Ascending)
            .then_with(|| compare(a, b, SortField::TradingDate, SortDirection::Descending))
    });
    out
}
