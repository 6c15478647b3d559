// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{OptionType, TradeRecord};

/// Dashboard totals for a set of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_trades: usize,
    /// Sum of premium paid, `cost * contracts` per trade.
    pub total_cost: Decimal,
    pub total_realized_pl: Decimal,
    pub total_unrealized_pl: Decimal,
    pub overall_pl: Decimal,
    pub total_dollars_traded: Decimal,
}

/// Capital a trade puts to work: premium for long options, notional for
/// covered strategies, nothing for anything else. Totals saturate at the
/// `Decimal` bounds.
pub fn dollars_traded(t: &TradeRecord) -> Decimal {
    match t.option_type {
        OptionType::CallOption | OptionType::PutOption => premium(t),
        OptionType::PmccCoveredCall | OptionType::CoveredCall | OptionType::CashSecuredPut => t
            .strike_price
            .saturating_mul(Decimal::ONE_HUNDRED)
            .saturating_mul(Decimal::from(t.contracts)),
        _ => Decimal::ZERO,
    }
}

fn premium(t: &TradeRecord) -> Decimal {
    t.cost.saturating_mul(Decimal::from(t.contracts))
}

pub fn summarize(trades: &[TradeRecord]) -> Summary {
    let mut s = trades.iter().fold(Summary::default(), |mut acc, t| {
        acc.total_trades += 1;
        acc.total_cost = acc.total_cost.saturating_add(premium(t));
        acc.total_realized_pl = acc
            .total_realized_pl
            .saturating_add(t.realized_pl.unwrap_or_default());
        acc.total_unrealized_pl = acc
            .total_unrealized_pl
            .saturating_add(t.unrealized_pl.unwrap_or_default());
        acc.total_dollars_traded = acc.total_dollars_traded.saturating_add(dollars_traded(t));
        acc
    });
    s.overall_pl = s.total_realized_pl.saturating_add(s.total_unrealized_pl);
    s
}
