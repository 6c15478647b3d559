// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::{OptionType, TradeField, TradeRecord, TradeUpdate};

const SHARES_PER_CONTRACT: i64 = 100;

/// Break-even of a long call: strike plus the premium amortised per share.
pub fn pmcc_break_even(
    option_type: &OptionType,
    contracts: i64,
    cost: Decimal,
    strike_price: Decimal,
) -> Option<Decimal> {
    if *option_type != OptionType::CallOption || contracts <= 0 {
        return None;
    }
    let per_share = cost
        .checked_div(Decimal::from(contracts))?
        .checked_div(Decimal::from(SHARES_PER_CONTRACT))?;
    strike_price.checked_add(per_share)
}

/// `strike * 100 * contracts`, or `None` if it does not fit in a `Decimal`.
pub fn notional(strike_price: Decimal, contracts: i64) -> Option<Decimal> {
    strike_price
        .checked_mul(Decimal::from(SHARES_PER_CONTRACT))?
        .checked_mul(Decimal::from(contracts))
}

// expects the resolved type, never the "Other" placeholder
pub fn earns_expected_return(option_type: &OptionType) -> bool {
    matches!(
        option_type,
        OptionType::CoveredCall
            | OptionType::CashCoveredCall
            | OptionType::CashSecuredPut
            | OptionType::PmccCallOption
    )
}

/// P&L over position notional (strike x 100 x contracts), in percent.
/// `None` when the type does not qualify, the notional is zero or the
/// arithmetic overflows.
pub fn expected_return(
    option_type: &OptionType,
    contracts: i64,
    strike_price: Decimal,
    realized_pl: Option<Decimal>,
    unrealized_pl: Option<Decimal>,
) -> Option<Decimal> {
    if !earns_expected_return(option_type) {
        return None;
    }
    let denominator = notional(strike_price, contracts)?;
    if denominator <= Decimal::ZERO {
        return None;
    }
    let pl = realized_pl
        .unwrap_or_default()
        .checked_add(unrealized_pl.unwrap_or_default())?;
    pl.checked_div(denominator)?.checked_mul(Decimal::ONE_HUNDRED)
}

pub fn triggers_pmcc(field: TradeField) -> bool {
    matches!(
        field,
        TradeField::Cost | TradeField::StrikePrice | TradeField::Contracts | TradeField::OptionType
    )
}

pub fn triggers_expected_return(field: TradeField) -> bool {
    matches!(
        field,
        TradeField::RealizedPl
            | TradeField::UnrealizedPl
            | TradeField::StrikePrice
            | TradeField::Contracts
            | TradeField::OptionType
    )
}

/// Derived columns to merge into the update after `edited` changed.
/// `rec` already carries the new value.
pub fn recalculate(rec: &TradeRecord, edited: TradeField) -> TradeUpdate {
    let mut out = TradeUpdate::default();
    if triggers_pmcc(edited) {
        out.pmcc_calc = Some(pmcc_break_even(
            &rec.option_type,
            rec.contracts,
            rec.cost,
            rec.strike_price,
        ));
    }
    if triggers_expected_return(edited) {
        // a zero notional keeps whatever was stored before
        if let Some(er) = expected_return(
            &rec.option_type,
            rec.contracts,
            rec.strike_price,
            rec.realized_pl,
            rec.unrealized_pl,
        ) {
            out.expected_return = Some(Some(er));
        }
    }
    out
}

pub fn derive_all(
    option_type: &OptionType,
    contracts: i64,
    cost: Decimal,
    strike_price: Decimal,
    realized_pl: Option<Decimal>,
    unrealized_pl: Option<Decimal>,
) -> (Option<Decimal>, Option<Decimal>) {
    (
        pmcc_break_even(option_type, contracts, cost, strike_price),
        expected_return(option_type, contracts, strike_price, realized_pl, unrealized_pl),
    )
}
