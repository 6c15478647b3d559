// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OptionType, TradeRecord, TradeStatus};

/// Inclusive bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Range<T> {
    fn default() -> Self {
        Range { min: None, max: None }
    }
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Range { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, v: T) -> bool {
        self.min.is_none_or(|lo| v >= lo) && self.max.is_none_or(|hi| v <= hi)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeFilter {
    pub status: Option<TradeStatus>,
    pub account: Option<String>,
    pub option_type: Option<OptionType>,
    pub audited: Option<bool>,
    pub exercised: Option<bool>,
    /// Case-insensitive substring of the ticker.
    pub ticker: Option<String>,
    pub strike_price: Range<Decimal>,
    pub cost: Range<Decimal>,
    pub realized_pl: Range<Decimal>,
    pub unrealized_pl: Range<Decimal>,
    pub trading_date: Range<NaiveDate>,
    pub expiration_date: Range<NaiveDate>,
    pub closed_date: Range<NaiveDate>,
}

impl TradeFilter {
    pub fn matches(&self, t: &TradeRecord) -> bool {
        if self.status.is_some_and(|s| s != t.status) {
            return false;
        }
        if self.account.as_ref().is_some_and(|a| *a != t.account) {
            return false;
        }
        if self.option_type.as_ref().is_some_and(|o| *o != t.option_type) {
            return false;
        }
        if self.audited.is_some_and(|a| a != t.audited) {
            return false;
        }
        if self.exercised.is_some_and(|e| e != t.exercised) {
            return false;
        }
        if let Some(needle) = &self.ticker {
            if !t.ticker.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if !self.strike_price.contains(t.strike_price) || !self.cost.contains(t.cost) {
            return false;
        }
        if !self.realized_pl.contains(t.realized_pl.unwrap_or_default())
            || !self.unrealized_pl.contains(t.unrealized_pl.unwrap_or_default())
        {
            return false;
        }
        if !self.trading_date.contains(t.trading_date) {
            return false;
        }
        if self.expiration_date.is_set() {
            match t.expiration_date {
                Some(d) if self.expiration_date.contains(d) => {}
                _ => return false,
            }
        }
        if self.closed_date.is_set() {
            match t.closed_date {
                Some(d) if self.closed_date.contains(d) => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply(&self, trades: &[TradeRecord]) -> Vec<TradeRecord> {
        trades.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    /// Number of active filter groups; a range counts once even with both bounds.
    pub fn active_count(&self) -> usize {
        [
            self.status.is_some(),
            self.account.is_some(),
            self.option_type.is_some(),
            self.audited.is_some(),
            self.exercised.is_some(),
            self.ticker.is_some(),
            self.strike_price.is_set(),
            self.cost.is_set(),
            self.realized_pl.is_set(),
            self.unrealized_pl.is_set(),
            self.trading_date.is_set(),
            self.expiration_date.is_set(),
            self.closed_date.is_set(),
        ]
        .into_iter()
        .filter(|on| *on)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Maps the UI "no constraint" inputs (empty text, `all`) to `None`.
pub fn unconstrained(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn trade(id: i64, ticker: &str, status: TradeStatus) -> TradeRecord {
        TradeRecord {
            id,
            owner_id: "u1".into(),
            ticker: ticker.into(),
            account: "SAE".into(),
            option_type: OptionType::CashSecuredPut,
            contracts: 1,
            cost: Decimal::ZERO,
            strike_price: d("100"),
            price_at_purchase: d("101"),
            trading_date: date("2025-02-01"),
            expiration_date: Some(date("2025-03-21")),
            closed_date: if status == TradeStatus::Closed {
                Some(date("2025-02-15"))
            } else {
                None
            },
            status,
            realized_pl: None,
            unrealized_pl: None,
            pmcc_calc: None,
            expected_return: None,
            audited: false,
            exercised: false,
        }
    }

    fn sample() -> Vec<TradeRecord> {
        vec![
            trade(1, "AAPL", TradeStatus::Open),
            trade(2, "AAPL", TradeStatus::Closed),
            trade(3, "MSFT", TradeStatus::Open),
            trade(4, "XAAP", TradeStatus::Open),
        ]
    }

    fn ids(v: &[TradeRecord]) -> Vec<i64> {
        v.iter().map(|t| t.id).collect()
    }

    #[test]
    fn empty_filter_is_identity() {
        let all = sample();
        let f = TradeFilter::default();
        assert_eq!(f.apply(&all), all);
        assert_eq!(f.active_count(), 0);
    }

    #[test]
    fn status_and_ticker_compose_with_and() {
        let f = TradeFilter {
            status: Some(TradeStatus::Open),
            ticker: Some("aap".into()),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&sample())), vec![1, 4]);
        assert_eq!(f.active_count(), 2);
    }

    #[test]
    fn missing_pl_counts_as_zero_in_ranges() {
        let mut all = sample();
        all[0].realized_pl = Some(d("25"));
        let f = TradeFilter {
            realized_pl: Range::new(Some(Decimal::ZERO), Some(d("10"))),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&all)), vec![2, 3, 4]);
    }

    #[test]
    fn ranges_are_inclusive() {
        let mut all = sample();
        all[1].strike_price = d("150");
        let f = TradeFilter {
            strike_price: Range::new(Some(d("100")), Some(d("150"))),
            ..Default::default()
        };
        assert_eq!(f.apply(&all).len(), 4);
        let f = TradeFilter {
            strike_price: Range::new(Some(d("100.01")), None),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&all)), vec![2]);
    }

    #[test]
    fn closed_date_range_requires_a_closed_date() {
        let f = TradeFilter {
            closed_date: Range::new(None, Some(date("2030-01-01"))),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&sample())), vec![2]);
    }

    #[test]
    fn expiration_range_is_inclusive_and_needs_a_date() {
        let mut all = sample();
        all[0].expiration_date = Some(date("2025-06-20"));
        all[3].expiration_date = None;
        let f = TradeFilter {
            expiration_date: Range::new(Some(date("2025-03-21")), Some(date("2025-04-30"))),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&all)), vec![2, 3]);

        let f = TradeFilter {
            expiration_date: Range::new(Some(date("2025-06-01")), None),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&all)), vec![1]);
    }

    #[test]
    fn single_bound_date_range_is_active() {
        let f = TradeFilter {
            expiration_date: Range::new(None, Some(date("2025-12-31"))),
            ..Default::default()
        };
        assert_eq!(f.active_count(), 1);
        assert!(!f.is_empty());
        let f = TradeFilter {
            closed_date: Range::new(Some(date("2025-01-01")), None),
            trading_date: Range::new(None, Some(date("2025-12-31"))),
            ..Default::default()
        };
        assert_eq!(f.active_count(), 2);
    }

    #[test]
    fn date_range_counts_once() {
        let f = TradeFilter {
            trading_date: Range::new(Some(date("2025-01-01")), Some(date("2025-12-31"))),
            cost: Range::new(None, Some(d("5"))),
            ..Default::default()
        };
        assert_eq!(f.active_count(), 2);
    }

    #[test]
    fn exact_flags_and_account() {
        let mut all = sample();
        all[2].audited = true;
        all[3].account = "Robinhood".into();
        let f = TradeFilter {
            audited: Some(false),
            account: Some("SAE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&f.apply(&all)), vec![1, 2]);
    }

    #[test]
    fn all_sentinel_is_unconstrained() {
        assert_eq!(unconstrained(Some("All")), None);
        assert_eq!(unconstrained(Some("  ")), None);
        assert_eq!(unconstrained(None), None);
        assert_eq!(unconstrained(Some(" SAE ")), Some("SAE"));
    }
}
