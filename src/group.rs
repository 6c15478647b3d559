// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{TradeRecord, TradeStatus};
use crate::sort::default_display_order;

/// Accounts shown first, in this order.
pub const PREFERRED_ACCOUNTS: [&str; 4] = ["SAE", "ST", "ST Operating", "Robinhood"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountGroup {
    pub account: String,
    pub open: Vec<TradeRecord>,
    pub closed: Vec<TradeRecord>,
}

impl AccountGroup {
    pub fn len(&self) -> usize {
        self.open.len() + self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn trades(&self) -> impl Iterator<Item = &TradeRecord> {
        self.open.iter().chain(self.closed.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Keep the incoming order inside each bucket.
    #[default]
    AsGiven,
    /// Status ascending, then newest trading date first.
    Display,
}

/// Account order for a set of trades: preferred accounts that are present,
/// then the rest alphabetically.
pub fn account_order(trades: &[TradeRecord]) -> Vec<String> {
    let present: BTreeSet<&str> = trades.iter().map(|t| t.account.as_str()).collect();
    let mut out: Vec<String> = PREFERRED_ACCOUNTS
        .iter()
        .filter(|a| present.contains(*a))
        .map(|a| a.to_string())
        .collect();
    out.extend(
        present
            .into_iter()
            .filter(|a| !PREFERRED_ACCOUNTS.contains(a))
            .map(str::to_string),
    );
    out
}

pub fn group_by_account(trades: &[TradeRecord], order: GroupOrder) -> Vec<AccountGroup> {
    let ordered;
    let trades = match order {
        GroupOrder::AsGiven => trades,
        GroupOrder::Display => {
            ordered = default_display_order(trades);
            &ordered[..]
        }
    };
    account_order(trades)
        .into_iter()
        .map(|account| {
            let (open, closed): (Vec<_>, Vec<_>) = trades
                .iter()
                .filter(|t| t.account == account)
                .cloned()
                .partition(|t| t.status == TradeStatus::Open);
            AccountGroup {
                account,
                open,
                closed,
            }
        })
        .collect()
}
