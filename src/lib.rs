// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod calc;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod events;
pub mod filter;
pub mod group;
pub mod kv;
pub mod ledger;
pub mod models;
pub mod quotes;
pub mod sort;
pub mod store;
pub mod utils;
