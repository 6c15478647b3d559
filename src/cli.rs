// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command, value_parser};

/// Filter flags shared by `trade list`, `summary` and `export trades`.
fn filter_args() -> Vec<Arg> {
    vec![
        arg!(--status <STATUS> "open|closed|all"),
        arg!(--account <ACCOUNT> "Exact account name"),
        Arg::new("type").long("type").value_name("TYPE").help("Exact option type label"),
        arg!(--ticker <TEXT> "Ticker contains (case-insensitive)"),
        arg!(--audited <BOOL> "true|false"),
        arg!(--exercised <BOOL> "true|false"),
        arg!(--min_strike <AMOUNT>).long("min-strike"),
        arg!(--max_strike <AMOUNT>).long("max-strike"),
        arg!(--min_cost <AMOUNT>).long("min-cost"),
        arg!(--max_cost <AMOUNT>).long("max-cost"),
        arg!(--min_realized <AMOUNT>).long("min-realized").allow_hyphen_values(true),
        arg!(--max_realized <AMOUNT>).long("max-realized").allow_hyphen_values(true),
        arg!(--min_unrealized <AMOUNT>).long("min-unrealized").allow_hyphen_values(true),
        arg!(--max_unrealized <AMOUNT>).long("max-unrealized").allow_hyphen_values(true),
        arg!(--from <DATE> "Trading date on or after (YYYY-MM-DD)"),
        arg!(--to <DATE> "Trading date on or before (YYYY-MM-DD)"),
        arg!(--expires_from <DATE>).long("expires-from"),
        arg!(--expires_to <DATE>).long("expires-to"),
        arg!(--closed_from <DATE>).long("closed-from"),
        arg!(--closed_to <DATE>).long("closed-to"),
    ]
}

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json").long("json").action(ArgAction::SetTrue),
        Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue),
    ]
}

fn trade_id() -> Arg {
    arg!(<ID> "Trade id").value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    command!()
        .name("optjournal")
        .about("Options-trading journal: log trades, track PMCC break-even and P&L")
        .arg(
            arg!(--user <USER> "Journal owner (defaults to the default_user setting)")
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("trade")
                .about("Add, edit and browse trades")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--ticker <TICKER>).required(true))
                        .arg(arg!(--account <ACCOUNT>).required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("TYPE")
                                .required(true)
                                .help("Option type, or Other with --custom-type"),
                        )
                        .arg(arg!(--custom_type <TEXT>).long("custom-type"))
                        .arg(arg!(--contracts <N>).required(true).value_parser(value_parser!(i64)))
                        .arg(arg!(--cost <AMOUNT> "Premium per contract").default_value("0"))
                        .arg(arg!(--strike <PRICE>).required(true))
                        .arg(arg!(--price_at_purchase <PRICE>).long("price-at-purchase").default_value("0"))
                        .arg(arg!(--expiration <DATE>))
                        .arg(arg!(--realized_pl <AMOUNT>).long("realized-pl").allow_hyphen_values(true))
                        .arg(arg!(--unrealized_pl <AMOUNT>).long("unrealized-pl").allow_hyphen_values(true))
                        .arg(arg!(--date <DATE> "Trading date, defaults to today")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a single field")
                        .arg(trade_id())
                        .arg(arg!(--field <FIELD>).required(true))
                        .arg(arg!(--value <VALUE>).required(true).allow_hyphen_values(true))
                        .arg(arg!(--custom_type <TEXT>).long("custom-type")),
                )
                .subcommand(Command::new("close").arg(trade_id()))
                .subcommand(Command::new("reopen").arg(trade_id()))
                .subcommand(Command::new("rm").arg(trade_id()))
                .subcommand(Command::new("show").arg(trade_id()).args(json_flags()))
                .subcommand(
                    Command::new("list")
                        .args(filter_args())
                        .arg(arg!(--sort <FIELD> "Sort field").default_value("trading_date"))
                        .arg(Arg::new("desc").long("desc").action(ArgAction::SetTrue))
                        .arg(
                            Arg::new("group")
                                .long("group")
                                .action(ArgAction::SetTrue)
                                .help("Section by account, then open/closed"),
                        )
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Dashboard totals")
                .args(filter_args())
                .arg(Arg::new("by_account").long("by-account").action(ArgAction::SetTrue))
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("trades").arg(arg!(--path <CSV>).required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("trades")
                    .arg(arg!(--format <FMT> "csv|json").default_value("csv"))
                    .arg(arg!(--out <PATH>).required(true))
                    .args(filter_args()),
            ),
        )
        .subcommand(
            Command::new("quote")
                .about("Current prices")
                .arg(arg!([TICKERS] ... "Tickers to quote"))
                .arg(Arg::new("watchlist").long("watchlist").action(ArgAction::SetTrue))
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(list_command("watchlist", "TICKER"))
        .subcommand(list_command("accounts", "NAME"))
        .subcommand(
            Command::new("feed")
                .about("Shared trades")
                .subcommand(Command::new("share").arg(trade_id()))
                .subcommand(Command::new("list").args(json_flags()))
                .subcommand(Command::new("clear")),
        )
        .subcommand(
            Command::new("config")
                .subcommand(Command::new("get").arg(arg!(<KEY>)))
                .subcommand(Command::new("set").arg(arg!(<KEY>)).arg(arg!(<VALUE>)))
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored trades for inconsistencies"))
}

fn list_command(name: &'static str, value: &'static str) -> Command {
    Command::new(name)
        .subcommand(Command::new("add").arg(Arg::new("value").value_name(value).required(true)))
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(Arg::new("value").value_name(value).required(true)))
}
