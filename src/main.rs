// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use optjournal::{cli, commands, db, utils};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("OPTJOURNAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let owner = utils::current_owner(&conn, &matches)?;
    tracing::debug!(%owner, "resolved journal owner");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("trade", sub)) => commands::trades::handle(&conn, &owner, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&conn, &owner, sub)?,
        Some(("import", sub)) => commands::importer::handle(&conn, &owner, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &owner, sub)?,
        Some(("quote", sub)) => commands::quotes::handle(&conn, &owner, sub)?,
        Some(("watchlist", sub)) => commands::lists::handle_watchlist(&conn, &owner, sub)?,
        Some(("accounts", sub)) => commands::lists::handle_accounts(&conn, &owner, sub)?,
        Some(("feed", sub)) => commands::feed::handle(&conn, &owner, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &owner)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
