//! # Gelato PDV Entry Point
//!
//! Maintenance commands for the till. The sale screen itself talks to the
//! command functions in the library.
//!
//! ## Usage
//! ```bash
//! gelato-pdv [--config <PATH>] <COMMAND>
//!
//! gelato-pdv init-config              # write a default config.toml
//! gelato-pdv hash-password <PASSWORD> # value for session.operator_password_hash
//! gelato-pdv catalog                  # print the catalog as JSON
//! gelato-pdv report [--days <N>]      # sales report as JSON (default: today)
//! gelato-pdv receipt <SALE_ID>        # print a sale's receipt HTML
//! gelato-pdv check                    # storage health check
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use gelato_core::receipt::render_receipt_html;
use gelato_core::{DateRange, MAX_REPORT_DAYS};
use gelato_pdv::state::session::hash_password;
use gelato_pdv::{init_tracing, start, ApiError, ApiResult, PdvConfig};
use tracing::error;

const USAGE: &str = "\
Gelato PDV

Usage: gelato-pdv [--config <PATH>] <COMMAND>

Commands:
  init-config              Write a default config file
  hash-password <PASSWORD> Hash an operator password
  catalog                  Print the product catalog as JSON
  report [--days <N>]      Print the sales report as JSON (default: today)
  receipt <SALE_ID>        Print the receipt HTML of a completed sale
  check                    Check that storage is reachable

Options:
  -c, --config <PATH>      Config file (default: platform config dir)
  -h, --help               Show this help message";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> ApiResult<()> {
    let mut config_path: Option<PathBuf> = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            other => rest.push(other.to_string()),
        }
        i += 1;
    }

    let Some(command) = rest.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "init-config" => {
            let path = PdvConfig::default().save(config_path)?;
            println!("✓ Config written to {}", path.display());
        }
        "hash-password" => {
            let password = rest
                .get(1)
                .ok_or_else(|| ApiError::validation("hash-password needs a password"))?;
            println!("{}", hash_password(password)?);
        }
        "catalog" => {
            let state = start(config_path).await?;
            let catalog = state.catalog.read().await;
            print_json(&catalog.products())?;
            drop(catalog);
            state.shutdown().await;
        }
        "report" => {
            let days = match rest.iter().position(|a| a == "--days") {
                Some(pos) => rest
                    .get(pos + 1)
                    .and_then(|d| d.parse::<u32>().ok())
                    .ok_or_else(|| ApiError::validation("--days needs a number"))?,
                None => 1,
            };
            if days == 0 || days > MAX_REPORT_DAYS {
                return Err(ApiError::validation(format!("--days must be between 1 and {}", MAX_REPORT_DAYS)));
            }

            let state = start(config_path).await?;
            let options = state.config.report_options();
            let range = DateRange::last_days(Utc::now(), days, options.offset());
            let report = state.sales.read().await.report(range, &options);
            print_json(&report)?;
            state.shutdown().await;
        }
        "receipt" => {
            let sale_id = rest
                .get(1)
                .ok_or_else(|| ApiError::validation("receipt needs a sale id"))?;

            let state = start(config_path).await?;
            let sale = state.sales.read().await.get(sale_id)?.clone();
            println!("{}", render_receipt_html(&sale, &state.config.receipt_header()));
            state.shutdown().await;
        }
        "check" => {
            let state = start(config_path).await?;
            let healthy = state.health_check().await;
            state.shutdown().await;
            if !healthy {
                return Err(ApiError::internal("Storage health check failed"));
            }
            println!("✓ Storage OK");
        }
        other => {
            return Err(ApiError::validation(format!("Unknown command '{}', see --help", other)));
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> ApiResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
