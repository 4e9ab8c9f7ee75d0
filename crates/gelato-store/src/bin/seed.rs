//! # Seed Data Generator
//!
//! Resets the catalog to the default ice-cream catalog and writes a batch of
//! demo completed sales so the report has something to show.
//!
//! ## Usage
//! ```bash
//! # 7 days of demo sales (default)
//! cargo run -p gelato-store --bin seed
//!
//! # Custom amount and database
//! cargo run -p gelato-store --bin seed -- --days 30 --db ./data/gelato.db
//! ```
//!
//! Sales are spread over opening hours (10h to 21h UTC) with a mix of
//! scoops, weighed self-service, açaí cups with add-ons and drinks, and
//! every payment method.

use std::env;
use std::sync::Arc;

use chrono::{Duration, Utc};
use gelato_core::checkout::{finalize_order, Payment};
use gelato_core::types::{FRUITS_GROUP, TOPPINGS_GROUP};
use gelato_core::{Cart, ItemOptions, Money, Order, PaymentMethod};
use gelato_store::{CatalogStore, SalesStore, SqliteStorage, StorageConfig};

const PAYMENT_ROTATION: &[PaymentMethod] = &[
    PaymentMethod::Pix,
    PaymentMethod::Cash,
    PaymentMethod::Credit,
    PaymentMethod::Debit,
    PaymentMethod::Pix,
];

const FRUITS: &[&str] = &["morango", "banana", "kiwi", "manga"];
const TOPPINGS: &[&str] = &["granola", "paçoca", "leite em pó", "confete"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut per_day: usize = 25;
    let mut db_path = String::from("./gelato_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(7);
                    i += 1;
                }
            }
            "--per-day" => {
                if i + 1 < args.len() {
                    per_day = args[i + 1].parse().unwrap_or(25);
                    i += 1;
                }
            }
            "-d" | "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Gelato PDV Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --days <N>         Days of demo sales (default: 7)");
                println!("  --per-day <N>      Sales per day (default: 25)");
                println!("  -d, --db <PATH>    Database file path (default: ./gelato_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍦 Gelato PDV Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!("Per day:  {}", per_day);
    println!();

    let storage = Arc::new(SqliteStorage::open(StorageConfig::new(&db_path)).await?);
    println!("✓ Connected to database");

    let mut catalog = CatalogStore::load(storage.clone()).await;
    catalog.reset().await;
    println!("✓ Catalog reset ({} products)", catalog.products().len());

    let mut sales = SalesStore::load(storage.clone()).await;
    if !sales.list().is_empty() {
        println!("⚠ Sales history already has {} sales", sales.list().len());
        println!("  Skipping sales to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let mut generated = Vec::new();
    let mut seed = 0usize;

    for day in 0..days {
        let date = today - Duration::days(day);
        for n in 0..per_day {
            seed += 1;
            let hour = 10 + (seed * 7 % 12) as u32;
            let minute = (seed * 13 % 60) as u32;
            let Some(at) = date.and_hms_opt(hour, minute, 0).map(|dt| dt.and_utc()) else {
                continue;
            };

            let cart = demo_cart(&catalog, seed)?;
            let mut order = if n % 3 == 0 {
                Order::open_comanda(&format!("Cliente {}", seed), at)?
            } else {
                Order::direct_sale(at)
            };
            order.set_items(cart.into_items(), at)?;

            let method = PAYMENT_ROTATION[seed % PAYMENT_ROTATION.len()];
            let payment = if method == PaymentMethod::Cash {
                // Round the tender up to the next R$ 10 note
                let total = order.computed_total().cents();
                Payment::cash(Money::from_cents((total / 1000 + 1) * 1000))
            } else {
                Payment::exact(method)
            };
            finalize_order(&mut order, &payment, at)?;
            generated.push(order);
        }
    }

    let count = generated.len();
    sales.extend(generated).await?;
    if let Some(err) = sales.last_error() {
        eprintln!("Failed to save sales: {}", err);
        return Ok(());
    }

    println!("✓ Generated {} demo sales", count);
    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Builds a varied cart from the default catalog.
fn demo_cart(catalog: &CatalogStore, seed: usize) -> Result<Cart, Box<dyn std::error::Error>> {
    let mut cart = Cart::new();

    match seed % 4 {
        0 => {
            let scoops = catalog.get(1 + (seed % 3) as u32)?;
            cart.add_unit(scoops, 1 + (seed % 2) as u32)?;
        }
        1 => {
            let self_service = catalog.get(4)?;
            let line = cart.add_weighed(self_service, 200 + (seed * 37 % 400) as u32)?;
            if seed % 2 == 1 {
                cart.attach_addons(line, vec![catalog.get(20)?.clone()])?;
            }
        }
        2 => {
            let cup = catalog.get(11)?;
            let mut options = ItemOptions::new();
            options.insert(
                FRUITS_GROUP.to_string(),
                vec![FRUITS[seed % FRUITS.len()].to_string()],
            );
            options.insert(
                TOPPINGS_GROUP.to_string(),
                TOPPINGS.iter().take(1 + seed % 3).map(|t| t.to_string()).collect(),
            );
            cart.add_customized(cup, 1, options, vec![catalog.get(22)?.clone()])?;
        }
        _ => {
            cart.add_unit(catalog.get(5 + (seed % 2) as u32)?, 2)?;
        }
    }

    if seed % 5 == 0 {
        cart.add_unit(catalog.get(31)?, 1)?;
    }
    Ok(cart)
}
