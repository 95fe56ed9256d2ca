//! # Seed Data Generator
//!
//! Populates the database with a dry-cleaning price list and a few demo
//! orders, then prints a cash up for the day.
//!
//! ## Usage
//! ```bash
//! # Seed ./pressline_dev.db with the catalog and 10 demo orders
//! cargo run -p pressline-db --bin seed
//!
//! # Custom amount of demo orders
//! cargo run -p pressline-db --bin seed -- --orders 50
//!
//! # Specify database path
//! cargo run -p pressline-db --bin seed -- --db ./data/pressline.db
//! ```
//!
//! Shop settings (name, currency symbol, opening float) come from the
//! `PRESSLINE_*` environment variables, see [`pressline_db::AppConfig`].

use std::env;

use chrono::{Duration, Utc};
use pressline_core::cashup::reconcile;
use pressline_core::{CartAdjustments, LineItemDraft, Money, OrderDraft, PaymentMethod, Service};
use pressline_db::{AppConfig, Database};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Price list: (category, [(service, price in cents)])
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Laundry",
        &[
            ("Shirt - Wash & Press", 450),
            ("Shirt - Folded", 400),
            ("Polo Shirt", 500),
            ("Bedsheet - Single", 650),
            ("Bedsheet - Double", 800),
        ],
    ),
    (
        "Dry Clean",
        &[
            ("Suit - 2 Piece", 1500),
            ("Suit - 3 Piece", 1950),
            ("Jacket", 950),
            ("Trousers", 650),
            ("Skirt", 650),
            ("Dress - Plain", 1200),
            ("Dress - Evening", 2500),
            ("Coat - Wool", 1800),
            ("Tie", 400),
        ],
    ),
    (
        "Household",
        &[
            ("Duvet - Single", 1800),
            ("Duvet - King", 2500),
            ("Curtains (per panel)", 1400),
            ("Rug - Small", 2000),
        ],
    ),
    (
        "Alterations",
        &[
            ("Trouser Hem", 900),
            ("Zip Replacement", 1500),
            ("Sleeve Shortening", 1800),
        ],
    ),
];

const COLORS: &[&str] = &["white", "navy", "black", "grey", "blue", "cream"];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pressline_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = AppConfig::load()?;
    let args: Vec<String> = env::args().collect();

    let mut order_count: usize = 10;
    if env::var("PRESSLINE_DB_PATH").is_err() {
        config.database_path = "./pressline_dev.db".into();
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--orders" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "-d" | "--db" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Pressline Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>   Number of demo orders to create (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./pressline_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let shop = config.shop.clone();

    println!("🌱 {} - Seed Data Generator", shop.shop_name);
    println!("================================");
    println!("Database: {}", config.database_path.display());
    println!("Orders:   {}", order_count);
    println!();

    let db = Database::new(config.db_config()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.services().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} services", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    let mut services: Vec<Service> = Vec::new();
    for (category, entries) in CATALOG {
        for (name, cents) in entries.iter() {
            match db.services().create(name, category, Money::from_cents(*cents)).await {
                Ok(service) => services.push(service),
                Err(e) => warn!(service = %name, error = %e, "Failed to insert service"),
            }
        }
    }

    println!("✓ Inserted {} services", services.len());

    if services.is_empty() {
        return Ok(());
    }

    // -------------------------------------------------------------------------
    // Demo orders
    // -------------------------------------------------------------------------

    let day_start = Utc::now() - Duration::minutes(1);
    let mut created = 0;

    for n in 0..order_count {
        let draft = demo_draft(n, &services);
        let submitted = match pressline_core::price_order(&draft) {
            Ok(priced) => priced.totals(),
            Err(e) => {
                warn!(order = n, error = %e, "Skipping demo order");
                continue;
            }
        };

        let order = db
            .orders()
            .create_order(&draft, Some(&submitted), shop.totals_tolerance)
            .await?;

        if !order.grand_total.is_zero() {
            let method = if n % 3 == 0 {
                PaymentMethod::Card
            } else {
                PaymentMethod::Cash
            };
            db.payments()
                .add_payment(&order.id, method, order.grand_total)
                .await?;
        }

        println!(
            "  {}  {:<10} {:>10}",
            order.ticket_number,
            order.customer_id,
            shop.format_money(order.grand_total)
        );
        created += 1;
    }

    println!("✓ Created {} orders", created);

    // -------------------------------------------------------------------------
    // Cash up
    // -------------------------------------------------------------------------

    let takings = db
        .payments()
        .takings_between(day_start, Utc::now() + Duration::minutes(1))
        .await?;

    let payouts = Money::from_cents(1200);
    let mut input = takings.cash_up_input(shop.default_opening_float, payouts);
    input.actual_cash_counted = takings.cash + shop.default_opening_float - payouts;
    input.actual_card_total = takings.card;

    let summary = reconcile(&input);
    info!(
        cash_variance = %summary.cash_variance,
        card_variance = %summary.card_variance,
        "Demo cash up"
    );

    println!();
    println!("Cash up");
    println!("  Cash takings:     {:>10}", shop.format_money(takings.cash));
    println!("  Card takings:     {:>10}", shop.format_money(takings.card));
    println!("  Opening float:    {:>10}", shop.format_money(input.opening_float));
    println!("  Payouts:          {:>10}", shop.format_money(input.total_payouts));
    println!("  Expected in till: {:>10}", shop.format_money(summary.expected_cash_in_till));
    println!(
        "  Cash variance:    {:>10} ({:?})",
        shop.format_money(summary.cash_variance),
        summary.cash_status
    );

    db.close().await;
    println!();
    println!("✓ Done");

    Ok(())
}

/// Builds a deterministic demo order from its index.
fn demo_draft(n: usize, services: &[Service]) -> OrderDraft {
    let line_count = 1 + n % 3;
    let mut draft = OrderDraft::new(format!("cust-{:03}", n % 7 + 1));

    for line in 0..line_count {
        let service = &services[(n * 5 + line * 3) % services.len()];
        let quantity = 1 + ((n + line) % 4) as i64;
        let mut item = LineItemDraft::from_service(service, quantity);
        item.color = Some(COLORS[(n + line) % COLORS.len()].to_string());

        if line == 0 && n % 4 == 1 {
            item = item.with_discount_percentage(Decimal::TEN);
        }
        draft = draft.with_item(item);
    }

    draft.is_express = n % 5 == 0;
    draft.due_date = Some((Utc::now() + Duration::days(if draft.is_express { 1 } else { 3 })).date_naive());

    if n % 6 == 2 {
        draft = draft.with_adjustments(CartAdjustments {
            cart_discount_amount: Some(Money::from_cents(200)),
            ..CartAdjustments::default()
        });
    }

    draft
}
