//! # pressline-core: Pure Business Logic for Pressline
//!
//! This crate is the **heart** of Pressline. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pressline Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Counter / Back Office UI                     │   │
//! │  │    New Order ──► Ticket ──► Payment ──► Cash Up                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderDraft                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pressline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  cashup   │  │   │
//! │  │   │OrderDraft │  │   Money   │  │ line/cart │  │ variance  │  │   │
//! │  │   │PricedOrder│  │ (Decimal) │  │  totals   │  │   float   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ PricedOrder                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pressline-db (Database Layer)                   │   │
//! │  │   re-prices inside the write transaction with the same module   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (OrderDraft, PricedOrder, Service, Order, ...)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`pricing`] - Line, subtotal and cart-level pricing
//! - [`cashup`] - End-of-day till reconciliation
//! - [`config`] - Explicit shop configuration
//! - [`error`] - Domain error types
//! - [`validation`] - Input domain checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Money**: Decimal arithmetic, rounded to cents only for display/storage
//! 4. **Explicit Errors**: Out-of-domain input is rejected, never clamped
//!
//! ## Example Usage
//!
//! ```rust
//! use pressline_core::{price_order, CartAdjustments, LineItemDraft, Money, OrderDraft};
//! use rust_decimal::Decimal;
//!
//! let shirt = LineItemDraft {
//!     service_id: "svc-shirt".into(),
//!     service_name: "Shirt - Wash & Press".into(),
//!     unit_price: Money::from_cents(1000),
//!     quantity: 2,
//!     item_discount_percentage: Some(Decimal::TEN),
//!     item_discount_amount: None,
//!     notes: None,
//!     color: Some("white".into()),
//! };
//!
//! let draft = OrderDraft::new("cust-1")
//!     .with_item(shirt)
//!     .with_adjustments(CartAdjustments {
//!         cart_price_override: Some(Money::from_cents(1500)),
//!         ..Default::default()
//!     });
//!
//! let priced = price_order(&draft).unwrap();
//! assert_eq!(priced.subtotal, Money::from_cents(1800));
//! assert_eq!(priced.grand_total, Money::from_cents(1500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cashup;
pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cashup::{reconcile, CashUpInput, CashUpSummary, Payout, VarianceStatus};
pub use config::ShopConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{
    checked_subtotal, compute_grand_total, compute_subtotal, price_line_item, price_order,
    verify_totals,
};
pub use types::*;
