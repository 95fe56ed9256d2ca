//! # Domain Types
//!
//! Core domain types used throughout Pressline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Pricing input              Pricing output            Stored records    │
//! │  ─────────────              ──────────────            ──────────────    │
//! │  OrderDraft                 PricedOrder               Order             │
//! │  ├── LineItemDraft[]   ──►  ├── PricedLineItem[] ──►  ├── OrderItem[]   │
//! │  └── CartAdjustments        ├── subtotal              └── Payment[]     │
//! │                             └── grand_total                             │
//! │                                                                         │
//! │  Service (catalog)  ──► LineItemDraft::from_service (price snapshot)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Customer ids, notes, colours, due dates and the express flag are opaque
//! to pricing. They ride along from draft to priced order untouched.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Catalog Service
// =============================================================================

/// A cleaning service offered at the counter (e.g. "Suit 2pc - Dry Clean").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Display name shown at the counter and on tickets.
    pub name: String,
    /// Grouping used by the catalog screens ("Dry Cleaning", "Laundry", ...).
    pub category: String,
    /// Current list price per unit.
    pub price: Money,
    /// Whether the service can be sold (soft delete).
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order Draft (pricing input)
// =============================================================================

/// One garment/service entry on an order, before pricing.
///
/// Discount fields are optional. A percentage must lie in `[0, 100]` and a
/// flat amount must be non-negative; pricing rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemDraft {
    /// Catalog service reference (opaque to pricing).
    pub service_id: String,
    /// Service name at time of ordering (frozen).
    pub service_name: String,
    /// Price per unit before discount (frozen).
    pub unit_price: Money,
    /// Number of units, at least 1.
    pub quantity: i64,
    /// Percentage off this line (10 = 10%).
    #[serde(default)]
    pub item_discount_percentage: Option<Decimal>,
    /// Flat amount off this line, applied after the percentage.
    #[serde(default)]
    pub item_discount_amount: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl LineItemDraft {
    /// Creates a line item from a catalog service.
    ///
    /// ## Price Freezing
    /// Name and price are captured at this moment. Later catalog edits do
    /// not change an order already being written.
    pub fn from_service(service: &Service, quantity: i64) -> Self {
        LineItemDraft {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            unit_price: service.price,
            quantity,
            item_discount_percentage: None,
            item_discount_amount: None,
            notes: None,
            color: None,
        }
    }

    /// Sets a percentage discount on this line.
    pub fn with_discount_percentage(mut self, percentage: Decimal) -> Self {
        self.item_discount_percentage = Some(percentage);
        self
    }

    /// Sets a flat discount on this line.
    pub fn with_discount_amount(mut self, amount: Money) -> Self {
        self.item_discount_amount = Some(amount);
        self
    }
}

/// Whole-order adjustments applied after line totals are summed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartAdjustments {
    /// Percentage off the subtotal.
    #[serde(default)]
    pub cart_discount_percentage: Option<Decimal>,
    /// Flat amount off, applied after the percentage.
    #[serde(default)]
    pub cart_discount_amount: Option<Money>,
    /// Absolute replacement for the grand total.
    ///
    /// A negative override is treated as absent.
    #[serde(default)]
    pub cart_price_override: Option<Money>,
}

impl CartAdjustments {
    /// Returns true when no adjustment is set.
    pub fn is_empty(&self) -> bool {
        self.cart_discount_percentage.is_none()
            && self.cart_discount_amount.is_none()
            && self.cart_price_override.is_none()
    }
}

/// An order as captured at the counter, before pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Customer reference (opaque to pricing).
    pub customer_id: String,
    pub items: Vec<LineItemDraft>,
    #[serde(default)]
    pub adjustments: CartAdjustments,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_express: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Creates an empty draft for a customer.
    pub fn new(customer_id: impl Into<String>) -> Self {
        OrderDraft {
            customer_id: customer_id.into(),
            items: Vec::new(),
            adjustments: CartAdjustments::default(),
            due_date: None,
            is_express: false,
            notes: None,
        }
    }

    /// Appends a line item.
    pub fn with_item(mut self, item: LineItemDraft) -> Self {
        self.items.push(item);
        self
    }

    /// Replaces the cart-level adjustments.
    pub fn with_adjustments(mut self, adjustments: CartAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }
}

// =============================================================================
// Priced Order (pricing output)
// =============================================================================

/// A line item enriched with its computed total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLineItem {
    #[serde(flatten)]
    pub item: LineItemDraft,
    /// `max(0, unit_price × quantity − percentage − flat)`, unrounded.
    pub line_total: Money,
}

/// The draft enriched with per-line totals, subtotal and grand total.
///
/// Monetary values are exact. Round with [`PricedOrder::totals`] or
/// [`Money::to_cents`] when displaying or persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOrder {
    pub customer_id: String,
    pub items: Vec<PricedLineItem>,
    pub adjustments: CartAdjustments,
    pub due_date: Option<NaiveDate>,
    pub is_express: bool,
    pub notes: Option<String>,
    /// Sum of line totals, before cart adjustments.
    pub subtotal: Money,
    /// Payable amount after cart adjustments (or the override).
    pub grand_total: Money,
}

impl PricedOrder {
    /// Returns the totals rounded to cents.
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal.round_to_cents(),
            grand_total: self.grand_total.round_to_cents(),
        }
    }

    /// Total discount granted on the order (line and cart level).
    ///
    /// Negative when an override is above the undiscounted amount.
    pub fn discount_total(&self) -> Money {
        let gross: Money = self
            .items
            .iter()
            .map(|line| line.item.unit_price.multiply_quantity(line.item.quantity))
            .sum();
        gross - self.grand_total
    }

    /// Number of garments on the order.
    pub fn piece_count(&self) -> i64 {
        self.items.iter().map(|line| line.item.quantity).sum()
    }
}

/// Order totals as submitted by (or returned to) a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub grand_total: Money,
}

// =============================================================================
// Order Status
// =============================================================================

/// Where a ticket is in the shop.
///
/// ```text
/// Received ──► InProgress ──► Ready ──► Collected
///     │             │           │
///     └─────────────┴───────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Garments taken in at the counter.
    Received,
    /// Being cleaned.
    InProgress,
    /// Waiting for the customer.
    Ready,
    /// Handed back to the customer.
    Collected,
    /// Order voided.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Received
    }
}

impl OrderStatus {
    /// Returns true for states an order never leaves.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Collected | OrderStatus::Cancelled)
    }

    /// Checks whether an order may move from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Received, InProgress) | (InProgress, Ready) | (Ready, Collected) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Stable lowercase name, as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Ready => "ready",
            OrderStatus::Collected => "collected",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash into the till.
    Cash,
    /// Card on the counter terminal.
    Card,
}

// =============================================================================
// Stored Records
// =============================================================================

/// A persisted order (ticket).
///
/// Amounts are the priced values rounded to cents at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-facing ticket number, `YYMMDD-NNNN`.
    pub ticket_number: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub subtotal: Money,
    pub cart_discount_percentage: Option<Decimal>,
    pub cart_discount_amount: Option<Money>,
    pub cart_price_override: Option<Money>,
    pub grand_total: Money,
    pub due_date: Option<NaiveDate>,
    pub is_express: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub service_id: String,
    /// Service name at time of ordering (frozen).
    pub service_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub item_discount_percentage: Option<Decimal>,
    pub item_discount_amount: Option<Money>,
    pub line_total: Money,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A payment towards an order. An order can be paid in several parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
