//! # Order Repository
//!
//! Database operations for orders (tickets) and their lines.
//!
//! ## Order Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create_order()                                    │
//! │                                                                         │
//! │  Counter screen                                                        │
//! │     └── price_order(draft) → shows totals, submits draft + totals      │
//! │                                                                         │
//! │  price_order(draft)               ← same pressline-core function       │
//! │  verify_totals(submitted)         ← reject if the screen disagrees     │
//! │  money → INTEGER cents            ← reject values that do not fit      │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │     ├── bump ticket_sequences     ← YYMMDD-NNNN, takes the write lock  │
//! │     ├── check every service_id exists and is active                   │
//! │     ├── INSERT orders                                                  │
//! │     └── INSERT order_items (one per line, in order)                    │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any error → ROLLBACK (transaction dropped), nothing is written        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Lifecycle
//! ```text
//! received ──► in_progress ──► ready ──► collected
//!     │             │            │
//!     └─────────────┴────────────┴──► cancelled
//! ```

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::stored_cents;
use crate::error::{DbError, DbResult};
use pressline_core::pricing::{price_order, verify_totals};
use pressline_core::{
    CoreError, Money, Order, OrderDraft, OrderItem, OrderStatus, OrderTotals, PricedLineItem,
    PricedOrder,
};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    ticket_number: String,
    customer_id: String,
    status: OrderStatus,
    subtotal_cents: i64,
    cart_discount_percentage: Option<String>,
    cart_discount_amount_cents: Option<i64>,
    cart_price_override_cents: Option<i64>,
    grand_total_cents: i64,
    due_date: Option<NaiveDate>,
    is_express: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        Ok(Order {
            cart_discount_percentage: parse_percentage(
                "orders.cart_discount_percentage",
                row.cart_discount_percentage,
            )?,
            id: row.id,
            ticket_number: row.ticket_number,
            customer_id: row.customer_id,
            status: row.status,
            subtotal: Money::from_cents(row.subtotal_cents),
            cart_discount_amount: row.cart_discount_amount_cents.map(Money::from_cents),
            cart_price_override: row.cart_price_override_cents.map(Money::from_cents),
            grand_total: Money::from_cents(row.grand_total_cents),
            due_date: row.due_date,
            is_express: row.is_express,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    service_id: String,
    service_name: String,
    unit_price_cents: i64,
    quantity: i64,
    item_discount_percentage: Option<String>,
    item_discount_amount_cents: Option<i64>,
    line_total_cents: i64,
    notes: Option<String>,
    color: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = DbError;

    fn try_from(row: OrderItemRow) -> DbResult<Self> {
        Ok(OrderItem {
            item_discount_percentage: parse_percentage(
                "order_items.item_discount_percentage",
                row.item_discount_percentage,
            )?,
            id: row.id,
            order_id: row.order_id,
            service_id: row.service_id,
            service_name: row.service_name,
            unit_price: Money::from_cents(row.unit_price_cents),
            quantity: row.quantity,
            item_discount_amount: row.item_discount_amount_cents.map(Money::from_cents),
            line_total: Money::from_cents(row.line_total_cents),
            notes: row.notes,
            color: row.color,
            created_at: row.created_at,
        })
    }
}

fn parse_percentage(column: &str, raw: Option<String>) -> DbResult<Option<Decimal>> {
    raw.map(|value| Decimal::from_str(&value).map_err(|_| DbError::corrupt(column, value)))
        .transpose()
}

const SELECT_ORDER: &str = r#"
    SELECT
        id, ticket_number, customer_id, status,
        subtotal_cents, cart_discount_percentage, cart_discount_amount_cents,
        cart_price_override_cents, grand_total_cents,
        due_date, is_express, notes, created_at, updated_at
    FROM orders
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Prices and stores a new order in one transaction.
    ///
    /// ## Arguments
    /// * `draft` - What the counter entered
    /// * `submitted` - Totals the counter showed the customer, if any.
    ///   When given, they must match the recomputed totals to within
    ///   `tolerance` (after rounding to cents) or nothing is written.
    /// * `tolerance` - Usually `ShopConfig::totals_tolerance`
    ///
    /// ## Errors
    /// * `DbError::Core(InvalidInput | EmptyOrder)` - draft out of domain,
    ///   or an amount too large to store as cents
    /// * `DbError::Core(TotalsMismatch)` - submitted totals disagree
    /// * `DbError::Core(ServiceNotFound)` - a line names an unknown or
    ///   deactivated service
    pub async fn create_order(
        &self,
        draft: &OrderDraft,
        submitted: Option<&OrderTotals>,
        tolerance: Money,
    ) -> DbResult<Order> {
        let priced = price_order(draft)?;

        if let Some(submitted) = submitted {
            if let Err(err) = verify_totals(&priced, submitted, tolerance) {
                warn!(
                    customer_id = %draft.customer_id,
                    error = %err,
                    "Rejecting order: submitted totals do not match"
                );
                return Err(err.into());
            }
        }

        let adjustments = &priced.adjustments;
        let subtotal_cents = stored_cents("subtotal", priced.subtotal)?;
        let grand_total_cents = stored_cents("grand_total", priced.grand_total)?;
        let cart_discount_amount_cents = adjustments
            .cart_discount_amount
            .map(|amount| stored_cents("cart_discount_amount", amount))
            .transpose()?;
        let cart_price_override_cents = adjustments
            .cart_price_override
            .map(|amount| stored_cents("cart_price_override", amount))
            .transpose()?;
        let lines = priced
            .items
            .iter()
            .map(LineCents::new)
            .collect::<DbResult<Vec<_>>>()?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Must stay the first statement: it takes the write lock.
        let ticket_number = next_ticket_number(&mut tx, now).await?;
        ensure_services_exist(&mut tx, &priced).await?;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            ticket_number,
            customer_id: priced.customer_id.clone(),
            status: OrderStatus::Received,
            subtotal: Money::from_cents(subtotal_cents),
            cart_discount_percentage: adjustments.cart_discount_percentage,
            cart_discount_amount: adjustments.cart_discount_amount,
            cart_price_override: adjustments.cart_price_override,
            grand_total: Money::from_cents(grand_total_cents),
            due_date: priced.due_date,
            is_express: priced.is_express,
            notes: priced.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %order.id, ticket_number = %order.ticket_number, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, ticket_number, customer_id, status,
                subtotal_cents, cart_discount_percentage, cart_discount_amount_cents,
                cart_price_override_cents, grand_total_cents,
                due_date, is_express, notes, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9,
                ?10, ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.ticket_number)
        .bind(&order.customer_id)
        .bind(order.status)
        .bind(subtotal_cents)
        .bind(order.cart_discount_percentage.map(|pct| pct.to_string()))
        .bind(cart_discount_amount_cents)
        .bind(cart_price_override_cents)
        .bind(grand_total_cents)
        .bind(order.due_date)
        .bind(order.is_express)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (line_number, (line, cents)) in priced.items.iter().zip(&lines).enumerate() {
            let item = &line.item;
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, service_id, line_number,
                    service_name, unit_price_cents, quantity,
                    item_discount_percentage, item_discount_amount_cents,
                    line_total_cents, notes, color, created_at
                ) VALUES (
                    ?1, ?2, ?3, ?4,
                    ?5, ?6, ?7,
                    ?8, ?9,
                    ?10, ?11, ?12, ?13
                )
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order.id)
            .bind(&item.service_id)
            .bind(line_number as i64)
            .bind(&item.service_name)
            .bind(cents.unit_price)
            .bind(item.quantity)
            .bind(item.item_discount_percentage.map(|pct| pct.to_string()))
            .bind(cents.item_discount_amount)
            .bind(cents.line_total)
            .bind(&item.notes)
            .bind(&item.color)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %order.id,
            ticket_number = %order.ticket_number,
            items = priced.items.len(),
            grand_total = %order.grand_total,
            "Order created"
        );

        Ok(order)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE id = ?1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Gets an order by the number printed on the customer's ticket.
    pub async fn get_by_ticket_number(&self, ticket_number: &str) -> DbResult<Option<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE ticket_number = ?1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(ticket_number)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Gets the lines of an order, in the order they were entered.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, order_id, service_id, service_name,
                unit_price_cents, quantity,
                item_discount_percentage, item_discount_amount_cents,
                line_total_cents, notes, color, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY line_number
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderItem::try_from).collect()
    }

    /// Moves an order to a new status.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no such order
    /// * `DbError::Core(InvalidStatusTransition)` - e.g. collected → ready
    /// * `DbError::TransactionFailed` - the status changed underneath us
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("{SELECT_ORDER} WHERE id = ?1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut order = match row {
            Some(row) => Order::try_from(row)?,
            None => return Err(DbError::not_found("Order", id)),
        };

        if !order.status.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                order_id: id.to_string(),
                from: order.status,
                to: next,
            }
            .into());
        }

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE orders SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        )
        .bind(id)
        .bind(order.status)
        .bind(next)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::TransactionFailed(format!(
                "order {id} changed status concurrently"
            )));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, from = order.status.as_str(), to = next.as_str(), "Order status changed");

        order.status = next;
        order.updated_at = now;
        Ok(order)
    }

    /// Lists orders in a given status, oldest first (the work queue).
    pub async fn list_by_status(&self, status: OrderStatus, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE status = ?1 ORDER BY created_at, ticket_number LIMIT ?2");
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(status)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_for_customer(&self, customer_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!(
            "{SELECT_ORDER} WHERE customer_id = ?1 ORDER BY created_at DESC, ticket_number DESC LIMIT ?2"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(customer_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// A priced line's money columns, converted before the transaction opens.
struct LineCents {
    unit_price: i64,
    item_discount_amount: Option<i64>,
    line_total: i64,
}

impl LineCents {
    fn new(line: &PricedLineItem) -> DbResult<Self> {
        Ok(LineCents {
            unit_price: stored_cents("unit_price", line.item.unit_price)?,
            item_discount_amount: line
                .item
                .item_discount_amount
                .map(|amount| stored_cents("item_discount_amount", amount))
                .transpose()?,
            line_total: stored_cents("line_total", line.line_total)?,
        })
    }
}

/// Every line must name a service that exists and is still on sale.
async fn ensure_services_exist(
    tx: &mut Transaction<'_, Sqlite>,
    priced: &PricedOrder,
) -> DbResult<()> {
    let service_ids: BTreeSet<&str> = priced
        .items
        .iter()
        .map(|line| line.item.service_id.as_str())
        .collect();

    for service_id in service_ids {
        let exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM services WHERE id = ?1 AND is_active = 1",
        )
            .bind(service_id)
            .fetch_one(&mut **tx)
            .await?;

        if exists == 0 {
            return Err(CoreError::ServiceNotFound(service_id.to_string()).into());
        }
    }

    Ok(())
}

/// Next ticket number for the day of `now`: `YYMMDD-NNNN`, counting from 0001.
///
/// Bumps the day's row in `ticket_sequences`. Run first in the
/// transaction, this write makes concurrent callers wait on SQLite's lock
/// (up to the busy timeout) rather than fail.
async fn next_ticket_number(
    tx: &mut Transaction<'_, Sqlite>,
    now: DateTime<Utc>,
) -> DbResult<String> {
    let prefix = now.format("%y%m%d").to_string();

    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO ticket_sequences (day, last_sequence) VALUES (?1, 1)
        ON CONFLICT (day) DO UPDATE SET last_sequence = last_sequence + 1
        RETURNING last_sequence
        "#,
    )
    .bind(&prefix)
    .fetch_one(&mut **tx)
    .await?;

    Ok(format_ticket_number(&prefix, sequence))
}

fn format_ticket_number(prefix: &str, sequence: i64) -> String {
    format!("{prefix}-{sequence:04}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pressline_core::{CartAdjustments, LineItemDraft, Service, ValidationError};

    struct Fixture {
        db: Database,
        shirt: Service,
        suit: Service,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shirt = db
            .services()
            .create("Shirt - Wash & Press", "Laundry", Money::from_cents(1000))
            .await
            .unwrap();
        let suit = db
            .services()
            .create("Suit - 2 Piece", "Dry Clean", Money::from_cents(1500))
            .await
            .unwrap();
        Fixture { db, shirt, suit }
    }

    fn draft(f: &Fixture) -> OrderDraft {
        OrderDraft::new("cust-42")
            .with_item(
                LineItemDraft::from_service(&f.shirt, 2).with_discount_percentage(Decimal::TEN),
            )
            .with_item(LineItemDraft::from_service(&f.suit, 1))
    }

    #[tokio::test]
    async fn test_create_order_persists_priced_values() {
        let f = fixture().await;
        let order = f
            .db
            .orders()
            .create_order(&draft(&f), None, Money::zero())
            .await
            .unwrap();

        // 2 × 10.00 − 10% = 18.00, plus 15.00
        assert_eq!(order.subtotal, Money::from_cents(3300));
        assert_eq!(order.grand_total, Money::from_cents(3300));
        assert_eq!(order.status, OrderStatus::Received);

        let stored = f.db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.grand_total, Money::from_cents(3300));
        assert_eq!(stored.ticket_number, order.ticket_number);

        let items = f.db.orders().get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].service_name, "Shirt - Wash & Press");
        assert_eq!(items[0].line_total, Money::from_cents(1800));
        assert_eq!(items[0].item_discount_percentage, Some(Decimal::TEN));
        assert_eq!(items[1].line_total, Money::from_cents(1500));
    }

    #[tokio::test]
    async fn test_cart_adjustments_round_trip() {
        let f = fixture().await;
        let draft = draft(&f).with_adjustments(CartAdjustments {
            cart_discount_percentage: Some(Decimal::new(125, 1)), // 12.5%
            cart_discount_amount: Some(Money::from_cents(100)),
            cart_price_override: None,
        });

        let order = f
            .db
            .orders()
            .create_order(&draft, None, Money::zero())
            .await
            .unwrap();
        let stored = f.db.orders().get_by_id(&order.id).await.unwrap().unwrap();

        // 33.00 × 0.875 = 28.875, − 1.00 = 27.875 → 27.88
        assert_eq!(stored.grand_total, Money::from_cents(2788));
        assert_eq!(stored.cart_discount_percentage, Some(Decimal::new(125, 1)));
        assert_eq!(stored.cart_discount_amount, Some(Money::from_cents(100)));
        assert_eq!(stored.cart_price_override, None);
    }

    #[tokio::test]
    async fn test_matching_submitted_totals_accepted() {
        let f = fixture().await;
        let d = draft(&f);
        let totals = price_order(&d).unwrap().totals();

        let order = f
            .db
            .orders()
            .create_order(&d, Some(&totals), Money::zero())
            .await
            .unwrap();
        assert_eq!(order.grand_total, totals.grand_total);
    }

    #[tokio::test]
    async fn test_mismatched_totals_rejected_and_nothing_written() {
        let f = fixture().await;
        let d = draft(&f);
        let totals = OrderTotals {
            subtotal: Money::from_cents(3300),
            grand_total: Money::from_cents(3000),
        };

        let err = f
            .db
            .orders()
            .create_order(&d, Some(&totals), Money::from_cents(1))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::TotalsMismatch { ref field, .. }) if field == "grand_total"
        ));
        assert!(f
            .db
            .orders()
            .list_for_customer("cust-42", 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_rejected() {
        let f = fixture().await;
        let mut d = draft(&f);
        d.items[1].quantity = 0;

        let err = f
            .db
            .orders()
            .create_order(&d, None, Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InvalidInput(_))));

        let empty = OrderDraft::new("cust-42");
        let err = f
            .db
            .orders()
            .create_order(&empty, None, Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::EmptyOrder)));
    }

    #[tokio::test]
    async fn test_unknown_service_rejected() {
        let f = fixture().await;
        let mut d = draft(&f);
        d.items[0].service_id = "svc-gone".to_string();

        let err = f
            .db
            .orders()
            .create_order(&d, None, Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::ServiceNotFound(ref id)) if id == "svc-gone"
        ));
    }

    #[tokio::test]
    async fn test_deactivated_service_rejected() {
        let f = fixture().await;
        f.db.services().set_active(&f.shirt.id, false).await.unwrap();

        let err = f
            .db
            .orders()
            .create_order(&draft(&f), None, Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::ServiceNotFound(ref id)) if id == &f.shirt.id
        ));
    }

    #[tokio::test]
    async fn test_amount_too_large_for_cents_rejected_and_nothing_written() {
        let f = fixture().await;
        let mut d = draft(&f);
        // 10^17 dollars is 10^19 cents, past i64::MAX
        d.items[1].unit_price = Money::from_decimal(Decimal::from(100_000_000_000_000_000i64));

        let err = f
            .db
            .orders()
            .create_order(&d, None, Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidInput(ValidationError::TooLarge { .. }))
        ));
        assert!(f
            .db
            .orders()
            .list_for_customer("cust-42", 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_get_distinct_tickets() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("orders.db")))
            .await
            .unwrap();
        let shirt = db
            .services()
            .create("Shirt - Wash & Press", "Laundry", Money::from_cents(1000))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for n in 0..8 {
            let repo = db.orders();
            let draft = OrderDraft::new(format!("cust-{n}"))
                .with_item(LineItemDraft::from_service(&shirt, 1));
            handles.push(tokio::spawn(async move {
                repo.create_order(&draft, None, Money::zero()).await
            }));
        }

        let mut tickets = BTreeSet::new();
        for handle in handles {
            let order = handle.await.unwrap().unwrap();
            tickets.insert(order.ticket_number);
        }
        assert_eq!(tickets.len(), 8);

        db.close().await;
    }

    #[tokio::test]
    async fn test_ticket_numbers_increase_within_day() {
        let f = fixture().await;
        let repo = f.db.orders();

        let first = repo.create_order(&draft(&f), None, Money::zero()).await.unwrap();
        let second = repo.create_order(&draft(&f), None, Money::zero()).await.unwrap();

        let prefix = Utc::now().format("%y%m%d").to_string();
        // A test straddling midnight UTC would see a new prefix.
        if first.ticket_number.starts_with(&prefix) && second.ticket_number.starts_with(&prefix) {
            assert_eq!(first.ticket_number, format!("{prefix}-0001"));
            assert_eq!(second.ticket_number, format!("{prefix}-0002"));
        }

        let found = repo
            .get_by_ticket_number(&second.ticket_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, second.id);
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let f = fixture().await;
        let repo = f.db.orders();
        let order = repo.create_order(&draft(&f), None, Money::zero()).await.unwrap();

        let order = repo.update_status(&order.id, OrderStatus::InProgress).await.unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);

        let err = repo
            .update_status(&order.id, OrderStatus::Collected)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidStatusTransition { .. })
        ));

        repo.update_status(&order.id, OrderStatus::Ready).await.unwrap();
        repo.update_status(&order.id, OrderStatus::Collected).await.unwrap();

        let stored = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Collected);

        let err = repo
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidStatusTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_status_missing_order() {
        let f = fixture().await;
        let err = f
            .db
            .orders()
            .update_status("missing", OrderStatus::Ready)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let f = fixture().await;
        let repo = f.db.orders();
        let a = repo.create_order(&draft(&f), None, Money::zero()).await.unwrap();
        let b = repo.create_order(&draft(&f), None, Money::zero()).await.unwrap();
        repo.update_status(&b.id, OrderStatus::Cancelled).await.unwrap();

        let received = repo.list_by_status(OrderStatus::Received, 10).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].id, a.id);

        let cancelled = repo.list_by_status(OrderStatus::Cancelled, 10).await.unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, b.id);
    }

    #[test]
    fn test_format_ticket_number() {
        assert_eq!(format_ticket_number("261019", 7), "261019-0007");
        assert_eq!(format_ticket_number("261019", 12345), "261019-12345");
    }

    #[test]
    fn test_parse_percentage_rejects_garbage() {
        assert_eq!(
            parse_percentage("col", Some("12.5".to_string())).unwrap(),
            Some(Decimal::new(125, 1))
        );
        assert!(parse_percentage("col", None).unwrap().is_none());
        assert!(matches!(
            parse_percentage("col", Some("ten".to_string())),
            Err(DbError::CorruptValue { .. })
        ));
    }
}
