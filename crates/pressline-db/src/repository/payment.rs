//! # Payment Repository
//!
//! Payments taken against orders, and the day's takings for cash up.
//!
//! ```text
//! payments ──► takings_between(open, close) ──► Takings { cash, card }
//!                                                   │
//!                                                   ▼
//!                          Takings::cash_up_input(opening_float, payouts)
//!                                                   │
//!                                                   ▼
//!                          operator fills in the counted amounts
//!                                                   │
//!                                                   ▼
//!                                    pressline_core::cashup::reconcile
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::stored_cents;
use crate::error::{DbError, DbResult};
use pressline_core::{
    CashUpInput, CoreError, Money, OrderStatus, Payment, PaymentMethod, ValidationError,
};

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: String,
    order_id: String,
    method: PaymentMethod,
    amount_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: row.id,
            order_id: row.order_id,
            method: row.method,
            amount: Money::from_cents(row.amount_cents),
            created_at: row.created_at,
        }
    }
}

/// Recorded takings for a period, split by method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Takings {
    pub cash: Money,
    pub card: Money,
}

impl Takings {
    /// Cash plus card.
    pub fn total(&self) -> Money {
        self.cash + self.card
    }

    /// Starts a cash up from these takings.
    ///
    /// The counted amounts (`actual_cash_counted`, `actual_card_total`)
    /// are left at zero for the operator to fill in.
    pub fn cash_up_input(&self, opening_float: Money, total_payouts: Money) -> CashUpInput {
        CashUpInput {
            system_cash_takings: self.cash,
            system_card_takings: self.card,
            opening_float,
            total_payouts,
            ..CashUpInput::default()
        }
    }
}

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Records a payment against an order.
    ///
    /// ## Errors
    /// * `DbError::Core(InvalidInput)` - amount rounds to zero cents or less,
    ///   or is too large to store
    /// * `DbError::NotFound` - no such order, or the order is cancelled
    pub async fn add_payment(
        &self,
        order_id: &str,
        method: PaymentMethod,
        amount: Money,
    ) -> DbResult<Payment> {
        let amount_cents = stored_cents("amount", amount)?;
        let amount = Money::from_cents(amount_cents);
        if amount_cents <= 0 {
            return Err(CoreError::from(ValidationError::MustBePositive {
                field: "amount".to_string(),
                value: amount_cents,
            })
            .into());
        }

        let status: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await?;
        match status {
            None => return Err(DbError::not_found("Order", order_id)),
            Some(OrderStatus::Cancelled) => {
                return Err(DbError::not_found("Order (not cancelled)", order_id))
            }
            Some(_) => {}
        }

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            method,
            amount,
            created_at: Utc::now(),
        };

        debug!(order_id = %order_id, method = ?method, amount = %amount, "Recording payment");

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, method, amount_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.order_id)
        .bind(payment.method)
        .bind(amount_cents)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Gets all payments for an order, oldest first.
    pub async fn list_for_order(&self, order_id: &str) -> DbResult<Vec<Payment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, method, amount_cents, created_at
            FROM payments
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    /// Sum of payments made against an order.
    pub async fn total_paid(&self, order_id: &str) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE order_id = ?1")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(cents))
    }

    /// Cash and card taken in `[from, to)`.
    pub async fn takings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Takings> {
        let rows: Vec<(PaymentMethod, i64)> = sqlx::query_as(
            r#"
            SELECT method, COALESCE(SUM(amount_cents), 0)
            FROM payments
            WHERE created_at >= ?1 AND created_at < ?2
            GROUP BY method
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut takings = Takings::default();
        for (method, cents) in rows {
            match method {
                PaymentMethod::Cash => takings.cash += Money::from_cents(cents),
                PaymentMethod::Card => takings.card += Money::from_cents(cents),
            }
        }

        info!(
            from = %from,
            to = %to,
            cash = %takings.cash,
            card = %takings.card,
            "Takings computed"
        );

        Ok(takings)
    }
}
