//! # Service Repository
//!
//! The shop's price list: "Shirt - Wash & Press", "Suit - 2 Piece",
//! "Duvet - King" and so on.
//!
//! Order lines copy a service's name and price when the order is taken,
//! so editing the catalog never changes an existing ticket.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::stored_cents;
use crate::error::{DbError, DbResult};
use pressline_core::validation::{validate_service_name, validate_unit_price};
use pressline_core::{CoreError, Money, Service};

/// Row shape of the `services` table.
#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    category: String,
    price_cents: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id,
            name: row.name,
            category: row.category,
            price: Money::from_cents(row.price_cents),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_SERVICE: &str = r#"
    SELECT id, name, category, price_cents, is_active, created_at, updated_at
    FROM services
"#;

/// Repository for service catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ServiceRepository::new(pool);
///
/// let service = repo.create("Shirt - Wash & Press", "Laundry", Money::from_cents(450)).await?;
/// let found = repo.search_by_name("shirt", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Validates and inserts a new active service.
    ///
    /// The returned service carries the price as stored, rounded to cents.
    pub async fn create(&self, name: &str, category: &str, price: Money) -> DbResult<Service> {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            price: price.round_to_cents(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.insert(&service).await?;
        Ok(service)
    }

    /// Inserts a service as given (seeding, imports).
    ///
    /// The price is stored rounded to cents.
    pub async fn insert(&self, service: &Service) -> DbResult<()> {
        validate_service_name(&service.name).map_err(CoreError::from)?;
        validate_unit_price(service.price).map_err(CoreError::from)?;
        let price_cents = stored_cents("price", service.price)?;

        debug!(id = %service.id, name = %service.name, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, category, price_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.category)
        .bind(price_cents)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a service by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Service))` - Service found (active or not)
    /// * `Ok(None)` - Service not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        let sql = format!("{SELECT_SERVICE} WHERE id = ?1");
        let row: Option<ServiceRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Service::from))
    }

    /// Lists active services sorted by category then name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Service>> {
        let sql = format!("{SELECT_SERVICE} WHERE is_active = 1 ORDER BY category, name LIMIT ?1");
        let rows: Vec<ServiceRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    /// Case-insensitive substring search over active service names.
    ///
    /// An empty query lists active services.
    pub async fn search_by_name(&self, query: &str, limit: u32) -> DbResult<Vec<Service>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching services");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            "{SELECT_SERVICE} WHERE is_active = 1 AND name LIKE ?1 ESCAPE '\\' ORDER BY name LIMIT ?2"
        );
        let rows: Vec<ServiceRow> = sqlx::query_as(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned services");
        Ok(rows.into_iter().map(Service::from).collect())
    }

    /// Changes a service's price. Existing orders keep their snapshot.
    pub async fn update_price(&self, id: &str, price: Money) -> DbResult<()> {
        validate_unit_price(price).map_err(CoreError::from)?;
        let price_cents = stored_cents("price", price)?;

        let result = sqlx::query("UPDATE services SET price_cents = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(price_cents)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Hides or re-shows a service at the counter.
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE services SET is_active = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(is_active)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Counts all services, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally in LIKE.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use pressline_core::ValidationError;
    use rust_decimal::Decimal;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = db().await;
        let repo = db.services();

        let created = repo
            .create("Shirt - Wash & Press", "Laundry", Money::from_cents(450))
            .await
            .unwrap();
        let found = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(found.name, "Shirt - Wash & Press");
        assert_eq!(found.price, Money::from_cents(450));
        assert!(found.is_active);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_returns_price_as_stored() {
        let db = db().await;
        let repo = db.services();

        let created = repo
            .create("Tie", "Dry Clean", Money::from_decimal(Decimal::new(4505, 3)))
            .await
            .unwrap();
        let found = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(created.price, Money::from_cents(451));
        assert_eq!(created.price, found.price);
    }

    #[tokio::test]
    async fn test_price_too_large_for_cents_rejected() {
        let db = db().await;
        let err = db
            .services()
            .create("Rug - Persian", "Household", Money::from_decimal(Decimal::MAX))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidInput(ValidationError::TooLarge { .. }))
        ));
        assert_eq!(db.services().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_is_unique_violation() {
        let db = db().await;
        let repo = db.services();
        let created = repo
            .create("Jacket", "Dry Clean", Money::from_cents(950))
            .await
            .unwrap();

        let err = repo.insert(&created).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, .. } if field == "services.id"
        ));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = db().await;
        assert!(db.services().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_negative_price() {
        let db = db().await;
        let err = db
            .services()
            .create("Tie", "Dry Clean", Money::from_cents(-100))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_rejects_blank_name() {
        let db = db().await;
        let err = db
            .services()
            .create("   ", "Dry Clean", Money::from_cents(100))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_skips_inactive() {
        let db = db().await;
        let repo = db.services();

        repo.create("Shirt - Wash & Press", "Laundry", Money::from_cents(450))
            .await
            .unwrap();
        let silk = repo
            .create("Silk Shirt - Dry Clean", "Dry Clean", Money::from_cents(900))
            .await
            .unwrap();
        repo.create("Duvet - King", "Bedding", Money::from_cents(2500))
            .await
            .unwrap();

        assert_eq!(repo.search_by_name("SHIRT", 10).await.unwrap().len(), 2);

        repo.set_active(&silk.id, false).await.unwrap();
        let results = repo.search_by_name("shirt", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Shirt - Wash & Press");

        assert_eq!(repo.search_by_name("", 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = db().await;
        let repo = db.services();

        repo.create("Curtains 100% wool", "Household", Money::from_cents(3000))
            .await
            .unwrap();
        repo.create("Curtains cotton", "Household", Money::from_cents(2000))
            .await
            .unwrap();

        let results = repo.search_by_name("100%", 10).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_update_price() {
        let db = db().await;
        let repo = db.services();

        let service = repo
            .create("Trousers", "Dry Clean", Money::from_cents(600))
            .await
            .unwrap();
        repo.update_price(&service.id, Money::from_cents(650))
            .await
            .unwrap();

        let found = repo.get_by_id(&service.id).await.unwrap().unwrap();
        assert_eq!(found.price, Money::from_cents(650));

        assert!(matches!(
            repo.update_price("missing", Money::from_cents(1)).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
