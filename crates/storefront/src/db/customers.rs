//! Customer ledger repository.
//!
//! The ledger is upserted by email with overwrite semantics for contact
//! fields and additive semantics for the lifetime aggregates. Nothing here
//! ever decrements a total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::{Customer, CustomerContact};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    email: String,
    name: String,
    phone: Option<String>,
    total_purchases: i64,
    total_spent: Decimal,
    last_purchase_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Result<Customer, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Customer {
            id: CustomerId::new(self.id),
            email,
            name: self.name,
            phone: self.phone,
            total_purchases: self.total_purchases,
            total_spent: self.total_spent,
            last_purchase_date: self.last_purchase_date,
            created_at: self.created_at,
        })
    }
}

/// Repository for customer ledger operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by their (normalized) email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, email, name, phone, total_purchases, total_spent, \
                    last_purchase_date, created_at \
             FROM customer \
             WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    /// Record a successful checkout against the ledger.
    ///
    /// Upserts by email: contact fields are overwritten with the latest
    /// values (a missing phone keeps the stored one), while
    /// `total_purchases` and `total_spent` are incremented and
    /// `last_purchase_date` is set to now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn record_purchase(
        &self,
        contact: &CustomerContact,
        quantity: u32,
        amount: Decimal,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "INSERT INTO customer \
                (email, name, phone, total_purchases, total_spent, last_purchase_date) \
             VALUES ($1, $2, $3, $4, $5, now()) \
             ON CONFLICT (email) DO UPDATE SET \
                name = EXCLUDED.name, \
                phone = COALESCE(EXCLUDED.phone, customer.phone), \
                total_purchases = customer.total_purchases + EXCLUDED.total_purchases, \
                total_spent = customer.total_spent + EXCLUDED.total_spent, \
                last_purchase_date = EXCLUDED.last_purchase_date \
             RETURNING id, email, name, phone, total_purchases, total_spent, \
                       last_purchase_date, created_at",
        )
        .bind(contact.email.as_str())
        .bind(&contact.name)
        .bind(contact.phone.as_deref())
        .bind(i64::from(quantity))
        .bind(amount)
        .fetch_one(self.pool)
        .await?;

        row.into_customer()
    }
}
