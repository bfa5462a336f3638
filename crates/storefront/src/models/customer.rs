//! Customer ledger model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clementine_core::{CustomerId, Email};

/// Denormalized per-customer record of lifetime purchase totals.
///
/// Keyed by email. Created implicitly on a customer's first successful
/// checkout, then updated additively on every subsequent one; never deleted
/// or decremented by this service (there is no refund path here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
    pub name: String,
    pub phone: Option<String>,
    /// Sum of quantities across all checkouts.
    pub total_purchases: i64,
    /// Sum of grand totals across all checkouts.
    pub total_spent: Decimal,
    pub last_purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Contact details submitted with a checkout.
///
/// `name` and `email` are required; the email is case-normalized by
/// [`Email::parse`] so that ledger upserts always hit the same row.
#[derive(Debug, Clone)]
pub struct CustomerContact {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
}

/// Error building a [`CustomerContact`] from raw form input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContactError {
    #[error("name is required")]
    MissingName,
    #[error("email is invalid: {0}")]
    InvalidEmail(#[from] clementine_core::EmailError),
}

impl CustomerContact {
    /// Validate raw contact input, trimming whitespace.
    ///
    /// A blank phone is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] if the name is blank or the email does not
    /// parse.
    pub fn parse(name: &str, email: &str, phone: Option<&str>) -> Result<Self, ContactError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactError::MissingName);
        }

        let email = Email::parse(email)?;

        let phone = phone
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);

        Ok(Self {
            name: name.to_string(),
            email,
            phone,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_contact() {
        let contact =
            CustomerContact::parse(" Ada Lovelace ", "Ada@Example.com", Some("555-0100")).unwrap();
        assert_eq!(contact.name, "Ada Lovelace");
        assert_eq!(contact.email.as_str(), "ada@example.com");
        assert_eq!(contact.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_parse_blank_name_rejected() {
        assert!(matches!(
            CustomerContact::parse("   ", "ada@example.com", None),
            Err(ContactError::MissingName)
        ));
    }

    #[test]
    fn test_parse_invalid_email_rejected() {
        assert!(matches!(
            CustomerContact::parse("Ada", "not-an-email", None),
            Err(ContactError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_parse_blank_phone_is_absent() {
        let contact = CustomerContact::parse("Ada", "ada@example.com", Some("  ")).unwrap();
        assert!(contact.phone.is_none());
    }
}
