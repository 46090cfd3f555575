//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use golden_fig_core::CustomerId;

/// Magento customer tokens are valid for 1 hour by default.
const TOKEN_LIFETIME_SECONDS: i64 = 60 * 60;

/// Session-stored customer identity.
///
/// Carries the Magento customer token used for wishlist and account calls.
/// Implements `Debug` manually so the token never reaches logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Magento customer ID.
    pub id: CustomerId,
    /// Customer's email address.
    pub email: String,
    /// Customer's first name, for display.
    pub first_name: Option<String>,
    /// Magento customer token.
    token: String,
    /// Unix timestamp when the token was obtained.
    obtained_at: i64,
}

impl CurrentCustomer {
    /// Create a new session customer with a freshly obtained token.
    #[must_use]
    pub fn new(id: CustomerId, email: String, first_name: Option<String>, token: String) -> Self {
        Self {
            id,
            email,
            first_name,
            token,
            obtained_at: chrono::Utc::now().timestamp(),
        }
    }

    /// The Magento customer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the token has outlived Magento's default lifetime.
    ///
    /// An expired token means the customer must log in again; Magento does
    /// not offer a refresh flow for customer tokens.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() - self.obtained_at >= TOKEN_LIFETIME_SECONDS
    }

    /// Name shown in the header ("Hi, Ada" or the email local part).
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().map_or_else(
            || self.email.split('@').next().unwrap_or(&self.email),
            |name| name,
        )
    }
}

impl std::fmt::Debug for CurrentCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentCustomer")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("token", &"[REDACTED]")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Session keys for storefront session data.
pub mod session_keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for the flash notification queue.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> CurrentCustomer {
        CurrentCustomer::new(
            CustomerId::new(7),
            "ada@example.com".to_string(),
            Some("Ada".to_string()),
            "token-value".to_string(),
        )
    }

    #[test]
    fn test_fresh_token_not_expired() {
        assert!(!customer().is_expired());
    }

    #[test]
    fn test_display_name_prefers_first_name() {
        assert_eq!(customer().display_name(), "Ada");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        let mut c = customer();
        c.first_name = None;
        assert_eq!(c.display_name(), "ada");
    }

    #[test]
    fn test_debug_redacts_token() {
        let output = format!("{:?}", customer());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("token-value"));
    }
}
