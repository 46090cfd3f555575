//! Authentication route handlers.
//!
//! Login exchanges credentials for a Magento customer token, fetches the
//! customer record, and stores both in the session. Logout revokes the token
//! (best effort) and destroys the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Query parameters for error display on the login page.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub customer_name: Option<String>,
    pub notifications: Vec<crate::notifications::Notification>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        customer_name: None,
        notifications: vec![],
    }
}

/// Handle login form submission.
///
/// Authenticates via the Magento `generateCustomerToken` mutation, then
/// fetches the customer record with the new token.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state
        .magento()
        .generate_customer_token(&form.email, &form.password)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    let customer = match state.magento().get_customer(&token).await {
        Ok(customer) => customer,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch customer after login");
            return Redirect::to("/auth/login?error=customer_fetch").into_response();
        }
    };

    let current_customer =
        CurrentCustomer::new(customer.id, customer.email, customer.firstname, token);

    if let Err(e) = set_current_customer(&session, &current_customer).await {
        tracing::error!(error = %e, "Failed to set session");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&current_customer.id, Some(&current_customer.email));

    Redirect::to("/").into_response()
}

/// Handle logout.
///
/// Revokes the Magento token (best effort), clears the session, and drops
/// the cached wishlist snapshot.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(customer)) = session
        .get::<CurrentCustomer>(crate::models::session_keys::CURRENT_CUSTOMER)
        .await
    {
        if let Err(e) = state.magento().revoke_customer_token(customer.token()).await {
            tracing::warn!(error = %e, "Failed to revoke Magento customer token");
        }
        state.wishlist().forget(customer.id).await;
    }

    if let Err(e) = clear_current_customer(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session");
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}
