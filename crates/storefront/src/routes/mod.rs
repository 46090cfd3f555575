//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing (home)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /products/{url_key}     - Product detail with variant picker
//!
//! # Wishlist (HTMX fragments)
//! GET  /wishlist               - Wishlist page (requires auth)
//! GET  /wishlist/button        - Wishlist button fragment
//! POST /wishlist/add           - Toggle add (returns button fragment, triggers wishlist-updated)
//! POST /wishlist/remove        - Toggle remove (returns button fragment, triggers wishlist-updated)
//! GET  /wishlist/count         - Wishlist count badge (fragment)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod catalog;
pub mod wishlist;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, wishlist_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{url_key}", get(catalog::show))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/button", get(wishlist::button))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/count", get(wishlist::count))
}

/// Create all routes for the storefront.
///
/// The wishlist and auth groups carry their own rate limits.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .nest("/products", catalog_routes())
        .nest("/wishlist", wishlist_routes().layer(wishlist_rate_limiter()))
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        .route("/health", get(health))
}

/// Health check endpoint.
async fn health() -> StatusCode {
    StatusCode::OK
}
