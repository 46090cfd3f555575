//! Golden Fig Storefront library.
//!
//! A server-rendered headless storefront over a Magento GraphQL backend.
//! Axum handlers render Askama templates; HTMX swaps fragments for the
//! interactive pieces (the wishlist button, the wishlist count badge).
//!
//! Magento is the source of truth for catalog and wishlist state - there is
//! no local database. Sessions are held in memory and carry the customer's
//! Magento token plus flash notifications.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod magento;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod routes;
pub mod state;
pub mod wishlist;
