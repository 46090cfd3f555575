//! Wishlist route handlers.
//!
//! The wishlist button is an HTMX fragment. Toggling POSTs back the product
//! SKU, the selected variant index, and the quantity; the handler derives a
//! single [`ToggleCommand`] and executes it. Successful mutations return the
//! refreshed fragment with an `HX-Trigger: wishlist-updated` header so the
//! count badge refetches; refused toggles return the fragment plus an
//! out-of-band notification block.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use golden_fig_core::{Quantity, Sku};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalCustomer, RequireCustomer};
use crate::models::{CurrentCustomer, Product};
use crate::notifications::{Notification, flash};
use crate::state::AppState;
use crate::wishlist::{ToggleCommand, WishlistError, WishlistSnapshot, WishlistToggle};

/// Shown when a dispatched mutation fails against the backend.
const UPDATE_FAILED: &str = "Error updating wishlist.";

// =============================================================================
// Form and Query Types
// =============================================================================

/// Parameters the button fragment and toggle posts carry.
#[derive(Debug, Deserialize)]
pub struct ToggleParams {
    pub sku: String,
    /// Index into the product's variant list.
    pub variant: Option<usize>,
    pub quantity: Option<u32>,
}

impl ToggleParams {
    fn sku(&self) -> Result<Sku> {
        Sku::parse(&self.sku).map_err(|e| AppError::BadRequest(format!("Invalid SKU: {e}")))
    }

    fn quantity(&self) -> Result<Quantity> {
        self.quantity.map_or(Ok(Quantity::default()), |q| {
            Quantity::new(q).map_err(|e| AppError::BadRequest(format!("Invalid quantity: {e}")))
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Wishlist button fragment template (for HTMX).
///
/// `notifications` renders as an out-of-band swap into the page's
/// notification area; it is empty on plain rerenders.
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_button.html")]
pub struct WishlistButtonTemplate {
    pub sku: String,
    pub variant: Option<usize>,
    pub quantity: u32,
    pub in_wishlist: bool,
    pub disabled: bool,
    pub notifications: Vec<Notification>,
}

/// Wishlist count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_count.html")]
pub struct WishlistCountTemplate {
    pub count: usize,
}

/// Saved item display data for the wishlist page.
pub struct WishlistItemView {
    pub sku: String,
    pub quantity: u32,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub items: Vec<WishlistItemView>,
    pub customer_name: Option<String>,
    pub notifications: Vec<Notification>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Snapshot for the current shopper: the real wishlist when signed in, the
/// empty default otherwise.
async fn snapshot_for(
    state: &AppState,
    customer: Option<&CurrentCustomer>,
) -> Result<WishlistSnapshot> {
    match customer {
        Some(c) => Ok(state.wishlist().snapshot(c.id, c.token()).await?),
        None => Ok(WishlistSnapshot::default()),
    }
}

fn button_fragment(
    params: &ToggleParams,
    product: &Product,
    snapshot: &WishlistSnapshot,
    signed_in: bool,
    notifications: Vec<Notification>,
) -> WishlistButtonTemplate {
    let toggle = WishlistToggle::new(product, snapshot)
        .with_selection(params.variant)
        .signed_in(signed_in);

    WishlistButtonTemplate {
        sku: product.sku.to_string(),
        variant: params.variant,
        quantity: params.quantity.unwrap_or(1),
        in_wishlist: toggle.is_in_wishlist(),
        disabled: toggle.is_disabled(),
        notifications,
    }
}

// =============================================================================
// Fragment Routes
// =============================================================================

/// Render the wishlist button fragment (HTMX).
#[instrument(skip(state, customer))]
pub async fn button(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
    Query(params): Query<ToggleParams>,
) -> Result<impl IntoResponse> {
    let sku = params.sku()?;
    let product = state.magento().get_product_by_sku(&sku).await?;
    let snapshot = snapshot_for(&state, customer.as_ref()).await?;

    Ok(button_fragment(
        &params,
        &product,
        &snapshot,
        customer.is_some(),
        vec![],
    ))
}

/// Toggle add (HTMX).
#[instrument(skip(state, session, customer))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Form(params): Form<ToggleParams>,
) -> Result<Response> {
    toggle(&state, &session, customer, params, Direction::Add).await
}

/// Toggle remove (HTMX).
#[instrument(skip(state, session, customer))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Form(params): Form<ToggleParams>,
) -> Result<Response> {
    toggle(&state, &session, customer, params, Direction::Remove).await
}

enum Direction {
    Add,
    Remove,
}

async fn toggle(
    state: &AppState,
    session: &Session,
    customer: Option<CurrentCustomer>,
    params: ToggleParams,
    direction: Direction,
) -> Result<Response> {
    let sku = params.sku()?;
    let quantity = params.quantity()?;
    let product = state.magento().get_product_by_sku(&sku).await?;
    let snapshot = snapshot_for(state, customer.as_ref()).await?;

    let derivation = WishlistToggle::new(&product, &snapshot)
        .with_selection(params.variant)
        .with_quantity(quantity)
        .signed_in(customer.is_some());

    let command = match direction {
        Direction::Add => derivation.add(),
        Direction::Remove => derivation.remove(),
    };

    match command {
        ToggleCommand::Ignore => {
            // Mutation already in flight; rerender as-is.
            Ok(button_fragment(&params, &product, &snapshot, customer.is_some(), vec![])
                .into_response())
        }
        ToggleCommand::Notify(notification) => {
            flash::push(session, notification.clone()).await?;
            Ok(button_fragment(
                &params,
                &product,
                &snapshot,
                customer.is_some(),
                vec![notification],
            )
            .into_response())
        }
        ToggleCommand::Add(request) => {
            // A signed-out shopper never derives a dispatch command.
            let customer = customer
                .ok_or_else(|| AppError::Unauthorized("No customer in session".to_string()))?;

            let outcome = state
                .wishlist()
                .add(customer.id, customer.token(), &request)
                .await;
            let notification = match outcome {
                Ok(()) => {
                    Notification::success(format!("{} has been added to your wishlist.", product.name))
                }
                Err(WishlistError::Busy) => {
                    return Ok(button_fragment(
                        &params,
                        &product,
                        &snapshot,
                        true,
                        vec![],
                    )
                    .into_response());
                }
                Err(e) => {
                    tracing::error!(error = %e, "Wishlist add failed");
                    Notification::error(UPDATE_FAILED)
                }
            };

            respond_after_mutation(state, session, &customer, &params, &product, notification).await
        }
        ToggleCommand::Remove(request) => {
            let customer = customer
                .ok_or_else(|| AppError::Unauthorized("No customer in session".to_string()))?;

            let outcome = state
                .wishlist()
                .remove(customer.id, customer.token(), &request)
                .await;
            let notification = match outcome {
                Ok(()) => Notification::success(format!(
                    "{} has been removed from your wishlist.",
                    product.name
                )),
                Err(WishlistError::Busy) => {
                    return Ok(button_fragment(
                        &params,
                        &product,
                        &snapshot,
                        true,
                        vec![],
                    )
                    .into_response());
                }
                Err(e) => {
                    tracing::error!(error = %e, "Wishlist remove failed");
                    Notification::error(UPDATE_FAILED)
                }
            };

            respond_after_mutation(state, session, &customer, &params, &product, notification).await
        }
    }
}

/// Refetch the snapshot, rerender the button, and trigger the count badge.
async fn respond_after_mutation(
    state: &AppState,
    session: &Session,
    customer: &CurrentCustomer,
    params: &ToggleParams,
    product: &Product,
    notification: Notification,
) -> Result<Response> {
    flash::push(session, notification.clone()).await?;

    let snapshot = state.wishlist().snapshot(customer.id, customer.token()).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        button_fragment(params, product, &snapshot, true, vec![notification]),
    )
        .into_response())
}

/// Get the wishlist count badge (HTMX).
#[instrument(skip(state, customer))]
pub async fn count(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<impl IntoResponse> {
    let count = match customer {
        Some(c) => state.wishlist().count(c.id, c.token()).await?,
        None => 0,
    };

    Ok(WishlistCountTemplate { count })
}

// =============================================================================
// Page Routes
// =============================================================================

/// Display the wishlist page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
) -> Result<impl IntoResponse> {
    let snapshot = state
        .wishlist()
        .snapshot(customer.id, customer.token())
        .await?;

    let mut items: Vec<WishlistItemView> = snapshot
        .iter()
        .map(|(sku, entry)| WishlistItemView {
            sku: sku.to_string(),
            quantity: entry.quantity.get(),
        })
        .collect();
    items.sort_by(|a, b| a.sku.cmp(&b.sku));

    Ok(WishlistShowTemplate {
        items,
        customer_name: Some(customer.display_name().to_string()),
        notifications: flash::take(&session).await?,
    })
}
