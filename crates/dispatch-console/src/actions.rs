//! Mutation flows
//!
//! Every flow issues one write and then reloads the list it touched, so the
//! caller always renders what the backend now holds.

use crate::confirm::Confirm;
use crate::error::{ConsoleError, ConsoleResult};
use dispatch_client::{ApiError, ConsoleApi};
use dispatch_model::{
    Order, OrderId, OrderStatus, Product, ProductDraft, ProductId, Vendor, VendorId, VendorStatus,
};
use serde::Serialize;
use tracing::{info, instrument};

/// Approve a pending vendor
///
/// # Errors
/// - `NotFound` when the vendor is not in the current list
/// - `InvalidTransition` when the vendor is not pending
/// - `Cancelled` when the operator declines
#[instrument(skip(api, confirm), fields(vendor = %id))]
pub async fn approve_vendor(
    api: &dyn ConsoleApi,
    confirm: &dyn Confirm,
    id: &VendorId,
) -> ConsoleResult<Vec<Vendor>> {
    let vendors = api.list_vendors().await?;
    let vendor = vendors
        .iter()
        .find(|v| &v.id == id)
        .ok_or_else(|| ConsoleError::NotFound {
            kind: "vendor",
            id: id.to_string(),
        })?;

    if !vendor.status.can_approve() {
        return Err(ConsoleError::InvalidTransition {
            kind: "vendor",
            id: id.to_string(),
            action: "approve",
            status: vendor.status.to_string(),
        });
    }
    if !confirm.confirm(&format!("Approve {}?", vendor.business_name)) {
        return Err(ConsoleError::Cancelled);
    }

    api.update_vendor_status(id, &VendorStatus::Active).await?;
    info!("vendor approved");
    Ok(api.list_vendors().await?)
}

/// Delete a vendor after confirmation
///
/// # Errors
/// `Cancelled` when the operator declines, or the backend failure.
#[instrument(skip(api, confirm), fields(vendor = %id))]
pub async fn delete_vendor(
    api: &dyn ConsoleApi,
    confirm: &dyn Confirm,
    id: &VendorId,
) -> ConsoleResult<Vec<Vendor>> {
    if !confirm.confirm(&format!("Delete vendor {id}? This cannot be undone.")) {
        return Err(ConsoleError::Cancelled);
    }
    api.delete_vendor(id).await?;
    info!("vendor deleted");
    Ok(api.list_vendors().await?)
}

/// Result of moving an order one step along the kitchen board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advanced {
    /// Status before the move
    pub from: OrderStatus,
    /// Status requested
    pub to: OrderStatus,
    /// Reloaded order list
    pub orders: Vec<Order>,
}

/// Move an order to its next kitchen status
///
/// # Errors
/// - `NotFound` when the order is not among `vendor`'s orders
/// - `InvalidTransition` when the order's status has no next step
#[instrument(skip(api), fields(order = %id))]
pub async fn advance_order(
    api: &dyn ConsoleApi,
    vendor: &VendorId,
    id: &OrderId,
) -> ConsoleResult<Advanced> {
    let orders = api.list_orders(Some(vendor)).await?;
    let order = orders
        .iter()
        .find(|o| &o.id == id)
        .ok_or_else(|| ConsoleError::NotFound {
            kind: "order",
            id: id.to_string(),
        })?;

    let from = order.status.clone();
    let to = from
        .next_step()
        .ok_or_else(|| ConsoleError::InvalidTransition {
            kind: "order",
            id: id.to_string(),
            action: "advance",
            status: from.to_string(),
        })?;

    api.update_order_status(id, &to).await?;
    info!(%from, %to, "order advanced");
    Ok(Advanced {
        from,
        to,
        orders: api.list_orders(Some(vendor)).await?,
    })
}

/// Field overrides applied to an existing product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    /// New name
    pub name: Option<String>,
    /// New price
    pub price: Option<f64>,
    /// New category
    pub category: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New image URL
    pub image_url: Option<String>,
}

impl ProductPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// `draft` with this patch's fields laid over it
    #[must_use]
    pub fn apply(self, mut draft: ProductDraft) -> ProductDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(image_url) = self.image_url {
            draft.image_url = image_url;
        }
        draft
    }
}

/// Add a product to the draft's vendor catalog
///
/// # Errors
/// `ValidationRejected` for a draft missing a required field, before any
/// request is sent.
#[instrument(skip_all, fields(vendor = %draft.vendor_id))]
pub async fn create_product(
    api: &dyn ConsoleApi,
    draft: &ProductDraft,
) -> ConsoleResult<Vec<Product>> {
    draft.validate().map_err(ApiError::from)?;
    api.create_product(draft).await?;
    info!(name = %draft.name, "product created");
    Ok(api.list_products(&draft.vendor_id).await?)
}

/// Change fields of one of `vendor`'s products
///
/// # Errors
/// - `NotFound` when the product is not in the catalog
/// - `ValidationRejected` when the patched draft is incomplete
#[instrument(skip(api, patch), fields(product = %id))]
pub async fn edit_product(
    api: &dyn ConsoleApi,
    vendor: &VendorId,
    id: &ProductId,
    patch: ProductPatch,
) -> ConsoleResult<Vec<Product>> {
    let products = api.list_products(vendor).await?;
    let product = products
        .iter()
        .find(|p| &p.id == id)
        .ok_or_else(|| ConsoleError::NotFound {
            kind: "product",
            id: id.to_string(),
        })?;

    let draft = patch.apply(ProductDraft::from_product(product));
    draft.validate().map_err(ApiError::from)?;
    api.update_product(id, &draft).await?;
    info!("product updated");
    Ok(api.list_products(vendor).await?)
}

/// Remove a product after confirmation
///
/// # Errors
/// `Cancelled` when the operator declines, or the backend failure.
#[instrument(skip(api, confirm), fields(product = %id))]
pub async fn delete_product(
    api: &dyn ConsoleApi,
    confirm: &dyn Confirm,
    vendor: &VendorId,
    id: &ProductId,
) -> ConsoleResult<Vec<Product>> {
    if !confirm.confirm("Are you sure you want to delete this product?") {
        return Err(ConsoleError::Cancelled);
    }
    api.delete_product(id).await?;
    info!("product deleted");
    Ok(api.list_products(vendor).await?)
}
