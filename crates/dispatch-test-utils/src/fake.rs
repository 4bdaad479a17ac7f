//! Scripted in-memory backend

use async_trait::async_trait;
use dispatch_client::{ApiError, ApiResult, ConsoleApi};
use dispatch_model::{
    Credentials, DeliveryPartner, Numeric, Order, OrderId, OrderStatus, OtpRequest,
    OtpVerification, Package, Product, ProductDraft, ProductId, SessionUser, SignupRequest,
    Vendor, VendorId, VendorStats, VendorStatus,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Backend operation, as recorded in the call log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /orders`
    ListOrders,
    /// `PATCH /orders/:id`
    UpdateOrderStatus,
    /// `GET /vendors`
    ListVendors,
    /// `PATCH /vendors/:id/status`
    UpdateVendorStatus,
    /// `DELETE /vendors/:id`
    DeleteVendor,
    /// `GET /vendor/:id/stats`
    VendorStats,
    /// `GET /products`
    ListProducts,
    /// `POST /products`
    CreateProduct,
    /// `PUT /products/:id`
    UpdateProduct,
    /// `DELETE /products/:id`
    DeleteProduct,
    /// `GET /partners`
    ListPartners,
    /// `GET /packages/available`
    AvailablePackages,
    /// `GET /packages/all_active`
    ActivePackages,
    /// `POST /auth/login*`
    Login,
    /// `POST /auth/send-otp`
    SendOtp,
    /// `POST /auth/verify-otp`
    VerifyOtp,
    /// `POST /auth/signup`
    Signup,
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Operation
    pub endpoint: Endpoint,
    /// Record id or scope the call targeted
    pub target: Option<String>,
}

#[derive(Default)]
struct Backend {
    orders: Vec<Order>,
    vendors: Vec<Vendor>,
    products: Vec<Product>,
    partners: Vec<DeliveryPartner>,
    available: Vec<Package>,
    active: Vec<Package>,
    stats: HashMap<VendorId, VendorStats>,
    accounts: Vec<(Credentials, SessionUser)>,
    otp: Option<String>,
    signups: Vec<SignupRequest>,
    failures: HashMap<Endpoint, VecDeque<ApiError>>,
    latency: HashMap<Endpoint, VecDeque<Duration>>,
    calls: Vec<Call>,
    next_product: u32,
}

/// [`ConsoleApi`] backed by in-memory lists
///
/// Mutations change the lists, so a reload after a mutation sees the
/// change. Failures and latency can be queued per endpoint and are
/// consumed one call at a time.
#[derive(Default)]
pub struct FakeApi {
    backend: Mutex<Backend>,
}

impl FakeApi {
    /// Empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed orders
    #[must_use]
    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.backend.lock().orders = orders;
        self
    }

    /// Seed vendors
    #[must_use]
    pub fn with_vendors(self, vendors: Vec<Vendor>) -> Self {
        self.backend.lock().vendors = vendors;
        self
    }

    /// Seed products
    #[must_use]
    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.backend.lock().products = products;
        self
    }

    /// Seed partners
    #[must_use]
    pub fn with_partners(self, partners: Vec<DeliveryPartner>) -> Self {
        self.backend.lock().partners = partners;
        self
    }

    /// Seed available and active packages
    #[must_use]
    pub fn with_packages(self, available: Vec<Package>, active: Vec<Package>) -> Self {
        let mut backend = self.backend.lock();
        backend.available = available;
        backend.active = active;
        drop(backend);
        self
    }

    /// Seed dashboard figures for `vendor`
    #[must_use]
    pub fn with_stats(self, vendor: &str, stats: VendorStats) -> Self {
        self.backend.lock().stats.insert(VendorId::new(vendor), stats);
        self
    }

    /// Accept `credentials` as `user`
    #[must_use]
    pub fn with_account(self, credentials: Credentials, user: SessionUser) -> Self {
        self.backend.lock().accounts.push((credentials, user));
        self
    }

    /// Code the OTP endpoints accept
    #[must_use]
    pub fn with_otp(self, code: &str) -> Self {
        self.backend.lock().otp = Some(code.to_string());
        self
    }

    /// Fail the next call to `endpoint` with `error`
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        self.backend
            .lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Delay the next call to `endpoint`
    pub fn delay_next(&self, endpoint: Endpoint, by: Duration) {
        self.backend
            .lock()
            .latency
            .entry(endpoint)
            .or_default()
            .push_back(by);
    }

    /// Every call so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.backend.lock().calls.clone()
    }

    /// Number of calls made to `endpoint`
    #[must_use]
    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.backend
            .lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Current orders
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.backend.lock().orders.clone()
    }

    /// Current vendors
    #[must_use]
    pub fn vendors(&self) -> Vec<Vendor> {
        self.backend.lock().vendors.clone()
    }

    /// Current products
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.backend.lock().products.clone()
    }

    /// Signup requests received
    #[must_use]
    pub fn signups(&self) -> Vec<SignupRequest> {
        self.backend.lock().signups.clone()
    }

    /// Record the call, then apply queued latency and failure
    async fn enter(&self, endpoint: Endpoint, target: Option<String>) -> ApiResult<()> {
        let (delay, failure) = {
            let mut backend = self.backend.lock();
            backend.calls.push(Call { endpoint, target });
            let delay = backend.latency.get_mut(&endpoint).and_then(VecDeque::pop_front);
            let failure = backend.failures.get_mut(&endpoint).and_then(VecDeque::pop_front);
            (delay, failure)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure.map_or(Ok(()), Err)
    }
}

fn not_found(path: String) -> ApiError {
    ApiError::RequestFailed {
        path,
        status: Some(404),
        message: "Not found".to_string(),
    }
}

#[async_trait]
impl ConsoleApi for FakeApi {
    async fn list_orders(&self, vendor: Option<&VendorId>) -> ApiResult<Vec<Order>> {
        self.enter(Endpoint::ListOrders, vendor.map(ToString::to_string)).await?;
        let backend = self.backend.lock();
        Ok(backend
            .orders
            .iter()
            .filter(|o| vendor.map_or(true, |v| &o.vendor_id == v))
            .cloned()
            .collect())
    }

    async fn update_order_status(&self, id: &OrderId, status: &OrderStatus) -> ApiResult<()> {
        self.enter(Endpoint::UpdateOrderStatus, Some(id.to_string())).await?;
        let mut backend = self.backend.lock();
        let order = backend
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| not_found(format!("/orders/{id}")))?;
        order.status = status.clone();
        Ok(())
    }

    async fn list_vendors(&self) -> ApiResult<Vec<Vendor>> {
        self.enter(Endpoint::ListVendors, None).await?;
        Ok(self.backend.lock().vendors.clone())
    }

    async fn update_vendor_status(&self, id: &VendorId, status: &VendorStatus) -> ApiResult<()> {
        self.enter(Endpoint::UpdateVendorStatus, Some(id.to_string())).await?;
        let mut backend = self.backend.lock();
        let vendor = backend
            .vendors
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| not_found(format!("/vendors/{id}/status")))?;
        vendor.status = status.clone();
        Ok(())
    }

    async fn delete_vendor(&self, id: &VendorId) -> ApiResult<()> {
        self.enter(Endpoint::DeleteVendor, Some(id.to_string())).await?;
        let mut backend = self.backend.lock();
        let before = backend.vendors.len();
        backend.vendors.retain(|v| &v.id != id);
        if backend.vendors.len() == before {
            return Err(not_found(format!("/vendors/{id}")));
        }
        Ok(())
    }

    async fn vendor_stats(&self, id: &VendorId) -> ApiResult<VendorStats> {
        self.enter(Endpoint::VendorStats, Some(id.to_string())).await?;
        Ok(self
            .backend
            .lock()
            .stats
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_products(&self, vendor: &VendorId) -> ApiResult<Vec<Product>> {
        self.enter(Endpoint::ListProducts, Some(vendor.to_string())).await?;
        Ok(self
            .backend
            .lock()
            .products
            .iter()
            .filter(|p| &p.vendor_id == vendor)
            .cloned()
            .collect())
    }

    async fn create_product(&self, draft: &ProductDraft) -> ApiResult<()> {
        draft.validate()?;
        self.enter(Endpoint::CreateProduct, Some(draft.name.clone())).await?;
        let mut backend = self.backend.lock();
        backend.next_product += 1;
        let id = ProductId::new(format!("p-new-{}", backend.next_product));
        backend.products.push(Product {
            id,
            vendor_id: draft.vendor_id.clone(),
            name: draft.name.clone(),
            price: Numeric::from_f64(draft.price),
            category: draft.category.clone(),
            description: Some(draft.description.clone()).filter(|d| !d.is_empty()),
            image_url: Some(draft.image_url.clone()).filter(|u| !u.is_empty()),
        });
        Ok(())
    }

    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> ApiResult<()> {
        draft.validate()?;
        self.enter(Endpoint::UpdateProduct, Some(id.to_string())).await?;
        let mut backend = self.backend.lock();
        let product = backend
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| not_found(format!("/products/{id}")))?;
        product.name.clone_from(&draft.name);
        product.price = Numeric::from_f64(draft.price);
        product.category.clone_from(&draft.category);
        product.description = Some(draft.description.clone()).filter(|d| !d.is_empty());
        product.image_url = Some(draft.image_url.clone()).filter(|u| !u.is_empty());
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> ApiResult<()> {
        self.enter(Endpoint::DeleteProduct, Some(id.to_string())).await?;
        let mut backend = self.backend.lock();
        let before = backend.products.len();
        backend.products.retain(|p| &p.id != id);
        if backend.products.len() == before {
            return Err(not_found(format!("/products/{id}")));
        }
        Ok(())
    }

    async fn list_partners(&self) -> ApiResult<Vec<DeliveryPartner>> {
        self.enter(Endpoint::ListPartners, None).await?;
        Ok(self.backend.lock().partners.clone())
    }

    async fn available_packages(&self) -> ApiResult<Vec<Package>> {
        self.enter(Endpoint::AvailablePackages, None).await?;
        Ok(self.backend.lock().available.clone())
    }

    async fn active_packages(&self) -> ApiResult<Vec<Package>> {
        self.enter(Endpoint::ActivePackages, None).await?;
        Ok(self.backend.lock().active.clone())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<SessionUser> {
        credentials.validate()?;
        self.enter(Endpoint::Login, None).await?;
        self.backend
            .lock()
            .accounts
            .iter()
            .find(|(known, _)| known == credentials)
            .map(|(_, user)| user.clone())
            .ok_or_else(|| ApiError::RequestFailed {
                path: credentials.endpoint().to_string(),
                status: Some(401),
                message: "Invalid credentials".to_string(),
            })
    }

    async fn send_otp(&self, request: &OtpRequest) -> ApiResult<()> {
        self.enter(Endpoint::SendOtp, Some(request.phone.clone())).await
    }

    async fn verify_otp(&self, request: &OtpVerification) -> ApiResult<()> {
        self.enter(Endpoint::VerifyOtp, Some(request.phone.clone())).await?;
        match self.backend.lock().otp.as_deref() {
            Some(code) if code != request.otp => Err(ApiError::RequestFailed {
                path: "/auth/verify-otp".to_string(),
                status: Some(400),
                message: "Invalid OTP".to_string(),
            }),
            _ => Ok(()),
        }
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<()> {
        request.validate()?;
        self.enter(Endpoint::Signup, Some(request.email.clone())).await?;
        self.backend.lock().signups.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{order, vendor};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn mutations_show_up_on_reload() {
        let api = FakeApi::new().with_orders(vec![order("o-1", "v-1", "10", "pending")]);

        api.update_order_status(&OrderId::new("o-1"), &OrderStatus::Preparing)
            .await
            .unwrap();

        let orders = api.list_orders(None).await.unwrap();
        assert_eq!(orders[0].status, OrderStatus::Preparing);
        assert_eq!(api.calls_to(Endpoint::ListOrders), 1);
    }

    #[tokio::test]
    async fn queued_failure_is_consumed_once() {
        let api = FakeApi::new().with_vendors(vec![vendor("v-1", "A", "pending", None)]);
        api.fail_next(
            Endpoint::ListVendors,
            ApiError::NetworkUnavailable {
                path: "/vendors".into(),
                reason: "connection failed".into(),
            },
        );

        assert!(api.list_vendors().await.unwrap_err().is_network());
        assert_eq!(api.list_vendors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scoped_orders_filter_by_vendor() {
        let api = FakeApi::new().with_orders(vec![
            order("o-1", "v-1", "10", "pending"),
            order("o-2", "v-2", "10", "pending"),
        ]);

        let scoped = api.list_orders(Some(&VendorId::new("v-2"))).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(
            api.calls(),
            vec![Call {
                endpoint: Endpoint::ListOrders,
                target: Some("v-2".to_string()),
            }]
        );
    }
}
