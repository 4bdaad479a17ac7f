//! Typed endpoint surface

use crate::client::{acknowledged, list_data, required_data, resource_path, ApiClient};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use dispatch_model::{
    AuthReply, Credentials, DeliveryPartner, Order, OrderId, OrderStatus, OtpRequest,
    OtpVerification, Package, Product, ProductDraft, ProductId, SessionUser, SignupRequest,
    StatusUpdate, Vendor, VendorId, VendorStats, VendorStatus,
};
use tracing::{info, instrument};

/// Every backend endpoint the console talks to
///
/// Implemented by [`ApiClient`] for the real backend and by in-memory fakes
/// in tests. Payloads are validated before anything is sent.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// `GET /orders`, or `GET /orders?vendorId=<id>` when scoped
    async fn list_orders(&self, vendor: Option<&VendorId>) -> ApiResult<Vec<Order>>;

    /// `PATCH /orders/:id`
    async fn update_order_status(&self, id: &OrderId, status: &OrderStatus) -> ApiResult<()>;

    /// `GET /vendors`
    async fn list_vendors(&self) -> ApiResult<Vec<Vendor>>;

    /// `PATCH /vendors/:id/status`
    async fn update_vendor_status(&self, id: &VendorId, status: &VendorStatus) -> ApiResult<()>;

    /// `DELETE /vendors/:id`
    async fn delete_vendor(&self, id: &VendorId) -> ApiResult<()>;

    /// `GET /vendor/:id/stats`
    async fn vendor_stats(&self, id: &VendorId) -> ApiResult<VendorStats>;

    /// `GET /products?vendorId=<id>`
    async fn list_products(&self, vendor: &VendorId) -> ApiResult<Vec<Product>>;

    /// `POST /products`
    async fn create_product(&self, draft: &ProductDraft) -> ApiResult<()>;

    /// `PUT /products/:id`
    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> ApiResult<()>;

    /// `DELETE /products/:id`
    async fn delete_product(&self, id: &ProductId) -> ApiResult<()>;

    /// `GET /partners`
    async fn list_partners(&self) -> ApiResult<Vec<DeliveryPartner>>;

    /// `GET /packages/available`
    async fn available_packages(&self) -> ApiResult<Vec<Package>>;

    /// `GET /packages/all_active`
    async fn active_packages(&self) -> ApiResult<Vec<Package>>;

    /// `POST /auth/login` or `POST /auth/login-otp`
    async fn login(&self, credentials: &Credentials) -> ApiResult<SessionUser>;

    /// `POST /auth/send-otp`
    async fn send_otp(&self, request: &OtpRequest) -> ApiResult<()>;

    /// `POST /auth/verify-otp`
    async fn verify_otp(&self, request: &OtpVerification) -> ApiResult<()>;

    /// `POST /auth/signup`
    async fn signup(&self, request: &SignupRequest) -> ApiResult<()>;
}

#[async_trait]
impl ConsoleApi for ApiClient {
    #[instrument(skip(self), fields(vendor = ?vendor.map(VendorId::as_str)))]
    async fn list_orders(&self, vendor: Option<&VendorId>) -> ApiResult<Vec<Order>> {
        let body = match vendor {
            Some(id) => self.get_query("/orders", &[("vendorId", id.as_str())]).await?,
            None => self.get("/orders").await?,
        };
        list_data("/orders", body)
    }

    #[instrument(skip(self), fields(order = %id, status = %status))]
    async fn update_order_status(&self, id: &OrderId, status: &OrderStatus) -> ApiResult<()> {
        let path = resource_path(&["orders", id.as_str()]);
        let body = self.patch(&path, &StatusUpdate::new(status.as_str())).await?;
        acknowledged(&path, &body)
    }

    #[instrument(skip(self))]
    async fn list_vendors(&self) -> ApiResult<Vec<Vendor>> {
        list_data("/vendors", self.get("/vendors").await?)
    }

    #[instrument(skip(self), fields(vendor = %id, status = %status))]
    async fn update_vendor_status(&self, id: &VendorId, status: &VendorStatus) -> ApiResult<()> {
        let path = resource_path(&["vendors", id.as_str(), "status"]);
        let body = self.patch(&path, &StatusUpdate::new(status.as_str())).await?;
        acknowledged(&path, &body)
    }

    #[instrument(skip(self), fields(vendor = %id))]
    async fn delete_vendor(&self, id: &VendorId) -> ApiResult<()> {
        let path = resource_path(&["vendors", id.as_str()]);
        let body = self.delete(&path).await?;
        acknowledged(&path, &body)
    }

    #[instrument(skip(self), fields(vendor = %id))]
    async fn vendor_stats(&self, id: &VendorId) -> ApiResult<VendorStats> {
        let path = resource_path(&["vendor", id.as_str(), "stats"]);
        required_data(&path, self.get(&path).await?)
    }

    #[instrument(skip(self), fields(vendor = %vendor))]
    async fn list_products(&self, vendor: &VendorId) -> ApiResult<Vec<Product>> {
        let body = self
            .get_query("/products", &[("vendorId", vendor.as_str())])
            .await?;
        list_data("/products", body)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_product(&self, draft: &ProductDraft) -> ApiResult<()> {
        draft.validate()?;
        let body = self.post("/products", draft).await?;
        acknowledged("/products", &body)
    }

    #[instrument(skip(self, draft), fields(product = %id))]
    async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> ApiResult<()> {
        draft.validate()?;
        let path = resource_path(&["products", id.as_str()]);
        let body = self.put(&path, draft).await?;
        acknowledged(&path, &body)
    }

    #[instrument(skip(self), fields(product = %id))]
    async fn delete_product(&self, id: &ProductId) -> ApiResult<()> {
        let path = resource_path(&["products", id.as_str()]);
        let body = self.delete(&path).await?;
        acknowledged(&path, &body)
    }

    #[instrument(skip(self))]
    async fn list_partners(&self) -> ApiResult<Vec<DeliveryPartner>> {
        list_data("/partners", self.get("/partners").await?)
    }

    #[instrument(skip(self))]
    async fn available_packages(&self) -> ApiResult<Vec<Package>> {
        list_data("/packages/available", self.get("/packages/available").await?)
    }

    #[instrument(skip(self))]
    async fn active_packages(&self) -> ApiResult<Vec<Package>> {
        list_data("/packages/all_active", self.get("/packages/all_active").await?)
    }

    #[instrument(skip_all, fields(endpoint = credentials.endpoint()))]
    async fn login(&self, credentials: &Credentials) -> ApiResult<SessionUser> {
        credentials.validate()?;
        let path = credentials.endpoint();
        let body = self.post(path, credentials).await?;
        acknowledged(path, &body)?;

        let reply: AuthReply =
            serde_json::from_value(body).map_err(|err| ApiError::malformed(path, err))?;
        let user = reply.into_user().ok_or_else(|| ApiError::RequestFailed {
            path: path.to_string(),
            status: None,
            message: "login reply carried no user".to_string(),
        })?;
        info!(user = %user.id, role = %user.role, "authenticated");
        Ok(user)
    }

    #[instrument(skip_all)]
    async fn send_otp(&self, request: &OtpRequest) -> ApiResult<()> {
        let body = self.post("/auth/send-otp", request).await?;
        acknowledged("/auth/send-otp", &body)
    }

    #[instrument(skip_all)]
    async fn verify_otp(&self, request: &OtpVerification) -> ApiResult<()> {
        let body = self.post("/auth/verify-otp", request).await?;
        acknowledged("/auth/verify-otp", &body)
    }

    #[instrument(skip_all, fields(business = %request.business_name))]
    async fn signup(&self, request: &SignupRequest) -> ApiResult<()> {
        request.validate()?;
        let body = self.post("/auth/signup", request).await?;
        acknowledged("/auth/signup", &body)
    }
}
