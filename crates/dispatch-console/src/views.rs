//! Console views: what each screen fetches and derives on every refresh

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};
use dispatch_client::{ApiResult, ConsoleApi};
use dispatch_model::{
    DeliveryPartner, Order, Package, Product, ServiceType, SessionUser, Vendor, VendorId,
    VendorStats,
};
use dispatch_stats::{
    active_orders, order_board, recent_transactions, summarize_earnings, summarize_orders,
    summarize_partners, summarize_vendors, EarningsSummary, EarningsWindow, OrderBoard,
    OrderStats, PartnerStats, Transaction, VendorSummary, ACTIVE_ORDERS_SHOWN,
    RECENT_TRANSACTIONS,
};
use dispatch_sync::Refresh;
use serde::Serialize;
use std::sync::Arc;

/// Backend handle shared by every view
pub type SharedApi = Arc<dyn ConsoleApi>;

/// Source of "now" for date-windowed views
pub type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Local wall-clock time
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(|| Local::now().fixed_offset())
}

/// Platform orders with their counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdersPage {
    /// Bucket counts and revenue
    pub stats: OrderStats,
    /// Orders as the backend listed them
    pub orders: Vec<Order>,
}

/// All platform orders
pub struct AdminOrders {
    api: SharedApi,
}

impl AdminOrders {
    /// View over `api`
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Refresh for AdminOrders {
    type Output = OrdersPage;

    fn name(&self) -> &str {
        "admin-orders"
    }

    async fn refresh(&self) -> ApiResult<OrdersPage> {
        let orders = self.api.list_orders(None).await?;
        Ok(OrdersPage {
            stats: summarize_orders(&orders),
            orders,
        })
    }
}

/// Vendor list with platform-wide figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorsPage {
    /// Figures over every vendor, regardless of the search
    pub summary: VendorSummary,
    /// Vendors matching the search
    pub vendors: Vec<Vendor>,
}

/// Admin vendor management
pub struct AdminVendors {
    api: SharedApi,
    search: Option<String>,
}

impl AdminVendors {
    /// View over `api`, optionally filtered by name or cuisine
    pub fn new(api: SharedApi, search: Option<String>) -> Self {
        Self {
            api,
            search: search.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[async_trait]
impl Refresh for AdminVendors {
    type Output = VendorsPage;

    fn name(&self) -> &str {
        "admin-vendors"
    }

    async fn refresh(&self) -> ApiResult<VendorsPage> {
        let all = self.api.list_vendors().await?;
        let summary = summarize_vendors(&all);
        let vendors = match &self.search {
            Some(needle) => all.into_iter().filter(|v| v.matches(needle)).collect(),
            None => all,
        };
        Ok(VendorsPage { summary, vendors })
    }
}

/// Delivery fleet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnersPage {
    /// Availability counts
    pub stats: PartnerStats,
    /// Every partner
    pub partners: Vec<DeliveryPartner>,
}

/// Delivery fleet, shown in both portals
pub struct Partners {
    api: SharedApi,
}

impl Partners {
    /// View over `api`
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Refresh for Partners {
    type Output = PartnersPage;

    fn name(&self) -> &str {
        "partners"
    }

    async fn refresh(&self) -> ApiResult<PartnersPage> {
        let partners = self.api.list_partners().await?;
        Ok(PartnersPage {
            stats: summarize_partners(&partners),
            partners,
        })
    }
}

/// Platform overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminDashboardPage {
    /// Order figures
    pub orders: OrderStats,
    /// Vendor figures
    pub vendors: VendorSummary,
    /// Fleet figures
    pub partners: PartnerStats,
    /// Open orders, oldest listed first
    pub active_orders: Vec<Order>,
}

/// Admin landing view
pub struct AdminDashboard {
    api: SharedApi,
}

impl AdminDashboard {
    /// View over `api`
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Refresh for AdminDashboard {
    type Output = AdminDashboardPage;

    fn name(&self) -> &str {
        "admin-dashboard"
    }

    async fn refresh(&self) -> ApiResult<AdminDashboardPage> {
        let (orders, vendors, partners) = futures::try_join!(
            self.api.list_orders(None),
            self.api.list_vendors(),
            self.api.list_partners(),
        )?;
        Ok(AdminDashboardPage {
            orders: summarize_orders(&orders),
            vendors: summarize_vendors(&vendors),
            partners: summarize_partners(&partners),
            active_orders: active_orders(&orders, ACTIVE_ORDERS_SHOWN),
        })
    }
}

/// Vendor landing view, shaped by the vendor's service type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "service_type", rename_all = "snake_case")]
pub enum VendorDashboardPage {
    /// Restaurants: figures and the orders needing attention
    Food {
        /// Backend-computed figures
        stats: VendorStats,
        /// First open orders
        active_orders: Vec<Order>,
    },
    /// Logistics: the package market
    Logistics {
        /// Packages waiting for pickup
        available: Vec<Package>,
        /// Packages on the move
        active: Vec<Package>,
    },
}

/// Vendor landing view
pub struct VendorDashboard {
    api: SharedApi,
    vendor: VendorId,
    service_type: ServiceType,
}

impl VendorDashboard {
    /// View for the signed-in vendor `user`
    pub fn new(api: SharedApi, user: &SessionUser) -> Self {
        Self {
            api,
            vendor: user.vendor_scope(),
            service_type: user.service_type,
        }
    }
}

#[async_trait]
impl Refresh for VendorDashboard {
    type Output = VendorDashboardPage;

    fn name(&self) -> &str {
        "vendor-dashboard"
    }

    async fn refresh(&self) -> ApiResult<VendorDashboardPage> {
        match self.service_type {
            ServiceType::Food => {
                let (stats, orders) = futures::try_join!(
                    self.api.vendor_stats(&self.vendor),
                    self.api.list_orders(Some(&self.vendor)),
                )?;
                Ok(VendorDashboardPage::Food {
                    stats,
                    active_orders: active_orders(&orders, ACTIVE_ORDERS_SHOWN),
                })
            }
            ServiceType::Logistics => {
                let (available, active) = futures::try_join!(
                    self.api.available_packages(),
                    self.api.active_packages(),
                )?;
                Ok(VendorDashboardPage::Logistics { available, active })
            }
        }
    }
}

/// Vendor kitchen board
pub struct KitchenBoard {
    api: SharedApi,
    vendor: VendorId,
}

impl KitchenBoard {
    /// Board for `vendor`
    pub fn new(api: SharedApi, vendor: VendorId) -> Self {
        Self { api, vendor }
    }
}

#[async_trait]
impl Refresh for KitchenBoard {
    type Output = OrderBoard;

    fn name(&self) -> &str {
        "kitchen-board"
    }

    async fn refresh(&self) -> ApiResult<OrderBoard> {
        let orders = self.api.list_orders(Some(&self.vendor)).await?;
        Ok(order_board(&orders))
    }
}

/// Vendor earnings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsPage {
    /// Windowed totals
    pub summary: EarningsSummary,
    /// Latest delivered orders
    pub transactions: Vec<Transaction>,
}

/// Vendor earnings view
pub struct Earnings {
    api: SharedApi,
    vendor: VendorId,
    clock: Clock,
}

impl Earnings {
    /// Earnings of `vendor`, windows relative to `clock`
    pub fn new(api: SharedApi, vendor: VendorId, clock: Clock) -> Self {
        Self { api, vendor, clock }
    }
}

#[async_trait]
impl Refresh for Earnings {
    type Output = EarningsPage;

    fn name(&self) -> &str {
        "earnings"
    }

    async fn refresh(&self) -> ApiResult<EarningsPage> {
        let orders = self.api.list_orders(Some(&self.vendor)).await?;
        let window = EarningsWindow::at(&(self.clock)());
        Ok(EarningsPage {
            summary: summarize_earnings(&orders, &window),
            transactions: recent_transactions(&orders, RECENT_TRANSACTIONS),
        })
    }
}

/// Vendor catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    /// Products, in backend order
    pub products: Vec<Product>,
}

/// Vendor catalog view
pub struct Catalog {
    api: SharedApi,
    vendor: VendorId,
}

impl Catalog {
    /// Catalog of `vendor`
    pub fn new(api: SharedApi, vendor: VendorId) -> Self {
        Self { api, vendor }
    }
}

#[async_trait]
impl Refresh for Catalog {
    type Output = CatalogPage;

    fn name(&self) -> &str {
        "catalog"
    }

    async fn refresh(&self) -> ApiResult<CatalogPage> {
        Ok(CatalogPage {
            products: self.api.list_products(&self.vendor).await?,
        })
    }
}
