//! Plain-text and JSON rendering of console pages

use crate::actions::Advanced;
use crate::error::ConsoleResult;
use crate::session::SessionContext;
use crate::views::{
    AdminDashboardPage, CatalogPage, EarningsPage, OrdersPage, PartnersPage, VendorDashboardPage,
    VendorsPage,
};
use dispatch_model::{Numeric, Order, Package};
use dispatch_stats::{fixed, OrderBoard};
use dispatch_sync::Snapshot;
use serde::Serialize;
use std::fmt::Write;

/// How a page is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// A page with a plain-text form
pub trait Render {
    /// Text shown in the terminal
    fn render_text(&self) -> String;
}

/// Render `page` in `format`
///
/// # Errors
/// JSON encoding failure.
pub fn render<P: Render + Serialize + ?Sized>(page: &P, format: OutputFormat) -> ConsoleResult<String> {
    match format {
        OutputFormat::Text => Ok(page.render_text()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(page)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Render a polled view, noting a failed refresh under the last good data
///
/// # Errors
/// JSON encoding failure.
pub fn render_snapshot<P: Render + Serialize>(
    snapshot: &Snapshot<P>,
    format: OutputFormat,
) -> ConsoleResult<String> {
    let mut out = match &snapshot.data {
        Some(page) => render(page.as_ref(), format)?,
        None if snapshot.last_error.is_some() => String::new(),
        None => "Loading...\n".to_string(),
    };
    if let Some(err) = &snapshot.last_error {
        let _ = writeln!(
            out,
            "! refresh failed ({} in a row): {err}",
            snapshot.consecutive_failures
        );
    }
    Ok(out)
}

fn money(amount: &Numeric) -> String {
    fixed(amount.or_zero(), 2)
}

fn when(order: &Order) -> String {
    order
        .created_at
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
}

fn order_line(out: &mut String, order: &Order) {
    let _ = writeln!(
        out,
        "  #{:<8}  {:<18}  {:>10}  {:<16}  {}",
        order.id.short(8),
        order.customer_label(),
        money(&order.total_amount),
        order.status.label(),
        when(order),
    );
}

fn package_line(out: &mut String, package: &Package) {
    let _ = writeln!(
        out,
        "  {:<10}  {} -> {}  {:>8}  {:<12}  {}",
        package.id.short(8),
        package.pickup_area(),
        package.dropoff_area(),
        money(&package.price),
        package.status,
        package.partner_label(),
    );
}

impl Render for OrdersPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Orders ===");
        let _ = writeln!(
            out,
            "Total: {}  Pending: {}  Completed: {}  Revenue: {}",
            self.stats.total, self.stats.pending, self.stats.completed, self.stats.revenue
        );
        let _ = writeln!(out);
        if self.orders.is_empty() {
            let _ = writeln!(out, "  No orders found");
        }
        for order in &self.orders {
            order_line(&mut out, order);
        }
        out
    }
}

impl Render for VendorsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Vendors ===");
        let _ = writeln!(
            out,
            "Total: {}  Active: {}  Pending: {}  Avg rating: {}",
            self.summary.total, self.summary.active, self.summary.pending, self.summary.avg_rating
        );
        let _ = writeln!(out);
        if self.vendors.is_empty() {
            let _ = writeln!(out, "  No vendors found");
        }
        for vendor in &self.vendors {
            let _ = writeln!(
                out,
                "  {:<12}  {:<24}  {:<14}  {:<10}  {}",
                vendor.id.short(12),
                vendor.business_name,
                vendor.cuisine_type.as_deref().unwrap_or("-"),
                vendor.status.label(),
                vendor.rating_label(),
            );
        }
        out
    }
}

impl Render for PartnersPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Delivery Partners ===");
        let _ = writeln!(
            out,
            "Total: {}  Online: {}  Busy: {}  Offline: {}",
            self.stats.total, self.stats.online, self.stats.busy, self.stats.offline
        );
        let _ = writeln!(out);
        if self.partners.is_empty() {
            let _ = writeln!(out, "  No partners found");
        }
        for partner in &self.partners {
            let _ = writeln!(
                out,
                "  {:<20}  {:<14}  {:<8}  {}",
                partner.name,
                partner.phone.as_deref().unwrap_or("-"),
                partner.status,
                partner.current_order.as_deref().unwrap_or("-"),
            );
        }
        out
    }
}

impl Render for AdminDashboardPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Platform Dashboard ===");
        let _ = writeln!(
            out,
            "Orders    total {}  pending {}  completed {}  revenue {}",
            self.orders.total, self.orders.pending, self.orders.completed, self.orders.revenue
        );
        let _ = writeln!(
            out,
            "Vendors   total {}  active {}  pending {}  avg rating {}",
            self.vendors.total, self.vendors.active, self.vendors.pending, self.vendors.avg_rating
        );
        let _ = writeln!(
            out,
            "Partners  total {}  online {}  busy {}  offline {}",
            self.partners.total, self.partners.online, self.partners.busy, self.partners.offline
        );
        let _ = writeln!(out, "\nActive orders:");
        if self.active_orders.is_empty() {
            let _ = writeln!(out, "  None");
        }
        for order in &self.active_orders {
            order_line(&mut out, order);
        }
        out
    }
}

impl Render for VendorDashboardPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Food {
                stats,
                active_orders,
            } => {
                let _ = writeln!(out, "=== Dashboard ===");
                let _ = writeln!(
                    out,
                    "Today's earnings: {}  Orders to fulfill: {}  Rating: {}  Active products: {}",
                    money(&stats.today_earnings),
                    stats.orders_to_fulfill,
                    fixed(stats.rating.or_zero(), 1),
                    stats.active_products,
                );
                let _ = writeln!(out, "\nActive orders:");
                if active_orders.is_empty() {
                    let _ = writeln!(out, "  No active orders");
                }
                for order in active_orders {
                    order_line(&mut out, order);
                }
            }
            Self::Logistics { available, active } => {
                let _ = writeln!(out, "=== Logistics Dashboard ===");
                let _ = writeln!(out, "Available packages ({}):", available.len());
                for package in available {
                    package_line(&mut out, package);
                }
                let _ = writeln!(out, "\nActive deliveries ({}):", active.len());
                for package in active {
                    package_line(&mut out, package);
                }
            }
        }
        out
    }
}

impl Render for OrderBoard {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Kitchen ===");
        for column in &self.columns {
            let _ = writeln!(
                out,
                "\n{} ({})  next: {}",
                column.label,
                column.orders.len(),
                column.next.label()
            );
            for order in &column.orders {
                order_line(&mut out, order);
            }
        }
        out
    }
}

impl Render for EarningsPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Earnings ===");
        let _ = writeln!(
            out,
            "Total: {}  This week: {}  This month: {}  Pending: {}",
            self.summary.total, self.summary.this_week, self.summary.this_month, self.summary.pending
        );
        let _ = writeln!(out, "\nRecent transactions:");
        if self.transactions.is_empty() {
            let _ = writeln!(out, "  No transactions yet");
        }
        for tx in &self.transactions {
            let date = tx
                .date
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
            let _ = writeln!(
                out,
                "  {date:<10}  {:<40}  {:>10}  {}",
                tx.description,
                fixed(tx.amount, 2),
                tx.status
            );
        }
        out
    }
}

impl Render for CatalogPage {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Catalog ({} products) ===", self.products.len());
        for product in &self.products {
            let _ = writeln!(
                out,
                "  {:<12}  {:<24}  {:<14}  {:>8}",
                product.id.short(12),
                product.name,
                product.category,
                money(&product.price),
            );
        }
        out
    }
}

impl Render for SessionContext {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.user.display_name(), self.user.role);
        let _ = writeln!(out, "Portal:    {}", self.portal.name());
        if self.user.vendor_id.is_some() {
            let _ = writeln!(out, "Vendor:    {}", self.vendor_scope());
            let _ = writeln!(out, "Service:   {}", self.user.service_type);
        }
        let _ = writeln!(
            out,
            "Signed in: {}",
            self.signed_in_at.format("%Y-%m-%d %H:%M UTC")
        );
        out
    }
}

impl Render for Advanced {
    fn render_text(&self) -> String {
        format!("Order moved from {} to {}\n", self.from.label(), self.to.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_client::ApiError;
    use dispatch_stats::{order_board, summarize_orders};
    use dispatch_test_utils::fixtures::order;
    use std::sync::Arc;

    fn page() -> OrdersPage {
        let orders = vec![
            order("a1b2c3d4e5", "v-1", "10.00", "delivered"),
            order("b", "v-1", "5.5", "out_for_delivery"),
        ];
        OrdersPage {
            stats: summarize_orders(&orders),
            orders,
        }
    }

    #[test]
    fn orders_text_has_figures_and_rows() {
        let text = page().render_text();
        assert!(text.contains("Total: 2  Pending: 0  Completed: 1  Revenue: 10.00"));
        assert!(text.contains("#a1b2c3d4"));
        assert!(text.contains("out for delivery"));
        assert!(text.contains("Guest User"));
    }

    #[test]
    fn json_uses_wire_names() {
        let json = render(&page(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stats"]["revenue"], "10.00");
        assert_eq!(value["orders"][1]["status"], "out_for_delivery");
    }

    #[test]
    fn board_lists_next_step_per_column() {
        let board = order_board(&[order("o-1", "v", "1", "preparing")]);
        let text = board.render_text();
        assert!(text.contains("Preparation (1)  next: ready"));
        assert!(text.contains("Ready (0)  next: out for delivery"));
    }

    #[test]
    fn failed_refresh_keeps_data_and_warns() {
        let snapshot = Snapshot {
            data: Some(Arc::new(page())),
            last_error: Some(ApiError::RequestFailed {
                path: "/orders".into(),
                status: Some(502),
                message: "Bad gateway".into(),
            }),
            consecutive_failures: 2,
            ..Snapshot::default()
        };

        let text = render_snapshot(&snapshot, OutputFormat::Text).unwrap();
        assert!(text.contains("Revenue: 10.00"));
        assert!(text.contains("! refresh failed (2 in a row)"));
    }

    #[test]
    fn empty_snapshot_is_loading() {
        let snapshot: Snapshot<OrdersPage> = Snapshot::default();
        assert_eq!(
            render_snapshot(&snapshot, OutputFormat::Text).unwrap(),
            "Loading...\n"
        );
    }
}
