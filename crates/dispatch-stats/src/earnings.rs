//! Vendor earnings over trailing windows

use crate::format::fixed;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use dispatch_model::{Order, OrderId};
use serde::Serialize;
use std::cmp::Reverse;

/// Delivered orders listed under "recent transactions"
pub const RECENT_TRANSACTIONS: usize = 10;

/// Earnings figures, each formatted to two decimals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    /// All delivered revenue
    pub total: String,
    /// Delivered revenue over the trailing seven days
    pub this_week: String,
    /// Delivered revenue since the first of the month
    pub this_month: String,
    /// Awaiting payout; settled by the backend, always zero here
    pub pending: String,
}

/// Window boundaries, resolved once per refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarningsWindow {
    /// Start of the trailing seven days
    pub week_start: DateTime<Utc>,
    /// Midnight on the first of the current month
    pub month_start: DateTime<Utc>,
}

impl EarningsWindow {
    /// Windows relative to `now`, with the month boundary taken in `now`'s zone
    #[must_use]
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let week_start = now.with_timezone(&Utc) - Duration::days(7);

        let first = now
            .date_naive()
            .with_day(1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_else(|| now.naive_local());
        let month_start = now
            .timezone()
            .from_local_datetime(&first)
            .earliest()
            .map_or_else(|| first.and_utc(), |dt| dt.with_timezone(&Utc));

        Self {
            week_start,
            month_start,
        }
    }
}

/// Sum delivered revenue overall and inside each window
///
/// Orders without a usable `created_at` count toward the total only.
#[must_use]
pub fn summarize_earnings(orders: &[Order], window: &EarningsWindow) -> EarningsSummary {
    let mut total = 0.0;
    let mut week = 0.0;
    let mut month = 0.0;

    for order in orders.iter().filter(|o| o.status.is_delivered()) {
        let amount = order.total_amount.or_zero();
        total += amount;
        if let Some(at) = order.created_at {
            if at >= window.week_start {
                week += amount;
            }
            if at >= window.month_start {
                month += amount;
            }
        }
    }

    EarningsSummary {
        total: fixed(total, 2),
        this_week: fixed(week, 2),
        this_month: fixed(month, 2),
        pending: fixed(0.0, 2),
    }
}

/// A delivered order as listed in the earnings view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Source order
    pub id: OrderId,
    /// When the order was placed
    pub date: Option<DateTime<Utc>>,
    /// `Order #<short id> - <customer>`
    pub description: String,
    /// Order total
    pub amount: f64,
    /// Always `Completed`
    pub status: &'static str,
}

/// Latest delivered orders, newest first
///
/// Orders with no timestamp sort after every dated order.
#[must_use]
pub fn recent_transactions(orders: &[Order], limit: usize) -> Vec<Transaction> {
    let mut delivered: Vec<&Order> = orders.iter().filter(|o| o.status.is_delivered()).collect();
    delivered.sort_by_key(|o| Reverse(o.created_at));

    delivered
        .into_iter()
        .take(limit)
        .map(|o| Transaction {
            id: o.id.clone(),
            date: o.created_at,
            description: format!(
                "Order #{} - {}",
                o.id.short(8),
                o.customer_name.as_deref().unwrap_or("Customer")
            ),
            amount: o.total_amount.or_zero(),
            status: "Completed",
        })
        .collect()
}
