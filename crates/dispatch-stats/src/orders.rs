//! Order aggregation and the vendor kitchen board

use crate::format::{fixed, sum_amounts};
use dispatch_model::{Order, OrderStatus};
use serde::Serialize;

/// Orders shown in the vendor dashboard's "active orders" panel
pub const ACTIVE_ORDERS_SHOWN: usize = 5;

/// Order figures for the admin orders view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    /// All orders
    pub total: usize,
    /// Orders in `pending`, `confirmed`, `preparing` or `ready`
    pub pending: usize,
    /// Delivered orders
    pub completed: usize,
    /// Delivered revenue, two decimals
    pub revenue: String,
}

impl Default for OrderStats {
    fn default() -> Self {
        summarize_orders(&[])
    }
}

/// Reduce an order list to counts and delivered revenue
///
/// `out_for_delivery` and unrecognised statuses land in neither the
/// pending nor the completed bucket.
#[must_use]
pub fn summarize_orders(orders: &[Order]) -> OrderStats {
    let pending = orders.iter().filter(|o| o.status.is_open()).count();
    let delivered: Vec<&Order> = orders.iter().filter(|o| o.status.is_delivered()).collect();
    let revenue = sum_amounts(delivered.iter().map(|o| &o.total_amount));

    OrderStats {
        total: orders.len(),
        pending,
        completed: delivered.len(),
        revenue: fixed(revenue, 2),
    }
}

/// Orders still needing attention, in backend order, capped at `limit`
#[must_use]
pub fn active_orders(orders: &[Order], limit: usize) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.status.is_open())
        .take(limit)
        .cloned()
        .collect()
}

/// One column of the kitchen board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn {
    /// Column heading
    pub label: &'static str,
    /// Status the column collects
    pub status: OrderStatus,
    /// Status the column's "next" action moves an order to
    pub next: OrderStatus,
    /// Orders currently in this column
    pub orders: Vec<Order>,
}

/// Kitchen board: Pending, Preparation, Ready
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBoard {
    /// Columns left to right
    pub columns: Vec<BoardColumn>,
}

impl OrderBoard {
    /// Column holding orders in `status`, if the board shows it
    #[must_use]
    pub fn column(&self, status: &OrderStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| &c.status == status)
    }

    /// Orders on the board across all columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.orders.len()).sum()
    }

    /// Whether no column holds an order
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const BOARD: [(&str, OrderStatus); 3] = [
    ("Pending", OrderStatus::Pending),
    ("Preparation", OrderStatus::Preparing),
    ("Ready", OrderStatus::Ready),
];

/// Group orders into the kitchen board columns
///
/// Orders in any other status are left off the board.
#[must_use]
pub fn order_board(orders: &[Order]) -> OrderBoard {
    let columns = BOARD
        .into_iter()
        .filter_map(|(label, status)| {
            let next = status.next_step()?;
            let orders = orders
                .iter()
                .filter(|o| o.status == status)
                .cloned()
                .collect();
            Some(BoardColumn {
                label,
                status,
                next,
                orders,
            })
        })
        .collect();

    OrderBoard { columns }
}
