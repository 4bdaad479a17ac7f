use chrono::{Duration, TimeZone, Utc};
use dispatch_model::{Numeric, Order, OrderId, OrderStatus, UserId, VendorId};
use dispatch_stats::{
    order_board, recent_transactions, summarize_earnings, summarize_orders, EarningsWindow,
};
use proptest::prelude::*;

fn status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Confirmed),
        Just(OrderStatus::Preparing),
        Just(OrderStatus::Ready),
        Just(OrderStatus::OutForDelivery),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Other("cancelled".to_string())),
        Just(OrderStatus::default()),
    ]
}

fn amount() -> impl Strategy<Value = Numeric> {
    prop_oneof![
        (0u32..1_000_000).prop_map(|cents| Numeric::parse(format!("{}.{:02}", cents / 100, cents % 100))),
        Just(Numeric::missing()),
        Just(Numeric::parse("n/a")),
    ]
}

fn order() -> impl Strategy<Value = Order> {
    (0u32..10_000, status(), amount(), proptest::option::of(0i64..60)).prop_map(
        |(n, status, total_amount, days_ago)| Order {
            id: OrderId::new(format!("order-{n}")),
            vendor_id: VendorId::new("v-1"),
            customer_id: UserId::new("c-1"),
            total_amount,
            status,
            created_at: days_ago.map(|d| reference_now() - Duration::days(d)),
            customer_name: None,
        },
    )
}

fn reference_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn buckets_never_exceed_total(orders in proptest::collection::vec(order(), 0..64)) {
        let stats = summarize_orders(&orders);
        prop_assert!(stats.pending + stats.completed <= stats.total);
        prop_assert_eq!(stats.total, orders.len());

        let all_bucketed = orders
            .iter()
            .all(|o| o.status.is_open() || o.status.is_delivered());
        prop_assert_eq!(stats.pending + stats.completed == stats.total, all_bucketed);
    }

    #[test]
    fn revenue_ignores_list_order(
        (orders, shuffled) in proptest::collection::vec(order(), 0..64)
            .prop_flat_map(|orders| (Just(orders.clone()), Just(orders).prop_shuffle())),
    ) {
        prop_assert_eq!(summarize_orders(&orders).revenue, summarize_orders(&shuffled).revenue);
    }

    #[test]
    fn windows_nest_inside_total(orders in proptest::collection::vec(order(), 0..64)) {
        let summary = summarize_earnings(&orders, &EarningsWindow::at(&reference_now()));
        let parse = |s: &str| s.parse::<f64>().unwrap();

        prop_assert!(parse(&summary.this_week) <= parse(&summary.total) + 0.005);
        prop_assert!(parse(&summary.this_month) <= parse(&summary.total) + 0.005);
        prop_assert_eq!(summary.pending, "0.00");
        prop_assert_eq!(&summary.total, &summarize_orders(&orders).revenue);
    }

    #[test]
    fn board_only_holds_board_statuses(orders in proptest::collection::vec(order(), 0..64)) {
        let board = order_board(&orders);
        for column in &board.columns {
            prop_assert!(column.orders.iter().all(|o| o.status == column.status));
        }
    }

    #[test]
    fn transactions_are_sorted_and_capped(
        orders in proptest::collection::vec(order(), 0..64),
        limit in 0usize..16,
    ) {
        let recent = recent_transactions(&orders, limit);
        prop_assert!(recent.len() <= limit);
        prop_assert!(recent.windows(2).all(|w| w[0].date >= w[1].date || w[1].date.is_none()));
    }
}

#[test]
fn empty_inputs_produce_zeroed_figures() {
    let stats = summarize_orders(&[]);
    assert_eq!(stats.revenue, "0.00");
    assert!(order_board(&[]).is_empty());
    assert!(recent_transactions(&[], 10).is_empty());
}
