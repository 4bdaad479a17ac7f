use dispatch_client::{ApiClient, ApiConfig, ApiError, ConsoleApi};
use dispatch_model::{
    Credentials, OrderId, OrderStatus, ProductDraft, Role, ServiceType, VendorId, VendorStatus,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warp::http::StatusCode;
use warp::Filter;

type Captured = Arc<Mutex<Vec<(String, Value)>>>;

fn spawn_backend() -> (SocketAddr, Captured) {
    let captured: Captured = Arc::default();

    let orders = warp::get()
        .and(warp::path("orders"))
        .and(warp::path::end())
        .and(warp::query::<HashMap<String, String>>())
        .map(|query: HashMap<String, String>| {
            let vendor = query.get("vendorId").cloned().unwrap_or_else(|| "v-1".into());
            warp::reply::json(&json!({
                "status": "success",
                "data": [
                    {"id": "o-1", "vendor_id": vendor, "total_amount": "10.00", "status": "delivered"},
                    {"id": "o-2", "vendor_id": vendor, "total_amount": 5.5, "status": "pending"}
                ]
            }))
        });

    let vendors = warp::get()
        .and(warp::path("vendors"))
        .and(warp::path::end())
        .map(|| {
            warp::reply::with_status(
                warp::reply::json(&json!({"error": "Failed to fetch data"})),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        });

    let partners = warp::get()
        .and(warp::path("partners"))
        .map(|| warp::reply::json(&json!({"status": "error", "error": "db down"})));

    let packages = warp::get()
        .and(warp::path!("packages" / "available"))
        .map(|| "<html>maintenance</html>");

    let stats = warp::get()
        .and(warp::path!("vendor" / String / "stats"))
        .map(|_id: String| {
            warp::reply::json(&json!({
                "status": "success",
                "data": {"todayEarnings": "120.50", "ordersToFulfill": 3, "rating": 4.5, "activeProducts": 12}
            }))
        });

    let patch_log = captured.clone();
    let patch = warp::patch()
        .and(warp::path::full())
        .and(warp::body::json())
        .map(move |path: warp::path::FullPath, body: Value| {
            patch_log
                .lock()
                .unwrap()
                .push((path.as_str().to_string(), body));
            warp::reply::json(&json!({"status": "success"}))
        });

    let login = warp::post()
        .and(warp::path!("auth" / "login"))
        .and(warp::body::json())
        .map(|body: Value| {
            if body["password"] == "secret" {
                warp::reply::with_status(
                    warp::reply::json(&json!({
                        "user": {"id": "u-1", "role": "super_admin", "email": "ops@example.com"}
                    })),
                    StatusCode::OK,
                )
            } else {
                warp::reply::with_status(
                    warp::reply::json(&json!({"error": "Invalid credentials"})),
                    StatusCode::UNAUTHORIZED,
                )
            }
        });

    let login_otp = warp::post()
        .and(warp::path!("auth" / "login-otp"))
        .map(|| {
            warp::reply::json(&json!({
                "status": "success",
                "data": {"user": {"id": "u-2", "role": "vendor_admin", "vendor_id": "v-9"}}
            }))
        });

    let routes = orders
        .or(vendors)
        .or(partners)
        .or(packages)
        .or(stats)
        .or(patch)
        .or(login)
        .or(login_otp);

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, captured)
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(ApiConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(5)))
}

#[tokio::test]
async fn decodes_order_envelope() {
    let (addr, _) = spawn_backend();
    let client = client_for(addr);

    let orders = client.list_orders(None).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].status, OrderStatus::Delivered);
    assert_eq!(orders[1].total_amount.value(), Some(5.5));

    let scoped = client.list_orders(Some(&VendorId::new("v-7"))).await.unwrap();
    assert!(scoped.iter().all(|o| o.vendor_id.as_str() == "v-7"));
}

#[tokio::test]
async fn non_success_status_carries_backend_message() {
    let (addr, _) = spawn_backend();
    let err = client_for(addr).list_vendors().await.unwrap_err();

    assert_eq!(
        err,
        ApiError::RequestFailed {
            path: "/vendors".into(),
            status: Some(500),
            message: "Failed to fetch data".into(),
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn error_envelope_is_request_failed() {
    let (addr, _) = spawn_backend();
    let err = client_for(addr).list_partners().await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::RequestFailed { status: None, ref message, .. } if message == "db down"
    ));
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let (addr, _) = spawn_backend();
    let err = client_for(addr).available_packages().await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse { .. }));
}

#[tokio::test]
async fn unknown_route_reports_status() {
    let (addr, _) = spawn_backend();
    let err = client_for(addr).active_packages().await.unwrap_err();
    assert!(matches!(err.status(), Some(s) if (400..500).contains(&s)));
    assert!(!err.is_network());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn vendor_stats_decode_camel_case() {
    let (addr, _) = spawn_backend();
    let stats = client_for(addr)
        .vendor_stats(&VendorId::new("v-1"))
        .await
        .unwrap();

    assert_eq!(stats.today_earnings.value(), Some(120.5));
    assert_eq!(stats.orders_to_fulfill, 3);
    assert_eq!(stats.active_products, 12);
}

#[tokio::test]
async fn status_changes_send_patch_bodies() {
    let (addr, captured) = spawn_backend();
    let client = client_for(addr);

    client
        .update_order_status(&OrderId::new("o-1"), &OrderStatus::Preparing)
        .await
        .unwrap();
    client
        .update_vendor_status(&VendorId::new("v-3"), &VendorStatus::Active)
        .await
        .unwrap();

    let log = captured.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            ("/orders/o-1".to_string(), json!({"status": "preparing"})),
            ("/vendors/v-3/status".to_string(), json!({"status": "active"})),
        ]
    );
}

#[tokio::test]
async fn path_ids_are_percent_encoded() {
    let (addr, captured) = spawn_backend();
    let client = client_for(addr);

    client
        .update_order_status(&OrderId::new("o#1/x"), &OrderStatus::Ready)
        .await
        .unwrap();
    client
        .update_vendor_status(&VendorId::new("v 3"), &VendorStatus::Active)
        .await
        .unwrap();

    let paths: Vec<String> = captured
        .lock()
        .unwrap()
        .iter()
        .map(|(path, _)| path.clone())
        .collect();
    assert_eq!(paths, vec!["/orders/o%231%2Fx", "/vendors/v%203/status"]);
}

#[tokio::test]
async fn login_reads_user_from_either_location() {
    let (addr, _) = spawn_backend();
    let client = client_for(addr);

    let admin = client
        .login(&Credentials::Password {
            email: "ops@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(admin.role, Role::SuperAdmin);

    let vendor = client
        .login(&Credentials::Otp {
            phone: "9876543210".into(),
            otp: "123456".into(),
        })
        .await
        .unwrap();
    assert_eq!(vendor.vendor_scope().as_str(), "v-9");
}

#[tokio::test]
async fn rejected_login_surfaces_message() {
    let (addr, _) = spawn_backend();
    let err = client_for(addr)
        .login(&Credentials::Password {
            email: "ops@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid credentials"));
}

#[tokio::test]
async fn invalid_draft_is_never_sent() {
    let (addr, _) = spawn_backend();
    let draft = ProductDraft::new(VendorId::new("v-1"), "", 12.0, "Mains");

    let err = client_for(addr).create_product(&draft).await.unwrap_err();
    assert!(matches!(err, ApiError::ValidationRejected(_)));
}

#[tokio::test]
async fn refused_connection_is_network_unavailable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client_for(SocketAddr::from(([127, 0, 0, 1], port)));

    let err = client.list_orders(None).await.unwrap_err();
    assert!(err.is_network());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn vendor_query_is_percent_encoded() {
    let (addr, _) = spawn_backend();
    let odd = VendorId::new("v&1#x y");

    let scoped = client_for(addr).list_orders(Some(&odd)).await.unwrap();
    assert_eq!(scoped.len(), 2);
    assert!(scoped.iter().all(|o| o.vendor_id == odd));
}

fn spawn_sparse_backend() -> SocketAddr {
    let vendors = warp::get().and(warp::path("vendors")).map(|| {
        warp::reply::json(&json!({
            "status": "success",
            "data": [
                {"id": "v-1", "business_name": "Apollo", "status": "active", "service_type": "food"},
                {"id": "v-2", "business_name": "Shipit", "status": null, "service_type": null},
                {"id": "v-3", "business_name": "Corner", "status": "pending", "service_type": "grocery"}
            ]
        }))
    });

    let orders = warp::get().and(warp::path("orders")).map(|| {
        warp::reply::json(&json!({
            "status": "success",
            "data": [
                {"id": "o-1", "total_amount": "10", "status": "delivered"},
                {"id": "o-2", "total_amount": "4", "status": null}
            ]
        }))
    });

    let products = warp::get().and(warp::path("products")).map(|| {
        warp::reply::json(&json!({
            "status": "success",
            "data": [
                {"id": "p-1", "vendor_id": "v-1", "name": "Naan", "price": "40", "category": "Breads"},
                {"id": "p-2", "vendor_id": null, "name": null, "price": null, "category": null}
            ]
        }))
    });

    let login = warp::post().and(warp::path!("auth" / "login")).map(|| {
        warp::reply::json(&json!({
            "user": {"id": "u-5", "role": "vendor_admin", "vendor_id": "v-2", "service_type": null}
        }))
    });

    let (addr, server) = warp::serve(vendors.or(orders).or(products).or(login))
        .bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn null_fields_in_one_record_keep_the_list() {
    let client = client_for(spawn_sparse_backend());

    let vendors = client.list_vendors().await.unwrap();
    assert_eq!(vendors.len(), 3);
    assert_eq!(vendors[1].status, VendorStatus::default());
    assert_eq!(vendors[1].service_type, ServiceType::Food);
    assert_eq!(vendors[2].service_type, ServiceType::Food);

    let orders = client.list_orders(None).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].status, OrderStatus::default());

    let products = client.list_products(&VendorId::new("v-1")).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].category, "Breads");
    assert_eq!(products[1].category, "");
    assert_eq!(products[1].name, "");
    assert_eq!(products[1].price.value(), None);

    let user = client
        .login(&Credentials::Password {
            email: "v@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.service_type, ServiceType::Food);
}
