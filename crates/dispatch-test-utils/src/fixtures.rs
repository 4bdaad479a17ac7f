//! Record builders with sensible defaults

use chrono::{DateTime, Utc};
use dispatch_model::{
    DeliveryPartner, Numeric, Order, OrderId, OrderStatus, Package, PackageId, PartnerId,
    PartnerStatus, Product, ProductId, Role, ServiceType, SessionUser, UserId, Vendor, VendorId,
    VendorStats, VendorStatus,
};

/// Order owned by `vendor`
pub fn order(id: &str, vendor: &str, amount: &str, status: &str) -> Order {
    Order {
        id: OrderId::new(id),
        vendor_id: VendorId::new(vendor),
        customer_id: UserId::new("customer-1"),
        total_amount: Numeric::parse(amount),
        status: OrderStatus::from(status),
        created_at: None,
        customer_name: None,
    }
}

/// Delivered order placed at `at`
pub fn delivered_at(id: &str, vendor: &str, amount: &str, at: DateTime<Utc>) -> Order {
    Order {
        created_at: Some(at),
        ..order(id, vendor, amount, "delivered")
    }
}

/// Vendor with an optional textual rating
pub fn vendor(id: &str, name: &str, status: &str, rating: Option<&str>) -> Vendor {
    Vendor {
        id: VendorId::new(id),
        business_name: name.to_string(),
        cuisine_type: None,
        logo_url: None,
        status: VendorStatus::from(status),
        rating: rating.map(Numeric::parse),
        description: None,
        user_id: UserId::new(format!("owner-{id}")),
        service_type: ServiceType::Food,
    }
}

/// Catalog product
pub fn product(id: &str, vendor: &str, name: &str, price: &str, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        vendor_id: VendorId::new(vendor),
        name: name.to_string(),
        price: Numeric::parse(price),
        category: category.to_string(),
        description: None,
        image_url: None,
    }
}

/// Delivery partner
pub fn partner(id: &str, name: &str, status: &str) -> DeliveryPartner {
    DeliveryPartner {
        id: PartnerId::new(id),
        name: name.to_string(),
        phone: None,
        status: PartnerStatus::from(status.to_string()),
        current_order: None,
    }
}

/// Logistics package
pub fn package(id: &str, pickup: &str, dropoff: &str, price: &str, status: &str) -> Package {
    Package {
        id: PackageId::new(id),
        pickup_location: pickup.to_string(),
        dropoff_location: dropoff.to_string(),
        package_details: "Documents".to_string(),
        price: Numeric::parse(price),
        status: status.to_string(),
        partner_name: None,
    }
}

/// Dashboard figures
pub fn stats(today: &str, to_fulfill: u64, rating: &str, products: u64) -> VendorStats {
    VendorStats {
        today_earnings: Numeric::parse(today),
        orders_to_fulfill: to_fulfill,
        rating: Numeric::parse(rating),
        active_products: products,
    }
}

/// Signed-in account with `role`
pub fn user(id: &str, role: Role) -> SessionUser {
    SessionUser {
        id: UserId::new(id),
        role,
        vendor_id: None,
        business_name: None,
        service_type: ServiceType::Food,
        logo_url: None,
        theme_color: None,
        email: Some(format!("{id}@example.com")),
        phone_number: None,
    }
}

/// Platform administrator
pub fn admin_user() -> SessionUser {
    user("admin-1", Role::SuperAdmin)
}

/// Vendor administrator acting for `vendor`
pub fn vendor_user(vendor: &str, service_type: ServiceType) -> SessionUser {
    SessionUser {
        vendor_id: Some(VendorId::new(vendor)),
        business_name: Some(format!("{vendor} Kitchen")),
        service_type,
        ..user(&format!("owner-{vendor}"), Role::VendorAdmin)
    }
}
