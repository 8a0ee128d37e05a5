use storefront_api::error::AppError;
use storefront_api::models::{CartLine, ShippingAddress};
use storefront_api::services::cart_service::validate_cart_lines;
use storefront_api::services::checkout_service::{
    compute_total, to_minor_units, validate_shipping_address,
};

fn line(product_id: i64, price: f64, quantity: u32) -> CartLine {
    CartLine {
        product_id,
        name: format!("Product {product_id}"),
        price,
        images: vec![],
        quantity,
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Thandi".to_string(),
        last_name: "Nkosi".to_string(),
        email: "thandi@example.com".to_string(),
        phone: None,
        street: "12 Long Street".to_string(),
        city: "Cape Town".to_string(),
        province: "Western Cape".to_string(),
        postal_code: "8001".to_string(),
        country: Some("ZA".to_string()),
    }
}

#[test]
fn total_is_sum_of_price_times_quantity() {
    let cart = vec![line(1, 100.0, 2), line(2, 50.0, 1)];
    assert_eq!(compute_total(&cart), 250.0);
}

#[test]
fn total_of_empty_cart_is_zero() {
    assert_eq!(compute_total(&[]), 0.0);
}

#[test]
fn minor_units_round_the_major_total() {
    assert_eq!(to_minor_units(250.0), 25000);
    assert_eq!(to_minor_units(19.99), 1999);
    // Accumulated float error must not leak into the provider amount.
    let cart = vec![line(1, 0.1, 3)];
    assert_eq!(to_minor_units(compute_total(&cart)), 30);
}

#[test]
fn provider_amount_matches_rounded_total() {
    let cart = vec![line(1, 129.95, 2), line(2, 49.5, 3)];
    let total = compute_total(&cart);
    assert_eq!(to_minor_units(total), (total * 100.0).round() as i64);
    assert_eq!(to_minor_units(total), 40840);
}

#[test]
fn complete_address_passes_validation() {
    assert!(validate_shipping_address(&address()).is_ok());
}

#[test]
fn phone_is_optional() {
    let mut addr = address();
    addr.phone = None;
    assert!(validate_shipping_address(&addr).is_ok());
}

#[test]
fn missing_fields_are_named_in_the_error() {
    let mut addr = address();
    addr.postal_code = String::new();
    addr.city = "  ".to_string();

    let err = validate_shipping_address(&addr).expect_err("address should be rejected");
    match err {
        AppError::BadRequest(message) => {
            assert!(message.contains("postal_code"));
            assert!(message.contains("city"));
            assert!(!message.contains("street"));
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn cart_snapshot_rejects_zero_quantity() {
    let cart = vec![line(1, 10.0, 0)];
    let err = validate_cart_lines(&cart).expect_err("zero quantity should be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn cart_snapshot_rejects_duplicate_product_lines() {
    let cart = vec![line(1, 10.0, 1), line(1, 10.0, 2)];
    let err = validate_cart_lines(&cart).expect_err("duplicate lines should be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn cart_snapshot_accepts_distinct_lines() {
    let cart = vec![line(1, 10.0, 1), line(2, 10.0, 2)];
    assert!(validate_cart_lines(&cart).is_ok());
}
