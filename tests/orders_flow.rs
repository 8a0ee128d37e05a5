use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{SigninRequest, SignupRequest},
        cart::SaveCartRequest,
        checkout::CheckoutRequest,
        orders::CreateOrderRequest,
        wishlist::AddWishlistRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{CartLine, OrderLine, PaymentStatus, ShippingAddress},
    payments::StripeClient,
    routes::params::Pagination,
    services::{
        auth_service, cart_service, checkout_service, order_service, profile_service,
        wishlist_service,
    },
    state::AppState,
};
use uuid::Uuid;

// Full service-level flow against a real database: cart sync, wishlist
// conflict semantics, checkout guards, order creation and listing, account
// deactivation. Skips when no database is configured in the environment.
#[tokio::test]
async fn cart_wishlist_checkout_and_orders_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    // SAFETY: tests run before any thread reads this variable.
    unsafe {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let state = setup_state(&database_url).await?;

    // Sign up through the real path so the password hash is usable later.
    let email = format!("shopper-{}@example.com", Uuid::new_v4().simple());
    let profile = auth_service::signup(
        &state.pool,
        SignupRequest {
            first_name: "Test".into(),
            last_name: "Shopper".into(),
            email: email.clone(),
            password: "correct horse battery".into(),
        },
    )
    .await?
    .data
    .expect("signup profile");

    let user = AuthUser {
        user_id: profile.id,
    };

    // Cart: push a snapshot, read it back.
    let lines = vec![
        cart_line(101, 100.0, 2),
        cart_line(202, 50.0, 1),
    ];
    cart_service::save_cart(
        &state.pool,
        &user,
        SaveCartRequest {
            cart_items: lines.clone(),
        },
    )
    .await?;

    let snapshot = cart_service::get_cart(&state.pool, &user)
        .await?
        .data
        .expect("cart snapshot");
    assert_eq!(snapshot.items, lines);

    // Snapshots violating the line invariants never reach the document.
    let err = cart_service::save_cart(
        &state.pool,
        &user,
        SaveCartRequest {
            cart_items: vec![cart_line(101, 100.0, 1), cart_line(101, 100.0, 2)],
        },
    )
    .await
    .expect_err("duplicate lines must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    // Wishlist: second add for the same product is a conflict, remove of an
    // absent entry is not found.
    wishlist_service::add_to_wishlist(&state.pool, &user, AddWishlistRequest { product_id: 101 })
        .await?;
    let err = wishlist_service::add_to_wishlist(
        &state.pool,
        &user,
        AddWishlistRequest { product_id: 101 },
    )
    .await
    .expect_err("duplicate wishlist add must conflict");
    assert!(matches!(err, AppError::Conflict(_)));

    let listed = wishlist_service::list_wishlist(&state.pool, &user)
        .await?
        .data
        .expect("wishlist");
    assert_eq!(listed.items, vec![101]);

    wishlist_service::remove_from_wishlist(&state.pool, &user, 101).await?;
    let err = wishlist_service::remove_from_wishlist(&state.pool, &user, 101)
        .await
        .expect_err("removing an absent entry must be not found");
    assert!(matches!(err, AppError::NotFound));

    // Checkout with a non-empty cart reaches the provider call, which fails
    // upstream here because no credentials are configured.
    let err = checkout_service::begin_checkout(
        &state,
        &user,
        CheckoutRequest {
            shipping_address: shipping_address(&email),
        },
    )
    .await
    .expect_err("unconfigured provider must surface as upstream failure");
    assert!(matches!(err, AppError::Upstream(_)));

    // An empty persisted cart is rejected before any provider call, however
    // complete the address is.
    cart_service::save_cart(&state.pool, &user, SaveCartRequest { cart_items: vec![] }).await?;
    let err = checkout_service::begin_checkout(
        &state,
        &user,
        CheckoutRequest {
            shipping_address: shipping_address(&email),
        },
    )
    .await
    .expect_err("empty cart must be rejected");
    assert!(matches!(err, AppError::InvalidState(_)));

    // Orders: empty items are invalid input; valid orders land and list
    // most-recent-first.
    let err = order_service::create_order(
        &state,
        &user,
        CreateOrderRequest {
            items: vec![],
            total_amount: 250.0,
            shipping_address: None,
            payment_status: None,
        },
    )
    .await
    .expect_err("empty items must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    let first = order_service::create_order(
        &state,
        &user,
        CreateOrderRequest {
            items: vec![OrderLine {
                product_id: 101,
                quantity: 2,
            }],
            total_amount: 200.0,
            shipping_address: Some(shipping_address(&email)),
            payment_status: None,
        },
    )
    .await?
    .data
    .expect("first order");
    assert_eq!(first.payment_status, PaymentStatus::Pending);

    let second = order_service::create_order(
        &state,
        &user,
        CreateOrderRequest {
            items: vec![OrderLine {
                product_id: 202,
                quantity: 1,
            }],
            total_amount: 50.0,
            shipping_address: Some(shipping_address(&email)),
            payment_status: Some(PaymentStatus::Paid),
        },
    )
    .await?
    .data
    .expect("second order");
    assert_eq!(second.payment_status, PaymentStatus::Paid);

    let history = order_service::list_orders(
        &state,
        &user,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await?
    .data
    .expect("order history");
    assert_eq!(history.items.len(), 2);
    assert_eq!(history.items[0].id, second.id, "newest order listed first");
    assert_eq!(history.items[1].id, first.id);

    // Deactivation keeps the record but blocks signin.
    profile_service::deactivate_account(&state.pool, &user).await?;
    let err = auth_service::signin(
        &state.pool,
        SigninRequest {
            email,
            password: "correct horse battery".into(),
        },
    )
    .await
    .expect_err("deactivated account must not sign in");
    assert!(matches!(err, AppError::Unauthorized(_)));

    Ok(())
}

fn cart_line(product_id: i64, price: f64, quantity: u32) -> CartLine {
    CartLine {
        product_id,
        name: format!("Product {product_id}"),
        price,
        images: vec![],
        quantity,
    }
}

fn shipping_address(email: &str) -> ShippingAddress {
    ShippingAddress {
        first_name: "Test".to_string(),
        last_name: "Shopper".to_string(),
        email: email.to_string(),
        phone: Some("+27 21 000 0000".to_string()),
        street: "12 Long Street".to_string(),
        city: "Cape Town".to_string(),
        province: "Western Cape".to_string(),
        postal_code: "8001".to_string(),
        country: Some("ZA".to_string()),
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    sqlx::query("TRUNCATE TABLE orders, audit_logs, users CASCADE")
        .execute(&pool)
        .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        frontend_origin: "http://localhost:3000".to_string(),
        checkout_currency: "zar".to_string(),
        stripe_secret_key: None,
        smtp: None,
        google: None,
    };

    Ok(AppState {
        pool,
        orm,
        config,
        payments: StripeClient::new(None)?,
        mailer: None,
        http: reqwest::Client::new(),
    })
}
