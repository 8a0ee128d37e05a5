use storefront_api::client::store::{Action, ProductSummary, Store};
use storefront_api::models::CartLine;

fn product(id: i64, price: f64) -> ProductSummary {
    ProductSummary {
        id,
        name: format!("Product {id}"),
        price,
        images: vec![format!("https://img.example/{id}.jpg")],
    }
}

fn line(product_id: i64, price: f64, quantity: u32) -> CartLine {
    CartLine {
        product_id,
        name: format!("Product {product_id}"),
        price,
        images: vec![],
        quantity,
    }
}

#[test]
fn add_merges_into_existing_line() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 10.0),
        quantity: 2,
    });
    store.dispatch(Action::AddToCart {
        product: product(1, 10.0),
        quantity: 1,
    });

    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.cart()[0].quantity, 3);
}

#[test]
fn merged_line_keeps_the_price_snapshot_from_first_add() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(7, 19.99),
        quantity: 1,
    });
    // Catalog price moved; the line added earlier keeps its snapshot.
    store.dispatch(Action::AddToCart {
        product: product(7, 24.99),
        quantity: 1,
    });

    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.cart()[0].price, 19.99);
    assert_eq!(store.cart()[0].quantity, 2);
}

#[test]
fn add_with_zero_quantity_floors_to_one() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 5.0),
        quantity: 0,
    });
    assert_eq!(store.cart()[0].quantity, 1);
}

#[test]
fn update_quantity_below_one_is_a_noop() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 5.0),
        quantity: 4,
    });
    store.mark_synced();

    store.dispatch(Action::UpdateQuantity {
        product_id: 1,
        quantity: 0,
    });

    assert_eq!(store.cart()[0].quantity, 4);
    assert!(!store.is_dirty());
}

#[test]
fn update_quantity_overwrites() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 5.0),
        quantity: 4,
    });
    store.dispatch(Action::UpdateQuantity {
        product_id: 1,
        quantity: 2,
    });
    assert_eq!(store.cart()[0].quantity, 2);
}

#[test]
fn remove_is_idempotent() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 5.0),
        quantity: 1,
    });
    store.dispatch(Action::RemoveFromCart { product_id: 1 });
    assert!(store.cart().is_empty());

    store.mark_synced();
    // Removing a line that is not there is a no-op, not an error.
    store.dispatch(Action::RemoveFromCart { product_id: 1 });
    assert!(store.cart().is_empty());
    assert!(!store.is_dirty());
}

#[test]
fn any_mutation_sequence_keeps_lines_unique_and_quantities_positive() {
    let mut store = Store::new();
    let actions = vec![
        Action::AddToCart {
            product: product(1, 10.0),
            quantity: 2,
        },
        Action::AddToCart {
            product: product(2, 30.0),
            quantity: 0,
        },
        Action::UpdateQuantity {
            product_id: 1,
            quantity: 0,
        },
        Action::AddToCart {
            product: product(1, 12.0),
            quantity: 5,
        },
        Action::RemoveFromCart { product_id: 99 },
        Action::UpdateQuantity {
            product_id: 2,
            quantity: 3,
        },
        Action::AddToCart {
            product: product(3, 1.5),
            quantity: 1,
        },
        Action::RemoveFromCart { product_id: 2 },
        Action::AddToCart {
            product: product(2, 30.0),
            quantity: 1,
        },
    ];

    for action in actions {
        store.dispatch(action);

        let mut ids: Vec<i64> = store.cart().iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), store.cart().len(), "duplicate line for a product");
        assert!(store.cart().iter().all(|l| l.quantity >= 1));
    }
}

#[test]
fn login_replaces_local_cart_with_server_copy() {
    let mut store = Store::new();
    // Local cart A, accumulated before signing in.
    store.dispatch(Action::AddToCart {
        product: product(1, 10.0),
        quantity: 2,
    });
    store.dispatch(Action::AddToCart {
        product: product(2, 5.0),
        quantity: 1,
    });

    // Server cart B wins wholesale; nothing from A survives.
    let server_cart = vec![line(3, 99.0, 1)];
    store.dispatch(Action::ReplaceCart {
        lines: server_cart.clone(),
    });

    assert_eq!(store.cart(), server_cart.as_slice());
    assert!(!store.is_dirty());
}

#[test]
fn logout_clears_only_the_local_mirror() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 10.0),
        quantity: 1,
    });
    store.dispatch(Action::AddToWishlist { product_id: 4 });

    store.dispatch(Action::ClearLocal);

    assert!(store.cart().is_empty());
    assert!(store.wishlist().is_empty());
    assert!(!store.is_dirty());
}

#[test]
fn wishlist_add_is_locally_idempotent() {
    let mut store = Store::new();
    store.dispatch(Action::AddToWishlist { product_id: 8 });
    store.dispatch(Action::AddToWishlist { product_id: 8 });
    assert_eq!(store.wishlist(), &[8]);

    store.dispatch(Action::RemoveFromWishlist { product_id: 8 });
    assert!(store.wishlist().is_empty());
}

#[test]
fn cart_total_sums_price_times_quantity() {
    let mut store = Store::new();
    store.dispatch(Action::AddToCart {
        product: product(1, 100.0),
        quantity: 2,
    });
    store.dispatch(Action::AddToCart {
        product: product(2, 50.0),
        quantity: 1,
    });
    assert_eq!(store.cart_total(), 250.0);
}
