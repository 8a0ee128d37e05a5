use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{SigninRequest, SignupRequest, TokenResponse},
        cart::{CartSnapshot, SaveCartRequest},
        checkout::{CheckoutRequest, CheckoutResponse},
        orders::{CreateOrderRequest, OrderList},
        profile::{ProfileResponse, UpdateProfileRequest},
        wishlist::{AddWishlistRequest, WishlistSnapshot},
    },
    models::{CartLine, Order, OrderLine, PaymentStatus, ShippingAddress},
    response::{ApiResponse, Meta},
    routes::{auth, cart, checkout, health, orders, params, profile, wishlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::signin,
        auth::google,
        auth::google_callback,
        cart::get_cart,
        cart::save_cart,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        profile::get_profile,
        profile::update_profile,
        profile::deactivate_account,
        orders::list_orders,
        orders::create_order,
        checkout::create_checkout
    ),
    components(
        schemas(
            CartLine,
            OrderLine,
            ShippingAddress,
            PaymentStatus,
            Order,
            SignupRequest,
            SigninRequest,
            TokenResponse,
            ProfileResponse,
            UpdateProfileRequest,
            SaveCartRequest,
            CartSnapshot,
            AddWishlistRequest,
            WishlistSnapshot,
            CreateOrderRequest,
            OrderList,
            CheckoutRequest,
            CheckoutResponse,
            params::Pagination,
            Meta,
            ApiResponse<ProfileResponse>,
            ApiResponse<TokenResponse>,
            ApiResponse<CartSnapshot>,
            ApiResponse<WishlistSnapshot>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CheckoutResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Cart", description = "Persisted cart snapshot endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Profile", description = "Profile endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Checkout", description = "Checkout endpoint"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
