//! API routes
//!
//! Three route groups:
//! - public: auth, catalog reads, product reviews
//! - user: cart, orders, profile, review writes (JWT required)
//! - admin: catalog writes, user/order management, stats (JWT + admin flag)

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod profile;
pub mod reviews;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, require_admin};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth)
    let public = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/products", get(products::list_products))
        .route("/api/products/tags/all", get(products::list_tags))
        .route("/api/products/price-range", get(products::price_range))
        .route("/api/products/{id}", get(products::get_product))
        .route(
            "/api/reviews/product/{product_id}",
            get(reviews::list_product_reviews),
        );

    // Authenticated user routes
    let user = Router::new()
        .route("/api/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route(
            "/api/cart/{product_id}",
            put(cart::update_cart_item).delete(cart::remove_from_cart),
        )
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/me", get(orders::my_orders))
        .route("/api/orders/{id}", get(orders::get_order))
        .route(
            "/api/profile",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_account),
        )
        .route(
            "/api/reviews/product/{product_id}",
            post(reviews::create_review),
        )
        .route("/api/reviews/{review_id}", delete(reviews::delete_review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin routes (auth + admin flag)
    let admin = Router::new()
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}", delete(admin::delete_user))
        .route("/api/admin/products", get(products::list_products_admin))
        .route("/api/products", post(products::create_product))
        .route(
            "/api/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/api/admin/orders", get(orders::all_orders))
        .route(
            "/api/admin/orders/{id}",
            put(orders::update_order_status).delete(orders::delete_order),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(user)
        .merge(admin)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
