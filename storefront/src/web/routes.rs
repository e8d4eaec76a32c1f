// storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, checkout_handlers, line_event_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .route(
          "/cart/lines/{line_id}/events",
          web::post().to(line_event_handlers::line_event_handler),
        ),
    )
    // Pages, scoped by sales channel and locale
    .service(
      web::scope("/{channel}/{locale}")
        .route("", web::get().to(product_handlers::home_page_handler))
        .route("/", web::get().to(product_handlers::home_page_handler))
        .route("/cart", web::get().to(cart_handlers::cart_page_handler))
        .route("/cart/add", web::post().to(cart_handlers::add_to_cart_handler))
        .route(
          "/cart/lines/{line_id}/quantity",
          web::post().to(cart_handlers::update_quantity_handler),
        )
        .route(
          "/cart/lines/{line_id}/remove",
          web::post().to(cart_handlers::remove_line_handler),
        )
        .route("/checkout", web::get().to(checkout_handlers::checkout_page_handler))
        .route("/products", web::get().to(product_handlers::list_products_handler))
        .route("/products/{slug}", web::get().to(product_handlers::product_page_handler))
        .route("/category/{slug}", web::get().to(product_handlers::category_page_handler))
        .route("/collections/{slug}", web::get().to(product_handlers::collection_page_handler)),
    );
}
