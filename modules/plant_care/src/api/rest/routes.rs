use std::sync::Arc;

use accounts::contract::client::AccountsApi;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers::{self, ListingSettings};
use crate::domain::service::Service;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    accounts: Arc<dyn AccountsApi>,
    settings: ListingSettings,
) -> anyhow::Result<Router> {
    let upload_limit = service
        .config()
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD);

    let routes = Router::new()
        // catalog reads are public
        .route("/catalog", get(handlers::search_catalog))
        .route("/catalog/{plant_id}", get(handlers::get_catalog_plant))
        .route(
            "/plants",
            get(handlers::list_plants).post(handlers::add_plant),
        )
        .route(
            "/plants/{id}",
            get(handlers::get_plant)
                .put(handlers::update_plant)
                .delete(handlers::delete_plant),
        )
        .route(
            "/plants/{id}/photo",
            post(handlers::upload_photo)
                .get(handlers::get_photo)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/notifications", get(handlers::notifications))
        .layer(Extension(service))
        .layer(Extension(settings))
        .layer(Extension(accounts));

    Ok(router.merge(routes))
}
