use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::contract::client::AccountsApi;
use crate::domain::service::Service;

pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    accounts: Arc<dyn AccountsApi>,
) -> anyhow::Result<Router> {
    let routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route(
            "/users/{username}",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .layer(Extension(service))
        .layer(Extension(accounts));

    Ok(router.merge(routes))
}
