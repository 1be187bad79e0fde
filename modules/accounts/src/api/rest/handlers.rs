use std::sync::Arc;

use appkit::ProblemResponse;
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::auth::{bearer_token, CurrentUser};
use crate::api::rest::dto::{
    LoginReq, ProfileDto, RegisterReq, SessionDto, UpdateProfileReq, UserDto,
};
use crate::api::rest::error::{map_domain_error, unauthenticated};
use crate::domain::service::Service;

pub async fn register(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    match svc.register(req.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user.into()))),
        Err(e) => {
            info!("Registration rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<LoginReq>,
) -> Result<Json<SessionDto>, ProblemResponse> {
    svc.login(&req.username, &req.password)
        .await
        .map(|s| Json(s.into()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn logout(
    Extension(svc): Extension<Arc<Service>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    let token = bearer_token(&headers)
        .ok_or_else(|| unauthenticated("Missing bearer token", uri.path()))?;
    match svc.logout(token).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Logout failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_profile(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(username): Path<String>,
    uri: Uri,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    svc.get_profile(user.id, &username)
        .await
        .map(|p| Json(p.into()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn update_profile(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(username): Path<String>,
    uri: Uri,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    info!(user = %user.username, "Updating profile");
    svc.update_profile(user.id, &username, req.into())
        .await
        .map(|p| Json(p.into()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}
