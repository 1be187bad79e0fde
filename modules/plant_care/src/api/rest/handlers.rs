use std::sync::Arc;

use accounts::CurrentUser;
use appkit::{bad_request, Page, PageRequest, ProblemResponse};
use appkit::Problem;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Extension,
};
use chrono::{NaiveDate, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    CatalogListDto, CatalogQuery, CreatePlantReq, ListPlantsQuery, NotificationDto,
    NotificationListDto, PlantListDto, UpdatePlantReq, UserPlantDto,
};
use crate::api::rest::error::map_domain_error;
use crate::contract::model::CatalogPlant;
use crate::domain::schedule;
use crate::domain::service::Service;

/// Listing settings shared by the collection handlers.
#[derive(Debug, Clone, Copy)]
pub struct ListingSettings {
    pub plants_per_page: usize,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn search_catalog(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<CatalogQuery>,
    uri: Uri,
) -> Result<Json<CatalogListDto>, ProblemResponse> {
    match svc.search_catalog(&query.name, query.limit).await {
        Ok(plants) => Ok(Json(CatalogListDto {
            count: plants.len(),
            plants,
        })),
        Err(e) => {
            error!("Catalog search failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_catalog_plant(
    Extension(svc): Extension<Arc<Service>>,
    Path(plant_id): Path<i32>,
    uri: Uri,
) -> Result<Json<CatalogPlant>, ProblemResponse> {
    svc.get_catalog_plant(plant_id)
        .await
        .map(Json)
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn list_plants(
    Extension(svc): Extension<Arc<Service>>,
    Extension(settings): Extension<ListingSettings>,
    user: CurrentUser,
    Query(query): Query<ListPlantsQuery>,
    uri: Uri,
) -> Result<Json<PlantListDto>, ProblemResponse> {
    let report = svc
        .watering_report(user.id, today())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    let notification_count = report.notification_count();
    let req = PageRequest::new(query.page, settings.plants_per_page);
    let page = Page::from_slice(&report.records, req);

    Ok(Json(PlantListDto {
        plants: page.items.into_iter().map(UserPlantDto::from).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        page_count: page.page_count,
        notification_count,
    }))
}

pub async fn add_plant(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    uri: Uri,
    Json(req): Json<CreatePlantReq>,
) -> Result<(StatusCode, Json<UserPlantDto>), ProblemResponse> {
    info!(user = %user.username, plant_id = req.plant_id, "Adding plant");
    match svc.add_plant(user.id, req.into()).await {
        Ok(record) => Ok((
            StatusCode::CREATED,
            Json(schedule::schedule_record(record, today()).into()),
        )),
        Err(e) => {
            error!("Failed to add plant: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_plant(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Json<UserPlantDto>, ProblemResponse> {
    svc.get_plant(user.id, id)
        .await
        .map(|r| Json(schedule::schedule_record(r, today()).into()))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

pub async fn update_plant(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    uri: Uri,
    Json(req): Json<UpdatePlantReq>,
) -> Result<Json<UserPlantDto>, ProblemResponse> {
    match svc.update_plant(user.id, id, req.into()).await {
        Ok(record) => Ok(Json(schedule::schedule_record(record, today()).into())),
        Err(e) => {
            error!("Failed to update plant {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn delete_plant(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    match svc.delete_plant(user.id, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete plant {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Accepts multipart/form-data; the first part carrying a file name is used.
pub async fn upload_photo(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    uri: Uri,
    mut multipart: Multipart,
) -> Result<Json<UserPlantDto>, ProblemResponse> {
    let (filename, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(multipart_problem)?
            .ok_or_else(|| bad_request("No file provided"))?;
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_problem)?;
        break (name, bytes);
    };

    match svc.attach_photo(user.id, id, &filename, &bytes).await {
        Ok(record) => Ok(Json(schedule::schedule_record(record, today()).into())),
        Err(e) => {
            error!("Failed to attach photo to {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn get_photo(
    Extension(svc): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Response, ProblemResponse> {
    let (key, bytes) = svc
        .get_photo(user.id, id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&key))], bytes).into_response())
}

pub async fn notifications(
    Extension(svc): Extension<Arc<Service>>,
    Extension(settings): Extension<ListingSettings>,
    user: CurrentUser,
    uri: Uri,
) -> Result<Json<NotificationListDto>, ProblemResponse> {
    let report = svc
        .watering_report(user.id, today())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    let count = report.notification_count();
    let page_count = report.page_count(settings.plants_per_page);
    Ok(Json(NotificationListDto {
        notifications: report
            .notifications
            .into_iter()
            .map(NotificationDto::from)
            .collect(),
        count,
        page_count,
    }))
}

/// Keeps the status axum assigns (413 when the body limit is hit).
fn multipart_problem(e: MultipartError) -> ProblemResponse {
    ProblemResponse(
        Problem::new(e.status(), "Invalid upload", e.body_text()).with_code("PLANTS_UPLOAD_INVALID"),
    )
}

fn content_type_for(key: &str) -> &'static str {
    match key.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
