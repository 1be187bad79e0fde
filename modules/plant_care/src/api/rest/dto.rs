use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{CatalogPlant, NewUserPlant, UserPlantPatch};
use crate::domain::schedule::{DerivedSchedule, Notification, ScheduleError, ScheduledRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogListDto {
    pub plants: Vec<CatalogPlant>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDto {
    /// Litres per day.
    pub daily_water_consumption: f64,
    pub next_watering_date: NaiveDate,
    pub days_overdue: i64,
    pub needs_watering: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleErrorDto {
    pub code: String,
    pub message: String,
}

/// A plant in the caller's collection with its derived schedule.
/// Exactly one of `schedule` / `schedule_error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlantDto {
    pub id: Uuid,
    pub plant_id: i32,
    pub common_name: String,
    pub botanical_name: String,
    pub nickname: Option<String>,
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<NaiveDate>,
    pub watered_amount_l: Option<f64>,
    pub position: Option<String>,
    pub has_photo: bool,
    pub image_location: String,
    pub registered_at: DateTime<Utc>,
    pub schedule: Option<ScheduleDto>,
    pub schedule_error: Option<ScheduleErrorDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantListDto {
    pub plants: Vec<UserPlantDto>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub page_count: usize,
    pub notification_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDto {
    pub record_id: Uuid,
    pub plant_name: String,
    pub overdue_days: i64,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListDto {
    pub notifications: Vec<NotificationDto>,
    pub count: usize,
    pub page_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub name: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListPlantsQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlantReq {
    pub plant_id: i32,
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<NaiveDate>,
    pub watered_amount_l: Option<f64>,
    pub position: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePlantReq {
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<NaiveDate>,
    pub watered_amount_l: Option<f64>,
    pub position: Option<String>,
    pub nickname: Option<String>,
}

impl From<DerivedSchedule> for ScheduleDto {
    fn from(s: DerivedSchedule) -> Self {
        Self {
            daily_water_consumption: s.daily_water_consumption,
            next_watering_date: s.next_watering_date,
            days_overdue: s.days_overdue,
            needs_watering: s.needs_watering,
        }
    }
}

impl From<ScheduleError> for ScheduleErrorDto {
    fn from(e: ScheduleError) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

impl From<ScheduledRecord> for UserPlantDto {
    fn from(s: ScheduledRecord) -> Self {
        let (schedule, schedule_error) = match s.schedule {
            Ok(d) => (Some(d.into()), None),
            Err(e) => (None, Some(e.into())),
        };
        let p = s.record.plant;
        let c = s.record.catalog;
        Self {
            id: p.id,
            plant_id: p.plant_id,
            common_name: c.common_name,
            botanical_name: c.botanical_name,
            nickname: p.nickname,
            size: p.size,
            sun_exposure: p.sun_exposure,
            pot_diameter_cm: p.pot_diameter_cm,
            last_watered: p.last_watered,
            watered_amount_l: p.watered_amount_l,
            position: p.position,
            has_photo: p.image_path.is_some(),
            image_location: c.image_location,
            registered_at: p.registered_at,
            schedule,
            schedule_error,
        }
    }
}

impl From<Notification> for NotificationDto {
    fn from(n: Notification) -> Self {
        Self {
            record_id: n.record_id,
            plant_name: n.plant_name,
            overdue_days: n.overdue_days,
            position: n.position,
        }
    }
}

impl From<CreatePlantReq> for NewUserPlant {
    fn from(r: CreatePlantReq) -> Self {
        Self {
            plant_id: r.plant_id,
            size: r.size,
            sun_exposure: r.sun_exposure,
            pot_diameter_cm: r.pot_diameter_cm,
            last_watered: r.last_watered,
            watered_amount_l: r.watered_amount_l,
            position: r.position,
            nickname: r.nickname,
        }
    }
}

impl From<UpdatePlantReq> for UserPlantPatch {
    fn from(r: UpdatePlantReq) -> Self {
        Self {
            size: r.size,
            sun_exposure: r.sun_exposure,
            pot_diameter_cm: r.pot_diameter_cm,
            last_watered: r.last_watered,
            watered_amount_l: r.watered_amount_l,
            position: r.position,
            nickname: r.nickname,
        }
    }
}
