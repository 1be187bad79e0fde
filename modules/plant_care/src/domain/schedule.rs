//! Watering schedule derivation.
//!
//! Everything here is pure: records come in, schedules and notifications come
//! out. Schedules are recomputed on every read and never stored, so they can
//! not go stale relative to `today`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::CareRecord;

const DAYS_PER_YEAR: f64 = 365.0;

/// Per-record failure; never aborts the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("unknown sun exposure category '{0}'")]
    InvalidCategory(String),

    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl ScheduleError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Stable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::Validation { .. } => "VALIDATION",
            Self::InvalidSchedule(_) => "INVALID_SCHEDULE",
            Self::InvalidDate(_) => "INVALID_DATE",
        }
    }
}

/// Coarse light bucket selecting where in the annual water range a plant sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SunExposure {
    Low,
    Medium,
    High,
}

impl SunExposure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Annual water depth (mm/year) for this exposure within `[min, max]`.
    pub fn annual_depth_mm(self, min_mm_year: f64, max_mm_year: f64) -> f64 {
        match self {
            Self::Low => min_mm_year,
            Self::Medium => (min_mm_year + max_mm_year) / 2.0,
            Self::High => max_mm_year,
        }
    }
}

impl fmt::Display for SunExposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SunExposure {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ScheduleError::InvalidCategory(s.to_string())),
        }
    }
}

/// Values derived for one record; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSchedule {
    /// Litres per day.
    pub daily_water_consumption: f64,
    pub next_watering_date: NaiveDate,
    /// Signed `today - next_watering_date` in days.
    pub days_overdue: i64,
    pub needs_watering: bool,
}

impl DerivedSchedule {
    pub fn overdue_days(&self) -> i64 {
        self.days_overdue.max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueStatus {
    pub days_delta: i64,
    pub needs_watering: bool,
}

impl OverdueStatus {
    pub fn overdue_days(&self) -> i64 {
        self.days_delta.max(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledRecord {
    pub record: CareRecord,
    pub schedule: Result<DerivedSchedule, ScheduleError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub record_id: Uuid,
    pub plant_name: String,
    /// Never negative; zero means due today.
    pub overdue_days: i64,
    /// Index of the record in the report's input order.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WateringReport {
    pub records: Vec<ScheduledRecord>,
    pub notifications: Vec<Notification>,
}

impl WateringReport {
    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    /// Pages needed to show every notification with `page_size` per page.
    pub fn page_count(&self, page_size: usize) -> usize {
        self.notification_count().div_ceil(page_size.max(1))
    }
}

/// Estimated litres per day a potted plant needs.
///
/// The annual depth picked by `sun` is spread over 365 days and applied to the
/// pot's cross-section; 1 mm of depth over 1 m² is one litre.
pub fn compute_daily_consumption(
    sun: SunExposure,
    pot_diameter_cm: f64,
    min_mm_year: f64,
    max_mm_year: f64,
) -> Result<f64, ScheduleError> {
    if !pot_diameter_cm.is_finite() || pot_diameter_cm <= 0.0 {
        return Err(ScheduleError::validation(
            "pot_diameter_cm",
            format!("must be a positive number, got {pot_diameter_cm}"),
        ));
    }
    for (field, v) in [
        ("min_water_consumption", min_mm_year),
        ("max_water_consumption", max_mm_year),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(ScheduleError::validation(
                field,
                format!("must be a non-negative number, got {v}"),
            ));
        }
    }

    let mm_per_day = sun.annual_depth_mm(min_mm_year, max_mm_year) / DAYS_PER_YEAR;
    let radius_m = pot_diameter_cm / 100.0 / 2.0;
    let area_m2 = PI * radius_m * radius_m;
    Ok(mm_per_day * area_m2)
}

/// Date the watered amount runs out: `last_watered + floor(amount / daily)`.
pub fn compute_next_watering_date(
    last_watered: NaiveDate,
    watered_amount_l: f64,
    daily_consumption_l: f64,
) -> Result<NaiveDate, ScheduleError> {
    if !daily_consumption_l.is_finite() || daily_consumption_l <= 0.0 {
        return Err(ScheduleError::InvalidSchedule(format!(
            "daily consumption must be positive, got {daily_consumption_l}"
        )));
    }
    if !watered_amount_l.is_finite() || watered_amount_l < 0.0 {
        return Err(ScheduleError::validation(
            "watered_amount_l",
            format!("must be a non-negative number, got {watered_amount_l}"),
        ));
    }

    let days = (watered_amount_l / daily_consumption_l).floor();
    if !days.is_finite() || days > f64::from(u32::MAX) {
        return Err(ScheduleError::InvalidSchedule(format!(
            "watering interval of {days} days is out of range"
        )));
    }
    last_watered
        .checked_add_days(Days::new(days as u64))
        .ok_or_else(|| {
            ScheduleError::InvalidSchedule(format!(
                "next watering date overflows ({last_watered} + {days} days)"
            ))
        })
}

pub fn compute_overdue_status(next_watering_date: NaiveDate, today: NaiveDate) -> OverdueStatus {
    let days_delta = (today - next_watering_date).num_days();
    OverdueStatus {
        days_delta,
        needs_watering: days_delta >= 0,
    }
}

/// Full derivation for one record, validating the stored fields on the way.
pub fn derive_schedule(
    record: &CareRecord,
    today: NaiveDate,
) -> Result<DerivedSchedule, ScheduleError> {
    let plant = &record.plant;

    let sun: SunExposure = plant
        .sun_exposure
        .as_deref()
        .ok_or_else(|| ScheduleError::validation("sun_exposure", "missing"))?
        .parse()?;
    let pot_diameter_cm = plant
        .pot_diameter_cm
        .ok_or_else(|| ScheduleError::validation("pot_diameter_cm", "missing"))?;

    let daily = compute_daily_consumption(
        sun,
        pot_diameter_cm,
        f64::from(record.catalog.min_water_consumption),
        f64::from(record.catalog.max_water_consumption),
    )?;

    let last_watered = plant
        .last_watered
        .ok_or_else(|| ScheduleError::InvalidDate("last watered date is missing".into()))?;
    if last_watered > today {
        return Err(ScheduleError::InvalidDate(format!(
            "last watered date {last_watered} is after {today}"
        )));
    }
    let amount = plant
        .watered_amount_l
        .ok_or_else(|| ScheduleError::validation("watered_amount_l", "missing"))?;

    let next = compute_next_watering_date(last_watered, amount, daily)?;
    let status = compute_overdue_status(next, today);

    Ok(DerivedSchedule {
        daily_water_consumption: daily,
        next_watering_date: next,
        days_overdue: status.days_delta,
        needs_watering: status.needs_watering,
    })
}

pub fn schedule_record(record: CareRecord, today: NaiveDate) -> ScheduledRecord {
    let schedule = derive_schedule(&record, today);
    ScheduledRecord { record, schedule }
}

/// Annotate every record and collect notifications, keeping input order.
pub fn build_schedule_and_notifications(
    records: Vec<CareRecord>,
    today: NaiveDate,
) -> WateringReport {
    let mut notifications = Vec::new();
    let records: Vec<ScheduledRecord> = records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let scheduled = schedule_record(record, today);
            if let Ok(s) = &scheduled.schedule {
                if s.needs_watering {
                    notifications.push(Notification {
                        record_id: scheduled.record.id(),
                        plant_name: scheduled.record.plant_name().to_string(),
                        overdue_days: s.overdue_days(),
                        position,
                    });
                }
            }
            scheduled
        })
        .collect();

    WateringReport {
        records,
        notifications,
    }
}
