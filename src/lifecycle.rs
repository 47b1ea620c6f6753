//! Derives the growth phase of a planting from elapsed time.
//!
//! Nothing here is stored: the persisted status of a planting only ever says
//! `planted` or `harvested`, and the finer phases are recomputed on every read.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::models::{Category, Plant, Planting, PlantingWithPlant, Status};

/// Look-ahead before the expected sprout date.
pub const SPROUTING_SOON_DAYS: i64 = 3;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `planted` to `reference`. Negative for future plantings.
pub fn elapsed_days(planted: NaiveDate, reference: NaiveDate) -> i64 {
    reference.signed_duration_since(planted).num_days()
}

/// Whole days from midnight UTC of `planted` to `now`, rounded down, so a
/// partially elapsed day never counts.
pub fn elapsed_days_since(planted: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start = planted.and_time(NaiveTime::MIN).and_utc();
    now.signed_duration_since(start)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Harvest threshold is checked first, so equal thresholds resolve to `Ready`.
pub fn classify_elapsed(elapsed: i64, days_to_sprout: u32, days_to_harvest: u32) -> Status {
    if elapsed >= i64::from(days_to_harvest) {
        Status::Ready
    } else if elapsed >= i64::from(days_to_sprout) {
        Status::Growing
    } else {
        Status::Sprouting
    }
}

/// Never returns `Planted` or `Harvested`.
pub fn classify(
    planted: NaiveDate,
    days_to_sprout: u32,
    days_to_harvest: u32,
    reference: NaiveDate,
) -> Status {
    classify_elapsed(
        elapsed_days(planted, reference),
        days_to_sprout,
        days_to_harvest,
    )
}

/// Status to display: a persisted `Harvested` wins over whatever the
/// elapsed time would say.
pub fn effective_status(
    persisted: Status,
    planted: NaiveDate,
    days_to_sprout: u32,
    days_to_harvest: u32,
    reference: NaiveDate,
) -> Status {
    match persisted {
        Status::Harvested => Status::Harvested,
        _ => classify(planted, days_to_sprout, days_to_harvest, reference),
    }
}

/// True inside the last days before the expected sprout date.
pub fn is_sprouting_soon(elapsed: i64, days_to_sprout: u32) -> bool {
    let sprout = i64::from(days_to_sprout);
    sprout - SPROUTING_SOON_DAYS <= elapsed && elapsed < sprout
}

pub fn expected_sprout_date(planted: NaiveDate, days_to_sprout: u32) -> NaiveDate {
    add_days(planted, days_to_sprout)
}

pub fn expected_harvest_date(planted: NaiveDate, days_to_harvest: u32) -> NaiveDate {
    add_days(planted, days_to_harvest)
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Everything a listing needs to render one planting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub elapsed_days: i64,
    pub status: Status,
    pub expected_sprout: NaiveDate,
    pub expected_harvest: NaiveDate,
}

impl Lifecycle {
    pub fn of(planting: &Planting, plant: &Plant, reference: NaiveDate) -> Self {
        let planted = planting.planted_date;
        Lifecycle {
            elapsed_days: elapsed_days(planted, reference),
            status: effective_status(
                planting.status,
                planted,
                plant.days_to_sprout,
                plant.days_to_harvest,
                reference,
            ),
            expected_sprout: expected_sprout_date(planted, plant.days_to_sprout),
            expected_harvest: expected_harvest_date(planted, plant.days_to_harvest),
        }
    }

    pub fn sprouting_soon(&self, plant: &Plant) -> bool {
        self.status == Status::Sprouting
            && is_sprouting_soon(self.elapsed_days, plant.days_to_sprout)
    }
}

impl PlantingWithPlant {
    pub fn lifecycle(&self, reference: NaiveDate) -> Lifecycle {
        Lifecycle::of(&self.planting, &self.plant, reference)
    }
}

/// Listing filter: free-text search over plant name and location plus an
/// optional effective status.
#[derive(Debug, Clone, Default)]
pub struct PlantingFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
}

impl PlantingFilter {
    pub fn matches(&self, item: &PlantingWithPlant, reference: NaiveDate) -> bool {
        let matches_search = match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                item.plant.name.to_lowercase().contains(&term)
                    || item.planting.location.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_status = match self.status {
            Some(status) => item.lifecycle(reference).status == status,
            None => true,
        };
        matches_search && matches_status
    }
}

/// Plant library filter: search over name and description, exact category,
/// season by substring.
#[derive(Debug, Clone, Default)]
pub struct PlantFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub season: Option<String>,
}

impl PlantFilter {
    pub fn matches(&self, plant: &Plant) -> bool {
        let matches_search = match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                plant.name.to_lowercase().contains(&term)
                    || plant
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
            None => true,
        };
        let matches_category = self.category.map_or(true, |c| plant.category == c);
        let matches_season = match &self.season {
            Some(season) => plant
                .season
                .to_lowercase()
                .contains(&season.to_lowercase()),
            None => true,
        };
        matches_search && matches_category && matches_season
    }
}
