//! Garden summary counts.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::lifecycle::{elapsed_days, SPROUTING_SOON_DAYS};
use crate::models::{PlantingWithPlant, Status};

/// Rows shown in each dashboard list.
pub const DASHBOARD_LIST_LEN: usize = 5;

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GardenStats {
    pub active_plantings: usize,
    pub ready_harvest: usize,
    pub sprouting_soon: usize,
    pub plant_varieties: usize,
}

/// Counts plantings of one garden in a single pass.
///
/// The sprouting-soon window here runs up to the harvest day, not the sprout
/// day, so it differs from [`crate::lifecycle::is_sprouting_soon`].
pub fn aggregate<'a, I>(plantings: I, reference: NaiveDate) -> GardenStats
where
    I: IntoIterator<Item = &'a PlantingWithPlant>,
{
    let mut stats = GardenStats::default();
    let mut varieties = HashSet::new();

    for item in plantings {
        varieties.insert(item.planting.plant_id);

        if item.planting.status == Status::Harvested {
            continue;
        }
        stats.active_plantings += 1;

        let elapsed = elapsed_days(item.planting.planted_date, reference);
        let sprout = i64::from(item.plant.days_to_sprout);
        let harvest = i64::from(item.plant.days_to_harvest);

        if elapsed >= harvest {
            stats.ready_harvest += 1;
        }
        if sprout - SPROUTING_SOON_DAYS <= elapsed && elapsed < harvest {
            stats.sprouting_soon += 1;
        }
    }

    stats.plant_varieties = varieties.len();
    stats
}

/// Unharvested plantings that are growing or ready, soonest harvest first.
pub fn upcoming_harvests(
    plantings: &[PlantingWithPlant],
    reference: NaiveDate,
) -> Vec<&PlantingWithPlant> {
    let mut upcoming: Vec<_> = plantings
        .iter()
        .filter(|item| {
            matches!(
                item.lifecycle(reference).status,
                Status::Ready | Status::Growing
            )
        })
        .collect();
    upcoming.sort_by_key(|item| item.lifecycle(reference).expected_harvest);
    upcoming
}

/// The last `n` plantings in storage order, i.e. the most recently recorded.
pub fn recent_plantings(plantings: &[PlantingWithPlant], n: usize) -> &[PlantingWithPlant] {
    &plantings[plantings.len().saturating_sub(n)..]
}
