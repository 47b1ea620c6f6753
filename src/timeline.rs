use chrono::{Days, Months, NaiveDate};

use crate::dates::first_of_month;
use crate::models::{PlantingWithPlant, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Planted,
    Sprouting,
    Harvest,
}

#[derive(Debug, Clone, Copy)]
pub struct TimelineEvent<'a> {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub item: &'a PlantingWithPlant,
}

impl TimelineEvent<'_> {
    pub fn title(&self) -> String {
        let name = &self.item.plant.name;
        match self.kind {
            EventKind::Planted => format!("{name} sembrado"),
            EventKind::Sprouting => format!("{name} brotando"),
            EventKind::Harvest => format!("{name} listo para cosechar"),
        }
    }
}

/// Planted, sprout and harvest milestones that fall inside the month of `month`.
pub fn month_events(plantings: &[PlantingWithPlant], month: NaiveDate) -> Vec<TimelineEvent<'_>> {
    let start = first_of_month(month);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(NaiveDate::MAX);
    let in_month = |date: NaiveDate| start <= date && date <= end;

    let mut events = Vec::new();
    for item in plantings {
        // Any reference date works here, only the milestone dates are used.
        let lifecycle = item.lifecycle(start);
        let milestones = [
            (item.planting.planted_date, EventKind::Planted),
            (lifecycle.expected_sprout, EventKind::Sprouting),
            (lifecycle.expected_harvest, EventKind::Harvest),
        ];
        for (date, kind) in milestones {
            if in_month(date) {
                events.push(TimelineEvent { date, kind, item });
            }
        }
    }
    events.sort_by_key(|event| event.date);
    events
}

/// Sprout and harvest milestones due within the next month, harvested
/// plantings excluded.
pub fn upcoming_events(plantings: &[PlantingWithPlant], today: NaiveDate) -> Vec<TimelineEvent<'_>> {
    let horizon = today
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    let due = |date: NaiveDate| today < date && date <= horizon;

    let mut events = Vec::new();
    for item in plantings {
        let lifecycle = item.lifecycle(today);
        if lifecycle.status == Status::Harvested {
            continue;
        }
        if lifecycle.status == Status::Sprouting && due(lifecycle.expected_sprout) {
            events.push(TimelineEvent {
                date: lifecycle.expected_sprout,
                kind: EventKind::Sprouting,
                item,
            });
        }
        if due(lifecycle.expected_harvest) {
            events.push(TimelineEvent {
                date: lifecycle.expected_harvest,
                kind: EventKind::Harvest,
                item,
            });
        }
    }
    events.sort_by_key(|event| event.date);
    events
}
