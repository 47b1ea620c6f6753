use chrono::NaiveDate;

use crate::dashboard::{recent_plantings, upcoming_harvests, GardenStats, DASHBOARD_LIST_LEN};
use crate::dates::{format_date, format_date_range, relative_time};
use crate::models::{Garden, Location, Plant, PlantingWithPlant};
use crate::timeline::{EventKind, TimelineEvent};

fn id_of(id: Option<mongodb::bson::oid::ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}

pub fn print_plant(plant: &Plant) {
    println!(
        "Nombre: '{}'\nCategoría: {}\nBrota en: {} días\nCosecha en: {} días\nTemporada: {}\nID: '{}'",
        plant.name,
        plant.category,
        plant.days_to_sprout,
        plant.days_to_harvest,
        plant.season,
        id_of(plant.id),
    );
    if let Some(description) = &plant.description {
        println!("Descripción: {description}");
    }
    if let Some(url) = &plant.image_url {
        println!("Imagen: {url}");
    }
    println!();
}

pub fn print_garden(garden: &Garden) {
    println!(
        "Huerto: '{}'\nDueño: {}\nID: '{}'",
        garden.name,
        garden.owner,
        id_of(garden.id)
    );
    if let Some(description) = &garden.description {
        println!("Descripción: {description}");
    }
    if garden.collaborators.is_empty() {
        println!("Colaboradores: Ninguno");
    } else {
        println!("Colaboradores:");
        for collaborator in &garden.collaborators {
            println!("  {} ({})", collaborator.user, collaborator.role);
        }
    }
    println!();
}

pub fn print_location(location: &Location) {
    match &location.description {
        Some(description) => println!(
            "{}, '{}': {}",
            id_of(location.id),
            location.name,
            description
        ),
        None => println!("{}, '{}'", id_of(location.id), location.name),
    }
}

pub fn print_planting(item: &PlantingWithPlant, today: NaiveDate) {
    let planting = &item.planting;
    let lifecycle = item.lifecycle(today);
    let status = if lifecycle.sprouting_soon(&item.plant) {
        format!("{} (brota pronto)", lifecycle.status)
    } else {
        lifecycle.status.to_string()
    };

    println!(
        "Planta: '{}'\nUbicación: '{}'\nCantidad: {}\nSembrado: {} ({})\nBrotación: {}\nCosecha esperada: {} ({})\nEstado: {}\nID: '{}'",
        item.plant.name,
        planting.location,
        planting.quantity,
        format_date(planting.planted_date),
        relative_time(planting.planted_date, today),
        format_date_range(lifecycle.expected_sprout, lifecycle.expected_harvest),
        format_date(lifecycle.expected_harvest),
        relative_time(lifecycle.expected_harvest, today),
        status,
        id_of(planting.id),
    );
    if let Some(notes) = &planting.notes {
        println!("Notas: {notes}");
    }
    if let (Some(date), Some(quantity)) = (planting.harvested_date, planting.harvested_quantity) {
        println!("Cosechado: {} ({} unidades)", format_date(date), quantity);
        if let Some(notes) = &planting.harvested_notes {
            println!("Notas de cosecha: {notes}");
        }
    }
    println!();
}

pub fn print_stats(stats: &GardenStats, plantings: &[PlantingWithPlant], today: NaiveDate) {
    println!("Siembras activas: {}", stats.active_plantings);
    println!("Listas para cosechar: {}", stats.ready_harvest);
    println!("Brotando pronto: {}", stats.sprouting_soon);
    println!("Variedades: {}", stats.plant_varieties);

    let recent = recent_plantings(plantings, DASHBOARD_LIST_LEN);
    if recent.is_empty() {
        println!("Siembras recientes: Ninguna");
    } else {
        println!("Siembras recientes:");
        for item in recent.iter().rev() {
            println!(
                "  {} en '{}': {} ({}) [{}]",
                item.plant.name,
                item.planting.location,
                format_date(item.planting.planted_date),
                relative_time(item.planting.planted_date, today),
                item.lifecycle(today).status,
            );
        }
    }

    let upcoming = upcoming_harvests(plantings, today);
    if upcoming.is_empty() {
        println!("Próximas cosechas: Ninguna");
        return;
    }
    println!("Próximas cosechas:");
    for item in upcoming.into_iter().take(DASHBOARD_LIST_LEN) {
        let lifecycle = item.lifecycle(today);
        println!(
            "  {} en '{}': {} ({}) [{}]",
            item.plant.name,
            item.planting.location,
            format_date(lifecycle.expected_harvest),
            relative_time(lifecycle.expected_harvest, today),
            lifecycle.status,
        );
    }
}

fn event_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Planted => "Siembra",
        EventKind::Sprouting => "Brotación",
        EventKind::Harvest => "Cosecha",
    }
}

pub fn print_timeline(month: &[TimelineEvent<'_>], upcoming: &[TimelineEvent<'_>], today: NaiveDate) {
    if month.is_empty() {
        println!("Sin eventos este mes");
    }
    for event in month {
        println!(
            "{} [{}] {}",
            format_date(event.date),
            event_label(event.kind),
            event.title()
        );
    }

    println!();
    if upcoming.is_empty() {
        println!("Sin eventos en los próximos 30 días");
        return;
    }
    println!("Próximos eventos:");
    for event in upcoming {
        println!(
            "  {} [{}] {} en '{}' ({})",
            format_date(event.date),
            event_label(event.kind),
            event.title(),
            event.item.planting.location,
            relative_time(event.date, today),
        );
    }
}
