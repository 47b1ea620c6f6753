use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use my_huerto::cli::{
    Cli, Commands, GardenCommand, LocationCommand, PlantCommand, PlantingCommand,
};
use my_huerto::dashboard::aggregate;
use my_huerto::dates::{parse_date, parse_month, today};
use my_huerto::db::{MongoStore, Store};
use my_huerto::error::parse_id;
use my_huerto::lifecycle::{PlantFilter, PlantingFilter};
use my_huerto::memory::MemoryStore;
use my_huerto::models::{
    GardenPatch, Harvest, LocationPatch, NewPlant, NewPlanting, PlantPatch, PlantingPatch,
};
use my_huerto::service::Tracker;
use my_huerto::timeline::{month_events, upcoming_events};
use my_huerto::{report, Error};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let user = cli.config.acting_user();

    let outcome = if cli.config.in_memory {
        let store = MemoryStore::with_samples()
            .await
            .context("Error al preparar el almacén en memoria")?;
        run(Tracker::new(store, user), cli.command).await
    } else {
        let store = MongoStore::connect(&cli.config.mongo())
            .await
            .with_context(|| format!("Error al conectar con MongoDB en {}", cli.config.mongo_uri))?;
        run(Tracker::new(store, user), cli.command).await
    };

    outcome.map_err(Into::into)
}

fn optional_date(input: Option<String>) -> Result<chrono::NaiveDate, Error> {
    match input {
        Some(input) => parse_date(&input),
        None => Ok(today()),
    }
}

async fn run<S: Store>(tracker: Tracker<S>, command: Commands) -> Result<(), Error> {
    match command {
        Commands::Plant { action } => plant(&tracker, action).await,
        Commands::Garden { action } => garden(&tracker, action).await,
        Commands::Location { action } => location(&tracker, action).await,
        Commands::Planting { action } => planting(&tracker, action).await,
        Commands::Stats { garden, date } => {
            let garden_id = parse_id(&garden)?;
            let reference = optional_date(date)?;
            let plantings = tracker.plantings(garden_id).await?;
            let stats = aggregate(&plantings, reference);
            report::print_stats(&stats, &plantings, reference);
            Ok(())
        }
        Commands::Timeline {
            garden,
            month,
            date,
        } => {
            let garden_id = parse_id(&garden)?;
            let reference = optional_date(date)?;
            let month = match month {
                Some(month) => parse_month(&month)?,
                None => reference,
            };
            let plantings = tracker.plantings(garden_id).await?;
            report::print_timeline(
                &month_events(&plantings, month),
                &upcoming_events(&plantings, reference),
                reference,
            );
            Ok(())
        }
    }
}

async fn plant<S: Store>(tracker: &Tracker<S>, action: PlantCommand) -> Result<(), Error> {
    match action {
        PlantCommand::List {
            search,
            category,
            season,
        } => {
            let filter = PlantFilter {
                search,
                category: category.map(|c| c.parse()).transpose()?,
                season,
            };
            let plants = tracker.find_plants(&filter).await?;
            if plants.is_empty() {
                println!("No se encontraron plantas");
            }
            for plant in &plants {
                report::print_plant(plant);
            }
        }
        PlantCommand::View { id } => {
            let plant = tracker.plant(parse_id(&id)?).await?;
            report::print_plant(&plant);
        }
        PlantCommand::Add(args) => {
            let plant = tracker
                .add_plant(NewPlant {
                    name: args.name,
                    category: args.category.parse()?,
                    days_to_sprout: args.days_to_sprout,
                    days_to_harvest: args.days_to_harvest,
                    season: args.season,
                    description: args.description,
                    image_url: args.image_url,
                })
                .await?;
            println!("Planta agregada, ID: {}", plant.id.unwrap_or_default());
        }
        PlantCommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let patch = PlantPatch {
                name: args.name,
                category: args.category.map(|c| c.parse()).transpose()?,
                days_to_sprout: args.days_to_sprout,
                days_to_harvest: args.days_to_harvest,
                season: args.season,
                description: args.description,
                image_url: args.image_url,
            };
            tracker.update_plant(id, patch).await?;
            println!("Planta ID {} actualizada", id);
        }
        PlantCommand::Remove { id } => {
            tracker.remove_plant(parse_id(&id)?).await?;
            println!("Planta con ID: {} removida.", id);
        }
        PlantCommand::Seed => {
            let added = tracker.seed_plants().await?;
            println!("{} plantas de ejemplo agregadas", added.len());
        }
    }
    Ok(())
}

async fn garden<S: Store>(tracker: &Tracker<S>, action: GardenCommand) -> Result<(), Error> {
    match action {
        GardenCommand::List => {
            let gardens = tracker.gardens().await?;
            if gardens.is_empty() {
                println!("No se encontraron huertos para '{}'", tracker.user());
            }
            for garden in &gardens {
                report::print_garden(garden);
            }
        }
        GardenCommand::View { id } => {
            let garden = tracker.garden(parse_id(&id)?).await?;
            report::print_garden(&garden);
        }
        GardenCommand::Create { name, description } => {
            let garden = tracker.create_garden(name, description).await?;
            println!("Huerto creado, ID: {}", garden.id.unwrap_or_default());
        }
        GardenCommand::Update {
            id,
            name,
            description,
        } => {
            let garden = tracker
                .update_garden(parse_id(&id)?, GardenPatch { name, description })
                .await?;
            report::print_garden(&garden);
        }
        GardenCommand::Remove { id } => {
            tracker.remove_garden(parse_id(&id)?).await?;
            println!("Huerto con ID: {} removido.", id);
        }
        GardenCommand::Share { id, with, role } => {
            let garden = tracker
                .add_collaborator(parse_id(&id)?, &with, role.parse()?)
                .await?;
            report::print_garden(&garden);
        }
        GardenCommand::Unshare { id, with } => {
            let garden = tracker.remove_collaborator(parse_id(&id)?, &with).await?;
            report::print_garden(&garden);
        }
    }
    Ok(())
}

async fn location<S: Store>(tracker: &Tracker<S>, action: LocationCommand) -> Result<(), Error> {
    match action {
        LocationCommand::List { garden } => {
            let locations = tracker.locations(parse_id(&garden)?).await?;
            if locations.is_empty() {
                println!("No se encontraron ubicaciones");
            }
            for location in &locations {
                report::print_location(location);
            }
        }
        LocationCommand::Add {
            garden,
            name,
            description,
        } => {
            let location = tracker
                .add_location(parse_id(&garden)?, name, description)
                .await?;
            println!("Ubicación agregada, ID: {}", location.id.unwrap_or_default());
        }
        LocationCommand::Update {
            id,
            name,
            description,
        } => {
            let location = tracker
                .update_location(parse_id(&id)?, LocationPatch { name, description })
                .await?;
            report::print_location(&location);
        }
        LocationCommand::Remove { id } => {
            tracker.remove_location(parse_id(&id)?).await?;
            println!("Ubicación con ID: {} removida.", id);
        }
    }
    Ok(())
}

async fn planting<S: Store>(tracker: &Tracker<S>, action: PlantingCommand) -> Result<(), Error> {
    match action {
        PlantingCommand::List {
            garden,
            search,
            status,
            date,
        } => {
            let reference = optional_date(date)?;
            let filter = PlantingFilter {
                search,
                status: status.map(|s| s.parse()).transpose()?,
            };
            let plantings = tracker.plantings(parse_id(&garden)?).await?;
            let mut found = false;
            for item in plantings.iter().filter(|p| filter.matches(p, reference)) {
                found = true;
                report::print_planting(item, reference);
            }
            if !found {
                println!("No se encontraron siembras");
            }
        }
        PlantingCommand::View { id } => {
            let item = tracker.planting(parse_id(&id)?).await?;
            report::print_planting(&item, today());
        }
        PlantingCommand::Add(args) => {
            let new = NewPlanting {
                plant_id: parse_id(&args.plant)?,
                garden_id: parse_id(&args.garden)?,
                location: args.location,
                planted_date: optional_date(args.date)?,
                quantity: args.quantity,
                notes: args.notes,
            };
            let item = tracker.record_planting(new).await?;
            println!(
                "Siembra registrada, ID: {}",
                item.planting.id.unwrap_or_default()
            );
        }
        PlantingCommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let patch = PlantingPatch {
                plant_id: args.plant.as_deref().map(parse_id).transpose()?,
                location: args.location,
                planted_date: args.date.as_deref().map(parse_date).transpose()?,
                quantity: args.quantity,
                notes: args.notes,
            };
            tracker.update_planting(id, patch).await?;
            println!("Siembra ID {} actualizada", id);
        }
        PlantingCommand::Harvest(args) => {
            let id = parse_id(&args.id)?;
            let quantity = match args.quantity {
                Some(quantity) => quantity,
                None => tracker.planting(id).await?.planting.quantity,
            };
            let harvest = Harvest {
                date: optional_date(args.date)?,
                quantity,
                notes: args.notes,
            };
            let item = tracker.harvest(id, harvest).await?;
            println!("{} marcado como cosechado", item.plant.name);
        }
        PlantingCommand::Remove { id } => {
            tracker.remove_planting(parse_id(&id)?).await?;
            println!("Siembra con ID: {} removida.", id);
        }
    }
    Ok(())
}
