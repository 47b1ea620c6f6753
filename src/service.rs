use std::collections::HashMap;

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use tracing::{debug, info, warn};

use crate::dashboard::{aggregate, GardenStats};
use crate::db::{Record, Store};
use crate::error::{Error, Result};
use crate::lifecycle::PlantFilter;
use crate::models::{
    Access, Garden, GardenPatch, Harvest, Location, LocationPatch, NewPlant, NewPlanting, Plant,
    PlantPatch, Planting, PlantingPatch, PlantingWithPlant, Role,
};
use crate::seed;

/// Runs garden operations on behalf of one user.
pub struct Tracker<S> {
    store: S,
    user: String,
}

impl<S: Store> Tracker<S> {
    pub fn new(store: S, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn into_store(self) -> S {
        self.store
    }

    async fn fetch<T: Record>(&self, id: ObjectId) -> Result<T> {
        self.store
            .get::<T>(id)
            .await?
            .ok_or_else(|| Error::not_found(T::ENTITY, id))
    }

    async fn save<T: Record>(&self, record: &T) -> Result<()> {
        if self.store.replace(record).await? {
            Ok(())
        } else {
            Err(Error::not_found(T::ENTITY, record.id().unwrap_or_default()))
        }
    }

    async fn authorize(&self, garden_id: ObjectId, access: Access) -> Result<Garden> {
        let garden: Garden = self.fetch(garden_id).await?;
        if !garden.allows(&self.user, access) {
            let action = match access {
                Access::View => "ver",
                Access::Edit => "editar",
                Access::Manage => "administrar",
            };
            return Err(Error::Forbidden {
                user: self.user.clone(),
                garden: garden_id,
                action,
            });
        }
        Ok(garden)
    }

    // Plants are a shared library, every user can maintain it.

    pub async fn plants(&self) -> Result<Vec<Plant>> {
        self.store.list(None).await
    }

    pub async fn find_plants(&self, filter: &PlantFilter) -> Result<Vec<Plant>> {
        let plants = self.plants().await?;
        Ok(plants.into_iter().filter(|p| filter.matches(p)).collect())
    }

    pub async fn plant(&self, id: ObjectId) -> Result<Plant> {
        self.fetch(id).await
    }

    pub async fn add_plant(&self, new: NewPlant) -> Result<Plant> {
        new.validate()?;
        let plant = self.store.insert(new.into_plant()).await?;
        warn_on_inverted_durations(&plant);
        info!(id = ?plant.id, name = %plant.name, "planta agregada");
        Ok(plant)
    }

    pub async fn update_plant(&self, id: ObjectId, patch: PlantPatch) -> Result<Plant> {
        if patch.is_empty() {
            return Err(Error::validation("no se proporcionaron cambios"));
        }
        let mut plant: Plant = self.fetch(id).await?;
        patch.apply(&mut plant)?;
        self.save(&plant).await?;
        warn_on_inverted_durations(&plant);
        info!(%id, "planta actualizada");
        Ok(plant)
    }

    /// Refuses to delete a plant that plantings still reference.
    pub async fn remove_plant(&self, id: ObjectId) -> Result<()> {
        let in_use = self
            .store
            .list::<Planting>(None)
            .await?
            .iter()
            .filter(|p| p.plant_id == id)
            .count();
        if in_use > 0 {
            return Err(Error::PlantInUse {
                id,
                plantings: in_use,
            });
        }
        if !self.store.delete::<Plant>(id).await? {
            return Err(Error::not_found(Plant::ENTITY, id));
        }
        info!(%id, "planta removida");
        Ok(())
    }

    /// Adds the sample plants whose names are not in the library yet.
    pub async fn seed_plants(&self) -> Result<Vec<Plant>> {
        let existing: Vec<String> = self
            .plants()
            .await?
            .into_iter()
            .map(|p| p.name.to_lowercase())
            .collect();
        let mut added = Vec::new();
        for sample in seed::sample_plants() {
            if existing.contains(&sample.name.to_lowercase()) {
                continue;
            }
            added.push(self.store.insert(sample.into_plant()).await?);
        }
        info!(added = added.len(), "biblioteca de plantas sembrada");
        Ok(added)
    }

    pub async fn gardens(&self) -> Result<Vec<Garden>> {
        let gardens: Vec<Garden> = self.store.list(None).await?;
        Ok(gardens
            .into_iter()
            .filter(|g| g.allows(&self.user, Access::View))
            .collect())
    }

    pub async fn garden(&self, id: ObjectId) -> Result<Garden> {
        self.authorize(id, Access::View).await
    }

    pub async fn create_garden(&self, name: String, description: Option<String>) -> Result<Garden> {
        let garden = Garden::new(name, description, self.user.clone())?;
        let garden = self.store.insert(garden).await?;
        info!(id = ?garden.id, owner = %garden.owner, "huerto creado");
        Ok(garden)
    }

    pub async fn update_garden(&self, id: ObjectId, patch: GardenPatch) -> Result<Garden> {
        let mut garden = self.authorize(id, Access::Manage).await?;
        patch.apply(&mut garden)?;
        self.save(&garden).await?;
        Ok(garden)
    }

    /// Deletes the garden together with its locations and plantings.
    pub async fn remove_garden(&self, id: ObjectId) -> Result<()> {
        self.authorize(id, Access::Manage).await?;
        let plantings = self.store.delete_in_garden::<Planting>(id).await?;
        let locations = self.store.delete_in_garden::<Location>(id).await?;
        self.store.delete::<Garden>(id).await?;
        info!(%id, plantings, locations, "huerto removido");
        Ok(())
    }

    pub async fn add_collaborator(&self, id: ObjectId, user: &str, role: Role) -> Result<Garden> {
        let mut garden = self.authorize(id, Access::Manage).await?;
        garden.add_collaborator(user, role)?;
        self.save(&garden).await?;
        info!(%id, collaborator = user, %role, "colaborador agregado");
        Ok(garden)
    }

    pub async fn remove_collaborator(&self, id: ObjectId, user: &str) -> Result<Garden> {
        let mut garden = self.authorize(id, Access::Manage).await?;
        if !garden.remove_collaborator(user) {
            return Err(Error::validation(format!(
                "'{user}' no colabora en este huerto"
            )));
        }
        self.save(&garden).await?;
        info!(%id, collaborator = user, "colaborador removido");
        Ok(garden)
    }

    pub async fn locations(&self, garden_id: ObjectId) -> Result<Vec<Location>> {
        self.authorize(garden_id, Access::View).await?;
        self.store.list(Some(garden_id)).await
    }

    pub async fn add_location(
        &self,
        garden_id: ObjectId,
        name: String,
        description: Option<String>,
    ) -> Result<Location> {
        self.authorize(garden_id, Access::Edit).await?;
        let location = Location::new(garden_id, name, description)?;
        let location = self.store.insert(location).await?;
        info!(id = ?location.id, %garden_id, "ubicación agregada");
        Ok(location)
    }

    pub async fn update_location(&self, id: ObjectId, patch: LocationPatch) -> Result<Location> {
        let mut location: Location = self.fetch(id).await?;
        self.authorize(location.garden_id, Access::Edit).await?;
        patch.apply(&mut location)?;
        self.save(&location).await?;
        Ok(location)
    }

    pub async fn remove_location(&self, id: ObjectId) -> Result<()> {
        let location: Location = self.fetch(id).await?;
        self.authorize(location.garden_id, Access::Edit).await?;
        self.store.delete::<Location>(id).await?;
        info!(%id, "ubicación removida");
        Ok(())
    }

    /// Plantings of a garden joined with their plants. Plantings whose plant
    /// no longer exists are left out.
    pub async fn plantings(&self, garden_id: ObjectId) -> Result<Vec<PlantingWithPlant>> {
        self.authorize(garden_id, Access::View).await?;
        let plantings: Vec<Planting> = self.store.list(Some(garden_id)).await?;
        let plants: HashMap<ObjectId, Plant> = self
            .plants()
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p)))
            .collect();

        let joined: Vec<_> = plantings
            .into_iter()
            .filter_map(|planting| {
                let plant = plants.get(&planting.plant_id)?.clone();
                Some(PlantingWithPlant { planting, plant })
            })
            .collect();
        debug!(%garden_id, count = joined.len(), "siembras cargadas");
        Ok(joined)
    }

    pub async fn planting(&self, id: ObjectId) -> Result<PlantingWithPlant> {
        let planting: Planting = self.fetch(id).await?;
        self.authorize(planting.garden_id, Access::View).await?;
        let plant = self.fetch(planting.plant_id).await?;
        Ok(PlantingWithPlant { planting, plant })
    }

    pub async fn record_planting(&self, new: NewPlanting) -> Result<PlantingWithPlant> {
        new.validate()?;
        self.authorize(new.garden_id, Access::Edit).await?;
        let plant: Plant = self.fetch(new.plant_id).await?;
        let planting = self.store.insert(new.into_planting()).await?;
        info!(id = ?planting.id, plant = %plant.name, "siembra registrada");
        Ok(PlantingWithPlant { planting, plant })
    }

    pub async fn update_planting(
        &self,
        id: ObjectId,
        patch: PlantingPatch,
    ) -> Result<PlantingWithPlant> {
        if patch.is_empty() {
            return Err(Error::validation("no se proporcionaron cambios"));
        }
        let mut planting: Planting = self.fetch(id).await?;
        self.authorize(planting.garden_id, Access::Edit).await?;
        patch.apply(&mut planting)?;
        let plant = self.fetch(planting.plant_id).await?;
        self.save(&planting).await?;
        info!(%id, "siembra actualizada");
        Ok(PlantingWithPlant { planting, plant })
    }

    pub async fn harvest(&self, id: ObjectId, harvest: Harvest) -> Result<PlantingWithPlant> {
        let mut planting: Planting = self.fetch(id).await?;
        self.authorize(planting.garden_id, Access::Edit).await?;
        planting.record_harvest(harvest)?;
        self.save(&planting).await?;
        let plant = self.fetch(planting.plant_id).await?;
        info!(%id, quantity = ?planting.harvested_quantity, "cosecha registrada");
        Ok(PlantingWithPlant { planting, plant })
    }

    pub async fn remove_planting(&self, id: ObjectId) -> Result<()> {
        let planting: Planting = self.fetch(id).await?;
        self.authorize(planting.garden_id, Access::Edit).await?;
        self.store.delete::<Planting>(id).await?;
        info!(%id, "siembra removida");
        Ok(())
    }

    pub async fn stats(&self, garden_id: ObjectId, reference: NaiveDate) -> Result<GardenStats> {
        let plantings = self.plantings(garden_id).await?;
        Ok(aggregate(&plantings, reference))
    }
}

fn warn_on_inverted_durations(plant: &Plant) {
    if plant.days_to_harvest < plant.days_to_sprout {
        warn!(
            name = %plant.name,
            days_to_sprout = plant.days_to_sprout,
            days_to_harvest = plant.days_to_harvest,
            "la cosecha llega antes que la brotación"
        );
    }
}
