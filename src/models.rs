use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vegetable,
    Herb,
    Fruit,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Vegetable => "vegetable",
            Category::Herb => "herb",
            Category::Fruit => "fruit",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vegetable" | "verdura" => Ok(Category::Vegetable),
            "herb" | "hierba" => Ok(Category::Herb),
            "fruit" | "fruta" => Ok(Category::Fruit),
            other => Err(Error::validation(format!(
                "categoría desconocida '{other}' (vegetable, herb, fruit)"
            ))),
        }
    }
}

/// Lifecycle phase of a planting.
///
/// Only `Planted` and `Harvested` are ever persisted; the other phases are
/// derived on read by [`crate::lifecycle::effective_status`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Planted,
    Sprouting,
    Growing,
    Ready,
    Harvested,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Planted => "planted",
            Status::Sprouting => "sprouting",
            Status::Growing => "growing",
            Status::Ready => "ready",
            Status::Harvested => "harvested",
        };
        f.write_str(name)
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "planted" => Ok(Status::Planted),
            "sprouting" => Ok(Status::Sprouting),
            "growing" => Ok(Status::Growing),
            "ready" => Ok(Status::Ready),
            "harvested" => Ok(Status::Harvested),
            other => Err(Error::validation(format!("estado desconocido '{other}'"))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Plant {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: Category,
    pub days_to_sprout: u32,
    pub days_to_harvest: u32,
    pub season: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlant {
    pub name: String,
    pub category: Category,
    pub days_to_sprout: u32,
    pub days_to_harvest: u32,
    pub season: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl NewPlant {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("season", &self.season)?;
        require_positive("days_to_sprout", self.days_to_sprout)?;
        require_positive("days_to_harvest", self.days_to_harvest)
    }

    pub fn into_plant(self) -> Plant {
        Plant {
            id: None,
            name: self.name.trim().to_string(),
            category: self.category,
            days_to_sprout: self.days_to_sprout,
            days_to_harvest: self.days_to_harvest,
            season: self.season.trim().to_string(),
            description: non_empty(self.description),
            image_url: non_empty(self.image_url),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlantPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub days_to_sprout: Option<u32>,
    pub days_to_harvest: Option<u32>,
    pub season: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl PlantPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.days_to_sprout.is_none()
            && self.days_to_harvest.is_none()
            && self.season.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
    }

    pub fn apply(self, plant: &mut Plant) -> Result<()> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            plant.name = name.trim().to_string();
        }
        if let Some(category) = self.category {
            plant.category = category;
        }
        if let Some(days) = self.days_to_sprout {
            require_positive("days_to_sprout", days)?;
            plant.days_to_sprout = days;
        }
        if let Some(days) = self.days_to_harvest {
            require_positive("days_to_harvest", days)?;
            plant.days_to_harvest = days;
        }
        if let Some(season) = self.season {
            require_text("season", &season)?;
            plant.season = season.trim().to_string();
        }
        if self.description.is_some() {
            plant.description = non_empty(self.description);
        }
        if self.image_url.is_some() {
            plant.image_url = non_empty(self.image_url);
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Editor,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Editor => f.write_str("editor"),
            Role::Viewer => f.write_str("viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(Error::validation(format!(
                "rol desconocido '{other}' (editor, viewer)"
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Collaborator {
    pub user: String,
    pub role: Role,
}

/// What a user wants to do with a garden's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    View,
    Edit,
    Manage,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Garden {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    pub created_at: DateTime<Utc>,
}

impl Garden {
    pub fn new(name: String, description: Option<String>, owner: String) -> Result<Self> {
        require_text("name", &name)?;
        Ok(Garden {
            id: None,
            name: name.trim().to_string(),
            description: non_empty(description),
            owner,
            collaborators: vec![],
            created_at: Utc::now(),
        })
    }

    pub fn role_of(&self, user: &str) -> Option<Role> {
        self.collaborators
            .iter()
            .find(|c| c.user == user)
            .map(|c| c.role)
    }

    /// Owners can do anything, editors can change plantings and locations,
    /// viewers can only read.
    pub fn allows(&self, user: &str, access: Access) -> bool {
        if self.owner == user {
            return true;
        }
        match (self.role_of(user), access) {
            (Some(_), Access::View) => true,
            (Some(Role::Editor), Access::Edit) => true,
            _ => false,
        }
    }

    pub fn add_collaborator(&mut self, user: &str, role: Role) -> Result<()> {
        let user = user.trim();
        require_text("user", user)?;
        if user == self.owner {
            return Err(Error::validation(format!(
                "'{user}' ya es el dueño del huerto"
            )));
        }
        if self.role_of(user).is_some() {
            return Err(Error::validation(format!(
                "'{user}' ya colabora en este huerto"
            )));
        }
        self.collaborators.push(Collaborator {
            user: user.to_string(),
            role,
        });
        Ok(())
    }

    /// Returns false when the user was not a collaborator.
    pub fn remove_collaborator(&mut self, user: &str) -> bool {
        let before = self.collaborators.len();
        self.collaborators.retain(|c| c.user != user.trim());
        self.collaborators.len() != before
    }
}

#[derive(Debug, Clone, Default)]
pub struct GardenPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl GardenPatch {
    pub fn apply(self, garden: &mut Garden) -> Result<()> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            garden.name = name.trim().to_string();
        }
        if self.description.is_some() {
            garden.description = non_empty(self.description);
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub garden_id: ObjectId,
    pub name: String,
    pub description: Option<String>,
}

impl Location {
    pub fn new(garden_id: ObjectId, name: String, description: Option<String>) -> Result<Self> {
        require_text("name", &name)?;
        Ok(Location {
            id: None,
            garden_id,
            name: name.trim().to_string(),
            description: non_empty(description),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl LocationPatch {
    pub fn apply(self, location: &mut Location) -> Result<()> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            location.name = name.trim().to_string();
        }
        if self.description.is_some() {
            location.description = non_empty(self.description);
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Planting {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub plant_id: ObjectId,
    pub garden_id: ObjectId,
    pub location: String,
    pub planted_date: NaiveDate,
    pub quantity: u32,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub harvested_date: Option<NaiveDate>,
    pub harvested_quantity: Option<u32>,
    pub harvested_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Planting {
    pub fn is_harvested(&self) -> bool {
        self.status == Status::Harvested
    }

    /// The only transition of the persisted status: `planted -> harvested`.
    pub fn record_harvest(&mut self, harvest: Harvest) -> Result<()> {
        if self.is_harvested() {
            return Err(Error::AlreadyHarvested(self.id.unwrap_or_default()));
        }
        if harvest.date < self.planted_date {
            return Err(Error::validation(format!(
                "la cosecha ({}) no puede ser anterior a la siembra ({})",
                harvest.date, self.planted_date
            )));
        }
        self.status = Status::Harvested;
        self.harvested_date = Some(harvest.date);
        self.harvested_quantity = Some(harvest.quantity);
        self.harvested_notes = non_empty(harvest.notes);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewPlanting {
    pub plant_id: ObjectId,
    pub garden_id: ObjectId,
    pub location: String,
    pub planted_date: NaiveDate,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl NewPlanting {
    pub fn validate(&self) -> Result<()> {
        require_text("location", &self.location)?;
        require_positive("quantity", self.quantity)
    }

    pub fn into_planting(self) -> Planting {
        Planting {
            id: None,
            plant_id: self.plant_id,
            garden_id: self.garden_id,
            location: self.location.trim().to_string(),
            planted_date: self.planted_date,
            quantity: self.quantity,
            notes: non_empty(self.notes),
            status: Status::Planted,
            harvested_date: None,
            harvested_quantity: None,
            harvested_notes: None,
            created_at: Utc::now(),
        }
    }
}

/// Editable planting fields. The persisted status is deliberately absent:
/// it only changes through [`Planting::record_harvest`].
#[derive(Debug, Clone, Default)]
pub struct PlantingPatch {
    pub plant_id: Option<ObjectId>,
    pub location: Option<String>,
    pub planted_date: Option<NaiveDate>,
    pub quantity: Option<u32>,
    pub notes: Option<String>,
}

impl PlantingPatch {
    pub fn is_empty(&self) -> bool {
        self.plant_id.is_none()
            && self.location.is_none()
            && self.planted_date.is_none()
            && self.quantity.is_none()
            && self.notes.is_none()
    }

    /// Applies the changes. A planted date after an already recorded harvest
    /// is rejected before anything is touched.
    pub fn apply(self, planting: &mut Planting) -> Result<()> {
        if let (Some(date), Some(harvested)) = (self.planted_date, planting.harvested_date) {
            if date > harvested {
                return Err(Error::validation(format!(
                    "la siembra ({date}) no puede ser posterior a la cosecha ({harvested})"
                )));
            }
        }
        if let Some(plant_id) = self.plant_id {
            planting.plant_id = plant_id;
        }
        if let Some(location) = self.location {
            require_text("location", &location)?;
            planting.location = location.trim().to_string();
        }
        if let Some(date) = self.planted_date {
            planting.planted_date = date;
        }
        if let Some(quantity) = self.quantity {
            require_positive("quantity", quantity)?;
            planting.quantity = quantity;
        }
        if self.notes.is_some() {
            planting.notes = non_empty(self.notes);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Harvest {
    pub date: NaiveDate,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// A planting joined with the plant it references.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantingWithPlant {
    pub planting: Planting,
    pub plant: Plant,
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("'{field}' no puede estar vacío")));
    }
    Ok(())
}

fn require_positive(field: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::validation(format!("'{field}' debe ser mayor que 0")));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
