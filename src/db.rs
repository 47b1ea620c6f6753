use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Garden, Location, Plant, Planting};

/// A document kept in its own collection and addressed by `_id`.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
    const ENTITY: &'static str;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);

    /// Garden that scopes the record, if any.
    fn garden_id(&self) -> Option<ObjectId> {
        None
    }
}

impl Record for Plant {
    const COLLECTION: &'static str = "plants";
    const ENTITY: &'static str = "Planta";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Record for Garden {
    const COLLECTION: &'static str = "gardens";
    const ENTITY: &'static str = "Huerto";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl Record for Location {
    const COLLECTION: &'static str = "locations";
    const ENTITY: &'static str = "Ubicación";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn garden_id(&self) -> Option<ObjectId> {
        Some(self.garden_id)
    }
}

impl Record for Planting {
    const COLLECTION: &'static str = "plantings";
    const ENTITY: &'static str = "Siembra";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn garden_id(&self) -> Option<ObjectId> {
        Some(self.garden_id)
    }
}

/// Storage for garden records: create, read, replace and delete by id.
///
/// Implementations assign ids on insert and never interpret record contents
/// beyond the garden scope used by [`Store::list`].
#[async_trait]
pub trait Store: Send + Sync {
    /// All records of a kind, optionally restricted to one garden, in
    /// insertion order.
    async fn list<T: Record>(&self, garden: Option<ObjectId>) -> Result<Vec<T>>;

    async fn get<T: Record>(&self, id: ObjectId) -> Result<Option<T>>;

    async fn insert<T: Record>(&self, record: T) -> Result<T>;

    /// Returns false when no record with the same id exists.
    async fn replace<T: Record>(&self, record: &T) -> Result<bool>;

    /// Returns false when nothing was deleted.
    async fn delete<T: Record>(&self, id: ObjectId) -> Result<bool>;

    /// Deletes every record of a kind that belongs to `garden`.
    async fn delete_in_garden<T: Record>(&self, garden: ObjectId) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects and pings the server so a bad URI fails before any command runs.
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.server_selection_timeout = Some(config.timeout);
        client_options.app_name = Some("my-huerto".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database = %config.database, "conectado a MongoDB");

        Ok(Self { db })
    }

    fn collection<T: Record>(&self) -> Collection<T> {
        self.db.collection::<T>(T::COLLECTION)
    }
}

fn scope_filter(garden: Option<ObjectId>) -> Document {
    match garden {
        Some(garden_id) => doc! { "garden_id": garden_id },
        None => doc! {},
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn list<T: Record>(&self, garden: Option<ObjectId>) -> Result<Vec<T>> {
        debug!(collection = T::COLLECTION, ?garden, "listando documentos");
        let cursor = self
            .collection::<T>()
            .find(scope_filter(garden))
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get<T: Record>(&self, id: ObjectId) -> Result<Option<T>> {
        Ok(self.collection::<T>().find_one(doc! { "_id": id }).await?)
    }

    async fn insert<T: Record>(&self, mut record: T) -> Result<T> {
        record.set_id(ObjectId::new());
        self.collection::<T>().insert_one(&record).await?;
        Ok(record)
    }

    async fn replace<T: Record>(&self, record: &T) -> Result<bool> {
        let Some(id) = record.id() else {
            return Ok(false);
        };
        let result = self
            .collection::<T>()
            .replace_one(doc! { "_id": id }, record)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete<T: Record>(&self, id: ObjectId) -> Result<bool> {
        let result = self.collection::<T>().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_in_garden<T: Record>(&self, garden: ObjectId) -> Result<u64> {
        let result = self
            .collection::<T>()
            .delete_many(doc! { "garden_id": garden })
            .await?;
        Ok(result.deleted_count)
    }
}
