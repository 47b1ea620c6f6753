use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Document};
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::{Record, Store};
use crate::error::Result;
use crate::models::Plant;
use crate::seed;

type Table = BTreeMap<ObjectId, Document>;

/// Process-local store. Records are kept as BSON documents so they go
/// through the same serde mapping as in MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the sample plant library.
    pub async fn with_samples() -> Result<Self> {
        let store = Self::new();
        for plant in seed::sample_plants() {
            store.insert::<Plant>(plant.into_plant()).await?;
        }
        Ok(store)
    }
}

fn in_scope<T: Record>(record: &T, garden: Option<ObjectId>) -> bool {
    garden.is_none() || record.garden_id() == garden
}

#[async_trait]
impl Store for MemoryStore {
    async fn list<T: Record>(&self, garden: Option<ObjectId>) -> Result<Vec<T>> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(T::COLLECTION) else {
            return Ok(vec![]);
        };
        let mut records = Vec::with_capacity(table.len());
        for document in table.values() {
            let record: T = bson::from_document(document.clone())?;
            if in_scope(&record, garden) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn get<T: Record>(&self, id: ObjectId) -> Result<Option<T>> {
        let tables = self.tables.read().await;
        match tables.get(T::COLLECTION).and_then(|table| table.get(&id)) {
            Some(document) => Ok(Some(bson::from_document(document.clone())?)),
            None => Ok(None),
        }
    }

    async fn insert<T: Record>(&self, mut record: T) -> Result<T> {
        let id = ObjectId::new();
        record.set_id(id);
        let document = bson::to_document(&record)?;
        self.tables
            .write()
            .await
            .entry(T::COLLECTION)
            .or_default()
            .insert(id, document);
        debug!(collection = T::COLLECTION, %id, "documento insertado en memoria");
        Ok(record)
    }

    async fn replace<T: Record>(&self, record: &T) -> Result<bool> {
        let Some(id) = record.id() else {
            return Ok(false);
        };
        let document = bson::to_document(record)?;
        let mut tables = self.tables.write().await;
        match tables
            .get_mut(T::COLLECTION)
            .and_then(|table| table.get_mut(&id))
        {
            Some(slot) => {
                *slot = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete<T: Record>(&self, id: ObjectId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(T::COLLECTION)
            .map(|table| table.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn delete_in_garden<T: Record>(&self, garden: ObjectId) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(T::COLLECTION) else {
            return Ok(0);
        };
        let mut doomed = Vec::new();
        for (id, document) in table.iter() {
            let record: T = bson::from_document(document.clone())?;
            if record.garden_id() == Some(garden) {
                doomed.push(*id);
            }
        }
        for id in &doomed {
            table.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Location};

    #[tokio::test]
    async fn crud_by_id() {
        let store = MemoryStore::new();
        let plant = seed::sample_plants().remove(0).into_plant();

        let mut stored = store.insert(plant).await.unwrap();
        let id = stored.id.unwrap();
        assert_eq!(store.get::<Plant>(id).await.unwrap(), Some(stored.clone()));

        stored.category = Category::Fruit;
        assert!(store.replace(&stored).await.unwrap());
        let reloaded: Plant = store.get(id).await.unwrap().unwrap();
        assert_eq!(reloaded.category, Category::Fruit);

        assert!(store.delete::<Plant>(id).await.unwrap());
        assert!(!store.delete::<Plant>(id).await.unwrap());
        assert_eq!(store.get::<Plant>(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn replace_of_unknown_record_reports_false() {
        let store = MemoryStore::new();
        let mut plant = seed::sample_plants().remove(0).into_plant();
        assert!(!store.replace(&plant).await.unwrap());

        plant.id = Some(ObjectId::new());
        assert!(!store.replace(&plant).await.unwrap());
    }

    #[tokio::test]
    async fn lists_are_scoped_by_garden() {
        let store = MemoryStore::new();
        let front = ObjectId::new();
        let back = ObjectId::new();

        for (garden, name) in [(front, "Jardín"), (back, "Patio"), (front, "Ventana")] {
            let location = Location::new(garden, name.into(), None).unwrap();
            store.insert(location).await.unwrap();
        }

        let names: Vec<String> = store
            .list::<Location>(Some(front))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Jardín", "Ventana"]);
        assert_eq!(store.list::<Location>(None).await.unwrap().len(), 3);

        assert_eq!(store.delete_in_garden::<Location>(front).await.unwrap(), 2);
        assert_eq!(store.list::<Location>(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn samples_are_loaded() {
        let store = MemoryStore::with_samples().await.unwrap();
        let plants = store.list::<Plant>(None).await.unwrap();
        assert_eq!(plants.len(), seed::sample_plants().len());
    }
}
