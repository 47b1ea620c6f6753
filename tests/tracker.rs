use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use my_huerto::dashboard::GardenStats;
use my_huerto::lifecycle::PlantFilter;
use my_huerto::memory::MemoryStore;
use my_huerto::models::{
    Category, Harvest, LocationPatch, NewPlant, NewPlanting, PlantingPatch, Role, Status,
};
use my_huerto::service::Tracker;
use my_huerto::Error;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn radish() -> NewPlant {
    NewPlant {
        name: "Rábano".into(),
        category: Category::Vegetable,
        days_to_sprout: 5,
        days_to_harvest: 30,
        season: "Primavera".into(),
        description: None,
        image_url: None,
    }
}

fn new_planting(plant_id: ObjectId, garden_id: ObjectId, planted: NaiveDate) -> NewPlanting {
    NewPlanting {
        plant_id,
        garden_id,
        location: "Bancal sur".into(),
        planted_date: planted,
        quantity: 10,
        notes: None,
    }
}

#[tokio::test]
async fn dashboard_counts_follow_recorded_plantings() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden = tracker.create_garden("Huerto".into(), None).await.unwrap();
    let garden_id = garden.id.unwrap();
    let radish = tracker.add_plant(radish()).await.unwrap();
    let radish_id = radish.id.unwrap();

    let early = tracker
        .record_planting(new_planting(radish_id, garden_id, date(2024, 1, 1)))
        .await
        .unwrap();
    tracker
        .record_planting(new_planting(radish_id, garden_id, date(2024, 1, 29)))
        .await
        .unwrap();
    let late = tracker
        .record_planting(new_planting(radish_id, garden_id, date(2024, 1, 31)))
        .await
        .unwrap();
    assert_eq!(early.planting.status, Status::Planted);

    let reference = date(2024, 2, 1);
    assert_eq!(
        tracker.stats(garden_id, reference).await.unwrap(),
        GardenStats {
            active_plantings: 3,
            ready_harvest: 1,
            sprouting_soon: 1,
            plant_varieties: 1,
        }
    );

    tracker
        .harvest(
            early.planting.id.unwrap(),
            Harvest {
                date: date(2024, 2, 1),
                quantity: 8,
                notes: Some("Picantes".into()),
            },
        )
        .await
        .unwrap();

    let stats = tracker.stats(garden_id, reference).await.unwrap();
    assert_eq!(stats.active_plantings, 2);
    assert_eq!(stats.ready_harvest, 0);
    assert_eq!(stats.plant_varieties, 1);

    let reloaded = tracker.planting(early.planting.id.unwrap()).await.unwrap();
    assert_eq!(reloaded.lifecycle(reference).status, Status::Harvested);
    assert_eq!(reloaded.planting.harvested_quantity, Some(8));

    let late = tracker.planting(late.planting.id.unwrap()).await.unwrap();
    assert_eq!(late.lifecycle(reference).status, Status::Sprouting);
}

#[tokio::test]
async fn harvesting_twice_is_rejected() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden_id = tracker
        .create_garden("Huerto".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let plant_id = tracker.add_plant(radish()).await.unwrap().id.unwrap();
    let id = tracker
        .record_planting(new_planting(plant_id, garden_id, date(2024, 1, 1)))
        .await
        .unwrap()
        .planting
        .id
        .unwrap();

    let harvest = Harvest {
        date: date(2024, 2, 1),
        quantity: 10,
        notes: None,
    };
    tracker.harvest(id, harvest.clone()).await.unwrap();
    assert!(matches!(
        tracker.harvest(id, harvest).await,
        Err(Error::AlreadyHarvested(_))
    ));
}

#[tokio::test]
async fn collaborators_get_role_based_access() {
    let store = MemoryStore::new();
    let owner = Tracker::new(store, "ana");
    let garden_id = owner
        .create_garden("Compartido".into(), Some("Patio trasero".into()))
        .await
        .unwrap()
        .id
        .unwrap();
    let plant_id = owner.add_plant(radish()).await.unwrap().id.unwrap();
    owner
        .add_collaborator(garden_id, "luis", Role::Viewer)
        .await
        .unwrap();
    let garden = owner
        .add_collaborator(garden_id, "eva", Role::Editor)
        .await
        .unwrap();
    assert_eq!(garden.collaborators.len(), 2);

    // Same store, different acting users.
    let store = owner.into_store();
    let viewer = Tracker::new(store, "luis");
    assert_eq!(viewer.gardens().await.unwrap().len(), 1);
    assert!(viewer.plantings(garden_id).await.unwrap().is_empty());
    assert!(matches!(
        viewer
            .record_planting(new_planting(plant_id, garden_id, date(2024, 3, 1)))
            .await,
        Err(Error::Forbidden { .. })
    ));

    let editor = Tracker::new(viewer.into_store(), "eva");
    editor
        .record_planting(new_planting(plant_id, garden_id, date(2024, 3, 1)))
        .await
        .unwrap();
    assert!(matches!(
        editor.add_collaborator(garden_id, "pedro", Role::Editor).await,
        Err(Error::Forbidden { .. })
    ));

    let stranger = Tracker::new(editor.into_store(), "pedro");
    assert!(stranger.gardens().await.unwrap().is_empty());
    assert!(matches!(
        stranger.plantings(garden_id).await,
        Err(Error::Forbidden { .. })
    ));
}

#[tokio::test]
async fn plants_in_use_cannot_be_removed() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden_id = tracker
        .create_garden("Huerto".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let plant_id = tracker.add_plant(radish()).await.unwrap().id.unwrap();
    let planting_id = tracker
        .record_planting(new_planting(plant_id, garden_id, date(2024, 1, 1)))
        .await
        .unwrap()
        .planting
        .id
        .unwrap();

    assert!(matches!(
        tracker.remove_plant(plant_id).await,
        Err(Error::PlantInUse { plantings: 1, .. })
    ));

    tracker.remove_planting(planting_id).await.unwrap();
    tracker.remove_plant(plant_id).await.unwrap();
    assert!(matches!(
        tracker.plant(plant_id).await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn recording_requires_existing_plant_and_garden() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden_id = tracker
        .create_garden("Huerto".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let plant_id = tracker.add_plant(radish()).await.unwrap().id.unwrap();

    assert!(matches!(
        tracker
            .record_planting(new_planting(ObjectId::new(), garden_id, date(2024, 1, 1)))
            .await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        tracker
            .record_planting(new_planting(plant_id, ObjectId::new(), date(2024, 1, 1)))
            .await,
        Err(Error::NotFound { .. })
    ));

    let mut empty = new_planting(plant_id, garden_id, date(2024, 1, 1));
    empty.quantity = 0;
    assert!(matches!(
        tracker.record_planting(empty).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn editing_a_planting_keeps_its_status() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden_id = tracker
        .create_garden("Huerto".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let radish_id = tracker.add_plant(radish()).await.unwrap().id.unwrap();
    let basil_id = tracker
        .add_plant(NewPlant {
            name: "Albahaca".into(),
            category: Category::Herb,
            days_to_sprout: 7,
            days_to_harvest: 75,
            season: "Verano".into(),
            description: None,
            image_url: None,
        })
        .await
        .unwrap()
        .id
        .unwrap();
    let id = tracker
        .record_planting(new_planting(radish_id, garden_id, date(2024, 1, 1)))
        .await
        .unwrap()
        .planting
        .id
        .unwrap();

    let updated = tracker
        .update_planting(
            id,
            PlantingPatch {
                plant_id: Some(basil_id),
                location: Some("Ventana".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.plant.name, "Albahaca");
    assert_eq!(updated.planting.location, "Ventana");
    assert_eq!(updated.planting.status, Status::Planted);

    assert!(matches!(
        tracker.update_planting(id, PlantingPatch::default()).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn moving_planted_date_past_harvest_is_rejected() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden_id = tracker
        .create_garden("Huerto".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let plant_id = tracker.add_plant(radish()).await.unwrap().id.unwrap();
    let id = tracker
        .record_planting(new_planting(plant_id, garden_id, date(2024, 1, 1)))
        .await
        .unwrap()
        .planting
        .id
        .unwrap();
    tracker
        .harvest(
            id,
            Harvest {
                date: date(2024, 2, 1),
                quantity: 10,
                notes: None,
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        tracker
            .update_planting(
                id,
                PlantingPatch {
                    planted_date: Some(date(2024, 6, 1)),
                    ..Default::default()
                },
            )
            .await,
        Err(Error::Validation(_))
    ));
    let stored = tracker.planting(id).await.unwrap();
    assert_eq!(stored.planting.planted_date, date(2024, 1, 1));
}

#[tokio::test]
async fn plant_library_can_be_filtered() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    tracker.add_plant(radish()).await.unwrap();
    tracker
        .add_plant(NewPlant {
            name: "Albahaca".into(),
            category: Category::Herb,
            days_to_sprout: 7,
            days_to_harvest: 75,
            season: "Primavera/Verano".into(),
            description: Some("Aromática para salsas".into()),
            image_url: None,
        })
        .await
        .unwrap();

    let by_description = tracker
        .find_plants(&PlantFilter {
            search: Some("SALSAS".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].name, "Albahaca");

    let spring_vegetables = tracker
        .find_plants(&PlantFilter {
            category: Some(Category::Vegetable),
            season: Some("primavera".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(spring_vegetables.len(), 1);
    assert_eq!(spring_vegetables[0].name, "Rábano");

    assert_eq!(
        tracker.find_plants(&PlantFilter::default()).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn removing_a_garden_cascades() {
    let tracker = Tracker::new(MemoryStore::new(), "ana");
    let garden_id = tracker
        .create_garden("Huerto".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let other_id = tracker
        .create_garden("Balcón".into(), None)
        .await
        .unwrap()
        .id
        .unwrap();
    let plant_id = tracker.add_plant(radish()).await.unwrap().id.unwrap();

    let location = tracker
        .add_location(garden_id, "Invernadero".into(), None)
        .await
        .unwrap();
    tracker
        .update_location(
            location.id.unwrap(),
            LocationPatch {
                description: Some("Temperatura controlada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    tracker
        .add_location(other_id, "Maceta".into(), None)
        .await
        .unwrap();
    tracker
        .record_planting(new_planting(plant_id, garden_id, date(2024, 1, 1)))
        .await
        .unwrap();
    let kept = tracker
        .record_planting(new_planting(plant_id, other_id, date(2024, 1, 1)))
        .await
        .unwrap();

    let locations = tracker.locations(garden_id).await.unwrap();
    assert_eq!(
        locations[0].description.as_deref(),
        Some("Temperatura controlada")
    );

    tracker.remove_garden(garden_id).await.unwrap();

    assert!(matches!(
        tracker.garden(garden_id).await,
        Err(Error::NotFound { .. })
    ));
    assert_eq!(tracker.gardens().await.unwrap().len(), 1);
    assert_eq!(tracker.locations(other_id).await.unwrap().len(), 1);
    let remaining = tracker.plantings(other_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].planting.id, kept.planting.id);

    // The plant is free again once its only other planting goes.
    tracker
        .remove_planting(kept.planting.id.unwrap())
        .await
        .unwrap();
    tracker.remove_plant(plant_id).await.unwrap();
}

#[tokio::test]
async fn seeding_skips_plants_already_in_library() {
    let tracker = Tracker::new(MemoryStore::with_samples().await.unwrap(), "ana");
    let before = tracker.plants().await.unwrap().len();

    assert!(tracker.seed_plants().await.unwrap().is_empty());
    assert_eq!(tracker.plants().await.unwrap().len(), before);
}
