//! SeaORM repositories against a real (in-memory) database.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing_test::traced_test;
use uuid::Uuid;

use appkit::db::{connect, DbConnConfig, MEMORY_DSN};
use plant_care::contract::model::{CatalogPlant, UserPlant};
use plant_care::domain::repo::{CatalogRepository, UserPlantsRepository};
use plant_care::infra::storage::migrations::Migrator;
use plant_care::infra::storage::{SeaOrmCatalogRepository, SeaOrmUserPlantsRepository};

async fn migrated_db() -> DatabaseConnection {
    let db = connect(
        &DbConnConfig {
            url: MEMORY_DSN.to_string(),
            max_conns: None,
            busy_timeout_ms: None,
        },
        &std::env::temp_dir(),
    )
    .await
    .unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn catalog(plant_id: i32, common_name: &str) -> CatalogPlant {
    CatalogPlant {
        plant_id,
        botanical_name: format!("Planta {plant_id}"),
        common_name: common_name.into(),
        water_needs: "Low".into(),
        min_water_consumption: 300,
        max_water_consumption: 600,
        ..Default::default()
    }
}

fn owned(user_id: Uuid, plant_id: i32) -> UserPlant {
    UserPlant {
        id: Uuid::new_v4(),
        user_id,
        plant_id,
        size: Some(40.0),
        sun_exposure: Some("Full Sun".into()),
        pot_diameter_cm: Some(20.0),
        last_watered: None,
        watered_amount_l: None,
        image_path: None,
        position: None,
        nickname: None,
        registered_at: Utc::now(),
    }
}

#[tokio::test]
async fn records_join_the_catalog_entry() {
    let db = migrated_db().await;
    let catalog_repo = SeaOrmCatalogRepository::new(db.clone());
    let plants = SeaOrmUserPlantsRepository::new(db.clone());
    catalog_repo.upsert(catalog(1, "River Wattle")).await.unwrap();

    let user = Uuid::new_v4();
    let plant = owned(user, 1);
    plants.insert(plant.clone()).await.unwrap();

    let record = plants.find_record(plant.id).await.unwrap().unwrap();
    assert_eq!(record.catalog.common_name, "River Wattle");
    let listed = plants.list_records(user).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].plant.id, plant.id);
}

#[tokio::test]
#[traced_test]
async fn plant_without_catalog_entry_is_skipped_with_a_warning() {
    let db = migrated_db().await;
    let catalog_repo = SeaOrmCatalogRepository::new(db.clone());
    let plants = SeaOrmUserPlantsRepository::new(db.clone());
    catalog_repo.upsert(catalog(1, "River Wattle")).await.unwrap();
    catalog_repo.upsert(catalog(2, "Ashby's Banksia")).await.unwrap();

    let user = Uuid::new_v4();
    let kept = owned(user, 1);
    let orphan = owned(user, 2);
    plants.insert(kept.clone()).await.unwrap();
    plants.insert(orphan.clone()).await.unwrap();

    // Only reachable with the foreign key switched off, e.g. a hand-edited database.
    db.execute_unprepared("PRAGMA foreign_keys = OFF").await.unwrap();
    db.execute_unprepared("DELETE FROM catalog_plants WHERE plant_id = 2")
        .await
        .unwrap();

    let listed = plants.list_records(user).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].plant.id, kept.id);
    assert!(plants.find_record(orphan.id).await.unwrap().is_none());
    assert!(plants.find_by_id(orphan.id).await.unwrap().is_some());
    assert!(logs_contain("user plant references a missing catalog entry"));
}
