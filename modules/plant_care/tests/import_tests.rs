//! Catalog CSV import against a real (in-memory) database.

use std::io::Write;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tempfile::NamedTempFile;

use appkit::db::{connect, DbConnConfig, MEMORY_DSN};
use plant_care::domain::repo::CatalogRepository;
use plant_care::import::{import_catalog_file, refresh_catalog_images_file};
use plant_care::infra::storage::SeaOrmCatalogRepository;

const HEADER: &str = "Plant ID,Botanical Name,Common Name,Plant Type,Water Needs,min_water_consumption,max_water_consumption,Climate Zones,Light Needs,Soil Type,Maintenance,Flower colour,Foliage Colour,Perfume,Aromatic,Edible,Bore water Tolerance,Frost Tolerance,Image Location";

async fn memory_db() -> DatabaseConnection {
    connect(
        &DbConnConfig {
            url: MEMORY_DSN.to_string(),
            max_conns: None,
            busy_timeout_ms: None,
        },
        &std::env::temp_dir(),
    )
    .await
    .unwrap()
}

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "{HEADER}").unwrap();
    for r in rows {
        writeln!(f, "{r}").unwrap();
    }
    f.flush().unwrap();
    f
}

#[tokio::test]
async fn import_inserts_then_updates() {
    let db = memory_db().await;
    let first = csv_file(&[
        "1.0,Acacia cognata,River Wattle,Shrub,Low,300,600,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,img/1.jpg",
        "2,Banksia ashbyi,Ashby's Banksia,Tree,Low,,,Arid,Full sun,Sand,Low,Orange,Grey,No,No,No,Yes,None,img/2.jpg",
    ]);
    let summary = import_catalog_file(&db, first.path()).await.unwrap();
    assert_eq!((summary.inserted, summary.updated), (2, 0));

    let second = csv_file(&[
        "1,Acacia cognata,River Wattle,Shrub,Medium,350,650,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,img/1.jpg",
    ]);
    let summary = import_catalog_file(&db, second.path()).await.unwrap();
    assert_eq!((summary.inserted, summary.updated), (0, 1));

    let repo = SeaOrmCatalogRepository::new(db.clone());
    let wattle = repo.find(1).await.unwrap().unwrap();
    assert_eq!(wattle.water_needs, "Medium");
    assert_eq!(wattle.min_water_consumption, 350);
    let banksia = repo.find(2).await.unwrap().unwrap();
    assert_eq!(banksia.max_water_consumption, 0);
}

#[tokio::test]
async fn refresh_updates_known_names_and_skips_others() {
    let db = memory_db().await;
    let catalog = csv_file(&[
        "1,Acacia cognata,River Wattle,Shrub,Low,300,600,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,old.jpg",
    ]);
    import_catalog_file(&db, catalog.path()).await.unwrap();

    let images = csv_file(&[
        "1,Acacia cognata,River Wattle,Shrub,Low,300,600,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,new.jpg",
        "9,Unknownia,Ghost,Shrub,Low,1,2,E,F,G,H,I,J,K,L,M,N,O,ghost.jpg",
    ]);
    let summary = refresh_catalog_images_file(&db, images.path()).await.unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, vec!["Unknownia".to_string()]);

    let repo = SeaOrmCatalogRepository::new(db);
    assert_eq!(repo.find(1).await.unwrap().unwrap().image_location, "new.jpg");
}

#[tokio::test]
async fn malformed_file_imports_nothing() {
    let db = memory_db().await;
    let good = csv_file(&[
        "5,Eremophila nivea,Silky Eremophila,Shrub,Low,100,200,Arid,Full sun,Sand,Low,Purple,Silver,No,No,No,Yes,Light,e.jpg",
    ]);
    import_catalog_file(&db, good.path()).await.unwrap();

    let bad = csv_file(&[
        "1,Acacia cognata,River Wattle,Shrub,Low,300,600,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,a.jpg",
        "oops,Broken,Row,Shrub,Low,1,2,E,F,G,H,I,J,K,L,M,N,O,b.jpg",
    ]);
    let err = import_catalog_file(&db, bad.path()).await.unwrap_err();
    assert!(format!("{err:#}").contains("line 3"), "{err:#}");

    let repo = SeaOrmCatalogRepository::new(db);
    assert!(repo.find(1).await.unwrap().is_none());
    assert!(repo.find(5).await.unwrap().is_some());
}

#[tokio::test]
async fn missing_file_is_reported() {
    let db = memory_db().await;
    let err = import_catalog_file(&db, std::path::Path::new("/nonexistent/plants.csv"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("plants.csv"));
}

const WATTLE: &str = "1,Acacia cognata,River Wattle,Shrub,Low,300,600,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,old.jpg";
const BANKSIA: &str = "2,Banksia ashbyi,Ashby's Banksia,Tree,Low,,,Arid,Full sun,Sand,Low,Orange,Grey,No,No,No,Yes,None,old.jpg";
const EREMOPHILA: &str = "5,Eremophila nivea,Silky Eremophila,Shrub,Low,100,200,Arid,Full sun,Sand,Low,Purple,Silver,No,No,No,Yes,Light,e.jpg";

#[tokio::test]
async fn database_failure_rolls_back_the_whole_import() {
    let db = memory_db().await;
    import_catalog_file(&db, csv_file(&[EREMOPHILA]).path())
        .await
        .unwrap();
    db.execute_unprepared(
        "CREATE TRIGGER reject_banksia BEFORE INSERT ON catalog_plants \
         WHEN NEW.plant_id = 2 BEGIN SELECT RAISE(ABORT, 'plant 2 rejected'); END;",
    )
    .await
    .unwrap();

    let file = csv_file(&[WATTLE, BANKSIA]);
    assert!(import_catalog_file(&db, file.path()).await.is_err());

    let repo = SeaOrmCatalogRepository::new(db);
    assert!(repo.find(1).await.unwrap().is_none());
    assert!(repo.find(2).await.unwrap().is_none());
    assert!(repo.find(5).await.unwrap().is_some());
}

#[tokio::test]
async fn database_failure_rolls_back_the_whole_refresh() {
    let db = memory_db().await;
    import_catalog_file(&db, csv_file(&[WATTLE, BANKSIA]).path())
        .await
        .unwrap();
    db.execute_unprepared(
        "CREATE TRIGGER freeze_banksia BEFORE UPDATE ON catalog_plants \
         WHEN NEW.plant_id = 2 BEGIN SELECT RAISE(ABORT, 'plant 2 frozen'); END;",
    )
    .await
    .unwrap();

    let images = csv_file(&[
        "1,Acacia cognata,River Wattle,Shrub,Low,300,600,Temperate,Full sun,Sand,Low,Yellow,Green,No,No,No,Yes,Light,new.jpg",
        "2,Banksia ashbyi,Ashby's Banksia,Tree,Low,,,Arid,Full sun,Sand,Low,Orange,Grey,No,No,No,Yes,None,new.jpg",
    ]);
    assert!(refresh_catalog_images_file(&db, images.path()).await.is_err());

    let repo = SeaOrmCatalogRepository::new(db);
    assert_eq!(repo.find(1).await.unwrap().unwrap().image_location, "old.jpg");
    assert_eq!(repo.find(2).await.unwrap().unwrap().image_location, "old.jpg");
}
