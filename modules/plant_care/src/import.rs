//! Catalog maintenance entry points for the command line.
//!
//! Each file is applied in a single transaction: a failing row leaves the
//! catalog as it was before the run.

use std::fs::File;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use sea_orm_migration::MigratorTrait;

use crate::contract::model::{ImportSummary, RefreshSummary};
use crate::domain::catalog_import::CatalogImporter;
use crate::domain::error::DomainError;
use crate::infra::catalog_csv;
use crate::infra::storage::{migrations::Migrator, SeaOrmCatalogRepository};

/// Run `work` against an importer bound to a fresh transaction and commit on success.
async fn in_transaction<T, F, Fut>(db: &DatabaseConnection, work: F) -> anyhow::Result<T>
where
    F: FnOnce(CatalogImporter) -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    Migrator::up(db, None)
        .await
        .context("running plant_care migrations")?;

    let txn = db.begin().await.context("starting catalog transaction")?;
    let repo = Arc::new(SeaOrmCatalogRepository::new(txn));
    // dropping the transaction on error rolls it back
    let out = work(CatalogImporter::new(repo.clone())).await?;

    let txn: DatabaseTransaction = Arc::try_unwrap(repo)
        .map_err(|_| anyhow!("catalog transaction is still in use"))?
        .into_inner();
    txn.commit().await.context("committing catalog transaction")?;
    Ok(out)
}

/// Import (or re-import) the plant catalog from a waterwise CSV file.
pub async fn import_catalog_file(
    db: &DatabaseConnection,
    csv_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let file = File::open(csv_path)
        .with_context(|| format!("opening {}", csv_path.display()))?;
    let plants = catalog_csv::parse_catalog(file)?;
    in_transaction(db, |importer| async move { importer.import_catalog(plants).await }).await
}

/// Update catalog image locations by botanical name from a CSV file.
pub async fn refresh_catalog_images_file(
    db: &DatabaseConnection,
    csv_path: &Path,
) -> anyhow::Result<RefreshSummary> {
    let file = File::open(csv_path)
        .with_context(|| format!("opening {}", csv_path.display()))?;
    let rows = catalog_csv::parse_image_locations(file)?;
    in_transaction(db, |importer| async move {
        importer.refresh_catalog_images(rows).await
    })
    .await
}
