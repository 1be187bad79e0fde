use sea_orm_migration::prelude::*;

mod m001_initial;
mod m002_add_plant_nickname;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_initial::Migration),
            Box::new(m002_add_plant_nickname::Migration),
        ]
    }

    // Each module tracks its own migrations in the shared database.
    fn migration_table_name() -> DynIden {
        Alias::new("plant_care_migrations").into_iden()
    }
}
