use sea_orm_migration::prelude::*;

mod m001_initial;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m001_initial::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("accounts_migrations").into_iden()
    }
}
