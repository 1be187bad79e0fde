use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserPlants::Table)
                    .add_column(ColumnDef::new(UserPlants::Nickname).text())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserPlants::Table)
                    .drop_column(UserPlants::Nickname)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum UserPlants {
    Table,
    Nickname,
}
