use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proveedores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Proveedores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Proveedores::NombreEmpresa)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Proveedores::PersonaContacto).string())
                    .col(ColumnDef::new(Proveedores::Telefono).string_len(20))
                    .col(ColumnDef::new(Proveedores::Email).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TiposServicio::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TiposServicio::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TiposServicio::NombreServicio)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TiposServicio::Descripcion).text())
                    .col(
                        ColumnDef::new(TiposServicio::CostoEstandar)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TiposServicio::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Proveedores::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Proveedores {
    Table,
    Id,
    NombreEmpresa,
    PersonaContacto,
    Telefono,
    Email,
}

#[derive(DeriveIden)]
enum TiposServicio {
    Table,
    Id,
    NombreServicio,
    Descripcion,
    CostoEstandar,
}
