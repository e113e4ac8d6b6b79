use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clientes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clientes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clientes::NombreCompleto).string().not_null())
                    .col(ColumnDef::new(Clientes::Telefono).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Clientes::Email).string().unique_key())
                    .col(ColumnDef::new(Clientes::Rfc).string_len(13))
                    .col(ColumnDef::new(Clientes::Calle).string())
                    .col(ColumnDef::new(Clientes::NumeroExterior).string_len(20))
                    .col(ColumnDef::new(Clientes::NumeroInterior).string_len(20))
                    .col(ColumnDef::new(Clientes::Colonia).string_len(100))
                    .col(ColumnDef::new(Clientes::CodigoPostal).string_len(10))
                    .col(ColumnDef::new(Clientes::Ciudad).string_len(100))
                    .col(ColumnDef::new(Clientes::Estado).string_len(100))
                    .col(ColumnDef::new(Clientes::FechaRegistro).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Equipos cascade with their cliente; ordenes protect them instead
        // (see the ordenes_servicio migration).
        manager
            .create_table(
                Table::create()
                    .table(Equipos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Equipos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Equipos::ClienteId).big_integer().not_null())
                    .col(ColumnDef::new(Equipos::TipoEquipo).string_len(100).not_null())
                    .col(ColumnDef::new(Equipos::Marca).string_len(100).not_null())
                    .col(ColumnDef::new(Equipos::Modelo).string_len(100).not_null())
                    .col(ColumnDef::new(Equipos::NumeroSerie).string_len(100))
                    .col(ColumnDef::new(Equipos::Contrasena).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipos_cliente_id")
                            .from(Equipos::Table, Equipos::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_equipos_cliente_id")
                    .table(Equipos::Table)
                    .col(Equipos::ClienteId)
                    .to_owned(),
            )
            .await?;

        // NULL serials never collide under SQL unique semantics, so this
        // enforces "(cliente, serie) unique when serial present" directly.
        manager
            .create_index(
                Index::create()
                    .name("uidx_equipos_cliente_serie")
                    .table(Equipos::Table)
                    .col(Equipos::ClienteId)
                    .col(Equipos::NumeroSerie)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Equipos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clientes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Clientes {
    Table,
    Id,
    NombreCompleto,
    Telefono,
    Email,
    Rfc,
    Calle,
    NumeroExterior,
    NumeroInterior,
    Colonia,
    CodigoPostal,
    Ciudad,
    Estado,
    FechaRegistro,
}

#[derive(DeriveIden)]
enum Equipos {
    Table,
    Id,
    ClienteId,
    TipoEquipo,
    Marca,
    Modelo,
    NumeroSerie,
    Contrasena,
}
