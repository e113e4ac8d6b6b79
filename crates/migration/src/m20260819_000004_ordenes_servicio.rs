use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cliente/equipo references are RESTRICT: deleting either is blocked
        // while an order points at it. User references are SET NULL so that
        // deleting an account never drops order history.
        manager
            .create_table(
                Table::create()
                    .table(OrdenesServicio::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdenesServicio::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdenesServicio::ClienteId).big_integer().not_null())
                    .col(ColumnDef::new(OrdenesServicio::EquipoId).big_integer().not_null())
                    .col(ColumnDef::new(OrdenesServicio::AsistenteReceptorId).big_integer())
                    .col(ColumnDef::new(OrdenesServicio::TecnicoAsignadoId).big_integer())
                    .col(ColumnDef::new(OrdenesServicio::DescripcionFalla).text().not_null())
                    .col(ColumnDef::new(OrdenesServicio::ContrasenaEquipo).string())
                    .col(ColumnDef::new(OrdenesServicio::Estado).string_len(50).not_null())
                    .col(ColumnDef::new(OrdenesServicio::Prioridad).string_len(20).not_null())
                    .col(ColumnDef::new(OrdenesServicio::FechaCreacion).big_integer().not_null())
                    .col(ColumnDef::new(OrdenesServicio::FechaCierre).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_cliente_id")
                            .from(OrdenesServicio::Table, OrdenesServicio::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_equipo_id")
                            .from(OrdenesServicio::Table, OrdenesServicio::EquipoId)
                            .to(Equipos::Table, Equipos::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_asistente_receptor_id")
                            .from(OrdenesServicio::Table, OrdenesServicio::AsistenteReceptorId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_tecnico_asignado_id")
                            .from(OrdenesServicio::Table, OrdenesServicio::TecnicoAsignadoId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ordenes_cliente_id")
                    .table(OrdenesServicio::Table)
                    .col(OrdenesServicio::ClienteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ordenes_tecnico_asignado_id")
                    .table(OrdenesServicio::Table)
                    .col(OrdenesServicio::TecnicoAsignadoId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ordenes_estado")
                    .table(OrdenesServicio::Table)
                    .col(OrdenesServicio::Estado)
                    .to_owned(),
            )
            .await?;

        // Join table orden <-> tipo de servicio.
        manager
            .create_table(
                Table::create()
                    .table(OrdenesTiposServicio::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdenesTiposServicio::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdenesTiposServicio::OrdenId).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrdenesTiposServicio::TipoServicioId)
                            .big_integer()
                            .not_null(),
                    )
                    .index(
                        Index::create()
                            .name("uidx_ordenes_tipos_servicio_pair")
                            .col(OrdenesTiposServicio::OrdenId)
                            .col(OrdenesTiposServicio::TipoServicioId)
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_tipos_servicio_orden_id")
                            .from(OrdenesTiposServicio::Table, OrdenesTiposServicio::OrdenId)
                            .to(OrdenesServicio::Table, OrdenesServicio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_tipos_servicio_tipo_id")
                            .from(OrdenesTiposServicio::Table, OrdenesTiposServicio::TipoServicioId)
                            .to(TiposServicio::Table, TiposServicio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ordenes_tipos_servicio_orden_id")
                    .table(OrdenesTiposServicio::Table)
                    .col(OrdenesTiposServicio::OrdenId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdenesTiposServicio::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrdenesServicio::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum OrdenesServicio {
    Table,
    Id,
    ClienteId,
    EquipoId,
    AsistenteReceptorId,
    TecnicoAsignadoId,
    DescripcionFalla,
    ContrasenaEquipo,
    Estado,
    Prioridad,
    FechaCreacion,
    FechaCierre,
}

#[derive(DeriveIden)]
enum OrdenesTiposServicio {
    Table,
    Id,
    OrdenId,
    TipoServicioId,
}

#[derive(DeriveIden)]
enum Clientes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Equipos {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Usuarios {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TiposServicio {
    Table,
    Id,
}
