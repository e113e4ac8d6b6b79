use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BitacoraOrdenes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BitacoraOrdenes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BitacoraOrdenes::OrdenId).big_integer().not_null())
                    .col(ColumnDef::new(BitacoraOrdenes::UsuarioId).big_integer())
                    .col(ColumnDef::new(BitacoraOrdenes::FechaHora).big_integer().not_null())
                    .col(ColumnDef::new(BitacoraOrdenes::Descripcion).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bitacora_orden_id")
                            .from(BitacoraOrdenes::Table, BitacoraOrdenes::OrdenId)
                            .to(OrdenesServicio::Table, OrdenesServicio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bitacora_usuario_id")
                            .from(BitacoraOrdenes::Table, BitacoraOrdenes::UsuarioId)
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
                    .name("idx_bitacora_orden_id")
                    .table(BitacoraOrdenes::Table)
                    .col(BitacoraOrdenes::OrdenId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bitacora_fecha_hora")
                    .table(BitacoraOrdenes::Table)
                    .col(BitacoraOrdenes::FechaHora)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BitacoraOrdenes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum BitacoraOrdenes {
    Table,
    Id,
    OrdenId,
    UsuarioId,
    FechaHora,
    Descripcion,
}

#[derive(DeriveIden)]
enum OrdenesServicio {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Usuarios {
    Table,
    Id,
}
