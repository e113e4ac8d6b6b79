use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transferencias::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transferencias::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transferencias::OrdenId).big_integer().not_null())
                    .col(ColumnDef::new(Transferencias::UsuarioSolicitanteId).big_integer())
                    .col(ColumnDef::new(Transferencias::UsuarioAutorizaId).big_integer())
                    .col(ColumnDef::new(Transferencias::FechaAutorizacion).big_integer())
                    .col(ColumnDef::new(Transferencias::DocumentoReferencia).string_len(100))
                    .col(ColumnDef::new(Transferencias::FechaTransferencia).big_integer().not_null())
                    .col(ColumnDef::new(Transferencias::Notas).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transferencias_orden_id")
                            .from(Transferencias::Table, Transferencias::OrdenId)
                            .to(OrdenesServicio::Table, OrdenesServicio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transferencias_usuario_solicitante_id")
                            .from(Transferencias::Table, Transferencias::UsuarioSolicitanteId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transferencias_usuario_autoriza_id")
                            .from(Transferencias::Table, Transferencias::UsuarioAutorizaId)
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
                    .name("idx_transferencias_orden_id")
                    .table(Transferencias::Table)
                    .col(Transferencias::OrdenId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItemsTransferidos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemsTransferidos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ItemsTransferidos::TransferenciaId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ItemsTransferidos::DescripcionItem).string().not_null())
                    .col(ColumnDef::new(ItemsTransferidos::Modelo).string_len(100))
                    .col(ColumnDef::new(ItemsTransferidos::NumeroSerie).string_len(100))
                    .col(ColumnDef::new(ItemsTransferidos::Cantidad).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_transferidos_transferencia_id")
                            .from(ItemsTransferidos::Table, ItemsTransferidos::TransferenciaId)
                            .to(Transferencias::Table, Transferencias::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_transferidos_transferencia_id")
                    .table(ItemsTransferidos::Table)
                    .col(ItemsTransferidos::TransferenciaId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemsTransferidos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transferencias::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Transferencias {
    Table,
    Id,
    OrdenId,
    UsuarioSolicitanteId,
    UsuarioAutorizaId,
    FechaAutorizacion,
    DocumentoReferencia,
    FechaTransferencia,
    Notas,
}

#[derive(DeriveIden)]
enum ItemsTransferidos {
    Table,
    Id,
    TransferenciaId,
    DescripcionItem,
    Modelo,
    NumeroSerie,
    Cantidad,
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
