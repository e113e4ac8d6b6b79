use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cotizaciones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cotizaciones::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cotizaciones::OrdenId).big_integer().not_null())
                    .col(ColumnDef::new(Cotizaciones::ProveedorId).big_integer())
                    .col(ColumnDef::new(Cotizaciones::UsuarioCreadorId).big_integer())
                    .col(ColumnDef::new(Cotizaciones::Concepto).text().not_null())
                    .col(
                        ColumnDef::new(Cotizaciones::CostoRefacciones)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cotizaciones::CostoManoObra)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cotizaciones::Estado).string_len(50).not_null())
                    .col(ColumnDef::new(Cotizaciones::FuenteRefaccion).string_len(50))
                    .col(ColumnDef::new(Cotizaciones::TipoCotizacion).string_len(50).not_null())
                    .col(ColumnDef::new(Cotizaciones::FechaCreacion).big_integer().not_null())
                    .col(ColumnDef::new(Cotizaciones::Notas).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cotizaciones_orden_id")
                            .from(Cotizaciones::Table, Cotizaciones::OrdenId)
                            .to(OrdenesServicio::Table, OrdenesServicio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cotizaciones_proveedor_id")
                            .from(Cotizaciones::Table, Cotizaciones::ProveedorId)
                            .to(Proveedores::Table, Proveedores::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cotizaciones_usuario_creador_id")
                            .from(Cotizaciones::Table, Cotizaciones::UsuarioCreadorId)
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
                    .name("idx_cotizaciones_orden_id")
                    .table(Cotizaciones::Table)
                    .col(Cotizaciones::OrdenId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cotizaciones::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cotizaciones {
    Table,
    Id,
    OrdenId,
    ProveedorId,
    UsuarioCreadorId,
    Concepto,
    CostoRefacciones,
    CostoManoObra,
    Estado,
    FuenteRefaccion,
    TipoCotizacion,
    FechaCreacion,
    Notas,
}

#[derive(DeriveIden)]
enum OrdenesServicio {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Proveedores {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Usuarios {
    Table,
    Id,
}
