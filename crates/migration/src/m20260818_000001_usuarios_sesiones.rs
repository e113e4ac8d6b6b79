use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Staff accounts.
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Usuarios::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Usuarios::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Usuarios::Nombre).string().not_null())
                    .col(ColumnDef::new(Usuarios::Email).string())
                    .col(ColumnDef::new(Usuarios::Role).string_len(20).not_null())
                    .col(ColumnDef::new(Usuarios::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(Usuarios::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(Usuarios::PasswordHash).blob().not_null())
                    .col(ColumnDef::new(Usuarios::Salt).blob().not_null())
                    .col(ColumnDef::new(Usuarios::PasswordIterations).integer().not_null())
                    .col(ColumnDef::new(Usuarios::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Bearer-token sessions. The token is the primary key.
        manager
            .create_table(
                Table::create()
                    .table(Sesiones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sesiones::Token).string().not_null().primary_key())
                    .col(ColumnDef::new(Sesiones::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Sesiones::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Sesiones::ExpiresAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sesiones_user_id")
                            .from(Sesiones::Table, Sesiones::UserId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sesiones_user_id")
                    .table(Sesiones::Table)
                    .col(Sesiones::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sesiones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Usuarios {
    Table,
    Id,
    Username,
    Nombre,
    Email,
    Role,
    IsSuperuser,
    Enabled,
    PasswordHash,
    Salt,
    PasswordIterations,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sesiones {
    Table,
    Token,
    UserId,
    CreatedAt,
    ExpiresAt,
}
