pub use sea_orm_migration::prelude::*;

mod m20260818_000001_usuarios_sesiones;
mod m20260818_000002_clientes_equipos;
mod m20260818_000003_catalogo;
mod m20260819_000004_ordenes_servicio;
mod m20260819_000005_cotizaciones;
mod m20260819_000006_transferencias;
mod m20260819_000007_bitacora;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260818_000001_usuarios_sesiones::Migration),
            Box::new(m20260818_000002_clientes_equipos::Migration),
            Box::new(m20260818_000003_catalogo::Migration),
            Box::new(m20260819_000004_ordenes_servicio::Migration),
            Box::new(m20260819_000005_cotizaciones::Migration),
            Box::new(m20260819_000006_transferencias::Migration),
            Box::new(m20260819_000007_bitacora::Migration),
        ]
    }
}
