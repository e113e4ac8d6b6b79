//! Referential deletion policy, enforced in the application before any
//! `DELETE` reaches the database.
//!
//! The schema mirrors these rules with FK actions, but the explicit checks
//! produce a Spanish error the client can show instead of a raw constraint
//! violation.

use sea_orm::entity::prelude::*;
use sea_orm::DatabaseConnection;

use entity::{orden_servicio, OrdenServicio};

use crate::error::ApiError;

/// A cliente with service history cannot be removed; equipos without
/// history cascade with the cliente. Orders always carry the cliente id, so
/// one check covers both direct and per-equipo references.
pub async fn ensure_cliente_deletable(
    db: &DatabaseConnection,
    cliente_id: i64,
) -> Result<(), ApiError> {
    let ordenes = OrdenServicio::find()
        .filter(orden_servicio::Column::ClienteId.eq(cliente_id))
        .count(db)
        .await?;
    if ordenes > 0 {
        return Err(ApiError::Protected(
            "No se puede eliminar el cliente: tiene órdenes de servicio".to_string(),
        ));
    }

    Ok(())
}

/// An equipo referenced by any orden is part of the shop's history.
pub async fn ensure_equipo_deletable(
    db: &DatabaseConnection,
    equipo_id: i64,
) -> Result<(), ApiError> {
    let ordenes = OrdenServicio::find()
        .filter(orden_servicio::Column::EquipoId.eq(equipo_id))
        .count(db)
        .await?;
    if ordenes > 0 {
        return Err(ApiError::Protected(
            "No se puede eliminar el equipo: tiene órdenes de servicio".to_string(),
        ));
    }

    Ok(())
}
