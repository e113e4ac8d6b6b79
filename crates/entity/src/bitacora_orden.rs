use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity log entry for an order. Append-only from the application's
/// point of view; only the elevated correction endpoint rewrites a row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bitacora_ordenes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,

    pub orden_id: i64,
    /// Acting user. Nullified on user deletion ("Sistema" in displays).
    pub usuario_id: Option<i64>,

    /// Unix timestamp (seconds).
    pub fecha_hora: i64,
    pub descripcion: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orden_servicio::Entity",
        from = "Column::OrdenId",
        to = "super::orden_servicio::Column::Id"
    )]
    OrdenServicio,
    #[sea_orm(
        belongs_to = "super::usuario::Entity",
        from = "Column::UsuarioId",
        to = "super::usuario::Column::Id"
    )]
    Usuario,
}

impl Related<super::orden_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenServicio.def()
    }
}

impl Related<super::usuario::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
