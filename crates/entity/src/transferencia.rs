use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Warehouse parts movement request attached to an order.
///
/// Requested by one user and authorized later by a distinct user; both
/// references are nullified if the user account is deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transferencias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub orden_id: i64,
    pub usuario_solicitante_id: Option<i64>,
    pub usuario_autoriza_id: Option<i64>,
    /// Stamped together with usuario_autoriza_id, exactly once.
    pub fecha_autorizacion: Option<i64>,

    pub documento_referencia: Option<String>,
    /// Unix timestamp (seconds).
    pub fecha_transferencia: i64,
    pub notas: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orden_servicio::Entity",
        from = "Column::OrdenId",
        to = "super::orden_servicio::Column::Id"
    )]
    OrdenServicio,
    #[sea_orm(has_many = "super::item_transferido::Entity")]
    ItemTransferido,
}

impl Related<super::orden_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenServicio.def()
    }
}

impl Related<super::item_transferido::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemTransferido.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn esta_autorizada(&self) -> bool {
        self.usuario_autoriza_id.is_some()
    }
}
