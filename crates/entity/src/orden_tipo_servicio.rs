use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mapping table for ordenes_servicio <-> tipos_servicio.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ordenes_tipos_servicio")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,

    pub orden_id: i64,
    pub tipo_servicio_id: i64,
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
        belongs_to = "super::tipo_servicio::Entity",
        from = "Column::TipoServicioId",
        to = "super::tipo_servicio::Column::Id"
    )]
    TipoServicio,
}

impl Related<super::orden_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenServicio.def()
    }
}

impl Related<super::tipo_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TipoServicio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
