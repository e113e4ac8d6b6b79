use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog of standard services offered by the shop.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tipos_servicio")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub nombre_servicio: String,
    pub descripcion: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub costo_estandar: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orden_tipo_servicio::Entity")]
    OrdenTipoServicio,
}

impl Related<super::orden_tipo_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenTipoServicio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
