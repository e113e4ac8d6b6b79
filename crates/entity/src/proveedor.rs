use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parts supplier catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proveedores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub nombre_empresa: String,
    pub persona_contacto: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cotizacion::Entity")]
    Cotizacion,
}

impl Related<super::cotizacion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cotizacion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
