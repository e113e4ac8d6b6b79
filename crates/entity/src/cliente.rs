use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer master record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clientes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub nombre_completo: String,
    #[sea_orm(unique)]
    pub telefono: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub rfc: Option<String>,

    pub calle: Option<String>,
    pub numero_exterior: Option<String>,
    pub numero_interior: Option<String>,
    pub colonia: Option<String>,
    pub codigo_postal: Option<String>,
    pub ciudad: Option<String>,
    pub estado: Option<String>,

    /// Unix timestamp (seconds).
    pub fecha_registro: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::equipo::Entity")]
    Equipo,
    #[sea_orm(has_many = "super::orden_servicio::Entity")]
    OrdenServicio,
}

impl Related<super::equipo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipo.def()
    }
}

impl Related<super::orden_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenServicio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
