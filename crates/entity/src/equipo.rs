use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical device owned by a cliente.
///
/// `contrasena` holds the device password encrypted at rest; handlers go
/// through the crypto service, never store plaintext here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub cliente_id: i64,

    pub tipo_equipo: String,
    pub marca: String,
    pub modelo: String,
    /// Unique per cliente when present.
    pub numero_serie: Option<String>,

    #[serde(skip_serializing)]
    pub contrasena: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cliente::Entity",
        from = "Column::ClienteId",
        to = "super::cliente::Column::Id"
    )]
    Cliente,
    #[sea_orm(has_many = "super::orden_servicio::Entity")]
    OrdenServicio,
}

impl Related<super::cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl Related<super::orden_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenServicio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Short display label used by listings and the autocomplete endpoint.
    pub fn descripcion(&self) -> String {
        match &self.numero_serie {
            Some(ns) => format!("{} {} (S/N: {})", self.marca, self.modelo, ns),
            None => format!("{} {}", self.marca, self.modelo),
        }
    }
}
