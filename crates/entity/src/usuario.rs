use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff role. Determines which dashboard a user lands on and which write
/// operations the permission predicates allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Rol {
    #[sea_orm(string_value = "Gerente")]
    #[serde(rename = "Gerente")]
    Gerente,
    #[sea_orm(string_value = "Recepcion")]
    #[serde(rename = "Recepcion")]
    Recepcion,
    #[sea_orm(string_value = "Tecnico")]
    #[serde(rename = "Tecnico")]
    Tecnico,
}

/// Staff account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub username: String,
    pub nombre: String,
    pub email: Option<String>,

    pub role: Rol,
    pub is_superuser: bool,
    pub enabled: bool,

    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    #[serde(skip_serializing)]
    pub salt: Vec<u8>,
    pub password_iterations: i32,

    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sesion::Entity")]
    Sesion,
}

impl Related<super::sesion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sesion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
