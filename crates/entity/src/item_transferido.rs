use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Line item inside a transferencia. A transfer always keeps at least one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items_transferidos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,

    pub transferencia_id: i64,

    pub descripcion_item: String,
    pub modelo: Option<String>,
    pub numero_serie: Option<String>,
    /// Always >= 1; validated before save.
    pub cantidad: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transferencia::Entity",
        from = "Column::TransferenciaId",
        to = "super::transferencia::Column::Id"
    )]
    Transferencia,
}

impl Related<super::transferencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transferencia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
