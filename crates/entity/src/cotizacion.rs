use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum EstadoCotizacion {
    #[sea_orm(string_value = "Pendiente")]
    #[serde(rename = "Pendiente")]
    Pendiente,
    #[sea_orm(string_value = "Enviada")]
    #[serde(rename = "Enviada")]
    Enviada,
    #[sea_orm(string_value = "Autorizada")]
    #[serde(rename = "Autorizada")]
    Autorizada,
    #[sea_orm(string_value = "Rechazada")]
    #[serde(rename = "Rechazada")]
    Rechazada,
}

impl EstadoCotizacion {
    pub fn es_terminal(&self) -> bool {
        matches!(self, EstadoCotizacion::Autorizada | EstadoCotizacion::Rechazada)
    }

    pub fn nombre(&self) -> &'static str {
        match self {
            EstadoCotizacion::Pendiente => "Pendiente",
            EstadoCotizacion::Enviada => "Enviada",
            EstadoCotizacion::Autorizada => "Autorizada",
            EstadoCotizacion::Rechazada => "Rechazada",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum FuenteRefaccion {
    #[sea_orm(string_value = "Stock interno")]
    #[serde(rename = "Stock interno")]
    StockInterno,
    #[sea_orm(string_value = "Pedido a proveedor")]
    #[serde(rename = "Pedido a proveedor")]
    PedidoProveedor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum TipoCotizacion {
    #[sea_orm(string_value = "Cotización interna")]
    #[serde(rename = "Cotización interna")]
    Interna,
    #[sea_orm(string_value = "Cotización externa")]
    #[serde(rename = "Cotización externa")]
    Externa,
}

/// Cost estimate attached to an order, subject to approval.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cotizaciones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub orden_id: i64,
    /// Supplier, only meaningful when fuente_refaccion is PedidoProveedor.
    /// Nullified on supplier deletion.
    pub proveedor_id: Option<i64>,
    /// Creating user. Nullified on user deletion.
    pub usuario_creador_id: Option<i64>,

    pub concepto: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub costo_refacciones: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub costo_mano_obra: Decimal,

    pub estado: EstadoCotizacion,
    pub fuente_refaccion: Option<FuenteRefaccion>,
    pub tipo_cotizacion: TipoCotizacion,

    /// Unix timestamp (seconds).
    pub fecha_creacion: i64,
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
    #[sea_orm(
        belongs_to = "super::proveedor::Entity",
        from = "Column::ProveedorId",
        to = "super::proveedor::Column::Id"
    )]
    Proveedor,
}

impl Related<super::orden_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenServicio.def()
    }
}

impl Related<super::proveedor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proveedor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parts plus labor. Dashboards only ever sum this over Autorizada rows.
    pub fn costo_total(&self) -> Decimal {
        self.costo_refacciones + self.costo_mano_obra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costo_total_sums_both_parts() {
        let c = Model {
            id: 1,
            orden_id: 1,
            proveedor_id: None,
            usuario_creador_id: None,
            concepto: "Cambio de pantalla".into(),
            costo_refacciones: Decimal::new(150000, 2),
            costo_mano_obra: Decimal::new(50000, 2),
            estado: EstadoCotizacion::Pendiente,
            fuente_refaccion: Some(FuenteRefaccion::StockInterno),
            tipo_cotizacion: TipoCotizacion::Interna,
            fecha_creacion: 0,
            notas: None,
        };
        assert_eq!(c.costo_total(), Decimal::new(200000, 2));
    }

    #[test]
    fn terminal_states() {
        assert!(EstadoCotizacion::Autorizada.es_terminal());
        assert!(EstadoCotizacion::Rechazada.es_terminal());
        assert!(!EstadoCotizacion::Pendiente.es_terminal());
        assert!(!EstadoCotizacion::Enviada.es_terminal());
    }
}
