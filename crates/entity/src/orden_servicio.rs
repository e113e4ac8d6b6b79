use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle states. Stored as the display string, matching the data
/// the shop already has on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum EstadoOrden {
    #[sea_orm(string_value = "Nueva")]
    #[serde(rename = "Nueva")]
    Nueva,
    #[sea_orm(string_value = "En diagnóstico")]
    #[serde(rename = "En diagnóstico")]
    Diagnostico,
    #[sea_orm(string_value = "Esperando autorización")]
    #[serde(rename = "Esperando autorización")]
    EsperandoAutorizacion,
    #[sea_orm(string_value = "Esperando refacción")]
    #[serde(rename = "Esperando refacción")]
    EsperandoRefaccion,
    #[sea_orm(string_value = "En reparación")]
    #[serde(rename = "En reparación")]
    EnReparacion,
    #[sea_orm(string_value = "Finalizada por Técnico")]
    #[serde(rename = "Finalizada por Técnico")]
    FinalizadaTecnico,
    #[sea_orm(string_value = "Entregada")]
    #[serde(rename = "Entregada")]
    Entregada,
    #[sea_orm(string_value = "Cancelada")]
    #[serde(rename = "Cancelada")]
    Cancelada,
}

impl EstadoOrden {
    /// Terminal states are reachable only through the dedicated close
    /// operation, never through a plain status update.
    pub fn es_terminal(&self) -> bool {
        matches!(self, EstadoOrden::Entregada | EstadoOrden::Cancelada)
    }

    /// Display name, identical to the stored string.
    pub fn nombre(&self) -> &'static str {
        match self {
            EstadoOrden::Nueva => "Nueva",
            EstadoOrden::Diagnostico => "En diagnóstico",
            EstadoOrden::EsperandoAutorizacion => "Esperando autorización",
            EstadoOrden::EsperandoRefaccion => "Esperando refacción",
            EstadoOrden::EnReparacion => "En reparación",
            EstadoOrden::FinalizadaTecnico => "Finalizada por Técnico",
            EstadoOrden::Entregada => "Entregada",
            EstadoOrden::Cancelada => "Cancelada",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Prioridad {
    #[sea_orm(string_value = "Baja")]
    #[serde(rename = "Baja")]
    Baja,
    #[sea_orm(string_value = "Normal")]
    #[serde(rename = "Normal")]
    Normal,
    #[sea_orm(string_value = "Alta")]
    #[serde(rename = "Alta")]
    Alta,
}

impl Prioridad {
    /// Sort weight for the technician dashboard: Alta first.
    pub fn peso(&self) -> u8 {
        match self {
            Prioridad::Alta => 1,
            Prioridad::Normal => 2,
            Prioridad::Baja => 3,
        }
    }

    pub fn nombre(&self) -> &'static str {
        match self {
            Prioridad::Baja => "Baja",
            Prioridad::Normal => "Normal",
            Prioridad::Alta => "Alta",
        }
    }
}

/// Service order. The auto-increment id doubles as the printed folio.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ordenes_servicio")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub cliente_id: i64,
    pub equipo_id: i64,

    /// Front-desk user who received the device. Nullified on user deletion.
    pub asistente_receptor_id: Option<i64>,
    /// Assigned technician. Nullified on user deletion.
    pub tecnico_asignado_id: Option<i64>,

    pub descripcion_falla: String,
    /// Device password snapshot, encrypted at rest.
    #[serde(skip_serializing)]
    pub contrasena_equipo: Option<String>,

    pub estado: EstadoOrden,
    pub prioridad: Prioridad,

    /// Unix timestamp (seconds).
    pub fecha_creacion: i64,
    /// Set exactly when the order enters Entregada or Cancelada; once set
    /// the order is frozen.
    pub fecha_cierre: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cliente::Entity",
        from = "Column::ClienteId",
        to = "super::cliente::Column::Id"
    )]
    Cliente,
    #[sea_orm(
        belongs_to = "super::equipo::Entity",
        from = "Column::EquipoId",
        to = "super::equipo::Column::Id"
    )]
    Equipo,
    #[sea_orm(has_many = "super::cotizacion::Entity")]
    Cotizacion,
    #[sea_orm(has_many = "super::transferencia::Entity")]
    Transferencia,
    #[sea_orm(has_many = "super::bitacora_orden::Entity")]
    BitacoraOrden,
    #[sea_orm(has_many = "super::orden_tipo_servicio::Entity")]
    OrdenTipoServicio,
}

impl Related<super::cliente::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl Related<super::equipo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipo.def()
    }
}

impl Related<super::cotizacion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cotizacion.def()
    }
}

impl Related<super::transferencia::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transferencia.def()
    }
}

impl Related<super::bitacora_orden::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BitacoraOrden.def()
    }
}

impl Related<super::orden_tipo_servicio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenTipoServicio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn esta_cerrada(&self) -> bool {
        self.fecha_cierre.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(EstadoOrden::Entregada.es_terminal());
        assert!(EstadoOrden::Cancelada.es_terminal());
        assert!(!EstadoOrden::Nueva.es_terminal());
        assert!(!EstadoOrden::FinalizadaTecnico.es_terminal());
    }

    #[test]
    fn prioridad_orders_alta_first() {
        assert!(Prioridad::Alta.peso() < Prioridad::Normal.peso());
        assert!(Prioridad::Normal.peso() < Prioridad::Baja.peso());
    }

    #[test]
    fn estado_serializes_as_display_string() {
        let json = serde_json::to_string(&EstadoOrden::FinalizadaTecnico).unwrap();
        assert_eq!(json, "\"Finalizada por Técnico\"");
        let back: EstadoOrden = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EstadoOrden::FinalizadaTecnico);
    }
}
