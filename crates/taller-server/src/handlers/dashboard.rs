//! Role-specific dashboards. `GET /api/dashboard` routes to the caller's
//! own board; the specific endpoints let a manager inspect any of them.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Local, TimeZone};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Iterable, QueryOrder};
use serde::Serialize;

use entity::orden_servicio::{EstadoOrden, Prioridad};
use entity::usuario::Rol;
use entity::{bitacora_orden, orden_servicio, usuario, BitacoraOrden, OrdenServicio, Usuario};

use crate::auth::{authenticate, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;

use super::ordenes::{BitacoraEntrada, OrdenResumen};

const DIAS_RETRASO: i64 = 3;

#[derive(Debug, Serialize)]
pub struct ConteoEstado {
    pub estado: EstadoOrden,
    pub total: u64,
}

/// Distribution of open orders across the non-terminal states.
async fn distribucion_activas(db: &DatabaseConnection) -> Result<Vec<ConteoEstado>, ApiError> {
    let mut conteos = Vec::new();
    for estado in EstadoOrden::iter().filter(|e| !e.es_terminal()) {
        let total = OrdenServicio::find()
            .filter(orden_servicio::Column::Estado.eq(estado))
            .count(db)
            .await?;
        conteos.push(ConteoEstado { estado, total });
    }
    Ok(conteos)
}

/// Start of the local calendar day, as a unix timestamp.
fn inicio_del_dia() -> i64 {
    let hoy = Local::now().date_naive();
    let medianoche = hoy.and_hms_opt(0, 0, 0).unwrap_or_default();
    Local
        .from_local_datetime(&medianoche)
        .single()
        .map(|d| d.timestamp())
        .unwrap_or(0)
}

async fn resumenes(
    db: &DatabaseConnection,
    ordenes: Vec<orden_servicio::Model>,
) -> Result<Vec<OrdenResumen>, ApiError> {
    let mut out = Vec::with_capacity(ordenes.len());
    for orden in ordenes {
        out.push(super::ordenes::resumen(db, orden).await?);
    }
    Ok(out)
}

// Recepción: what is waiting at the front desk.

#[derive(Debug, Serialize)]
pub struct DashboardRecepcion {
    pub abiertas: u64,
    pub cerradas_hoy: u64,
    /// Finalizada por Técnico, newest first: ready to call the customer.
    pub listas_para_entrega: Vec<OrdenResumen>,
    /// Nueva without a technician, newest first.
    pub nuevas_sin_asignar: Vec<OrdenResumen>,
    pub ultima_actividad: Vec<BitacoraEntrada>,
}

pub async fn dashboard_recepcion(
    db: &DatabaseConnection,
) -> Result<DashboardRecepcion, ApiError> {
    let abiertas = OrdenServicio::find()
        .filter(orden_servicio::Column::FechaCierre.is_null())
        .count(db)
        .await?;
    let cerradas_hoy = OrdenServicio::find()
        .filter(orden_servicio::Column::FechaCierre.gte(inicio_del_dia()))
        .count(db)
        .await?;

    let listas = OrdenServicio::find()
        .filter(orden_servicio::Column::Estado.eq(EstadoOrden::FinalizadaTecnico))
        .order_by_desc(orden_servicio::Column::FechaCreacion)
        .order_by_desc(orden_servicio::Column::Id)
        .paginate(db, 5)
        .fetch_page(0)
        .await?;

    let sin_asignar = OrdenServicio::find()
        .filter(orden_servicio::Column::Estado.eq(EstadoOrden::Nueva))
        .filter(orden_servicio::Column::TecnicoAsignadoId.is_null())
        .order_by_desc(orden_servicio::Column::FechaCreacion)
        .order_by_desc(orden_servicio::Column::Id)
        .paginate(db, 5)
        .fetch_page(0)
        .await?;

    let mut ultima_actividad = Vec::new();
    for entrada in BitacoraOrden::find()
        .order_by_desc(bitacora_orden::Column::FechaHora)
        .order_by_desc(bitacora_orden::Column::Id)
        .paginate(db, 8)
        .fetch_page(0)
        .await?
    {
        let usuario_nombre = match entrada.usuario_id {
            Some(uid) => Usuario::find_by_id(uid)
                .one(db)
                .await?
                .map(|u| u.nombre)
                .unwrap_or_else(|| "Sistema".to_string()),
            None => "Sistema".to_string(),
        };
        ultima_actividad.push(BitacoraEntrada { entrada, usuario_nombre });
    }

    Ok(DashboardRecepcion {
        abiertas,
        cerradas_hoy,
        listas_para_entrega: resumenes(db, listas).await?,
        nuevas_sin_asignar: resumenes(db, sin_asignar).await?,
        ultima_actividad,
    })
}

// Técnico: my queue, urgent work first.

#[derive(Debug, Serialize)]
pub struct DashboardTecnico {
    pub asignadas: Vec<OrdenResumen>,
    pub total: u64,
    pub esperando_refaccion: u64,
    pub nuevas: u64,
    pub prioridad_alta: u64,
}

pub async fn dashboard_tecnico(
    db: &DatabaseConnection,
    tecnico_id: i64,
) -> Result<DashboardTecnico, ApiError> {
    // Work finished and waiting for the front desk is off the bench queue.
    let mut abiertas = OrdenServicio::find()
        .filter(orden_servicio::Column::TecnicoAsignadoId.eq(tecnico_id))
        .filter(orden_servicio::Column::FechaCierre.is_null())
        .filter(orden_servicio::Column::Estado.ne(EstadoOrden::FinalizadaTecnico))
        .all(db)
        .await?;

    // Alta first, then oldest first within the same priority.
    abiertas.sort_by_key(|o| (o.prioridad.peso(), o.fecha_creacion, o.id));

    let total = abiertas.len() as u64;
    let esperando_refaccion = abiertas
        .iter()
        .filter(|o| o.estado == EstadoOrden::EsperandoRefaccion)
        .count() as u64;
    let nuevas = abiertas.iter().filter(|o| o.estado == EstadoOrden::Nueva).count() as u64;
    let prioridad_alta =
        abiertas.iter().filter(|o| o.prioridad == Prioridad::Alta).count() as u64;

    Ok(DashboardTecnico {
        asignadas: resumenes(db, abiertas).await?,
        total,
        esperando_refaccion,
        nuevas,
        prioridad_alta,
    })
}

// Gerente: shop-wide numbers.

#[derive(Debug, Serialize)]
pub struct CargaTecnico {
    pub tecnico_id: i64,
    pub nombre: String,
    pub activas: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardGerente {
    pub total_ordenes: u64,
    pub activas: u64,
    pub por_estado: Vec<ConteoEstado>,
    /// Active work per technician, Finalizada por Técnico excluded.
    pub carga_tecnicos: Vec<CargaTecnico>,
    /// Alta priority, still on the bench, older than three days.
    pub atrasadas: Vec<OrdenResumen>,
    /// Authorized-quotation value of delivered orders.
    pub ingresos_entregadas: Decimal,
}

pub async fn dashboard_gerente(db: &DatabaseConnection) -> Result<DashboardGerente, ApiError> {
    let total_ordenes = OrdenServicio::find().count(db).await?;
    let activas = OrdenServicio::find()
        .filter(orden_servicio::Column::FechaCierre.is_null())
        .count(db)
        .await?;

    let mut carga_tecnicos = Vec::new();
    let tecnicos = Usuario::find()
        .filter(usuario::Column::Role.eq(Rol::Tecnico))
        .filter(usuario::Column::Enabled.eq(true))
        .order_by_asc(usuario::Column::Nombre)
        .all(db)
        .await?;
    for tecnico in tecnicos {
        let activas = OrdenServicio::find()
            .filter(orden_servicio::Column::TecnicoAsignadoId.eq(tecnico.id))
            .filter(orden_servicio::Column::FechaCierre.is_null())
            .filter(orden_servicio::Column::Estado.ne(EstadoOrden::FinalizadaTecnico))
            .count(db)
            .await?;
        carga_tecnicos.push(CargaTecnico {
            tecnico_id: tecnico.id,
            nombre: tecnico.nombre,
            activas,
        });
    }

    let limite = now_ts() - DIAS_RETRASO * 24 * 60 * 60;
    let atrasadas = OrdenServicio::find()
        .filter(orden_servicio::Column::Prioridad.eq(Prioridad::Alta))
        .filter(orden_servicio::Column::FechaCierre.is_null())
        .filter(orden_servicio::Column::Estado.ne(EstadoOrden::FinalizadaTecnico))
        .filter(orden_servicio::Column::FechaCreacion.lt(limite))
        .order_by_asc(orden_servicio::Column::FechaCreacion)
        .all(db)
        .await?;

    let mut ingresos = Decimal::ZERO;
    let entregadas = OrdenServicio::find()
        .filter(orden_servicio::Column::Estado.eq(EstadoOrden::Entregada))
        .all(db)
        .await?;
    for orden in &entregadas {
        ingresos += super::ordenes::costo_total_orden(db, orden.id).await?;
    }

    Ok(DashboardGerente {
        total_ordenes,
        activas,
        por_estado: distribucion_activas(db).await?,
        carga_tecnicos,
        atrasadas: resumenes(db, atrasadas).await?,
        ingresos_entregadas: ingresos,
    })
}

// Axum surface.

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Dashboard {
    Recepcion(DashboardRecepcion),
    Tecnico(DashboardTecnico),
    Gerente(DashboardGerente),
}

/// Pick the board matching the caller's role. Unknown combinations fall
/// back to the reception view.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Dashboard>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;

    let board = if current.user.is_superuser || current.user.role == Rol::Gerente {
        Dashboard::Gerente(dashboard_gerente(&state.db).await?)
    } else if current.user.role == Rol::Tecnico {
        Dashboard::Tecnico(dashboard_tecnico(&state.db, current.id()).await?)
    } else {
        Dashboard::Recepcion(dashboard_recepcion(&state.db).await?)
    };

    Ok(Json(board))
}

pub async fn recepcion(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardRecepcion>, ApiError> {
    authenticate(&state.db, &headers).await?;
    Ok(Json(dashboard_recepcion(&state.db).await?))
}

pub async fn tecnico(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardTecnico>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    Ok(Json(dashboard_tecnico(&state.db, current.id()).await?))
}

fn require_gerente(current: &CurrentUser) -> Result<(), ApiError> {
    if current.es_gerente() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "Solo un gerente puede ver este panel".to_string(),
        ))
    }
}

pub async fn gerente(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardGerente>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_gerente(&current)?;
    Ok(Json(dashboard_gerente(&state.db).await?))
}
