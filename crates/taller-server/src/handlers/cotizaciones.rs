//! Quotations attached to an order. State machine:
//! Pendiente -> Enviada -> Autorizada | Rechazada, terminals frozen.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection, TransactionTrait};
use serde::Deserialize;

use entity::cotizacion::{EstadoCotizacion, FuenteRefaccion, TipoCotizacion};
use entity::{cotizacion, Cotizacion, Proveedor};

use crate::auth::{authenticate, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;
use crate::workflow;

use super::ordenes::{find_orden, registrar_bitacora};

#[derive(Debug, Deserialize)]
pub struct CotizacionCreate {
    pub concepto: String,
    pub costo_refacciones: Decimal,
    pub costo_mano_obra: Decimal,
    #[serde(default)]
    pub fuente_refaccion: Option<FuenteRefaccion>,
    #[serde(default)]
    pub proveedor_id: Option<i64>,
    #[serde(default)]
    pub tipo_cotizacion: Option<TipoCotizacion>,
    #[serde(default)]
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CotizacionUpdate {
    pub concepto: String,
    pub costo_refacciones: Decimal,
    pub costo_mano_obra: Decimal,
    pub estado: EstadoCotizacion,
    #[serde(default)]
    pub fuente_refaccion: Option<FuenteRefaccion>,
    #[serde(default)]
    pub proveedor_id: Option<i64>,
    #[serde(default)]
    pub notas: Option<String>,
}

struct Validada {
    concepto: String,
    fuente: Option<FuenteRefaccion>,
    proveedor_id: Option<i64>,
}

/// Shared create/update validation: non-empty concept, non-negative costs
/// with a positive sum, and the fuente/proveedor pairing rules.
async fn validar_campos(
    db: &DatabaseConnection,
    concepto: &str,
    costo_refacciones: Decimal,
    costo_mano_obra: Decimal,
    fuente: Option<FuenteRefaccion>,
    proveedor_id: Option<i64>,
) -> Result<Validada, ApiError> {
    let concepto = concepto.trim();
    if concepto.is_empty() {
        return Err(ApiError::Validation("El concepto es obligatorio".to_string()));
    }
    if costo_refacciones < Decimal::ZERO || costo_mano_obra < Decimal::ZERO {
        return Err(ApiError::Validation("Los costos no pueden ser negativos".to_string()));
    }
    if costo_refacciones + costo_mano_obra <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "El costo total de la cotización debe ser mayor a cero".to_string(),
        ));
    }

    let proveedor_id = match fuente {
        Some(FuenteRefaccion::PedidoProveedor) => {
            let id = proveedor_id.ok_or_else(|| {
                ApiError::Validation(
                    "Una refacción pedida a proveedor requiere indicar el proveedor".to_string(),
                )
            })?;
            Proveedor::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ApiError::NotFound("Proveedor no encontrado".to_string()))?;
            Some(id)
        }
        // Stock interno nunca lleva proveedor; se descarta sin error.
        Some(FuenteRefaccion::StockInterno) | None => None,
    };

    Ok(Validada { concepto: concepto.to_string(), fuente, proveedor_id })
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// New quotations always start Pendiente regardless of what the client
/// sends.
pub async fn crear_cotizacion(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    payload: &CotizacionCreate,
) -> Result<cotizacion::Model, ApiError> {
    let orden = find_orden(db, orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;

    let v = validar_campos(
        db,
        &payload.concepto,
        payload.costo_refacciones,
        payload.costo_mano_obra,
        payload.fuente_refaccion,
        payload.proveedor_id,
    )
    .await?;

    let txn = db.begin().await?;
    let model = cotizacion::ActiveModel {
        orden_id: Set(orden_id),
        proveedor_id: Set(v.proveedor_id),
        usuario_creador_id: Set(Some(current.id())),
        concepto: Set(v.concepto.clone()),
        costo_refacciones: Set(payload.costo_refacciones),
        costo_mano_obra: Set(payload.costo_mano_obra),
        estado: Set(EstadoCotizacion::Pendiente),
        fuente_refaccion: Set(v.fuente),
        tipo_cotizacion: Set(payload.tipo_cotizacion.unwrap_or(TipoCotizacion::Interna)),
        fecha_creacion: Set(now_ts()),
        notas: Set(non_empty(&payload.notas)),
        ..Default::default()
    };
    let creada = cotizacion::Entity::insert(model).exec_with_returning(&txn).await?;

    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!("Cotización registrada: {}", v.concepto),
    )
    .await?;
    txn.commit().await?;

    Ok(creada)
}

async fn find_cotizacion(
    db: &DatabaseConnection,
    id: i64,
) -> Result<cotizacion::Model, ApiError> {
    Cotizacion::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cotización no encontrada".to_string()))
}

pub async fn editar_cotizacion(
    db: &DatabaseConnection,
    current: &CurrentUser,
    id: i64,
    payload: &CotizacionUpdate,
) -> Result<cotizacion::Model, ApiError> {
    let existing = find_cotizacion(db, id).await?;
    let orden = find_orden(db, existing.orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;

    workflow::validar_transicion_cotizacion(existing.estado, payload.estado)
        .map_err(ApiError::Validation)?;

    let v = validar_campos(
        db,
        &payload.concepto,
        payload.costo_refacciones,
        payload.costo_mano_obra,
        payload.fuente_refaccion,
        payload.proveedor_id,
    )
    .await?;

    let estado_anterior = existing.estado;
    let orden_id = existing.orden_id;

    let txn = db.begin().await?;
    let mut model: cotizacion::ActiveModel = existing.into();
    model.concepto = Set(v.concepto);
    model.costo_refacciones = Set(payload.costo_refacciones);
    model.costo_mano_obra = Set(payload.costo_mano_obra);
    model.estado = Set(payload.estado);
    model.fuente_refaccion = Set(v.fuente);
    model.proveedor_id = Set(v.proveedor_id);
    model.notas = Set(non_empty(&payload.notas));
    let actualizada = model.update(&txn).await?;

    if estado_anterior != payload.estado {
        registrar_bitacora(
            &txn,
            orden_id,
            Some(current.id()),
            format!(
                "Cotización '{}' pasó a {}",
                actualizada.concepto,
                payload.estado.nombre()
            ),
        )
        .await?;
    }
    txn.commit().await?;

    Ok(actualizada)
}

pub async fn eliminar_cotizacion(
    db: &DatabaseConnection,
    current: &CurrentUser,
    id: i64,
) -> Result<(), ApiError> {
    let existing = find_cotizacion(db, id).await?;
    let orden = find_orden(db, existing.orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;

    let txn = db.begin().await?;
    Cotizacion::delete_by_id(id).exec(&txn).await?;
    registrar_bitacora(
        &txn,
        existing.orden_id,
        Some(current.id()),
        format!("Cotización eliminada: {}", existing.concepto),
    )
    .await?;
    txn.commit().await?;

    Ok(())
}

// Axum surface.

fn require_operacion(current: &CurrentUser) -> Result<(), ApiError> {
    if current.puede_operar_ordenes() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "No tiene permiso para gestionar cotizaciones".to_string(),
        ))
    }
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(orden_id): Path<i64>,
    Json(payload): Json<CotizacionCreate>,
) -> Result<(StatusCode, Json<cotizacion::Model>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;

    let creada = crear_cotizacion(&state.db, &current, orden_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(creada)))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<CotizacionUpdate>,
) -> Result<Json<cotizacion::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;

    Ok(Json(editar_cotizacion(&state.db, &current, id, &payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_eliminar() {
        return Err(ApiError::PermissionDenied(
            "Solo un gerente puede eliminar cotizaciones".to_string(),
        ));
    }

    eliminar_cotizacion(&state.db, &current, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
