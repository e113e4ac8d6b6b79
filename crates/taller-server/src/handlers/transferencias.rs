//! Warehouse transfer requests. A transfer always carries at least one item
//! and is authorized at most once, by someone other than the requester.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};

use entity::{item_transferido, transferencia, ItemTransferido, Transferencia};

use crate::auth::{authenticate, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;
use crate::workflow;

use super::ordenes::{find_orden, registrar_bitacora};

#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub descripcion_item: String,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub numero_serie: Option<String>,
    pub cantidad: i32,
}

#[derive(Debug, Deserialize)]
pub struct TransferenciaPayload {
    #[serde(default)]
    pub documento_referencia: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Serialize)]
pub struct TransferenciaConItems {
    #[serde(flatten)]
    pub transferencia: transferencia::Model,
    pub items: Vec<item_transferido::Model>,
}

fn validar_items(items: &[ItemPayload]) -> Result<(), ApiError> {
    if items.is_empty() {
        return Err(ApiError::Validation(
            "Una transferencia debe incluir al menos un artículo".to_string(),
        ));
    }
    for item in items {
        if item.descripcion_item.trim().is_empty() {
            return Err(ApiError::Validation(
                "Cada artículo requiere una descripción".to_string(),
            ));
        }
        if item.cantidad < 1 {
            return Err(ApiError::Validation(
                "La cantidad de cada artículo debe ser al menos 1".to_string(),
            ));
        }
    }
    Ok(())
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

async fn insertar_items(
    conn: &impl ConnectionTrait,
    transferencia_id: i64,
    items: &[ItemPayload],
) -> Result<(), ApiError> {
    for item in items {
        let model = item_transferido::ActiveModel {
            transferencia_id: Set(transferencia_id),
            descripcion_item: Set(item.descripcion_item.trim().to_string()),
            modelo: Set(non_empty(&item.modelo)),
            numero_serie: Set(non_empty(&item.numero_serie)),
            cantidad: Set(item.cantidad),
            ..Default::default()
        };
        item_transferido::Entity::insert(model).exec(conn).await?;
    }
    Ok(())
}

async fn find_transferencia(
    db: &DatabaseConnection,
    id: i64,
) -> Result<transferencia::Model, ApiError> {
    Transferencia::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transferencia no encontrada".to_string()))
}

async fn items_de(
    db: &impl ConnectionTrait,
    transferencia_id: i64,
) -> Result<Vec<item_transferido::Model>, ApiError> {
    Ok(ItemTransferido::find()
        .filter(item_transferido::Column::TransferenciaId.eq(transferencia_id))
        .all(db)
        .await?)
}

pub async fn crear_transferencia(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    payload: &TransferenciaPayload,
) -> Result<TransferenciaConItems, ApiError> {
    let orden = find_orden(db, orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;
    validar_items(&payload.items)?;

    let txn = db.begin().await?;
    let model = transferencia::ActiveModel {
        orden_id: Set(orden_id),
        usuario_solicitante_id: Set(Some(current.id())),
        usuario_autoriza_id: Set(None),
        fecha_autorizacion: Set(None),
        documento_referencia: Set(non_empty(&payload.documento_referencia)),
        fecha_transferencia: Set(now_ts()),
        notas: Set(non_empty(&payload.notas)),
        ..Default::default()
    };
    let creada = transferencia::Entity::insert(model).exec_with_returning(&txn).await?;
    insertar_items(&txn, creada.id, &payload.items).await?;

    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!(
            "Transferencia de almacén solicitada con {} artículo(s)",
            payload.items.len()
        ),
    )
    .await?;

    let items = items_de(&txn, creada.id).await?;
    txn.commit().await?;

    Ok(TransferenciaConItems { transferencia: creada, items })
}

/// Replace header fields and the item list. Items are rewritten wholesale;
/// the at-least-one invariant is checked against the incoming list.
pub async fn editar_transferencia(
    db: &DatabaseConnection,
    current: &CurrentUser,
    id: i64,
    payload: &TransferenciaPayload,
) -> Result<TransferenciaConItems, ApiError> {
    let existing = find_transferencia(db, id).await?;
    let orden = find_orden(db, existing.orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;

    if existing.esta_autorizada() && !current.es_gerente() {
        return Err(ApiError::PermissionDenied(
            "Una transferencia autorizada solo puede modificarla un gerente".to_string(),
        ));
    }

    validar_items(&payload.items)?;

    let txn = db.begin().await?;
    let mut model: transferencia::ActiveModel = existing.into();
    model.documento_referencia = Set(non_empty(&payload.documento_referencia));
    model.notas = Set(non_empty(&payload.notas));
    let actualizada = model.update(&txn).await?;

    ItemTransferido::delete_many()
        .filter(item_transferido::Column::TransferenciaId.eq(id))
        .exec(&txn)
        .await?;
    insertar_items(&txn, id, &payload.items).await?;

    registrar_bitacora(
        &txn,
        actualizada.orden_id,
        Some(current.id()),
        format!(
            "Transferencia #{id} modificada, ahora con {} artículo(s)",
            payload.items.len()
        ),
    )
    .await?;

    let items = items_de(&txn, id).await?;
    txn.commit().await?;

    Ok(TransferenciaConItems { transferencia: actualizada, items })
}

/// Stamp the authorization exactly once. A second call is a no-op that
/// returns the already-authorized row unchanged.
pub async fn autorizar_transferencia(
    db: &DatabaseConnection,
    current: &CurrentUser,
    id: i64,
) -> Result<transferencia::Model, ApiError> {
    let existing = find_transferencia(db, id).await?;
    let orden = find_orden(db, existing.orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;

    if existing.esta_autorizada() {
        return Ok(existing);
    }

    if existing.usuario_solicitante_id == Some(current.id()) {
        return Err(ApiError::Validation(
            "El solicitante no puede autorizar su propia transferencia".to_string(),
        ));
    }

    let orden_id = existing.orden_id;
    let txn = db.begin().await?;
    let mut model: transferencia::ActiveModel = existing.into();
    model.usuario_autoriza_id = Set(Some(current.id()));
    model.fecha_autorizacion = Set(Some(now_ts()));
    let autorizada = model.update(&txn).await?;

    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!("Transferencia #{id} autorizada"),
    )
    .await?;
    txn.commit().await?;

    Ok(autorizada)
}

/// Delete the transfer and log it in one transaction; the log entry is
/// written only after the delete succeeds, so a failed delete leaves no
/// phantom record in the bitácora.
pub async fn eliminar_transferencia(
    db: &DatabaseConnection,
    current: &CurrentUser,
    id: i64,
) -> Result<(), ApiError> {
    let existing = find_transferencia(db, id).await?;
    let orden = find_orden(db, existing.orden_id).await?;
    workflow::validar_orden_abierta(&orden).map_err(ApiError::OrderClosed)?;

    let txn = db.begin().await?;
    // Items cascade with the parent row.
    Transferencia::delete_by_id(id).exec(&txn).await?;
    registrar_bitacora(
        &txn,
        existing.orden_id,
        Some(current.id()),
        format!("Transferencia #{id} eliminada"),
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
            "No tiene permiso para gestionar transferencias".to_string(),
        ))
    }
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(orden_id): Path<i64>,
    Json(payload): Json<TransferenciaPayload>,
) -> Result<(StatusCode, Json<TransferenciaConItems>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;

    let creada = crear_transferencia(&state.db, &current, orden_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(creada)))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<TransferenciaPayload>,
) -> Result<Json<TransferenciaConItems>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;

    Ok(Json(editar_transferencia(&state.db, &current, id, &payload).await?))
}

pub async fn autorizar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<transferencia::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_autorizar_transferencias() {
        return Err(ApiError::PermissionDenied(
            "No tiene permiso para autorizar transferencias".to_string(),
        ));
    }

    Ok(Json(autorizar_transferencia(&state.db, &current, id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_eliminar() {
        return Err(ApiError::PermissionDenied(
            "Solo un gerente puede eliminar transferencias".to_string(),
        ));
    }

    eliminar_transferencia(&state.db, &current, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
