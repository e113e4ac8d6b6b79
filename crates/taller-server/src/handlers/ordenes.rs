//! Service-order lifecycle: intake, listing, edits, status changes, the
//! close operation and the per-order activity log.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use entity::cotizacion::EstadoCotizacion;
use entity::orden_servicio::{EstadoOrden, Prioridad};
use entity::{
    bitacora_orden, cliente, cotizacion, equipo, item_transferido, orden_servicio,
    orden_tipo_servicio, tipo_servicio, transferencia, usuario, BitacoraOrden, Cliente, Cotizacion,
    Equipo, ItemTransferido, OrdenServicio, OrdenTipoServicio, TipoServicio, Transferencia,
    Usuario,
};

use crate::auth::{authenticate, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;
use crate::workflow;

use super::{Paginado, PAGE_SIZE};

pub async fn find_orden(
    db: &impl ConnectionTrait,
    id: i64,
) -> Result<orden_servicio::Model, ApiError> {
    OrdenServicio::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Orden de servicio no encontrada".to_string()))
}

fn closed_guard(orden: &orden_servicio::Model) -> Result<(), ApiError> {
    workflow::validar_orden_abierta(orden).map_err(ApiError::OrderClosed)
}

/// Append an activity-log row. Always called inside the same transaction as
/// the change it records.
pub async fn registrar_bitacora(
    conn: &impl ConnectionTrait,
    orden_id: i64,
    usuario_id: Option<i64>,
    descripcion: String,
) -> Result<(), ApiError> {
    let entry = bitacora_orden::ActiveModel {
        orden_id: Set(orden_id),
        usuario_id: Set(usuario_id),
        fecha_hora: Set(now_ts()),
        descripcion: Set(descripcion),
        ..Default::default()
    };
    bitacora_orden::Entity::insert(entry).exec(conn).await?;
    Ok(())
}

// Intake.

#[derive(Debug, Deserialize)]
pub struct OrdenCreate {
    pub cliente_id: i64,
    pub equipo_id: i64,
    pub descripcion_falla: String,
    #[serde(default)]
    pub prioridad: Option<Prioridad>,
    #[serde(default)]
    pub tecnico_asignado_id: Option<i64>,
    /// Plaintext device password for this job; encrypted before storage.
    #[serde(default)]
    pub contrasena_equipo: Option<String>,
    /// Catalog services contracted at intake.
    #[serde(default)]
    pub servicios: Vec<i64>,
}

pub async fn crear_orden(
    state: &AppState,
    current: &CurrentUser,
    payload: &OrdenCreate,
) -> Result<orden_servicio::Model, ApiError> {
    if payload.descripcion_falla.trim().is_empty() {
        return Err(ApiError::Validation(
            "La descripción de la falla es obligatoria".to_string(),
        ));
    }

    let equipo = Equipo::find_by_id(payload.equipo_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipo no encontrado".to_string()))?;
    if equipo.cliente_id != payload.cliente_id {
        return Err(ApiError::Validation(
            "El equipo no pertenece al cliente indicado".to_string(),
        ));
    }

    if let Some(tecnico_id) = payload.tecnico_asignado_id {
        Usuario::find_by_id(tecnico_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Técnico no encontrado".to_string()))?;
    }

    for tipo_id in &payload.servicios {
        TipoServicio::find_by_id(*tipo_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Tipo de servicio no encontrado".to_string()))?;
    }

    let contrasena = payload
        .contrasena_equipo
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| state.master_key.encrypt(p));

    let txn = state.db.begin().await?;

    let model = orden_servicio::ActiveModel {
        cliente_id: Set(payload.cliente_id),
        equipo_id: Set(payload.equipo_id),
        asistente_receptor_id: Set(Some(current.id())),
        tecnico_asignado_id: Set(payload.tecnico_asignado_id),
        descripcion_falla: Set(payload.descripcion_falla.trim().to_string()),
        contrasena_equipo: Set(contrasena),
        estado: Set(EstadoOrden::Nueva),
        prioridad: Set(payload.prioridad.unwrap_or(Prioridad::Normal)),
        fecha_creacion: Set(now_ts()),
        fecha_cierre: Set(None),
        ..Default::default()
    };
    let orden = orden_servicio::Entity::insert(model).exec_with_returning(&txn).await?;

    for tipo_id in &payload.servicios {
        let join = orden_tipo_servicio::ActiveModel {
            orden_id: Set(orden.id),
            tipo_servicio_id: Set(*tipo_id),
            ..Default::default()
        };
        orden_tipo_servicio::Entity::insert(join).exec(&txn).await?;
    }

    registrar_bitacora(
        &txn,
        orden.id,
        Some(current.id()),
        format!("Orden creada. Equipo recibido: {}", equipo.descripcion()),
    )
    .await?;

    txn.commit().await?;
    Ok(orden)
}

// Listing.

#[derive(Debug, Deserialize)]
pub struct OrdenListQuery {
    #[serde(default)]
    pub estado: Option<EstadoOrden>,
    #[serde(default)]
    pub tecnico: Option<i64>,
    #[serde(default)]
    pub prioridad: Option<Prioridad>,
    /// Unix seconds, inclusive bounds on fecha_creacion.
    #[serde(default)]
    pub fecha_inicio: Option<i64>,
    #[serde(default)]
    pub fecha_fin: Option<i64>,
    #[serde(default = "super::primera_pagina")]
    pub page: u64,
}

#[derive(Debug, Serialize)]
pub struct OrdenResumen {
    #[serde(flatten)]
    pub orden: orden_servicio::Model,
    pub cliente_nombre: String,
    pub equipo_descripcion: String,
    pub tecnico_nombre: Option<String>,
}

pub async fn listar_ordenes(
    db: &DatabaseConnection,
    query: &OrdenListQuery,
) -> Result<Paginado<OrdenResumen>, ApiError> {
    let mut find = OrdenServicio::find()
        .order_by_desc(orden_servicio::Column::FechaCreacion)
        .order_by_desc(orden_servicio::Column::Id);

    if let Some(estado) = query.estado {
        find = find.filter(orden_servicio::Column::Estado.eq(estado));
    }
    if let Some(tecnico) = query.tecnico {
        find = find.filter(orden_servicio::Column::TecnicoAsignadoId.eq(tecnico));
    }
    if let Some(prioridad) = query.prioridad {
        find = find.filter(orden_servicio::Column::Prioridad.eq(prioridad));
    }
    if let Some(inicio) = query.fecha_inicio {
        find = find.filter(orden_servicio::Column::FechaCreacion.gte(inicio));
    }
    if let Some(fin) = query.fecha_fin {
        find = find.filter(orden_servicio::Column::FechaCreacion.lte(fin));
    }

    let paginator = find.paginate(db, PAGE_SIZE);
    let counts = paginator.num_items_and_pages().await?;
    let page = query.page.max(1).min(counts.number_of_pages.max(1));
    let ordenes = paginator.fetch_page(page - 1).await?;

    let mut items = Vec::with_capacity(ordenes.len());
    for orden in ordenes {
        items.push(resumen(db, orden).await?);
    }

    Ok(Paginado {
        items,
        total: counts.number_of_items,
        page,
        pages: counts.number_of_pages.max(1),
    })
}

pub(crate) async fn resumen(
    db: &DatabaseConnection,
    orden: orden_servicio::Model,
) -> Result<OrdenResumen, ApiError> {
    let cliente = Cliente::find_by_id(orden.cliente_id).one(db).await?;
    let equipo = Equipo::find_by_id(orden.equipo_id).one(db).await?;
    let tecnico = match orden.tecnico_asignado_id {
        Some(id) => Usuario::find_by_id(id).one(db).await?,
        None => None,
    };

    Ok(OrdenResumen {
        cliente_nombre: cliente.map(|c| c.nombre_completo).unwrap_or_default(),
        equipo_descripcion: equipo.map(|e| e.descripcion()).unwrap_or_default(),
        tecnico_nombre: tecnico.map(|t| t.nombre),
        orden,
    })
}

// Detail.

#[derive(Debug, Serialize)]
pub struct OrdenDetalle {
    #[serde(flatten)]
    pub orden: orden_servicio::Model,
    pub cliente: Option<cliente::Model>,
    pub equipo: Option<equipo::Model>,
    pub asistente_nombre: Option<String>,
    pub tecnico_nombre: Option<String>,
    pub servicios: Vec<tipo_servicio::Model>,
    pub cotizaciones: Vec<cotizacion::Model>,
    pub transferencias: Vec<TransferenciaDetalle>,
    pub bitacora: Vec<BitacoraEntrada>,
    /// Sum of costo_total over Autorizada quotations only.
    pub costo_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TransferenciaDetalle {
    #[serde(flatten)]
    pub transferencia: transferencia::Model,
    pub items: Vec<item_transferido::Model>,
}

#[derive(Debug, Serialize)]
pub struct BitacoraEntrada {
    #[serde(flatten)]
    pub entrada: bitacora_orden::Model,
    pub usuario_nombre: String,
}

/// Authorized-quotation total for one order.
pub async fn costo_total_orden(
    db: &impl ConnectionTrait,
    orden_id: i64,
) -> Result<Decimal, ApiError> {
    let autorizadas = Cotizacion::find()
        .filter(cotizacion::Column::OrdenId.eq(orden_id))
        .filter(cotizacion::Column::Estado.eq(EstadoCotizacion::Autorizada))
        .all(db)
        .await?;
    Ok(autorizadas.iter().map(|c| c.costo_total()).sum())
}

pub async fn detalle_orden(db: &DatabaseConnection, id: i64) -> Result<OrdenDetalle, ApiError> {
    let orden = find_orden(db, id).await?;

    let cliente = Cliente::find_by_id(orden.cliente_id).one(db).await?;
    let equipo = Equipo::find_by_id(orden.equipo_id).one(db).await?;

    let nombre_de = |user: Option<usuario::Model>| user.map(|u| u.nombre);
    let asistente_nombre = match orden.asistente_receptor_id {
        Some(uid) => nombre_de(Usuario::find_by_id(uid).one(db).await?),
        None => None,
    };
    let tecnico_nombre = match orden.tecnico_asignado_id {
        Some(uid) => nombre_de(Usuario::find_by_id(uid).one(db).await?),
        None => None,
    };

    let servicios = OrdenTipoServicio::find()
        .filter(orden_tipo_servicio::Column::OrdenId.eq(id))
        .find_also_related(TipoServicio)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, tipo)| tipo)
        .collect();

    let cotizaciones = Cotizacion::find()
        .filter(cotizacion::Column::OrdenId.eq(id))
        .order_by_asc(cotizacion::Column::Id)
        .all(db)
        .await?;
    let costo_total = cotizaciones
        .iter()
        .filter(|c| c.estado == EstadoCotizacion::Autorizada)
        .map(|c| c.costo_total())
        .sum();

    let mut transferencias = Vec::new();
    for t in Transferencia::find()
        .filter(transferencia::Column::OrdenId.eq(id))
        .order_by_asc(transferencia::Column::Id)
        .all(db)
        .await?
    {
        let items = ItemTransferido::find()
            .filter(item_transferido::Column::TransferenciaId.eq(t.id))
            .order_by_asc(item_transferido::Column::Id)
            .all(db)
            .await?;
        transferencias.push(TransferenciaDetalle { transferencia: t, items });
    }

    let mut bitacora = Vec::new();
    for entrada in BitacoraOrden::find()
        .filter(bitacora_orden::Column::OrdenId.eq(id))
        .order_by_asc(bitacora_orden::Column::FechaHora)
        .order_by_asc(bitacora_orden::Column::Id)
        .all(db)
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
        bitacora.push(BitacoraEntrada { entrada, usuario_nombre });
    }

    Ok(OrdenDetalle {
        orden,
        cliente,
        equipo,
        asistente_nombre,
        tecnico_nombre,
        servicios,
        cotizaciones,
        transferencias,
        bitacora,
        costo_total,
    })
}

// Edits.

#[derive(Debug, Deserialize)]
pub struct OrdenUpdate {
    #[serde(default)]
    pub descripcion_falla: Option<String>,
    #[serde(default)]
    pub prioridad: Option<Prioridad>,
    /// Absent = untouched; null = unassign; value = assign.
    #[serde(default, deserialize_with = "super::double_option")]
    pub tecnico_asignado_id: Option<Option<i64>>,
    /// Absent = untouched; empty string = clear; value = re-encrypt.
    #[serde(default)]
    pub contrasena_equipo: Option<String>,
}

pub async fn editar_orden(
    state: &AppState,
    current: &CurrentUser,
    id: i64,
    payload: &OrdenUpdate,
) -> Result<orden_servicio::Model, ApiError> {
    let orden = find_orden(&state.db, id).await?;
    closed_guard(&orden)?;

    let mut cambios: Vec<String> = Vec::new();
    let mut model: orden_servicio::ActiveModel = orden.clone().into();

    if let Some(falla) = payload.descripcion_falla.as_deref() {
        if falla.trim().is_empty() {
            return Err(ApiError::Validation(
                "La descripción de la falla es obligatoria".to_string(),
            ));
        }
        model.descripcion_falla = Set(falla.trim().to_string());
    }

    if let Some(prioridad) = payload.prioridad {
        if prioridad != orden.prioridad {
            cambios.push(format!("Prioridad cambiada a {}", prioridad.nombre()));
        }
        model.prioridad = Set(prioridad);
    }

    if let Some(tecnico) = payload.tecnico_asignado_id {
        match tecnico {
            Some(uid) => {
                let user = Usuario::find_by_id(uid)
                    .one(&state.db)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Técnico no encontrado".to_string()))?;
                if orden.tecnico_asignado_id != Some(uid) {
                    cambios.push(format!("Técnico asignado: {}", user.nombre));
                }
            }
            None => {
                if orden.tecnico_asignado_id.is_some() {
                    cambios.push("Técnico desasignado".to_string());
                }
            }
        }
        model.tecnico_asignado_id = Set(tecnico);
    }

    if let Some(p) = payload.contrasena_equipo.as_deref() {
        if p.is_empty() {
            model.contrasena_equipo = Set(None);
        } else {
            model.contrasena_equipo = Set(Some(state.master_key.encrypt(p)));
        }
    }

    let txn = state.db.begin().await?;
    let updated = model.update(&txn).await?;
    for cambio in cambios {
        registrar_bitacora(&txn, id, Some(current.id()), cambio).await?;
    }
    txn.commit().await?;

    Ok(updated)
}

pub async fn eliminar_orden(db: &DatabaseConnection, id: i64) -> Result<(), ApiError> {
    find_orden(db, id).await?;
    // Children (servicios, cotizaciones, transferencias, bitácora) cascade.
    OrdenServicio::delete_by_id(id).exec(db).await?;
    Ok(())
}

// Contracted services.

pub async fn agregar_servicio(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    tipo_servicio_id: i64,
) -> Result<(), ApiError> {
    let orden = find_orden(db, orden_id).await?;
    closed_guard(&orden)?;

    let tipo = TipoServicio::find_by_id(tipo_servicio_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tipo de servicio no encontrado".to_string()))?;

    let existing = OrdenTipoServicio::find()
        .filter(orden_tipo_servicio::Column::OrdenId.eq(orden_id))
        .filter(orden_tipo_servicio::Column::TipoServicioId.eq(tipo_servicio_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "El servicio ya está agregado a la orden".to_string(),
        ));
    }

    let txn = db.begin().await?;
    let join = orden_tipo_servicio::ActiveModel {
        orden_id: Set(orden_id),
        tipo_servicio_id: Set(tipo_servicio_id),
        ..Default::default()
    };
    orden_tipo_servicio::Entity::insert(join).exec(&txn).await?;
    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!("Servicio agregado: {}", tipo.nombre_servicio),
    )
    .await?;
    txn.commit().await?;

    Ok(())
}

pub async fn quitar_servicio(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    tipo_servicio_id: i64,
) -> Result<(), ApiError> {
    let orden = find_orden(db, orden_id).await?;
    closed_guard(&orden)?;

    let join = OrdenTipoServicio::find()
        .filter(orden_tipo_servicio::Column::OrdenId.eq(orden_id))
        .filter(orden_tipo_servicio::Column::TipoServicioId.eq(tipo_servicio_id))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("El servicio no está en la orden".to_string()))?;

    let nombre = TipoServicio::find_by_id(tipo_servicio_id)
        .one(db)
        .await?
        .map(|t| t.nombre_servicio)
        .unwrap_or_default();

    let txn = db.begin().await?;
    OrdenTipoServicio::delete_by_id(join.id).exec(&txn).await?;
    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!("Servicio retirado: {nombre}"),
    )
    .await?;
    txn.commit().await?;

    Ok(())
}

// Status changes and close.

#[derive(Debug, Deserialize)]
pub struct CambioEstado {
    pub estado: EstadoOrden,
}

pub async fn cambiar_estado(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    destino: EstadoOrden,
) -> Result<orden_servicio::Model, ApiError> {
    let orden = find_orden(db, orden_id).await?;

    // A technician only moves their own assignments; the front desk and
    // management move any order.
    if !current.es_recepcion_o_gerente() && orden.tecnico_asignado_id != Some(current.id()) {
        return Err(ApiError::PermissionDenied(
            "Solo el técnico asignado puede cambiar el estado de esta orden".to_string(),
        ));
    }

    workflow::validar_cambio_estado(&orden, destino).map_err(ApiError::Validation)?;

    if orden.estado == destino {
        return Ok(orden);
    }

    let anterior = orden.estado.nombre();
    let nuevo = destino.nombre();

    let txn = db.begin().await?;
    let mut model: orden_servicio::ActiveModel = orden.into();
    model.estado = Set(destino);
    let updated = model.update(&txn).await?;
    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!("Estado cambiado de '{anterior}' a '{nuevo}'"),
    )
    .await?;
    txn.commit().await?;

    Ok(updated)
}

/// Close an order as Entregada or Cancelada. The only path to a terminal
/// state; stamps fecha_cierre and freezes the order.
pub async fn cerrar_orden(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    destino: EstadoOrden,
) -> Result<orden_servicio::Model, ApiError> {
    let orden = find_orden(db, orden_id).await?;
    workflow::validar_cierre(&orden, destino).map_err(ApiError::Validation)?;

    let nuevo = destino.nombre();

    let txn = db.begin().await?;
    let mut model: orden_servicio::ActiveModel = orden.into();
    model.estado = Set(destino);
    model.fecha_cierre = Set(Some(now_ts()));
    let updated = model.update(&txn).await?;
    registrar_bitacora(
        &txn,
        orden_id,
        Some(current.id()),
        format!("Orden cerrada como '{nuevo}'"),
    )
    .await?;
    txn.commit().await?;

    Ok(updated)
}

// Bitácora.

#[derive(Debug, Deserialize)]
pub struct BitacoraPayload {
    pub descripcion: String,
}

pub async fn agregar_bitacora(
    db: &DatabaseConnection,
    current: &CurrentUser,
    orden_id: i64,
    descripcion: &str,
) -> Result<(), ApiError> {
    let orden = find_orden(db, orden_id).await?;
    closed_guard(&orden)?;

    if descripcion.trim().is_empty() {
        return Err(ApiError::Validation("La descripción es obligatoria".to_string()));
    }

    registrar_bitacora(db, orden_id, Some(current.id()), descripcion.trim().to_string()).await
}

/// Rewrite an existing log entry. Elevated operation for fixing typos; the
/// entry keeps its original author and timestamp.
pub async fn corregir_bitacora(
    db: &DatabaseConnection,
    orden_id: i64,
    entrada_id: i64,
    descripcion: &str,
) -> Result<bitacora_orden::Model, ApiError> {
    let orden = find_orden(db, orden_id).await?;
    closed_guard(&orden)?;

    if descripcion.trim().is_empty() {
        return Err(ApiError::Validation("La descripción es obligatoria".to_string()));
    }

    let entrada = BitacoraOrden::find_by_id(entrada_id)
        .one(db)
        .await?
        .filter(|e| e.orden_id == orden_id)
        .ok_or_else(|| ApiError::NotFound("Entrada de bitácora no encontrada".to_string()))?;

    let mut model: bitacora_orden::ActiveModel = entrada.into();
    model.descripcion = Set(descripcion.trim().to_string());
    Ok(model.update(db).await?)
}

// Axum surface.

fn require_operacion(current: &CurrentUser) -> Result<(), ApiError> {
    if current.puede_operar_ordenes() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "No tiene permiso para operar órdenes".to_string(),
        ))
    }
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OrdenListQuery>,
) -> Result<Json<Paginado<OrdenResumen>>, ApiError> {
    authenticate(&state.db, &headers).await?;
    Ok(Json(listar_ordenes(&state.db, &query).await?))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OrdenCreate>,
) -> Result<(StatusCode, Json<orden_servicio::Model>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_escribir() {
        return Err(ApiError::PermissionDenied(
            "No tiene permiso para registrar órdenes".to_string(),
        ));
    }

    let orden = crear_orden(&state, &current, &payload).await?;
    tracing::info!(orden = orden.id, cliente = orden.cliente_id, "orden registrada");
    Ok((StatusCode::CREATED, Json(orden)))
}

pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<OrdenDetalle>, ApiError> {
    authenticate(&state.db, &headers).await?;
    Ok(Json(detalle_orden(&state.db, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<OrdenUpdate>,
) -> Result<Json<orden_servicio::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_escribir() {
        return Err(ApiError::PermissionDenied(
            "No tiene permiso para editar órdenes".to_string(),
        ));
    }

    Ok(Json(editar_orden(&state, &current, id, &payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_eliminar() {
        return Err(ApiError::PermissionDenied(
            "Solo un gerente puede eliminar órdenes".to_string(),
        ));
    }

    eliminar_orden(&state.db, id).await?;
    tracing::info!(orden = id, "orden eliminada");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_servicio(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ServicioPayload>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;
    agregar_servicio(&state.db, &current, id, payload.tipo_servicio_id).await?;
    Ok(StatusCode::CREATED)
}

#[derive(Debug, Deserialize)]
pub struct ServicioPayload {
    pub tipo_servicio_id: i64,
}

pub async fn remove_servicio(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, tipo_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;
    quitar_servicio(&state.db, &current, id, tipo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_estado(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<CambioEstado>,
) -> Result<Json<orden_servicio::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;
    Ok(Json(cambiar_estado(&state.db, &current, id, payload.estado).await?))
}

pub async fn cerrar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<CambioEstado>,
) -> Result<Json<orden_servicio::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_cerrar_ordenes() {
        return Err(ApiError::PermissionDenied(
            "No tiene permiso para cerrar órdenes".to_string(),
        ));
    }

    Ok(Json(cerrar_orden(&state.db, &current, id, payload.estado).await?))
}

pub async fn add_bitacora(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<BitacoraPayload>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_operacion(&current)?;
    agregar_bitacora(&state.db, &current, id, &payload.descripcion).await?;
    Ok(StatusCode::CREATED)
}

pub async fn edit_bitacora(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, entrada_id)): Path<(i64, i64)>,
    Json(payload): Json<BitacoraPayload>,
) -> Result<Json<bitacora_orden::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_eliminar() {
        return Err(ApiError::PermissionDenied(
            "Solo un gerente puede corregir la bitácora".to_string(),
        ));
    }

    Ok(Json(corregir_bitacora(&state.db, id, entrada_id, &payload.descripcion).await?))
}
