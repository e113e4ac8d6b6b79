use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use entity::{cliente, equipo, Cliente, Equipo};

use crate::auth::{authenticate, CurrentUser};
use crate::error::ApiError;
use crate::policy;
use crate::state::AppState;
use crate::util::{matches_query, normalize_text, now_ts};

use super::Paginado;

#[derive(Debug, Deserialize)]
pub struct ClientePayload {
    pub nombre_completo: String,
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rfc: Option<String>,
    #[serde(default)]
    pub calle: Option<String>,
    #[serde(default)]
    pub numero_exterior: Option<String>,
    #[serde(default)]
    pub numero_interior: Option<String>,
    #[serde(default)]
    pub colonia: Option<String>,
    #[serde(default)]
    pub codigo_postal: Option<String>,
    #[serde(default)]
    pub ciudad: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
}

impl ClientePayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.nombre_completo.trim().is_empty() {
            return Err(ApiError::Validation("El nombre completo es obligatorio".to_string()));
        }
        if self.telefono.trim().is_empty() {
            return Err(ApiError::Validation("El teléfono es obligatorio".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ClienteListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "super::primera_pagina")]
    pub page: u64,
}

fn require_escritura(current: &CurrentUser) -> Result<(), ApiError> {
    if current.puede_escribir() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "No tiene permiso para administrar clientes".to_string(),
        ))
    }
}

async fn find_cliente(db: &DatabaseConnection, id: i64) -> Result<cliente::Model, ApiError> {
    Cliente::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cliente no encontrado".to_string()))
}

/// Uniqueness pre-check for telefono and email, excluding the row being
/// edited.
async fn check_unicos(
    db: &DatabaseConnection,
    payload: &ClientePayload,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let mut query = Cliente::find().filter(cliente::Column::Telefono.eq(payload.telefono.trim()));
    if let Some(id) = exclude_id {
        query = query.filter(cliente::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ApiError::Conflict(
            "Ya existe un cliente con ese teléfono".to_string(),
        ));
    }

    if let Some(email) = payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        let mut query = Cliente::find().filter(cliente::Column::Email.eq(email));
        if let Some(id) = exclude_id {
            query = query.filter(cliente::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(ApiError::Conflict(
                "Ya existe un cliente con ese correo".to_string(),
            ));
        }
    }

    Ok(())
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub async fn crear_cliente(
    db: &DatabaseConnection,
    payload: &ClientePayload,
) -> Result<cliente::Model, ApiError> {
    payload.validate()?;
    check_unicos(db, payload, None).await?;

    let model = cliente::ActiveModel {
        nombre_completo: Set(payload.nombre_completo.trim().to_string()),
        telefono: Set(payload.telefono.trim().to_string()),
        email: Set(non_empty(&payload.email)),
        rfc: Set(non_empty(&payload.rfc)),
        calle: Set(non_empty(&payload.calle)),
        numero_exterior: Set(non_empty(&payload.numero_exterior)),
        numero_interior: Set(non_empty(&payload.numero_interior)),
        colonia: Set(non_empty(&payload.colonia)),
        codigo_postal: Set(non_empty(&payload.codigo_postal)),
        ciudad: Set(non_empty(&payload.ciudad)),
        estado: Set(non_empty(&payload.estado)),
        fecha_registro: Set(now_ts()),
        ..Default::default()
    };

    Ok(cliente::Entity::insert(model).exec_with_returning(db).await?)
}

pub async fn editar_cliente(
    db: &DatabaseConnection,
    id: i64,
    payload: &ClientePayload,
) -> Result<cliente::Model, ApiError> {
    payload.validate()?;
    let existing = find_cliente(db, id).await?;
    check_unicos(db, payload, Some(id)).await?;

    let mut model: cliente::ActiveModel = existing.into();
    model.nombre_completo = Set(payload.nombre_completo.trim().to_string());
    model.telefono = Set(payload.telefono.trim().to_string());
    model.email = Set(non_empty(&payload.email));
    model.rfc = Set(non_empty(&payload.rfc));
    model.calle = Set(non_empty(&payload.calle));
    model.numero_exterior = Set(non_empty(&payload.numero_exterior));
    model.numero_interior = Set(non_empty(&payload.numero_interior));
    model.colonia = Set(non_empty(&payload.colonia));
    model.codigo_postal = Set(non_empty(&payload.codigo_postal));
    model.ciudad = Set(non_empty(&payload.ciudad));
    model.estado = Set(non_empty(&payload.estado));

    Ok(model.update(db).await?)
}

/// List customers newest-first, with optional accent-insensitive search over
/// name, phone and email.
pub async fn listar_clientes(
    db: &DatabaseConnection,
    q: Option<&str>,
    page: u64,
) -> Result<Paginado<cliente::Model>, ApiError> {
    let all = Cliente::find()
        .order_by_desc(cliente::Column::FechaRegistro)
        .order_by_desc(cliente::Column::Id)
        .all(db)
        .await?;

    let filtered = match q.map(str::trim).filter(|s| !s.is_empty()) {
        Some(q) => {
            let nq = normalize_text(q);
            all.into_iter()
                .filter(|c| {
                    matches_query(&c.nombre_completo, &nq)
                        || matches_query(&c.telefono, &nq)
                        || c.email.as_deref().is_some_and(|e| matches_query(e, &nq))
                        || c.rfc.as_deref().is_some_and(|r| matches_query(r, &nq))
                })
                .collect()
        }
        None => all,
    };

    Ok(Paginado::from_vec(filtered, page))
}

pub async fn eliminar_cliente(db: &DatabaseConnection, id: i64) -> Result<(), ApiError> {
    find_cliente(db, id).await?;
    policy::ensure_cliente_deletable(db, id).await?;
    Cliente::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// Autocomplete for the order intake form: match by name or phone, return
/// each customer with their registered devices.
pub async fn buscar_clientes(
    db: &DatabaseConnection,
    q: &str,
) -> Result<Vec<ResultadoBusqueda>, ApiError> {
    let q = q.trim();
    if q.is_empty() {
        return Ok(vec![]);
    }
    let nq = normalize_text(q);

    let clientes = Cliente::find()
        .order_by_asc(cliente::Column::NombreCompleto)
        .all(db)
        .await?;

    let mut resultados = Vec::new();
    for c in clientes {
        if !matches_query(&c.nombre_completo, &nq) && !matches_query(&c.telefono, &nq) {
            continue;
        }
        let equipos = Equipo::find()
            .filter(equipo::Column::ClienteId.eq(c.id))
            .order_by_asc(equipo::Column::Id)
            .all(db)
            .await?;
        resultados.push(ResultadoBusqueda {
            id: c.id,
            nombre: c.nombre_completo,
            telefono: c.telefono,
            equipos: equipos
                .into_iter()
                .map(|e| EquipoResumen { descripcion: e.descripcion(), id: e.id })
                .collect(),
        });
        // The dropdown shows a handful of entries; stop early.
        if resultados.len() >= 10 {
            break;
        }
    }

    Ok(resultados)
}

#[derive(Debug, Serialize)]
pub struct ResultadoBusqueda {
    pub id: i64,
    pub nombre: String,
    pub telefono: String,
    pub equipos: Vec<EquipoResumen>,
}

#[derive(Debug, Serialize)]
pub struct EquipoResumen {
    pub id: i64,
    pub descripcion: String,
}

#[derive(Debug, Serialize)]
pub struct ClienteDetalle {
    #[serde(flatten)]
    pub cliente: cliente::Model,
    pub equipos: Vec<equipo::Model>,
}

// Axum surface.

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ClienteListQuery>,
) -> Result<Json<Paginado<cliente::Model>>, ApiError> {
    authenticate(&state.db, &headers).await?;
    let page = listar_clientes(&state.db, query.q.as_deref(), query.page).await?;
    Ok(Json(page))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ClientePayload>,
) -> Result<(StatusCode, Json<cliente::Model>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;

    let created = crear_cliente(&state.db, &payload).await?;
    tracing::info!(cliente = created.id, "cliente registrado");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ClienteDetalle>, ApiError> {
    authenticate(&state.db, &headers).await?;

    let cliente = find_cliente(&state.db, id).await?;
    let equipos = Equipo::find()
        .filter(equipo::Column::ClienteId.eq(id))
        .order_by_asc(equipo::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(ClienteDetalle { cliente, equipos }))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ClientePayload>,
) -> Result<Json<cliente::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;

    let updated = editar_cliente(&state.db, id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    if !current.puede_eliminar() {
        return Err(ApiError::PermissionDenied(
            "Solo un gerente puede eliminar clientes".to_string(),
        ));
    }

    eliminar_cliente(&state.db, id).await?;
    tracing::info!(cliente = id, "cliente eliminado");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct BusquedaQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct BusquedaResponse {
    pub resultados: Vec<ResultadoBusqueda>,
}

pub async fn buscar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BusquedaQuery>,
) -> Result<Json<BusquedaResponse>, ApiError> {
    authenticate(&state.db, &headers).await?;
    let resultados = buscar_clientes(&state.db, &query.q).await?;
    Ok(Json(BusquedaResponse { resultados }))
}
