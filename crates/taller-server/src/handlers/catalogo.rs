//! Supplier and service-type catalogs. Small tables maintained by the front
//! desk; listings are unpaginated.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection, QueryOrder};
use serde::Deserialize;

use entity::{proveedor, tipo_servicio, Proveedor, TipoServicio};

use crate::auth::{authenticate, CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

fn require_escritura(current: &CurrentUser) -> Result<(), ApiError> {
    if current.puede_escribir() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "No tiene permiso para administrar el catálogo".to_string(),
        ))
    }
}

fn require_eliminacion(current: &CurrentUser) -> Result<(), ApiError> {
    if current.puede_eliminar() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "Solo un gerente puede eliminar elementos del catálogo".to_string(),
        ))
    }
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

// Proveedores.

#[derive(Debug, Deserialize)]
pub struct ProveedorPayload {
    pub nombre_empresa: String,
    #[serde(default)]
    pub persona_contacto: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

async fn find_proveedor(db: &DatabaseConnection, id: i64) -> Result<proveedor::Model, ApiError> {
    Proveedor::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Proveedor no encontrado".to_string()))
}

async fn check_proveedor_unico(
    db: &DatabaseConnection,
    nombre: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let mut query = Proveedor::find().filter(proveedor::Column::NombreEmpresa.eq(nombre));
    if let Some(id) = exclude_id {
        query = query.filter(proveedor::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ApiError::Conflict(
            "Ya existe un proveedor con ese nombre".to_string(),
        ));
    }
    Ok(())
}

pub async fn crear_proveedor(
    db: &DatabaseConnection,
    payload: &ProveedorPayload,
) -> Result<proveedor::Model, ApiError> {
    let nombre = payload.nombre_empresa.trim();
    if nombre.is_empty() {
        return Err(ApiError::Validation("El nombre de la empresa es obligatorio".to_string()));
    }
    check_proveedor_unico(db, nombre, None).await?;

    let model = proveedor::ActiveModel {
        nombre_empresa: Set(nombre.to_string()),
        persona_contacto: Set(non_empty(&payload.persona_contacto)),
        telefono: Set(non_empty(&payload.telefono)),
        email: Set(non_empty(&payload.email)),
        ..Default::default()
    };
    Ok(proveedor::Entity::insert(model).exec_with_returning(db).await?)
}

pub async fn proveedores_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<proveedor::Model>>, ApiError> {
    authenticate(&state.db, &headers).await?;
    let all = Proveedor::find()
        .order_by_asc(proveedor::Column::NombreEmpresa)
        .all(&state.db)
        .await?;
    Ok(Json(all))
}

pub async fn proveedores_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ProveedorPayload>,
) -> Result<(StatusCode, Json<proveedor::Model>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;
    let created = crear_proveedor(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn proveedores_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ProveedorPayload>,
) -> Result<Json<proveedor::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;

    let existing = find_proveedor(&state.db, id).await?;
    let nombre = payload.nombre_empresa.trim();
    if nombre.is_empty() {
        return Err(ApiError::Validation("El nombre de la empresa es obligatorio".to_string()));
    }
    check_proveedor_unico(&state.db, nombre, Some(id)).await?;

    let mut model: proveedor::ActiveModel = existing.into();
    model.nombre_empresa = Set(nombre.to_string());
    model.persona_contacto = Set(non_empty(&payload.persona_contacto));
    model.telefono = Set(non_empty(&payload.telefono));
    model.email = Set(non_empty(&payload.email));
    Ok(Json(model.update(&state.db).await?))
}

/// Quotations that referenced the supplier keep their row with a null
/// proveedor_id; history survives the catalog cleanup.
pub async fn proveedores_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_eliminacion(&current)?;

    find_proveedor(&state.db, id).await?;
    Proveedor::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Tipos de servicio.

#[derive(Debug, Deserialize)]
pub struct TipoServicioPayload {
    pub nombre_servicio: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub costo_estandar: Decimal,
}

impl TipoServicioPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.nombre_servicio.trim().is_empty() {
            return Err(ApiError::Validation(
                "El nombre del servicio es obligatorio".to_string(),
            ));
        }
        if self.costo_estandar < Decimal::ZERO {
            return Err(ApiError::Validation(
                "El costo estándar no puede ser negativo".to_string(),
            ));
        }
        Ok(())
    }
}

async fn find_tipo_servicio(
    db: &DatabaseConnection,
    id: i64,
) -> Result<tipo_servicio::Model, ApiError> {
    TipoServicio::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tipo de servicio no encontrado".to_string()))
}

async fn check_servicio_unico(
    db: &DatabaseConnection,
    nombre: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let mut query = TipoServicio::find().filter(tipo_servicio::Column::NombreServicio.eq(nombre));
    if let Some(id) = exclude_id {
        query = query.filter(tipo_servicio::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ApiError::Conflict(
            "Ya existe un servicio con ese nombre".to_string(),
        ));
    }
    Ok(())
}

pub async fn crear_tipo_servicio(
    db: &DatabaseConnection,
    payload: &TipoServicioPayload,
) -> Result<tipo_servicio::Model, ApiError> {
    payload.validate()?;
    let nombre = payload.nombre_servicio.trim();
    check_servicio_unico(db, nombre, None).await?;

    let model = tipo_servicio::ActiveModel {
        nombre_servicio: Set(nombre.to_string()),
        descripcion: Set(non_empty(&payload.descripcion)),
        costo_estandar: Set(payload.costo_estandar),
        ..Default::default()
    };
    Ok(tipo_servicio::Entity::insert(model).exec_with_returning(db).await?)
}

pub async fn servicios_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<tipo_servicio::Model>>, ApiError> {
    authenticate(&state.db, &headers).await?;
    let all = TipoServicio::find()
        .order_by_asc(tipo_servicio::Column::NombreServicio)
        .all(&state.db)
        .await?;
    Ok(Json(all))
}

pub async fn servicios_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TipoServicioPayload>,
) -> Result<(StatusCode, Json<tipo_servicio::Model>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;
    let created = crear_tipo_servicio(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn servicios_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<TipoServicioPayload>,
) -> Result<Json<tipo_servicio::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;
    payload.validate()?;

    let existing = find_tipo_servicio(&state.db, id).await?;
    let nombre = payload.nombre_servicio.trim();
    check_servicio_unico(&state.db, nombre, Some(id)).await?;

    let mut model: tipo_servicio::ActiveModel = existing.into();
    model.nombre_servicio = Set(nombre.to_string());
    model.descripcion = Set(non_empty(&payload.descripcion));
    model.costo_estandar = Set(payload.costo_estandar);
    Ok(Json(model.update(&state.db).await?))
}

pub async fn servicios_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_eliminacion(&current)?;

    find_tipo_servicio(&state.db, id).await?;
    TipoServicio::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
