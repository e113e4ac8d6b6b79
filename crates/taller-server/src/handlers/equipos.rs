use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use entity::{equipo, Cliente, Equipo};

use crate::auth::{authenticate, CurrentUser};
use crate::crypto::MasterKey;
use crate::error::ApiError;
use crate::policy;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EquipoPayload {
    pub cliente_id: i64,
    pub tipo_equipo: String,
    pub marca: String,
    pub modelo: String,
    #[serde(default)]
    pub numero_serie: Option<String>,
    /// Plaintext on the wire; encrypted before it touches the database.
    #[serde(default)]
    pub contrasena: Option<String>,
}

impl EquipoPayload {
    fn validate(&self) -> Result<(), ApiError> {
        for (value, campo) in [
            (&self.tipo_equipo, "tipo de equipo"),
            (&self.marca, "marca"),
            (&self.modelo, "modelo"),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("El campo {campo} es obligatorio")));
            }
        }
        Ok(())
    }

    fn numero_serie_norm(&self) -> Option<String> {
        self.numero_serie
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

fn require_escritura(current: &CurrentUser) -> Result<(), ApiError> {
    if current.puede_escribir() {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied(
            "No tiene permiso para administrar equipos".to_string(),
        ))
    }
}

async fn find_equipo(db: &DatabaseConnection, id: i64) -> Result<equipo::Model, ApiError> {
    Equipo::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipo no encontrado".to_string()))
}

/// Serial numbers are unique per customer, not globally; two customers can
/// each own a device with the same serial.
async fn check_serie_unica(
    db: &DatabaseConnection,
    cliente_id: i64,
    numero_serie: &str,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let mut query = Equipo::find()
        .filter(equipo::Column::ClienteId.eq(cliente_id))
        .filter(equipo::Column::NumeroSerie.eq(numero_serie));
    if let Some(id) = exclude_id {
        query = query.filter(equipo::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(ApiError::Conflict(
            "El cliente ya tiene un equipo con ese número de serie".to_string(),
        ));
    }
    Ok(())
}

pub async fn crear_equipo(
    db: &DatabaseConnection,
    master_key: &MasterKey,
    payload: &EquipoPayload,
) -> Result<equipo::Model, ApiError> {
    payload.validate()?;

    Cliente::find_by_id(payload.cliente_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Cliente no encontrado".to_string()))?;

    let serie = payload.numero_serie_norm();
    if let Some(ref s) = serie {
        check_serie_unica(db, payload.cliente_id, s, None).await?;
    }

    let contrasena = payload
        .contrasena
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| master_key.encrypt(p));

    let model = equipo::ActiveModel {
        cliente_id: Set(payload.cliente_id),
        tipo_equipo: Set(payload.tipo_equipo.trim().to_string()),
        marca: Set(payload.marca.trim().to_string()),
        modelo: Set(payload.modelo.trim().to_string()),
        numero_serie: Set(serie),
        contrasena: Set(contrasena),
        ..Default::default()
    };

    Ok(equipo::Entity::insert(model).exec_with_returning(db).await?)
}

pub async fn editar_equipo(
    db: &DatabaseConnection,
    master_key: &MasterKey,
    id: i64,
    payload: &EquipoPayload,
) -> Result<equipo::Model, ApiError> {
    payload.validate()?;
    let existing = find_equipo(db, id).await?;

    // The owner is fixed at registration; re-homing a device would detach
    // it from its service history.
    if payload.cliente_id != existing.cliente_id {
        return Err(ApiError::Validation(
            "El equipo no puede cambiar de cliente".to_string(),
        ));
    }

    let serie = payload.numero_serie_norm();
    if let Some(ref s) = serie {
        check_serie_unica(db, existing.cliente_id, s, Some(id)).await?;
    }

    let mut model: equipo::ActiveModel = existing.into();
    model.tipo_equipo = Set(payload.tipo_equipo.trim().to_string());
    model.marca = Set(payload.marca.trim().to_string());
    model.modelo = Set(payload.modelo.trim().to_string());
    model.numero_serie = Set(serie);

    // An absent contrasena leaves the stored one alone; an empty string
    // clears it.
    if let Some(p) = payload.contrasena.as_deref() {
        if p.is_empty() {
            model.contrasena = Set(None);
        } else {
            model.contrasena = Set(Some(master_key.encrypt(p)));
        }
    }

    Ok(model.update(db).await?)
}

pub async fn eliminar_equipo(db: &DatabaseConnection, id: i64) -> Result<(), ApiError> {
    find_equipo(db, id).await?;
    policy::ensure_equipo_deletable(db, id).await?;
    Equipo::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// Decrypt a stored device password for display. Failures surface the
/// decryption sentinel, never an error.
pub async fn revelar_contrasena(
    db: &DatabaseConnection,
    master_key: &MasterKey,
    id: i64,
) -> Result<Option<String>, ApiError> {
    let equipo = find_equipo(db, id).await?;
    Ok(equipo.contrasena.as_deref().map(|stored| master_key.decrypt(stored)))
}

// Axum surface.

#[derive(Debug, Deserialize)]
pub struct EquipoListQuery {
    #[serde(default)]
    pub cliente_id: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EquipoListQuery>,
) -> Result<Json<Vec<equipo::Model>>, ApiError> {
    authenticate(&state.db, &headers).await?;

    let mut find = Equipo::find().order_by_asc(equipo::Column::Id);
    if let Some(cliente_id) = query.cliente_id {
        find = find.filter(equipo::Column::ClienteId.eq(cliente_id));
    }
    Ok(Json(find.all(&state.db).await?))
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EquipoPayload>,
) -> Result<(StatusCode, Json<equipo::Model>), ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;

    let created = crear_equipo(&state.db, &state.master_key, &payload).await?;
    tracing::info!(equipo = created.id, cliente = created.cliente_id, "equipo registrado");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<equipo::Model>, ApiError> {
    authenticate(&state.db, &headers).await?;
    Ok(Json(find_equipo(&state.db, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<EquipoPayload>,
) -> Result<Json<equipo::Model>, ApiError> {
    let current = authenticate(&state.db, &headers).await?;
    require_escritura(&current)?;

    let updated = editar_equipo(&state.db, &state.master_key, id, &payload).await?;
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
            "Solo un gerente puede eliminar equipos".to_string(),
        ));
    }

    eliminar_equipo(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ContrasenaResponse {
    pub id: i64,
    pub password: Option<String>,
}

pub async fn password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ContrasenaResponse>, ApiError> {
    authenticate(&state.db, &headers).await?;
    let password = revelar_contrasena(&state.db, &state.master_key, id).await?;
    Ok(Json(ContrasenaResponse { id, password }))
}
