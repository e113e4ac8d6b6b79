//! Session authentication and permission predicates.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use entity::usuario::Rol;
use entity::{sesion, usuario, Sesion, Usuario};

use crate::crypto::{hash_password, verify_password_hash};
use crate::error::ApiError;
use crate::util::{generate_session_token, now_ts, random_bytes};

/// The user behind the current request, resolved from the bearer token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: usuario::Model,
}

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn es_gerente(&self) -> bool {
        self.user.is_superuser || self.user.role == Rol::Gerente
    }

    pub fn es_recepcion_o_gerente(&self) -> bool {
        self.user.is_superuser || matches!(self.user.role, Rol::Gerente | Rol::Recepcion)
    }

    /// Catalog, client, equipment and order creation/edit rights.
    pub fn puede_escribir(&self) -> bool {
        self.es_recepcion_o_gerente()
    }

    /// Day-to-day order operations: status changes, log entries, quotations
    /// and transfers. Technicians work orders; they do not manage catalogs.
    pub fn puede_operar_ordenes(&self) -> bool {
        self.user.is_superuser
            || matches!(self.user.role, Rol::Gerente | Rol::Recepcion | Rol::Tecnico)
    }

    /// Closing an order hands it to the customer; reception owns that step.
    pub fn puede_cerrar_ordenes(&self) -> bool {
        self.es_recepcion_o_gerente()
    }

    pub fn puede_autorizar_transferencias(&self) -> bool {
        self.es_recepcion_o_gerente()
    }

    /// Destructive operations and audit-log corrections.
    pub fn puede_eliminar(&self) -> bool {
        self.es_gerente()
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolve the request's bearer token to an enabled user.
///
/// Expired sessions are deleted on sight rather than left for a sweeper.
pub async fn authenticate(
    db: &DatabaseConnection,
    headers: &HeaderMap,
) -> Result<CurrentUser, ApiError> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Se requiere un token de sesión".to_string()))?;

    let session = Sesion::find_by_id(token.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Sesión no válida".to_string()))?;

    if session.expires_at <= now_ts() {
        sesion::Entity::delete_by_id(session.token.clone()).exec(db).await?;
        return Err(ApiError::Unauthorized("La sesión ha expirado".to_string()));
    }

    let user = Usuario::find_by_id(session.user_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Sesión no válida".to_string()))?;

    if !user.enabled {
        return Err(ApiError::Unauthorized("La cuenta está deshabilitada".to_string()));
    }

    Ok(CurrentUser { user })
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: usuario::Model,
}

/// Verify credentials and mint a session token.
///
/// Bad username and bad password produce the same message; login never
/// confirms which accounts exist.
pub async fn login(
    db: &DatabaseConnection,
    session_ttl_secs: i64,
    req: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let invalid = || ApiError::Unauthorized("Usuario o contraseña incorrectos".to_string());

    let user = Usuario::find()
        .filter(usuario::Column::Username.eq(req.username.as_str()))
        .one(db)
        .await?
        .ok_or_else(invalid)?;

    if !user.enabled {
        return Err(invalid());
    }

    let ok = verify_password_hash(
        req.password.as_bytes(),
        &user.salt,
        &user.password_hash,
        user.password_iterations as u32,
    );
    if !ok {
        return Err(invalid());
    }

    let now = now_ts();
    let token = generate_session_token();
    let session = sesion::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user.id),
        created_at: Set(now),
        expires_at: Set(now + session_ttl_secs),
    };
    sesion::Entity::insert(session).exec(db).await?;

    Ok(LoginResponse { token, expires_at: now + session_ttl_secs, user })
}

/// Drop the session behind the presented token. Idempotent.
pub async fn logout(db: &DatabaseConnection, headers: &HeaderMap) -> Result<(), ApiError> {
    if let Some(token) = extract_bearer_token(headers) {
        sesion::Entity::delete_by_id(token.to_string()).exec(db).await?;
    }
    Ok(())
}

/// Create a staff account. Used by seeding and by tests; there is no public
/// signup surface.
pub async fn create_user(
    db: &DatabaseConnection,
    password_iterations: u32,
    username: &str,
    nombre: &str,
    password: &str,
    role: Rol,
    is_superuser: bool,
) -> Result<usuario::Model, ApiError> {
    let existing = Usuario::find()
        .filter(usuario::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("El nombre de usuario ya existe".to_string()));
    }

    let salt = random_bytes(16);
    let hash = hash_password(password.as_bytes(), &salt, password_iterations);

    let model = usuario::ActiveModel {
        username: Set(username.to_string()),
        nombre: Set(nombre.to_string()),
        email: Set(None),
        role: Set(role),
        is_superuser: Set(is_superuser),
        enabled: Set(true),
        password_hash: Set(hash),
        salt: Set(salt),
        password_iterations: Set(password_iterations as i32),
        created_at: Set(now_ts()),
        ..Default::default()
    };

    Ok(usuario::Entity::insert(model).exec_with_returning(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(role: Rol, is_superuser: bool) -> CurrentUser {
        CurrentUser {
            user: usuario::Model {
                id: 1,
                username: "u".into(),
                nombre: "U".into(),
                email: None,
                role,
                is_superuser,
                enabled: true,
                password_hash: vec![],
                salt: vec![],
                password_iterations: 1,
                created_at: 0,
            },
        }
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn permission_matrix() {
        let gerente = user(Rol::Gerente, false);
        let recepcion = user(Rol::Recepcion, false);
        let tecnico = user(Rol::Tecnico, false);
        let superuser = user(Rol::Tecnico, true);

        assert!(gerente.puede_escribir());
        assert!(recepcion.puede_escribir());
        assert!(!tecnico.puede_escribir());
        assert!(superuser.puede_escribir());

        assert!(tecnico.puede_operar_ordenes());
        assert!(!tecnico.puede_cerrar_ordenes());
        assert!(recepcion.puede_cerrar_ordenes());

        assert!(!tecnico.puede_autorizar_transferencias());
        assert!(recepcion.puede_autorizar_transferencias());
        assert!(gerente.puede_autorizar_transferencias());

        assert!(!recepcion.puede_eliminar());
        assert!(gerente.puede_eliminar());
        assert!(superuser.puede_eliminar());
    }
}
