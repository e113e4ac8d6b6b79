mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use entity::usuario::Rol;
use entity::{sesion, Sesion};
use taller_server::auth::{authenticate, login, logout, LoginRequest};
use taller_server::error::ApiError;

use common::{setup, usuario};

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

fn credentials(username: &str, password: &str) -> LoginRequest {
    LoginRequest { username: username.to_string(), password: password.to_string() }
}

#[tokio::test]
async fn login_y_autenticacion() {
    let state = setup().await;
    usuario(&state, "recepcion", Rol::Recepcion).await;

    let resp = login(&state.db, 3600, &credentials("recepcion", "contrasena"))
        .await
        .unwrap();
    assert_eq!(resp.token.len(), 64);

    let current = authenticate(&state.db, &bearer(&resp.token)).await.unwrap();
    assert_eq!(current.user.username, "recepcion");
}

#[tokio::test]
async fn credenciales_invalidas_mismo_mensaje() {
    let state = setup().await;
    usuario(&state, "recepcion", Rol::Recepcion).await;

    let mal_password = login(&state.db, 3600, &credentials("recepcion", "otra"))
        .await
        .unwrap_err();
    let sin_usuario = login(&state.db, 3600, &credentials("nadie", "otra"))
        .await
        .unwrap_err();

    // Login does not reveal which accounts exist.
    assert_eq!(mal_password.to_string(), sin_usuario.to_string());
    assert!(matches!(mal_password, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn logout_invalida_el_token() {
    let state = setup().await;
    usuario(&state, "recepcion", Rol::Recepcion).await;

    let resp = login(&state.db, 3600, &credentials("recepcion", "contrasena"))
        .await
        .unwrap();
    let headers = bearer(&resp.token);

    logout(&state.db, &headers).await.unwrap();
    assert!(matches!(
        authenticate(&state.db, &headers).await.unwrap_err(),
        ApiError::Unauthorized(_)
    ));

    // Logging out twice is harmless.
    logout(&state.db, &headers).await.unwrap();
}

#[tokio::test]
async fn sesion_expirada_se_rechaza_y_borra() {
    let state = setup().await;
    let current = usuario(&state, "recepcion", Rol::Recepcion).await;

    let vencida = sesion::ActiveModel {
        token: Set("t".repeat(64)),
        user_id: Set(current.id()),
        created_at: Set(0),
        expires_at: Set(1),
    };
    sesion::Entity::insert(vencida).exec(&state.db).await.unwrap();

    let err = authenticate(&state.db, &bearer(&"t".repeat(64))).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    // Expired rows are reaped on contact.
    assert!(Sesion::find_by_id("t".repeat(64))
        .one(&state.db)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn cuenta_deshabilitada_no_entra() {
    let state = setup().await;
    let current = usuario(&state, "recepcion", Rol::Recepcion).await;

    let resp = login(&state.db, 3600, &credentials("recepcion", "contrasena"))
        .await
        .unwrap();

    let mut model: entity::usuario::ActiveModel = current.user.into();
    model.enabled = Set(false);
    model.update(&state.db).await.unwrap();

    // Both fresh logins and existing sessions are cut off.
    assert!(login(&state.db, 3600, &credentials("recepcion", "contrasena"))
        .await
        .is_err());
    assert!(matches!(
        authenticate(&state.db, &bearer(&resp.token)).await.unwrap_err(),
        ApiError::Unauthorized(_)
    ));
}
