use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use crate::handlers;
use crate::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Sesiones.
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Clientes y equipos.
        .route("/api/clientes", get(handlers::clientes::list).post(handlers::clientes::create))
        .route(
            "/api/clientes/{id}",
            get(handlers::clientes::get)
                .put(handlers::clientes::update)
                .delete(handlers::clientes::delete),
        )
        .route("/api/equipos", get(handlers::equipos::list).post(handlers::equipos::create))
        .route(
            "/api/equipos/{id}",
            get(handlers::equipos::get)
                .put(handlers::equipos::update)
                .delete(handlers::equipos::delete),
        )
        .route("/api/equipos/{id}/password", get(handlers::equipos::password))
        // Catálogo.
        .route(
            "/api/catalogo/proveedores",
            get(handlers::catalogo::proveedores_list).post(handlers::catalogo::proveedores_create),
        )
        .route(
            "/api/catalogo/proveedores/{id}",
            put(handlers::catalogo::proveedores_update)
                .delete(handlers::catalogo::proveedores_delete),
        )
        .route(
            "/api/catalogo/servicios",
            get(handlers::catalogo::servicios_list).post(handlers::catalogo::servicios_create),
        )
        .route(
            "/api/catalogo/servicios/{id}",
            put(handlers::catalogo::servicios_update).delete(handlers::catalogo::servicios_delete),
        )
        // Órdenes de servicio.
        .route("/api/ordenes", get(handlers::ordenes::list).post(handlers::ordenes::create))
        .route("/api/ordenes/buscar-cliente", get(handlers::clientes::buscar))
        .route(
            "/api/ordenes/{id}",
            get(handlers::ordenes::get)
                .put(handlers::ordenes::update)
                .delete(handlers::ordenes::delete),
        )
        .route("/api/ordenes/{id}/estado", post(handlers::ordenes::set_estado))
        .route("/api/ordenes/{id}/cerrar", post(handlers::ordenes::cerrar))
        .route("/api/ordenes/{id}/servicios", post(handlers::ordenes::add_servicio))
        .route(
            "/api/ordenes/{id}/servicios/{tipo_id}",
            delete(handlers::ordenes::remove_servicio),
        )
        .route("/api/ordenes/{id}/bitacora", post(handlers::ordenes::add_bitacora))
        .route(
            "/api/ordenes/{id}/bitacora/{entrada_id}",
            put(handlers::ordenes::edit_bitacora),
        )
        .route("/api/ordenes/{id}/cotizaciones", post(handlers::cotizaciones::create))
        .route("/api/ordenes/{id}/transferencias", post(handlers::transferencias::create))
        // Cotizaciones y transferencias fuera del contexto de su orden.
        .route(
            "/api/cotizaciones/{id}",
            put(handlers::cotizaciones::update).delete(handlers::cotizaciones::delete),
        )
        .route(
            "/api/transferencias/{id}",
            put(handlers::transferencias::update).delete(handlers::transferencias::delete),
        )
        .route(
            "/api/transferencias/{id}/autorizar",
            post(handlers::transferencias::autorizar),
        )
        // Paneles.
        .route("/api/dashboard", get(handlers::dashboard::index))
        .route("/api/dashboard/recepcion", get(handlers::dashboard::recepcion))
        .route("/api/dashboard/tecnico", get(handlers::dashboard::tecnico))
        .route("/api/dashboard/gerente", get(handlers::dashboard::gerente))
        .with_state(state)
}
