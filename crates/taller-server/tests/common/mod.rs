#![allow(dead_code)]

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use entity::usuario::Rol;
use taller_server::auth::{self, CurrentUser};
use taller_server::config::{AuthSection, ServerConfig, ServerSection, StorageSection};
use taller_server::crypto::MasterKey;
use taller_server::handlers::clientes::{crear_cliente, ClientePayload};
use taller_server::handlers::equipos::{crear_equipo, EquipoPayload};
use taller_server::handlers::ordenes::{crear_orden, OrdenCreate};
use taller_server::state::AppState;

// Low iteration count keeps the test suite fast.
pub const TEST_ITERATIONS: u32 = 1_000;

pub async fn setup() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = ServerConfig {
        server: ServerSection::default(),
        storage: StorageSection { database_url: "sqlite::memory:".to_string() },
        auth: AuthSection {
            secret_key: "clave-de-prueba".to_string(),
            session_ttl_secs: 3600,
            password_iterations: TEST_ITERATIONS,
        },
    };

    AppState {
        db,
        master_key: Arc::new(MasterKey::derive("clave-de-prueba")),
        config: Arc::new(config),
    }
}

pub async fn usuario(state: &AppState, username: &str, rol: Rol) -> CurrentUser {
    let user = auth::create_user(
        &state.db,
        TEST_ITERATIONS,
        username,
        username,
        "contrasena",
        rol,
        false,
    )
    .await
    .unwrap();
    CurrentUser { user }
}

pub fn cliente_payload(nombre: &str, telefono: &str) -> ClientePayload {
    ClientePayload {
        nombre_completo: nombre.to_string(),
        telefono: telefono.to_string(),
        email: None,
        rfc: None,
        calle: None,
        numero_exterior: None,
        numero_interior: None,
        colonia: None,
        codigo_postal: None,
        ciudad: None,
        estado: None,
    }
}

pub fn equipo_payload(cliente_id: i64, serie: Option<&str>) -> EquipoPayload {
    EquipoPayload {
        cliente_id,
        tipo_equipo: "Laptop".to_string(),
        marca: "Dell".to_string(),
        modelo: "Latitude 5420".to_string(),
        numero_serie: serie.map(str::to_string),
        contrasena: None,
    }
}

pub fn orden_create(cliente_id: i64, equipo_id: i64) -> OrdenCreate {
    OrdenCreate {
        cliente_id,
        equipo_id,
        descripcion_falla: "No enciende".to_string(),
        prioridad: None,
        tecnico_asignado_id: None,
        contrasena_equipo: None,
        servicios: vec![],
    }
}

/// Intake shortcut: a fresh order in estado Nueva.
pub async fn orden_nueva(
    state: &AppState,
    current: &CurrentUser,
    cliente_id: i64,
    equipo_id: i64,
) -> entity::orden_servicio::Model {
    crear_orden(state, current, &orden_create(cliente_id, equipo_id)).await.unwrap()
}

/// Customer with one registered device, ready for an intake.
pub async fn cliente_con_equipo(state: &AppState, telefono: &str) -> (i64, i64) {
    let cliente = crear_cliente(&state.db, &cliente_payload("Cliente de Prueba", telefono))
        .await
        .unwrap();
    let equipo = crear_equipo(&state.db, &state.master_key, &equipo_payload(cliente.id, None))
        .await
        .unwrap();
    (cliente.id, equipo.id)
}
