mod common;

use rust_decimal::Decimal;

use entity::orden_servicio::EstadoOrden;
use entity::usuario::Rol;
use taller_server::error::ApiError;
use taller_server::handlers::catalogo::{crear_tipo_servicio, TipoServicioPayload};
use taller_server::handlers::ordenes::{
    agregar_bitacora, agregar_servicio, cerrar_orden, corregir_bitacora, detalle_orden,
    quitar_servicio,
};

use common::{cliente_con_equipo, orden_nueva, setup, usuario};

async fn servicio(state: &taller_server::state::AppState, nombre: &str) -> i64 {
    crear_tipo_servicio(
        &state.db,
        &TipoServicioPayload {
            nombre_servicio: nombre.to_string(),
            descripcion: None,
            costo_estandar: Decimal::new(35000, 2),
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn servicios_se_agregan_sin_duplicados() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;
    let limpieza = servicio(&state, "Limpieza general").await;

    agregar_servicio(&state.db, &recepcion, orden.id, limpieza).await.unwrap();
    let err = agregar_servicio(&state.db, &recepcion, orden.id, limpieza)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let detalle = detalle_orden(&state.db, orden.id).await.unwrap();
    assert_eq!(detalle.servicios.len(), 1);
    assert!(detalle
        .bitacora
        .iter()
        .any(|e| e.entrada.descripcion.contains("Limpieza general")));

    quitar_servicio(&state.db, &recepcion, orden.id, limpieza).await.unwrap();
    let err = quitar_servicio(&state.db, &recepcion, orden.id, limpieza)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn servicio_desconocido_no_se_agrega() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let err = agregar_servicio(&state.db, &recepcion, orden.id, 999)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn correccion_de_bitacora_conserva_autor_y_fecha() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    agregar_bitacora(&state.db, &tecnico, orden.id, "Se reemplazo la pantalla")
        .await
        .unwrap();

    let detalle = detalle_orden(&state.db, orden.id).await.unwrap();
    let entrada = detalle
        .bitacora
        .iter()
        .find(|e| e.entrada.usuario_id == Some(tecnico.id()))
        .unwrap();

    let corregida = corregir_bitacora(
        &state.db,
        orden.id,
        entrada.entrada.id,
        "Se reemplazó la pantalla",
    )
    .await
    .unwrap();
    assert_eq!(corregida.descripcion, "Se reemplazó la pantalla");
    assert_eq!(corregida.usuario_id, Some(tecnico.id()));
    assert_eq!(corregida.fecha_hora, entrada.entrada.fecha_hora);

    // Entry ids from another order do not cross over.
    let otra = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;
    let err = corregir_bitacora(&state.db, otra.id, entrada.entrada.id, "x")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn bitacora_congelada_tras_el_cierre() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    agregar_bitacora(&state.db, &recepcion, orden.id, "Nota previa").await.unwrap();
    cerrar_orden(&state.db, &recepcion, orden.id, EstadoOrden::Cancelada)
        .await
        .unwrap();

    let detalle = detalle_orden(&state.db, orden.id).await.unwrap();
    let entrada = detalle
        .bitacora
        .iter()
        .find(|e| e.entrada.descripcion == "Nota previa")
        .unwrap();

    let err = corregir_bitacora(&state.db, orden.id, entrada.entrada.id, "editada")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::OrderClosed(_)));
}
