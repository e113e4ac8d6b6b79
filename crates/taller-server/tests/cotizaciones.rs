mod common;

use rust_decimal::Decimal;

use entity::cotizacion::{EstadoCotizacion, FuenteRefaccion, TipoCotizacion};
use entity::usuario::Rol;
use taller_server::error::ApiError;
use taller_server::handlers::catalogo::{crear_proveedor, ProveedorPayload};
use taller_server::handlers::cotizaciones::{
    crear_cotizacion, editar_cotizacion, CotizacionCreate, CotizacionUpdate,
};
use taller_server::handlers::ordenes::detalle_orden;

use common::{cliente_con_equipo, orden_nueva, setup, usuario};

fn create_payload(refacciones: i64, mano_obra: i64) -> CotizacionCreate {
    CotizacionCreate {
        concepto: "Cambio de pantalla".to_string(),
        costo_refacciones: Decimal::new(refacciones, 2),
        costo_mano_obra: Decimal::new(mano_obra, 2),
        fuente_refaccion: None,
        proveedor_id: None,
        tipo_cotizacion: None,
        notas: None,
    }
}

fn update_from(c: &entity::cotizacion::Model, estado: EstadoCotizacion) -> CotizacionUpdate {
    CotizacionUpdate {
        concepto: c.concepto.clone(),
        costo_refacciones: c.costo_refacciones,
        costo_mano_obra: c.costo_mano_obra,
        estado,
        fuente_refaccion: c.fuente_refaccion,
        proveedor_id: c.proveedor_id,
        notas: c.notas.clone(),
    }
}

#[tokio::test]
async fn nueva_cotizacion_inicia_pendiente() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let c = crear_cotizacion(&state.db, &recepcion, orden.id, &create_payload(150000, 50000))
        .await
        .unwrap();
    assert_eq!(c.estado, EstadoCotizacion::Pendiente);
    assert_eq!(c.tipo_cotizacion, TipoCotizacion::Interna);
    assert_eq!(c.costo_total(), Decimal::new(200000, 2));
}

#[tokio::test]
async fn costo_total_cero_rechazado() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let err = crear_cotizacion(&state.db, &recepcion, orden.id, &create_payload(0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let mut negativo = create_payload(100, 0);
    negativo.costo_mano_obra = Decimal::new(-100, 2);
    let err = crear_cotizacion(&state.db, &recepcion, orden.id, &negativo)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn pedido_a_proveedor_requiere_proveedor() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let mut payload = create_payload(100000, 0);
    payload.fuente_refaccion = Some(FuenteRefaccion::PedidoProveedor);
    let err = crear_cotizacion(&state.db, &recepcion, orden.id, &payload)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let proveedor = crear_proveedor(
        &state.db,
        &ProveedorPayload {
            nombre_empresa: "Refacciones MX".to_string(),
            persona_contacto: None,
            telefono: None,
            email: None,
        },
    )
    .await
    .unwrap();

    payload.proveedor_id = Some(proveedor.id);
    let c = crear_cotizacion(&state.db, &recepcion, orden.id, &payload).await.unwrap();
    assert_eq!(c.fuente_refaccion, Some(FuenteRefaccion::PedidoProveedor));
    assert_eq!(c.proveedor_id, Some(proveedor.id));
}

#[tokio::test]
async fn stock_interno_descarta_proveedor() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let proveedor = crear_proveedor(
        &state.db,
        &ProveedorPayload {
            nombre_empresa: "Refacciones MX".to_string(),
            persona_contacto: None,
            telefono: None,
            email: None,
        },
    )
    .await
    .unwrap();

    let mut payload = create_payload(100000, 0);
    payload.fuente_refaccion = Some(FuenteRefaccion::StockInterno);
    payload.proveedor_id = Some(proveedor.id);

    let c = crear_cotizacion(&state.db, &recepcion, orden.id, &payload).await.unwrap();
    assert_eq!(c.fuente_refaccion, Some(FuenteRefaccion::StockInterno));
    assert_eq!(c.proveedor_id, None);
}

#[tokio::test]
async fn transiciones_validas_e_invalidas() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let c = crear_cotizacion(&state.db, &recepcion, orden.id, &create_payload(100000, 0))
        .await
        .unwrap();

    // Pendiente -> Autorizada salta Enviada.
    let err = editar_cotizacion(
        &state.db,
        &recepcion,
        c.id,
        &update_from(&c, EstadoCotizacion::Autorizada),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let enviada = editar_cotizacion(
        &state.db,
        &recepcion,
        c.id,
        &update_from(&c, EstadoCotizacion::Enviada),
    )
    .await
    .unwrap();
    assert_eq!(enviada.estado, EstadoCotizacion::Enviada);

    let autorizada = editar_cotizacion(
        &state.db,
        &recepcion,
        c.id,
        &update_from(&enviada, EstadoCotizacion::Autorizada),
    )
    .await
    .unwrap();
    assert_eq!(autorizada.estado, EstadoCotizacion::Autorizada);

    // Terminal: no hay vuelta atrás.
    let err = editar_cotizacion(
        &state.db,
        &recepcion,
        c.id,
        &update_from(&autorizada, EstadoCotizacion::Pendiente),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn costo_de_orden_suma_solo_autorizadas() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let a = crear_cotizacion(&state.db, &recepcion, orden.id, &create_payload(100000, 50000))
        .await
        .unwrap();
    let _pendiente =
        crear_cotizacion(&state.db, &recepcion, orden.id, &create_payload(999900, 0))
            .await
            .unwrap();

    let enviada = editar_cotizacion(
        &state.db,
        &recepcion,
        a.id,
        &update_from(&a, EstadoCotizacion::Enviada),
    )
    .await
    .unwrap();
    editar_cotizacion(
        &state.db,
        &recepcion,
        a.id,
        &update_from(&enviada, EstadoCotizacion::Autorizada),
    )
    .await
    .unwrap();

    let detalle = detalle_orden(&state.db, orden.id).await.unwrap();
    assert_eq!(detalle.costo_total, Decimal::new(150000, 2));
    assert_eq!(detalle.cotizaciones.len(), 2);
}
