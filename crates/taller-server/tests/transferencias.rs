mod common;

use sea_orm::entity::prelude::*;

use entity::usuario::Rol;
use entity::{bitacora_orden, item_transferido, BitacoraOrden, ItemTransferido, Transferencia};
use taller_server::error::ApiError;
use taller_server::handlers::transferencias::{
    autorizar_transferencia, crear_transferencia, editar_transferencia, eliminar_transferencia,
    ItemPayload, TransferenciaPayload,
};

use common::{cliente_con_equipo, orden_nueva, setup, usuario};

fn item(descripcion: &str, cantidad: i32) -> ItemPayload {
    ItemPayload {
        descripcion_item: descripcion.to_string(),
        modelo: None,
        numero_serie: None,
        cantidad,
    }
}

fn payload(items: Vec<ItemPayload>) -> TransferenciaPayload {
    TransferenciaPayload { documento_referencia: None, notas: None, items }
}

#[tokio::test]
async fn transferencia_requiere_al_menos_un_item() {
    let state = setup().await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let err = crear_transferencia(&state.db, &tecnico, orden.id, &payload(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Memoria RAM 8GB", 0)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let creada = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Memoria RAM 8GB", 2)]),
    )
    .await
    .unwrap();
    assert_eq!(creada.items.len(), 1);
    assert_eq!(creada.transferencia.usuario_solicitante_id, Some(tecnico.id()));
    assert!(!creada.transferencia.esta_autorizada());
}

#[tokio::test]
async fn edicion_no_puede_vaciar_items() {
    let state = setup().await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let creada = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Disco SSD", 1), item("Cable SATA", 2)]),
    )
    .await
    .unwrap();

    let err = editar_transferencia(&state.db, &tecnico, creada.transferencia.id, &payload(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // A failed edit leaves the original items untouched.
    let items = ItemTransferido::find()
        .filter(item_transferido::Column::TransferenciaId.eq(creada.transferencia.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);

    let editada = editar_transferencia(
        &state.db,
        &tecnico,
        creada.transferencia.id,
        &payload(vec![item("Disco SSD 1TB", 1)]),
    )
    .await
    .unwrap();
    assert_eq!(editada.items.len(), 1);
    assert_eq!(editada.items[0].descripcion_item, "Disco SSD 1TB");
}

#[tokio::test]
async fn edicion_queda_en_bitacora() {
    let state = setup().await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let creada = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Disco SSD", 1)]),
    )
    .await
    .unwrap();
    let id = creada.transferencia.id;

    let antes = BitacoraOrden::find()
        .filter(bitacora_orden::Column::OrdenId.eq(orden.id))
        .count(&state.db)
        .await
        .unwrap();

    editar_transferencia(
        &state.db,
        &tecnico,
        id,
        &payload(vec![item("Disco SSD", 1), item("Cable SATA", 2)]),
    )
    .await
    .unwrap();

    let despues = BitacoraOrden::find()
        .filter(bitacora_orden::Column::OrdenId.eq(orden.id))
        .all(&state.db)
        .await
        .unwrap();
    assert_eq!(despues.len() as u64, antes + 1);
    let entrada = despues
        .iter()
        .find(|e| e.descripcion.contains(&format!("Transferencia #{id} modificada")))
        .unwrap();
    assert_eq!(entrada.usuario_id, Some(tecnico.id()));
}

#[tokio::test]
async fn solicitante_no_se_autoautoriza() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let creada = crear_transferencia(
        &state.db,
        &recepcion,
        orden.id,
        &payload(vec![item("Teclado", 1)]),
    )
    .await
    .unwrap();

    let err = autorizar_transferencia(&state.db, &recepcion, creada.transferencia.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn autorizacion_se_estampa_una_sola_vez() {
    let state = setup().await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let gerente = usuario(&state, "gerente", Rol::Gerente).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let creada = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Fuente de poder", 1)]),
    )
    .await
    .unwrap();

    let autorizada = autorizar_transferencia(&state.db, &recepcion, creada.transferencia.id)
        .await
        .unwrap();
    assert_eq!(autorizada.usuario_autoriza_id, Some(recepcion.id()));
    let stamp = autorizada.fecha_autorizacion.unwrap();

    // Second authorization, even by another manager, changes nothing.
    let repetida = autorizar_transferencia(&state.db, &gerente, creada.transferencia.id)
        .await
        .unwrap();
    assert_eq!(repetida.usuario_autoriza_id, Some(recepcion.id()));
    assert_eq!(repetida.fecha_autorizacion, Some(stamp));
}

#[tokio::test]
async fn editar_autorizada_exige_gerente() {
    let state = setup().await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let gerente = usuario(&state, "gerente", Rol::Gerente).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let creada = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Pasta térmica", 1)]),
    )
    .await
    .unwrap();
    autorizar_transferencia(&state.db, &recepcion, creada.transferencia.id)
        .await
        .unwrap();

    let err = editar_transferencia(
        &state.db,
        &tecnico,
        creada.transferencia.id,
        &payload(vec![item("Pasta térmica", 2)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::PermissionDenied(_)));

    let editada = editar_transferencia(
        &state.db,
        &gerente,
        creada.transferencia.id,
        &payload(vec![item("Pasta térmica", 2)]),
    )
    .await
    .unwrap();
    assert_eq!(editada.items[0].cantidad, 2);
}

#[tokio::test]
async fn eliminar_borra_y_deja_rastro() {
    let state = setup().await;
    let tecnico = usuario(&state, "tecnico", Rol::Tecnico).await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let gerente = usuario(&state, "gerente", Rol::Gerente).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;
    let orden = orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;

    let creada = crear_transferencia(
        &state.db,
        &tecnico,
        orden.id,
        &payload(vec![item("Ventilador", 1)]),
    )
    .await
    .unwrap();
    let id = creada.transferencia.id;

    eliminar_transferencia(&state.db, &gerente, id).await.unwrap();

    assert!(Transferencia::find_by_id(id).one(&state.db).await.unwrap().is_none());
    let huella = BitacoraOrden::find()
        .filter(bitacora_orden::Column::OrdenId.eq(orden.id))
        .all(&state.db)
        .await
        .unwrap();
    assert!(huella
        .iter()
        .any(|e| e.descripcion.contains(&format!("Transferencia #{id} eliminada"))));
}
