mod common;

use sea_orm::entity::prelude::*;

use entity::usuario::Rol;
use entity::Equipo;
use taller_server::error::ApiError;
use taller_server::handlers::clientes::{
    buscar_clientes, crear_cliente, eliminar_cliente, listar_clientes,
};
use taller_server::handlers::equipos::{
    crear_equipo, editar_equipo, eliminar_equipo, revelar_contrasena,
};

use common::{cliente_con_equipo, cliente_payload, equipo_payload, orden_nueva, setup, usuario};

#[tokio::test]
async fn busqueda_ignora_acentos_y_mayusculas() {
    let state = setup().await;
    crear_cliente(&state.db, &cliente_payload("José García", "5550001")).await.unwrap();
    crear_cliente(&state.db, &cliente_payload("Ana López", "5550002")).await.unwrap();

    for consulta in ["garcia", "GARCÍA", "Garcia", "jose gar"] {
        let pagina = listar_clientes(&state.db, Some(consulta), 1).await.unwrap();
        assert_eq!(pagina.total, 1, "consulta {consulta:?}");
        assert_eq!(pagina.items[0].nombre_completo, "José García");
    }

    // Accented query against an unaccented record also matches.
    crear_cliente(&state.db, &cliente_payload("Maria Perez", "5550003")).await.unwrap();
    let pagina = listar_clientes(&state.db, Some("Pérez"), 1).await.unwrap();
    assert_eq!(pagina.total, 1);
}

#[tokio::test]
async fn autocompletado_devuelve_equipos_del_cliente() {
    let state = setup().await;
    let cliente = crear_cliente(&state.db, &cliente_payload("José García", "5550001"))
        .await
        .unwrap();
    crear_equipo(&state.db, &state.master_key, &equipo_payload(cliente.id, Some("SN-1")))
        .await
        .unwrap();
    crear_equipo(&state.db, &state.master_key, &equipo_payload(cliente.id, Some("SN-2")))
        .await
        .unwrap();

    let resultados = buscar_clientes(&state.db, "garcia").await.unwrap();
    assert_eq!(resultados.len(), 1);
    assert_eq!(resultados[0].equipos.len(), 2);
    assert!(resultados[0].equipos[0].descripcion.contains("SN-1"));

    assert!(buscar_clientes(&state.db, "").await.unwrap().is_empty());
}

#[tokio::test]
async fn telefono_duplicado_es_conflicto() {
    let state = setup().await;
    crear_cliente(&state.db, &cliente_payload("Uno", "5550001")).await.unwrap();
    let err = crear_cliente(&state.db, &cliente_payload("Dos", "5550001"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn serie_unica_por_cliente() {
    let state = setup().await;
    let a = crear_cliente(&state.db, &cliente_payload("Uno", "5550001")).await.unwrap();
    let b = crear_cliente(&state.db, &cliente_payload("Dos", "5550002")).await.unwrap();

    crear_equipo(&state.db, &state.master_key, &equipo_payload(a.id, Some("SN-X")))
        .await
        .unwrap();
    let err = crear_equipo(&state.db, &state.master_key, &equipo_payload(a.id, Some("SN-X")))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // Same serial under a different customer is fine.
    crear_equipo(&state.db, &state.master_key, &equipo_payload(b.id, Some("SN-X")))
        .await
        .unwrap();
}

#[tokio::test]
async fn contrasena_cifrada_y_recuperable() {
    let state = setup().await;
    let cliente = crear_cliente(&state.db, &cliente_payload("Uno", "5550001")).await.unwrap();

    let mut payload = equipo_payload(cliente.id, None);
    payload.contrasena = Some("clave1234".to_string());
    let equipo = crear_equipo(&state.db, &state.master_key, &payload).await.unwrap();

    // Never stored in the clear.
    assert_ne!(equipo.contrasena.as_deref(), Some("clave1234"));

    let revelada = revelar_contrasena(&state.db, &state.master_key, equipo.id)
        .await
        .unwrap();
    assert_eq!(revelada.as_deref(), Some("clave1234"));

    // Empty string clears; absent leaves alone.
    let mut limpia = equipo_payload(cliente.id, None);
    limpia.contrasena = Some(String::new());
    let equipo = editar_equipo(&state.db, &state.master_key, equipo.id, &limpia)
        .await
        .unwrap();
    assert!(equipo.contrasena.is_none());
}

#[tokio::test]
async fn equipo_no_cambia_de_cliente() {
    let state = setup().await;
    let duenio = crear_cliente(&state.db, &cliente_payload("Cliente A", "5550001"))
        .await
        .unwrap();
    let otro = crear_cliente(&state.db, &cliente_payload("Cliente B", "5550002"))
        .await
        .unwrap();
    let equipo = crear_equipo(&state.db, &state.master_key, &equipo_payload(duenio.id, None))
        .await
        .unwrap();

    let err = editar_equipo(&state.db, &state.master_key, equipo.id, &equipo_payload(otro.id, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let sin_cambios = Equipo::find_by_id(equipo.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sin_cambios.cliente_id, duenio.id);
}

#[tokio::test]
async fn cliente_con_historial_esta_protegido() {
    let state = setup().await;
    let recepcion = usuario(&state, "recepcion", Rol::Recepcion).await;
    let (cliente_id, equipo_id) = cliente_con_equipo(&state, "5550001").await;

    // An order blocks both the device and the customer.
    orden_nueva(&state, &recepcion, cliente_id, equipo_id).await;
    let err = eliminar_equipo(&state.db, equipo_id).await.unwrap_err();
    assert!(matches!(err, ApiError::Protected(_)));
    let err = eliminar_cliente(&state.db, cliente_id).await.unwrap_err();
    assert!(matches!(err, ApiError::Protected(_)));

    // A customer whose equipos never saw the bench deletes cleanly, devices
    // and all.
    let (libre_id, libre_equipo) = cliente_con_equipo(&state, "5550009").await;
    eliminar_cliente(&state.db, libre_id).await.unwrap();
    assert!(Equipo::find_by_id(libre_equipo).one(&state.db).await.unwrap().is_none());
}

#[tokio::test]
async fn paginacion_de_clientes() {
    let state = setup().await;
    for i in 0..23 {
        crear_cliente(&state.db, &cliente_payload(&format!("Cliente {i}"), &format!("55500{i:02}")))
            .await
            .unwrap();
    }

    let p1 = listar_clientes(&state.db, None, 1).await.unwrap();
    assert_eq!(p1.total, 23);
    assert_eq!(p1.pages, 3);
    assert_eq!(p1.items.len(), 10);

    let p3 = listar_clientes(&state.db, None, 3).await.unwrap();
    assert_eq!(p3.items.len(), 3);
}
