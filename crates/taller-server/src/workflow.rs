//! Pure guard functions for the order and quotation lifecycles.
//!
//! These tables are the single source of truth; handlers never inline their
//! own transition checks.

use entity::cotizacion::EstadoCotizacion;
use entity::orden_servicio::{EstadoOrden, Model as Orden};

/// Guard for the plain set-status operation.
///
/// Terminal states are never reachable here; closing goes through
/// [`validar_cierre`] only.
pub fn validar_cambio_estado(orden: &Orden, destino: EstadoOrden) -> Result<(), String> {
    if orden.esta_cerrada() {
        return Err("La orden ya está cerrada y no admite cambios de estado".to_string());
    }
    if destino.es_terminal() {
        return Err(
            "Entregada y Cancelada solo se asignan mediante la operación de cierre".to_string(),
        );
    }
    Ok(())
}

/// Guard for the dedicated close operation.
pub fn validar_cierre(orden: &Orden, destino: EstadoOrden) -> Result<(), String> {
    if orden.esta_cerrada() {
        return Err("La orden ya está cerrada".to_string());
    }
    match destino {
        EstadoOrden::Entregada => {
            if orden.estado != EstadoOrden::FinalizadaTecnico {
                return Err(
                    "No se puede entregar una orden que el técnico no ha finalizado".to_string(),
                );
            }
        }
        EstadoOrden::Cancelada => {
            if orden.estado == EstadoOrden::FinalizadaTecnico {
                return Err("No se puede cancelar un trabajo ya finalizado".to_string());
            }
        }
        _ => {
            return Err("El cierre solo admite Entregada o Cancelada".to_string());
        }
    }
    Ok(())
}

/// Any mutation of the order or its children checks this first.
pub fn validar_orden_abierta(orden: &Orden) -> Result<(), String> {
    if orden.esta_cerrada() {
        return Err("La orden está cerrada y es de solo lectura".to_string());
    }
    Ok(())
}

/// States selectable from the current quotation state. The current state is
/// always included (a save that keeps it is a no-op transition); terminal
/// states offer nothing else.
pub fn estados_permitidos_cotizacion(actual: EstadoCotizacion) -> &'static [EstadoCotizacion] {
    match actual {
        EstadoCotizacion::Pendiente => &[EstadoCotizacion::Pendiente, EstadoCotizacion::Enviada],
        EstadoCotizacion::Enviada => &[
            EstadoCotizacion::Enviada,
            EstadoCotizacion::Autorizada,
            EstadoCotizacion::Rechazada,
        ],
        EstadoCotizacion::Autorizada => &[EstadoCotizacion::Autorizada],
        EstadoCotizacion::Rechazada => &[EstadoCotizacion::Rechazada],
    }
}

pub fn validar_transicion_cotizacion(
    actual: EstadoCotizacion,
    destino: EstadoCotizacion,
) -> Result<(), String> {
    if estados_permitidos_cotizacion(actual).contains(&destino) {
        Ok(())
    } else {
        Err("Transición de cotización no permitida desde el estado actual".to_string())
    }
}
