pub mod bitacora_orden;
pub mod cliente;
pub mod cotizacion;
pub mod equipo;
pub mod item_transferido;
pub mod orden_servicio;
pub mod orden_tipo_servicio;
pub mod proveedor;
pub mod sesion;
pub mod tipo_servicio;
pub mod transferencia;
pub mod usuario;

pub use bitacora_orden::Entity as BitacoraOrden;
pub use cliente::Entity as Cliente;
pub use cotizacion::Entity as Cotizacion;
pub use equipo::Entity as Equipo;
pub use item_transferido::Entity as ItemTransferido;
pub use orden_servicio::Entity as OrdenServicio;
pub use orden_tipo_servicio::Entity as OrdenTipoServicio;
pub use proveedor::Entity as Proveedor;
pub use sesion::Entity as Sesion;
pub use tipo_servicio::Entity as TipoServicio;
pub use transferencia::Entity as Transferencia;
pub use usuario::Entity as Usuario;
