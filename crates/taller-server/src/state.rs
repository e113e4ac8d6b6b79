use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::ServerConfig;
use crate::crypto::MasterKey;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub master_key: Arc<MasterKey>,
    pub config: Arc<ServerConfig>,
}
