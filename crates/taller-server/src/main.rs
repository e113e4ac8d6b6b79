use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taller_server::auth;
use taller_server::config::ServerConfig;
use taller_server::crypto::MasterKey;
use taller_server::db;
use taller_server::routes;
use taller_server::state::AppState;

#[derive(Parser)]
#[command(name = "tallerd", about = "Servidor de gestión de órdenes de servicio")]
struct Cli {
    /// Config file path, or a bare name resolved under /etc/taller/.
    #[arg(short, long, default_value = "taller")]
    config: String,

    /// Override the listen address from the config file.
    #[arg(long)]
    listen: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create a staff account.
    CrearUsuario {
        #[arg(long)]
        username: String,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        password: String,
        /// Gerente, Recepcion o Tecnico.
        #[arg(long, default_value = "Recepcion")]
        rol: String,
        #[arg(long)]
        superusuario: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    let mut config = ServerConfig::load(&config_path)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    let database = db::connect(&config.storage.database_url)
        .await
        .context("cannot open database")?;
    db::migrate(&database).await.context("migration failed")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = AppState {
                db: database,
                master_key: std::sync::Arc::new(MasterKey::derive(&config.auth.secret_key)),
                config: std::sync::Arc::new(config),
            };

            let listen = state.config.server.listen.clone();
            let listener = tokio::net::TcpListener::bind(&listen)
                .await
                .with_context(|| format!("cannot bind {listen}"))?;
            tracing::info!(%listen, "tallerd listo");

            axum::serve(listener, routes::router(state)).await?;
        }
        Command::CrearUsuario { username, nombre, password, rol, superusuario } => {
            let rol = match rol.as_str() {
                "Gerente" => entity::usuario::Rol::Gerente,
                "Recepcion" => entity::usuario::Rol::Recepcion,
                "Tecnico" => entity::usuario::Rol::Tecnico,
                other => anyhow::bail!("rol desconocido: {other}"),
            };
            let user = auth::create_user(
                &database,
                config.auth.password_iterations,
                &username,
                &nombre,
                &password,
                rol,
                superusuario,
            )
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?;
            tracing::info!(user = %user.username, id = user.id, "usuario creado");
        }
    }

    Ok(())
}
