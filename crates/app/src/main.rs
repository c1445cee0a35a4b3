use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finance_tips={level},server={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let calculator = engine::Calculator::builder()
        .config(settings.calculators)
        .build()
        .inspect_err(|err| tracing::error!("invalid calculator settings: {err}"))?;

    let server = settings.server;
    let db = parse_database(&server.database)
        .await
        .inspect_err(|err| tracing::error!("failed to initialize database: {err}"))?;

    let addr = format!("{}:{}", server.bind, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .inspect_err(|err| tracing::error!("failed to bind server listener on {addr}: {err}"))?;

    server::run_with_listener(calculator, db, listener)
        .await
        .inspect_err(|err| tracing::error!("server failed: {err}"))?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready, history table migrated");
    Ok(database)
}
