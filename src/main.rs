use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use dotenv::dotenv;
use freelancer_marketplace::{
    config::{Config, StorageBackend},
    db::{memory::MemoryStore, DBClient, Store},
    routes::create_router,
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};

async fn connect_store(config: &Config) -> Result<Arc<dyn Store>, String> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("using the in-memory store, data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .map_err(|err| format!("Failed to connect to the database: {:?}", err))?;
            println!("✅Connection to the database is successful!");

            let db_client = DBClient::new(pool);
            db_client
                .migrate()
                .await
                .map_err(|err| format!("Failed to run migrations: {:?}", err))?;

            Ok(Arc::new(db_client))
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let db_client = match connect_store(&config).await {
        Ok(db_client) => db_client,
        Err(err) => {
            eprintln!("🔥 {}", err);
            std::process::exit(1);
        }
    };

    let frontend_origin = match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(_) => {
            eprintln!("🔥 FRONTEND_URL is not a valid origin: {}", config.frontend_url);
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(frontend_origin))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ]);

    let app_state = AppState::new(db_client, config.clone());
    let app = create_router(Arc::new(app_state)).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("🔥 Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    println!("🚀 Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("🔥 Server error: {}", err);
        std::process::exit(1);
    }
}
