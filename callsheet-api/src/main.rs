use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use callsheet_api::config::ApiConfig;
use callsheet_api::helpers::session::SessionTokens;
use callsheet_api::{configure_routes, helpers, not_found};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Held until shutdown so buffered log lines are flushed
    let _log_guard = if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("callsheet-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        None
    };

    let (config, config_path) = ApiConfig::load(args.config.as_deref())?;
    tracing::info!("Loaded config from {}", config_path.display());

    if config.auth.jwt_secret == "change-me" {
        tracing::warn!(
            "auth.jwt_secret is still the default value; set it in {} or CALLSHEET__AUTH__JWT_SECRET",
            config_path.display()
        );
    }

    let db = helpers::database::initialize_database(&config.database)?;
    let session_tokens = web::Data::new(SessionTokens::new(&config.auth));
    let upload_config = web::Data::new(config.uploads.clone());

    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        let cors = if let Some(cors_config) = &cors_config {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .supports_credentials()
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(db.clone()))
            .app_data(session_tokens.clone())
            .app_data(upload_config.clone())
            .configure(configure_routes)
            .default_service(web::to(not_found))
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
