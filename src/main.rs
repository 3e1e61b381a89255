use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use storyrelay::cli::{commands::{Cli, Commands}, run_cli};
use storyrelay::config::AppConfig;
use storyrelay::llm::ProviderFactory;
use storyrelay::session::{SessionService, SessionStore};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600);
    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // stdout belongs to the game transcript in `play`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config).await;
        return Ok(());
    }

    info!("Starting Story Relay...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let llm_provider = match ProviderFactory::create_default(&config) {
        Some(p) => p,
        None => {
            error!(
                "Failed to initialize LLM provider '{}' from configuration",
                config.llm.provider
            );
            std::process::exit(1);
        }
    };

    // Lives exactly as long as the server process.
    let store = Arc::new(SessionStore::new());
    let service = SessionService::new(store, llm_provider, config.generation.clone());

    let host = config.server.host.clone();
    let port = config.server.port;
    let allowed_origin = config.server.allowed_origin.clone();
    if allowed_origin.is_none() {
        warn!("No server.allowed_origin configured; cross-origin requests will be refused");
    }

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(cors(allowed_origin.as_deref()))
            .route("/health", web::get().to(health))
            .configure(storyrelay::api::routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
