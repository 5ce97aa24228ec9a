use actix_files as fs;
use actix_web::{web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use tera::Tera;

use kokotajlo_site::backend::BackendClient;
use kokotajlo_site::config::Config;
use kokotajlo_site::web::routes;
use kokotajlo_site::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Kokotajlo site");

    let config = Config::from_env();
    let backend = BackendClient::new(config.backend_url.clone());

    // Initialize template engine
    let mut tera = match Tera::new(&config.templates_glob()) {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
    };
    tera.autoescape_on(vec![".html"]);

    let app_state = Data::new(AppState::new(tera, backend));
    let static_dir = config.static_dir.clone();

    info!("Listening on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", &static_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
