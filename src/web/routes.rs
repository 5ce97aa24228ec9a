use actix_web::web;
use crate::web::handlers;

// Site pages. Each serves the page on GET and takes the chat form on POST.
const PAGES: &[&str] = &[
    "/",
    "/{locale:fr|en}",
    "/{section:services|about|contact|resources}",
    "/{locale:fr|en}/{section:services|about|contact|resources}",
    "/resources/{slug}",
    "/{locale:fr|en}/resources/{slug}",
];

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
        .service(
            web::scope("/api")
                .route("/chat", web::post().to(handlers::chat))
                .route("/contact", web::post().to(handlers::contact)),
        )
        .route("/health", web::get().to(handlers::health_check));

    for path in PAGES {
        cfg.service(
            web::resource(*path)
                .route(web::get().to(handlers::index))
                .route(web::post().to(handlers::chat_form)),
        );
    }
}
