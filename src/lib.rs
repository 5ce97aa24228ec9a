pub mod backend;
pub mod config;
pub mod error;
pub mod web;
pub mod widget;

use tera::Tera;

use backend::BackendClient;

// App state structure
pub struct AppState {
    pub tera: Tera,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(tera: Tera, backend: BackendClient) -> Self {
        Self { tera, backend }
    }
}
