use std::sync::Arc;

use poem::{
    Endpoint, EndpointExt, Route, get, post,
    error::{MethodNotAllowedError, NotFoundError},
    middleware::{AddData, Tracing},
};

use crate::core::renderer::CoverRenderer;
use crate::routes::{
    generate::generate,
    index::{index, index_page},
    preflight::Preflight,
};

pub mod core;
pub mod error;
pub mod routes;
pub mod schemas;
pub mod settings;

pub struct AppState {
    pub renderer: Arc<CoverRenderer>,
}

/// Full route tree: CORS preflight on every path, `POST /generate`, and the
/// static page for anything else.
pub fn init_route(app_state: Arc<AppState>) -> impl Endpoint + 'static {
    Route::new()
        .at("/", get(index))
        .at("/generate", post(generate))
        .catch_error(|_: NotFoundError| async move { index_page() })
        .catch_error(|_: MethodNotAllowedError| async move { index_page() })
        .with(AddData::new(app_state))
        .with(Preflight)
        .with(Tracing)
}
