use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::common::di::AppState;
use crate::interfaces::api::handlers::recycle_bin_handler;

/// Rutas de la papelera, pensadas para montarse bajo el prefijo de items del host
pub fn create_recycle_bin_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/recycled", get(recycle_bin_handler::get_recycled_items))
        .route("/{id}/recycle", post(recycle_bin_handler::recycle_item))
        .route("/recycle", post(recycle_bin_handler::recycle_many))
        .route("/{id}/restore", post(recycle_bin_handler::restore_item))
        .route("/restore", post(recycle_bin_handler::restore_many))
        .route("/{id}/delete", delete(recycle_bin_handler::delete_item))
        .route("/delete", delete(recycle_bin_handler::delete_many))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
