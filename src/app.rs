use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/musculo/:slug", get(handlers::muscle_page))
        .route("/seleccion/toggle", post(handlers::toggle_form))
        .route("/rutina", get(handlers::review_page).post(handlers::submit_form))
        .route("/rutina/quitar/:id", post(handlers::remove_form))
        .route("/api/catalog", get(handlers::api_catalog))
        .route("/api/selection", get(handlers::api_selection))
        .route("/api/selection/toggle", post(handlers::api_toggle))
        .route("/api/selection/:id", delete(handlers::api_remove))
        .route("/api/rutinas", post(handlers::api_submit))
        .with_state(state)
}
