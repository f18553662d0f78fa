//! Root greeting endpoint

use axum::extract::State;

/// Greeting message, taken from configuration
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses(
        (status = 200, description = "Greeting message", body = String)
    )
)]
pub async fn greeting(State(state): State<crate::AppState>) -> String {
    state.config.catalog.greeting.clone()
}
