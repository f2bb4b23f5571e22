mod auth;
mod categories;
mod creators;
mod dashboard;
mod notifications;
mod payments;
mod subscriptions;
mod users;
mod videos;

use axum::routing::{get, post};
use axum::Router;

use crate::middleware::require_auth;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    // Everything except login/refresh sits behind the JWT middleware.
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/dashboard", dashboard::routes())
        .nest("/users", users::routes())
        .nest("/videos", videos::routes())
        .nest("/categories", categories::routes())
        .nest("/creators", creators::routes())
        .nest("/subscriptions", subscriptions::routes())
        .nest("/payments", payments::routes())
        .nest("/notifications", notifications::routes())
        .route_layer(axum::middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .merge(protected)
}
