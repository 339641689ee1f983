use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api::{ErrorResponse, IdResponse, QueryParams, StatusResponse};
use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::{bad_request, good_response, not_found, server_error};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(healthcheck))
        .route("/api/fb-id", get(resolve_id))
        .layer(cors)
        .with_state(state)
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse::new_from_msg("ok"))
}

pub async fn resolve_id(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let qp = QueryParams::from_query(query.as_deref());
    let input = qp.input.unwrap_or_default();

    match state.resolver.resolve(&input).await {
        Ok(id) => good_response(IdResponse { id }),
        Err(e) => {
            let body = ErrorResponse::new_from_code(e.code());
            match e {
                ResolveError::MissingInput => bad_request(body),
                ResolveError::NotFound => not_found(body),
                ResolveError::ResolutionFailed => server_error(body),
            }
        }
    }
}
