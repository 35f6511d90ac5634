//! Dashboard endpoints.
//!
//! Both endpoints check the session before any provider is contacted.
//! The aggregate endpoint always answers 200 once authorized; the
//! single-provider endpoint answers with the status of its result.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use infrapulse_core::ProviderKind;
use infrapulse_providers::ProviderRegistry;
use tracing::{debug, instrument, warn};

use crate::error::ServerError;
use crate::state::AppState;

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ServerError> {
    let session = state.verifier.verify(headers);
    if session.authenticated && session.is_admin {
        Ok(())
    } else {
        debug!(authenticated = session.authenticated, "Rejected dashboard request");
        Err(ServerError::Unauthorized)
    }
}

/// `GET /api/infra`: every provider at once.
#[instrument(skip_all)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    require_admin(&state, &headers)?;
    let dashboard = state.aggregator.run(&state.ctx).await;
    Ok(Json(dashboard).into_response())
}

/// `GET /api/infra/{provider}`: one provider by slug.
#[instrument(skip(state, headers))]
pub async fn provider_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    require_admin(&state, &headers)?;

    let kind: ProviderKind = ProviderRegistry::get_by_slug(&slug)
        .map(|desc| desc.id)
        .ok_or_else(|| ServerError::UnknownProvider(slug.clone()))?;
    let result = state
        .aggregator
        .run_one(kind, &state.ctx)
        .await
        .ok_or(ServerError::UnknownProvider(slug))?;

    let status = StatusCode::from_u16(result.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status != StatusCode::OK {
        warn!(provider = %kind, %status, "Provider request failed");
    }
    Ok((status, Json(result)).into_response())
}
