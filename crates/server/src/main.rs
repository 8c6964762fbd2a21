use std::{net::SocketAddr, path::Path as FsPath, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::ResponseId,
    error::{ApiError, ErrorCode},
    protocol::{
        QuestionGroupsResponse, StoredResponsePayload, SubmitAnswersRequest, SubmitAnswersResponse,
    },
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{error, info, warn};

mod api;
mod app_state;
mod config;
mod seed;

use api::{
    get_response, list_question_groups, questions_route, responses_route, save_responses,
    ApiContext,
};
use app_state::AppState;
use config::{load_settings, normalize_database_url};

const MAX_SUBMISSION_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if let Some(seed_path) = &settings.seed_path {
        seed::seed_if_empty(&storage, FsPath::new(seed_path)).await?;
    } else if storage.count_questions().await? == 0 {
        warn!("question bank is empty and no seed_path is configured");
    }

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/healthz", get(healthz))
        .route(questions_route(), get(http_list_questions))
        .route(responses_route(), post(http_save_responses))
        .route("/api/responses/:response_id", get(http_get_response))
        .layer(RequestBodyLimitLayer::new(MAX_SUBMISSION_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    if err.code == ErrorCode::Internal {
        error!(message = %err.message, "request failed");
    }
    (status_for(err.code), Json(err))
}

async fn welcome() -> &'static str {
    "Welcome to Neurocare"
}

async fn healthz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, (StatusCode, Json<ApiError>)> {
    state.api.storage.health_check().await.map_err(|e| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok("ok")
}

async fn http_list_questions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<QuestionGroupsResponse> {
    let groups = list_question_groups(&state.api).await.map_err(reject)?;
    Ok(Json(QuestionGroupsResponse { groups }))
}

async fn http_save_responses(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitAnswersRequest>, JsonRejection>,
) -> ApiResult<SubmitAnswersResponse> {
    let Json(req) = payload.map_err(|rejection| {
        reject(ApiError::new(
            ErrorCode::Validation,
            format!("invalid data: {}", rejection.body_text()),
        ))
    })?;

    let response_id = save_responses(&state.api, &req.answers)
        .await
        .map_err(reject)?;
    Ok(Json(SubmitAnswersResponse {
        message: "Responses saved successfully".into(),
        response_id: Some(response_id),
    }))
}

async fn http_get_response(
    State(state): State<Arc<AppState>>,
    Path(response_id): Path<i64>,
) -> ApiResult<StoredResponsePayload> {
    let stored = get_response(&state.api, ResponseId(response_id))
        .await
        .map_err(reject)?;
    Ok(Json(stored))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
