use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::PipelineConfig;
use crate::engine::{self, PipelineReport};
use crate::error::{BatchKind, PipelineError};
use crate::filter::ProspectFilter;
use crate::ingest::{RawBatch, Workbook};
use crate::stage::{self, Classification, StageSignals};

#[derive(Clone)]
pub struct AppState {
    config: Arc<PipelineConfig>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Config from `$PIPELINE_CONFIG_PATH` / `config/pipeline.toml` / defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(PipelineConfig::load_default()?))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/report", post(report))
        .route("/classify", post(classify_batch))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct ReportReq {
    #[serde(default)]
    sponsorships: RawBatch,
    #[serde(default)]
    public_investment: RawBatch,
    #[serde(default)]
    contacts: RawBatch,
    #[serde(default)]
    data_dictionary: Option<RawBatch>,
    #[serde(default)]
    filter: ProspectFilter,
}

#[derive(Serialize)]
struct StructuralErrorBody {
    error: String,
    batch: BatchKind,
    column: String,
}

/// Structural errors surface as 422 so the caller can tell the user which sheet is broken.
struct ApiError(PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let PipelineError::MissingColumn { batch, column } = &self.0;
        let body = StructuralErrorBody {
            error: self.0.to_string(),
            batch: *batch,
            column: column.clone(),
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

async fn report(
    State(state): State<AppState>,
    Json(req): Json<ReportReq>,
) -> Result<Json<PipelineReport>, ApiError> {
    let wb = Workbook {
        sponsorships: req.sponsorships,
        public_investment: req.public_investment,
        contacts: req.contacts,
        data_dictionary: req.data_dictionary,
    };
    engine::build_report(&wb, &req.filter, &state.config)
        .map(Json)
        .map_err(ApiError)
}

/// Ad-hoc classification; probabilities are taken as already on the 0–100 scale.
async fn classify_batch(Json(items): Json<Vec<StageSignals>>) -> Json<Vec<Classification>> {
    Json(items.iter().map(stage::classify).collect())
}
