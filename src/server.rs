use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dataset::options::{attribute_options, AttributeOptions};
use crate::dataset::{Attribute, AttributeValue, Dataset};
use crate::error::EstimateError;
use crate::estimator::evaluator::{match_report, per_attribute_match_percentage};
use crate::estimator::{ConstraintSet, MatchReport};
use crate::i18n::{Language, Translations};
use crate::overview::{overview, Distribution};
use crate::scenario::{default_best_scenario, ScenarioReport};

#[derive(Clone)]
struct ApiState {
    config: Arc<Config>,
    dataset: Arc<Dataset>,
    translations: Arc<BTreeMap<Language, Translations>>,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<EstimateError> for ApiError {
    fn from(error: EstimateError) -> Self {
        let status = match error {
            EstimateError::EmptyDataset => StatusCode::SERVICE_UNAVAILABLE,
            EstimateError::UnknownAttribute(_)
            | EstimateError::NotNumeric { .. }
            | EstimateError::OverlappingAttribute(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!("request failed: {}", self.message);
        }
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct ChanceRequest {
    #[serde(default)]
    constraints: BTreeMap<String, AttributeValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct AttributeMatchRequest {
    attribute: String,
    value: AttributeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LanguageQuery {
    lang: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OverviewQuery {
    attribute: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    records: usize,
}

#[derive(Debug, Serialize)]
struct LabeledOptions {
    label: String,
    #[serde(flatten)]
    options: AttributeOptions,
}

#[derive(Debug, Serialize)]
struct OptionsResponse {
    language: Language,
    attributes: Vec<LabeledOptions>,
}

#[derive(Debug, Serialize)]
struct AttributeMatchResponse {
    attribute: Attribute,
    value: AttributeValue,
    percentage: f64,
}

#[derive(Debug, Serialize)]
struct OverviewResponse {
    distributions: Vec<Distribution>,
}

pub async fn run_server(config: Config, dataset: Dataset, bind: SocketAddr) -> Result<()> {
    let state = build_state(config, dataset)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/options", get(options))
        .route("/v1/chance", post(chance))
        .route("/v1/attribute-match", post(attribute_match))
        .route("/v1/best-scenario", get(best_scenario))
        .route("/v1/overview", get(overview_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: Config, dataset: Dataset) -> Result<ApiState> {
    let dir = config.resolved_translations_dir();
    let mut translations = BTreeMap::new();
    for language in Language::ALL {
        translations.insert(language, Translations::load(language, dir.as_deref())?);
    }
    Ok(ApiState {
        config: Arc::new(config),
        dataset: Arc::new(dataset),
        translations: Arc::new(translations),
    })
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records: state.dataset.len(),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config.as_ref().clone())
}

async fn options(
    State(state): State<ApiState>,
    Query(query): Query<LanguageQuery>,
) -> ApiResult<OptionsResponse> {
    let language = match query.lang.as_deref() {
        Some(raw) => Language::from_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => state.config.display.language,
    };
    let tr = state
        .translations
        .get(&language)
        .ok_or_else(|| ApiError::bad_request(format!("no translations for {language}")))?;

    let mut attributes = Vec::with_capacity(Attribute::CORE.len());
    for attribute in Attribute::CORE.iter() {
        let options = attribute_options(
            &state.dataset,
            attribute,
            state.config.offers_other_option(attribute),
            state.config.predictor.max_years,
        )?;
        attributes.push(LabeledOptions {
            label: tr.translate(attribute.label()).to_string(),
            options,
        });
    }
    Ok(ok(OptionsResponse {
        language,
        attributes,
    }))
}

async fn chance(
    State(state): State<ApiState>,
    Json(request): Json<ChanceRequest>,
) -> ApiResult<MatchReport> {
    let constraints = ConstraintSet::from_named(request.constraints)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    debug!("chance request with {} constraints", constraints.len());
    let report = match_report(&state.dataset, &constraints)?;
    Ok(ok(report))
}

async fn attribute_match(
    State(state): State<ApiState>,
    Json(request): Json<AttributeMatchRequest>,
) -> ApiResult<AttributeMatchResponse> {
    let attribute =
        Attribute::from_str(&request.attribute).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let percentage = per_attribute_match_percentage(&state.dataset, &attribute, &request.value)?;
    Ok(ok(AttributeMatchResponse {
        attribute,
        value: request.value,
        percentage,
    }))
}

async fn best_scenario(State(state): State<ApiState>) -> ApiResult<ScenarioReport> {
    let scenario = default_best_scenario(&state.dataset)?;
    Ok(ok(ScenarioReport::new(&state.dataset, scenario)?))
}

async fn overview_handler(
    State(state): State<ApiState>,
    Query(query): Query<OverviewQuery>,
) -> ApiResult<OverviewResponse> {
    let attributes = match query.attribute.as_deref() {
        Some(raw) => vec![Attribute::from_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))?],
        None => Vec::new(),
    };
    let distributions = overview(&state.dataset, &attributes)?;
    Ok(ok(OverviewResponse { distributions }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
