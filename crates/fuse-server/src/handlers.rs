//! HTTP request handlers for the gateway API.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use fuse_core::{
    regime, CompletionRequest, CompletionResponse, MacroIndicators, QuoteRequest, QuoteResponse,
    RateTrend, RegimeAssessment,
};
use fuse_providers::Observation;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::extractors::{JsonBody, RequestId};
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Completion gateway: run the fallback chain over the configured backends
#[instrument(skip(state, body), fields(request_id = %request_id))]
pub async fn completions(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(body): JsonBody<CompletionRequest>,
) -> Result<Json<CompletionResponse>, ApiError> {
    body.validate()?;

    debug!(turns = body.messages.len(), "processing completion request");

    let outcome = state.completions.run(&body).await?;
    Ok(Json(CompletionResponse::text(outcome.provider, outcome.text)))
}

/// Query parameters for the market-data gateway
#[derive(Debug, Deserialize)]
pub struct QuotesQuery {
    /// Comma-separated symbol list
    pub symbols: Option<String>,
}

/// Market-data gateway: fan out to every quote source and merge
#[instrument(skip(state, query), fields(request_id = %request_id))]
pub async fn quotes(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    Query(query): Query<QuotesQuery>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let raw = query
        .symbols
        .ok_or_else(|| ApiError::bad_request("no symbols"))?;
    let request = QuoteRequest::parse(&raw)?;

    debug!(symbols = request.symbols().len(), "processing quote request");

    let outcome = state.quotes.run(&request).await?;
    Ok(Json(QuoteResponse::new(outcome.quotes)))
}

/// Fear & Greed sentiment endpoint
pub async fn sentiment(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = state.feargreed.snapshot().await?;
    Ok(Json(snapshot).into_response())
}

/// Macro regime endpoint: concurrent FRED series plus an index quote,
/// scored deterministically
pub async fn macro_regime(
    State(state): State<AppState>,
) -> Result<Json<RegimeAssessment>, ApiError> {
    if !state.fred.is_configured() {
        return Err(ApiError::internal("FRED_API_KEY not set"));
    }

    let vix_request = QuoteRequest::parse("^VIX")?;
    let (fed_funds, yield_curve, cpi, unemployment, vix_outcome) = tokio::join!(
        state.fred.observations("FEDFUNDS", 3),
        state.fred.observations("T10Y2Y", 1),
        state.fred.observations("CPIAUCSL", 13),
        state.fred.observations("UNRATE", 1),
        state.quotes.run(&vix_request),
    );
    let fed_funds = fed_funds?;
    let yield_curve = yield_curve?;
    let cpi = cpi?;
    let unemployment = unemployment?;

    let latest = |observations: &[Observation]| {
        observations
            .first()
            .and_then(Observation::value_f64)
            .unwrap_or(0.0)
    };

    let rate = latest(&fed_funds);
    let rate_prev = fed_funds
        .get(2)
        .and_then(Observation::value_f64)
        .unwrap_or(rate);
    let cpi_now = latest(&cpi);
    let cpi_year_ago = cpi.get(12).and_then(Observation::value_f64).unwrap_or(cpi_now);

    // A missing VIX quote falls back to a neutral level rather than failing
    // the whole assessment
    let vix = vix_outcome
        .ok()
        .and_then(|outcome| outcome.quotes.first().map(|q| q.price))
        .unwrap_or(20.0);

    let indicators = MacroIndicators {
        fed_funds_rate: rate,
        rate_trend: RateTrend::from_rates(rate, rate_prev),
        yield_spread: latest(&yield_curve),
        cpi_yoy: MacroIndicators::cpi_yoy_from_levels(cpi_now, cpi_year_ago),
        unemployment: latest(&unemployment),
        vix,
    };

    Ok(Json(regime::assess(&indicators)))
}

/// Query parameters for the research endpoint
#[derive(Debug, Deserialize)]
pub struct ResearchQuery {
    /// Report type: signals, targets, or earnings
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Ticker symbol
    pub symbol: Option<String>,
}

/// Finnhub-backed research reports
#[instrument(skip(state, query), fields(request_id = %request_id))]
pub async fn research(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    Query(query): Query<ResearchQuery>,
) -> Result<Response, ApiError> {
    if !state.finnhub.is_configured() {
        return Err(ApiError::internal("FINNHUB_API_KEY not set"));
    }

    let symbol = query
        .symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("symbol required"))?;

    match query.kind.as_deref() {
        Some("signals") => {
            let report = state.finnhub.signals(&symbol, Utc::now()).await?;
            Ok(Json(report).into_response())
        }
        Some("targets") => {
            let report = state.finnhub.targets(&symbol).await?;
            Ok(Json(report).into_response())
        }
        Some("earnings") => {
            let report = state.finnhub.earnings(&symbol).await?;
            Ok(Json(report).into_response())
        }
        _ => Err(ApiError::bad_request("invalid type")),
    }
}
