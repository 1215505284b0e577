// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::{error::ApiError, extract::AppQuery},
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::{DashboardSummary, DebtQuery, DebtReport, MonthlyChartEntry, MonthsQuery, SummaryQuery, UnitForecast},
    services::dashboard_service::clamp_months,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Ocupação, receitas e contratos a vencer", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .summary(&app_state.db_pool, query.month, query.year)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}

// GET /api/dashboard/monthly-chart
#[utoipa::path(
    get,
    path = "/api/dashboard/monthly-chart",
    tag = "Dashboard",
    params(MonthsQuery),
    responses(
        (status = 200, description = "Receitas, despesas e lucro por mês (mais antigo primeiro)", body = Vec<MonthlyChartEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_monthly_chart(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<MonthsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let chart = app_state
        .dashboard_service
        .monthly_chart(&app_state.db_pool, clamp_months(query.months))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(chart))
}

// GET /api/dashboard/unit-forecasts
#[utoipa::path(
    get,
    path = "/api/dashboard/unit-forecasts",
    tag = "Dashboard",
    params(MonthsQuery),
    responses((status = 200, description = "Previsão de lucro por unidade", body = Vec<UnitForecast>)),
    security(("api_jwt" = []))
)]
pub async fn get_unit_forecasts(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<MonthsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let forecasts = app_state
        .dashboard_service
        .unit_forecasts(&app_state.db_pool, clamp_months(query.months))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(forecasts))
}

// GET /api/dashboard/debts
#[utoipa::path(
    get,
    path = "/api/dashboard/debts",
    tag = "Dashboard",
    params(DebtQuery),
    responses((status = 200, description = "Dívidas por inquilino e contrato, maior primeiro", body = DebtReport)),
    security(("api_jwt" = []))
)]
pub async fn get_debts(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<DebtQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .debts(&app_state.db_pool, query.property_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}
