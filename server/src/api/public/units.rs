use crate::api::{app_error_response, ErrorResponse};
use axum::{extract::Query, response::IntoResponse, Json};
use family_table_core::units::{self, Conversion, Dimension, COMMON_CONVERSIONS};
use family_table_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitInfo {
    pub name: String,
    /// "weight" or "volume"
    pub dimension: String,
    /// Grams (weight) or milliliters (volume) in one unit
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommonConversion {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitsResponse {
    pub units: Vec<UnitInfo>,
    pub common_conversions: Vec<CommonConversion>,
}

fn dimension_name(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Weight => "weight",
        Dimension::Volume => "volume",
    }
}

#[utoipa::path(
    get,
    path = "/api/units",
    tag = "units",
    responses(
        (status = 200, description = "Known kitchen units", body = UnitsResponse)
    )
)]
pub async fn list_units() -> impl IntoResponse {
    Json(UnitsResponse {
        units: units::units()
            .iter()
            .map(|u| UnitInfo {
                name: u.name.to_string(),
                dimension: dimension_name(u.dimension).to_string(),
                factor: u.factor,
            })
            .collect(),
        common_conversions: COMMON_CONVERSIONS
            .iter()
            .map(|(from, to)| CommonConversion {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConvertParams {
    /// Amount to convert (default: 1)
    pub amount: Option<f64>,
    /// Source unit, e.g. "cup"
    pub from: String,
    /// Target unit, e.g. "ml"
    pub to: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConvertResponse {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
    /// Result rounded to two decimals
    pub formatted: String,
}

#[utoipa::path(
    get,
    path = "/api/units/convert",
    tag = "units",
    params(ConvertParams),
    responses(
        (status = 200, description = "Converted amount", body = ConvertResponse),
        (status = 400, description = "Unknown unit, invalid amount, or weight/volume mismatch", body = ErrorResponse)
    )
)]
pub async fn convert(Query(params): Query<ConvertParams>) -> impl IntoResponse {
    let conversion = Conversion::new(params.amount.unwrap_or(1.0), params.from, params.to);

    match conversion.result() {
        Ok(result) => Json(ConvertResponse {
            formatted: units::format_quantity(result),
            amount: conversion.amount,
            from: conversion.from,
            to: conversion.to,
            result,
        })
        .into_response(),
        Err(e) => app_error_response(AppError::Conversion(e)),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_convert_cup_to_ml() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/units/convert?amount=2&from=cup&to=ml",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["formatted"], "473.18");
    }

    #[tokio::test]
    async fn test_convert_dimension_mismatch() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/units/convert?from=cup&to=oz",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Cannot convert between weight and volume units"
        );
    }

    #[tokio::test]
    async fn test_list_units_is_public() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/units", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["units"][0]["name"], "cup");
        assert_eq!(body["common_conversions"].as_array().unwrap().len(), 6);
    }
}
