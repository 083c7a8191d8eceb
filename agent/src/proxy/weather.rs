//! Weather lookup proxy
//!
//! Resolves a place name with the Open-Meteo geocoding API, then fetches the
//! current conditions for the resolved coordinates. No caching: every lookup
//! geocodes again.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::types::WeatherResult;
use crate::error::{ProxyError, ProxyResult};

/// Label for weather codes missing from the table
pub const UNKNOWN_CONDITION: &str = "Condição desconhecida";

/// Fields requested from the forecast `current` block
const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,wind_gusts_10m,weather_code";

/// WMO weather codes and their labels
const CONDITIONS: &[(i64, &str)] = &[
    (0, "Céu limpo"),
    (1, "Principalmente limpo"),
    (2, "Parcialmente nublado"),
    (3, "Nublado"),
    (45, "Névoa"),
    (48, "Névoa com depósito de geada"),
    (51, "Garoa leve"),
    (53, "Garoa moderada"),
    (55, "Garoa intensa"),
    (56, "Garoa congelante leve"),
    (57, "Garoa congelante intensa"),
    (61, "Chuva fraca"),
    (63, "Chuva moderada"),
    (65, "Chuva forte"),
    (66, "Chuva congelante leve"),
    (67, "Chuva congelante forte"),
    (71, "Queda de neve leve"),
    (73, "Queda de neve moderada"),
    (75, "Queda de neve forte"),
    (77, "Grãos de neve"),
    (80, "Pancadas de chuva leves"),
    (81, "Pancadas de chuva moderadas"),
    (82, "Pancadas de chuva violentas"),
    (85, "Leves pancadas de neve"),
    (86, "Fortes pancadas de neve"),
    (95, "Tempestade"),
    (96, "Tempestade com granizo leve"),
    (99, "Tempestade com granizo forte"),
];

/// Map a WMO weather code to its label.
///
/// Total: unknown codes yield [`UNKNOWN_CONDITION`].
pub fn weather_condition(code: i64) -> &'static str {
    CONDITIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_CONDITION)
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeoMatch>>,
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_gusts_10m: f64,
    weather_code: i64,
}

/// Relays weather lookups to Open-Meteo
pub struct WeatherProxy {
    http_client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherProxy {
    /// Create a proxy for the given geocoding and forecast endpoints
    pub fn new(geocoding_url: &str, forecast_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            geocoding_url: geocoding_url.to_string(),
            forecast_url: forecast_url.to_string(),
        }
    }

    /// Look up current conditions for a place name.
    ///
    /// Fails with [`ProxyError::Validation`] before any outbound call when the
    /// location is missing or blank.
    pub async fn lookup(&self, location: Option<&str>) -> ProxyResult<WeatherResult> {
        let location = location
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| ProxyError::Validation("Location is required".to_string()))?;

        let place = self.geocode(location).await?;
        tracing::debug!(
            "Resolved '{}' to {} ({}, {})",
            location,
            place.name,
            place.latitude,
            place.longitude
        );

        let current = self.current_conditions(place.latitude, place.longitude).await?;

        Ok(WeatherResult {
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            wind_gust: current.wind_gusts_10m,
            conditions: weather_condition(current.weather_code).to_string(),
            location: place.name,
        })
    }

    async fn geocode(&self, location: &str) -> ProxyResult<GeoMatch> {
        let response = self
            .http_client
            .get(&self.geocoding_url)
            .query(&[("name", location), ("count", "1")])
            .send()
            .await?;

        let data: GeocodingResponse = read_json("Geocoding API", response).await?;

        data.results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ProxyError::NotFound(location.to_string()))
    }

    async fn current_conditions(&self, latitude: f64, longitude: f64) -> ProxyResult<CurrentConditions> {
        let response = self
            .http_client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?;

        let data: ForecastResponse = read_json("Forecast API", response).await?;
        Ok(data.current)
    }

    /// Text of the `{ error }` body for a failed weather request
    pub fn error_message(err: &ProxyError) -> String {
        match err {
            ProxyError::Validation(msg) => msg.clone(),
            other => format!("Failed to fetch weather data: {}", other),
        }
    }
}

/// Decode a JSON body, turning non-success statuses into upstream errors
async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> ProxyResult<T> {
    if !response.status().is_success() {
        return Err(ProxyError::from_response(service, response).await);
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
