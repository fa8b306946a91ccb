//! Weather webhook client
//!
//! One HTTP GET per refresh against a local endpoint. Failures are returned
//! to the caller as-is; there is no retry loop.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WeatherConfig;

/// Weather webhook client
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    url: String,
}

impl WeatherClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(WeatherError::Request)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current report
    pub async fn fetch(&self) -> Result<WeatherReport, WeatherError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout
            } else if e.is_connect() {
                WeatherError::Unavailable
            } else {
                WeatherError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout
            } else {
                WeatherError::Request(e)
            }
        })?;

        serde_json::from_str(&body).map_err(|e| WeatherError::Malformed(e.to_string()))
    }
}

// ============================================
// Report
// ============================================

/// A numeric reading the webhook may send as a number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{:.1}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Current conditions from the webhook; absent fields render as `--`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub temperature: Option<Reading>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub humidity: Option<Reading>,
    #[serde(default, rename = "windDir")]
    pub wind_dir: Option<String>,
}

const MISSING: &str = "--";

impl WeatherReport {
    pub fn city_text(&self) -> String {
        self.city.clone().unwrap_or_else(|| MISSING.to_string())
    }

    pub fn temperature_text(&self) -> String {
        self.temperature
            .as_ref()
            .map(|t| format!("{}°C", t))
            .unwrap_or_else(|| MISSING.to_string())
    }

    pub fn humidity_text(&self) -> String {
        self.humidity
            .as_ref()
            .map(|h| format!("{}%", h))
            .unwrap_or_else(|| MISSING.to_string())
    }
}

impl std::fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  {}  {}  humidity {}  wind {}",
            self.city_text(),
            self.temperature_text(),
            self.weather.as_deref().unwrap_or(MISSING),
            self.humidity_text(),
            self.wind_dir.as_deref().unwrap_or(MISSING),
        )
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur while fetching weather
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather service unavailable")]
    Unavailable,

    #[error("Weather request timed out")]
    Timeout,

    #[error("Weather service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed weather response: {0}")]
    Malformed(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::time::Duration;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/weather", addr)
    }

    fn client(url: String, timeout_ms: u64) -> WeatherClient {
        WeatherClient::new(&WeatherConfig {
            url,
            timeout_ms,
            ..WeatherConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_report() {
        let app = Router::new().route(
            "/weather",
            get(|| async {
                r#"{"city":"Hangzhou","temperature":21,"weather":"Cloudy","humidity":"64","windDir":"NE"}"#
            }),
        );
        let report = client(serve(app).await, 2000).fetch().await.unwrap();

        assert_eq!(report.city.as_deref(), Some("Hangzhou"));
        assert_eq!(report.temperature_text(), "21°C");
        assert_eq!(report.humidity_text(), "64%");
        assert_eq!(report.wind_dir.as_deref(), Some("NE"));
    }

    #[tokio::test]
    async fn test_missing_fields_render_placeholder() {
        let app = Router::new().route("/weather", get(|| async { r#"{"city":"Tianjin"}"# }));
        let report = client(serve(app).await, 2000).fetch().await.unwrap();

        assert_eq!(report.temperature_text(), "--");
        assert_eq!(report.to_string(), "Tianjin  --  --  humidity --  wind --");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let app = Router::new().route("/weather", get(|| async { "<html>oops</html>" }));
        let err = client(serve(app).await, 2000).fetch().await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_error_status() {
        let app = Router::new().route(
            "/weather",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let err = client(serve(app).await, 2000).fetch().await.unwrap_err();
        assert!(matches!(err, WeatherError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let app = Router::new().route(
            "/weather",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let err = client(serve(app).await, 100).fetch().await.unwrap_err();
        assert!(matches!(err, WeatherError::Timeout));
    }

    #[tokio::test]
    async fn test_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}/weather", addr), 2000)
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Unavailable));
    }
}
