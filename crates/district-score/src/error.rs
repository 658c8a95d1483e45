use crate::config::ConfigError;
use crate::scoring::ScoreError;
use crate::submissions::SubmissionError;
use crate::table::TableError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Table(TableError),
    Score(ScoreError),
    Submissions(SubmissionError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Score(ScoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Score(ScoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Score(ScoreError::Unscorable(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Table(_)
            | AppError::Submissions(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Table(err) => write!(f, "indicator table error: {}", err),
            AppError::Score(err) => write!(f, "{}", err),
            AppError::Submissions(err) => write!(f, "submission log error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Table(err) => Some(err),
            AppError::Score(err) => Some(err),
            AppError::Submissions(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<TableError> for AppError {
    fn from(value: TableError) -> Self {
        Self::Table(value)
    }
}

impl From<ScoreError> for AppError {
    fn from(value: ScoreError) -> Self {
        Self::Score(value)
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        Self::Submissions(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_errors_map_to_client_statuses() {
        let cases = [
            (
                ScoreError::Validation("weights required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ScoreError::NotFound("Z".to_string()), StatusCode::NOT_FOUND),
            (
                ScoreError::Unscorable("A".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(AppError::from(error).status(), expected);
        }
    }

    #[test]
    fn validation_message_is_passed_through_verbatim() {
        let error = AppError::from(ScoreError::Validation("weights required".to_string()));
        assert_eq!(error.to_string(), "weights required");
    }

    #[test]
    fn table_errors_are_server_errors() {
        let error = AppError::from(TableError::Empty);
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().starts_with("indicator table error"));
    }
}
