//! Wire model of the homework status API and the checks applied to it.
//!
//! The API answers with `{"homeworks": [...], "current_date": <unix ts>}`, newest
//! homework first. Bodies arrive as raw JSON and are validated here rather than
//! deserialized straight into structs, so every malformed shape maps to a precise error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("API response is empty")]
    Empty,
    #[error("API response is not a JSON object")]
    NotAnObject,
    #[error("API response has no \"homeworks\" key")]
    MissingHomeworks,
    #[error("\"homeworks\" in API response is not a list")]
    HomeworksNotAList,
}

impl ResponseError {
    /// True for errors about the shape of an otherwise present body.
    pub fn is_shape_error(&self) -> bool {
        !matches!(self, ResponseError::Empty)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("homework record is not a JSON object")]
    NotAnObject,
    #[error("homework record has no \"{0}\" key")]
    MissingField(&'static str),
    #[error("homework record field \"{0}\" is not a string")]
    InvalidField(&'static str),
    #[error("undocumented homework status: {0}")]
    Unrecognized(String),
}

// ── Status table ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Verdict text shown to the student.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::Unrecognized(s.to_string()))
    }
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub homework_name: String,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    pub fn from_value(value: &Value) -> Result<Self, StatusError> {
        let obj = value.as_object().ok_or(StatusError::NotAnObject)?;

        let string_field = |key: &'static str| -> Result<&str, StatusError> {
            obj.get(key)
                .ok_or(StatusError::MissingField(key))?
                .as_str()
                .ok_or(StatusError::InvalidField(key))
        };

        let homework_name = string_field("homework_name")?.to_string();
        let status = string_field("status")?.parse::<HomeworkStatus>()?;

        Ok(Self {
            homework_name,
            status,
        })
    }

    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// A validated poll answer. `homeworks` stays raw: each entry is only checked when
/// it is formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    pub homeworks: Vec<Value>,
    pub current_date: Option<i64>,
}

impl PollResponse {
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}

/// Validate the overall shape of a decoded response.
///
/// An empty `homeworks` list is valid and means nothing changed since the cursor.
pub fn check_response(value: &Value) -> Result<PollResponse, ResponseError> {
    if value.is_null() {
        return Err(ResponseError::Empty);
    }
    let obj = value.as_object().ok_or(ResponseError::NotAnObject)?;
    let homeworks = obj
        .get("homeworks")
        .ok_or(ResponseError::MissingHomeworks)?
        .as_array()
        .ok_or(ResponseError::HomeworksNotAList)?
        .clone();
    let current_date = obj.get("current_date").and_then(Value::as_i64);

    Ok(PollResponse {
        homeworks,
        current_date,
    })
}

/// Turn one homework record into the notification sentence.
pub fn parse_status(value: &Value) -> Result<String, StatusError> {
    HomeworkRecord::from_value(value).map(|record| record.message())
}
