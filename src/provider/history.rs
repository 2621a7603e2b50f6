//! The remote history capability and its wire types.

use crate::core::Operator;
use crate::provider::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Operation tag used on the wire by the calculator API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiOperation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    SquareRoot,
    Power,
}

impl From<ApiOperation> for Operator {
    fn from(operation: ApiOperation) -> Self {
        match operation {
            ApiOperation::Addition => Operator::Add,
            ApiOperation::Subtraction => Operator::Subtract,
            ApiOperation::Multiplication => Operator::Multiply,
            ApiOperation::Division => Operator::Divide,
            ApiOperation::SquareRoot => Operator::Sqrt,
            ApiOperation::Power => Operator::Power,
        }
    }
}

impl From<Operator> for ApiOperation {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Add => ApiOperation::Addition,
            Operator::Subtract => ApiOperation::Subtraction,
            Operator::Multiply => ApiOperation::Multiplication,
            Operator::Divide => ApiOperation::Division,
            Operator::Sqrt => ApiOperation::SquareRoot,
            Operator::Power => ApiOperation::Power,
        }
    }
}

/// One history record as the remote service returns it.
///
/// Remote identifiers are kept for diagnostics only; the ledger assigns
/// its own when loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub operation: ApiOperation,
    pub parameter1: f64,
    #[serde(default)]
    pub parameter2: Option<f64>,
    pub result: f64,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
}

impl RemoteRecord {
    /// Right operand as the ledger stores it: absent for square root.
    pub fn operand2(&self) -> Option<f64> {
        match Operator::from(self.operation) {
            Operator::Sqrt => None,
            _ => Some(self.parameter2.unwrap_or(0.0)),
        }
    }
}

/// Remote store of completed operations.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Every stored record, most recent first.
    async fn fetch_all(&self) -> Result<Vec<RemoteRecord>, ApiError>;

    /// The `count` most recent records.
    async fn fetch_recent(&self, count: usize) -> Result<Vec<RemoteRecord>, ApiError>;

    /// Remove every stored record.
    async fn clear(&self) -> Result<(), ApiError>;
}

/// Accept RFC 3339 timestamps, and naive ones which are taken as UTC.
fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn operation_tags_use_wire_names() {
        let json = serde_json::to_string(&ApiOperation::SquareRoot).unwrap();
        assert_eq!(json, "\"SQUARE_ROOT\"");

        for operator in Operator::ALL {
            assert_eq!(Operator::from(ApiOperation::from(operator)), operator);
        }
    }

    #[test]
    fn record_parses_rfc3339_date() {
        let record: RemoteRecord = serde_json::from_str(
            r#"{"id": 17, "operation": "ADDITION", "parameter1": 5, "parameter2": 3,
                "result": 8, "date": "2024-05-01T10:30:00Z"}"#,
        )
        .unwrap();

        assert_eq!(record.id, Some(17));
        assert_eq!(record.operand2(), Some(3.0));
        assert_eq!(record.date, Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn record_accepts_naive_date() {
        let record: RemoteRecord = serde_json::from_str(
            r#"{"operation": "SQUARE_ROOT", "parameter1": 9, "parameter2": 0,
                "result": 3, "date": "2024-05-01T10:30:00.250"}"#,
        )
        .unwrap();

        assert_eq!(record.operand2(), None);
        assert_eq!(record.date.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn record_rejects_unparseable_date() {
        let result: Result<RemoteRecord, _> = serde_json::from_str(
            r#"{"operation": "POWER", "parameter1": 2, "result": 4, "date": "yesterday"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_second_parameter_defaults_to_zero_for_binary() {
        let record: RemoteRecord = serde_json::from_str(
            r#"{"operation": "MULTIPLICATION", "parameter1": 2, "result": 0,
                "date": "2024-05-01T10:30:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(record.operand2(), Some(0.0));
        assert_eq!(record.date.format("%H").to_string(), "08");
    }
}
