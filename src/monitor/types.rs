use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uptime check. `response_time` is in milliseconds and missing when the
/// check produced no latency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorLogRecord {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorLogsResponse {
    pub success: bool,
    #[serde(default)]
    pub monitor_logs: Vec<MonitorLogRecord>,
    #[serde(default)]
    pub average_response_time: Option<f64>,
    #[serde(default)]
    pub average_response_up_time: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorLogs {
    pub records: Vec<MonitorLogRecord>,
    pub average_response_time: Option<f64>,
    pub average_response_up_time: Option<f64>,
}

impl MonitorLogsResponse {
    pub fn into_result(self) -> Result<MonitorLogs> {
        if !self.success {
            bail!(self
                .message
                .unwrap_or_else(|| "monitor logs request failed".to_string()));
        }

        Ok(MonitorLogs {
            records: self.monitor_logs,
            average_response_time: self.average_response_time,
            average_response_up_time: self.average_response_up_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_logs_and_ignores_extra_fields() {
        let response: MonitorLogsResponse = serde_json::from_value(json!({
            "success": true,
            "monitorLogs": [
                {
                    "_id": "log-1",
                    "createdAt": "2024-05-01T10:00:00.000Z",
                    "responseTime": 182,
                    "statusCode": 200,
                },
                {
                    "createdAt": "2024-05-01T10:05:00.000Z",
                    "responseTime": null,
                },
                { "createdAt": "2024-05-01T10:10:00+02:00" },
            ],
            "averageResponseTime": 182.5,
            "averageResponseUpTime": 99.1,
        }))
        .unwrap();

        let logs = response.into_result().unwrap();

        assert_eq!(logs.records.len(), 3);
        assert_eq!(
            logs.records[0],
            MonitorLogRecord {
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
                response_time: Some(182.0),
            }
        );
        assert_eq!(logs.records[1].response_time, None);
        assert_eq!(
            logs.records[2].created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 10, 0).unwrap()
        );
        assert_eq!(logs.average_response_time, Some(182.5));
        assert_eq!(logs.average_response_up_time, Some(99.1));
    }

    #[test]
    fn unsuccessful_response_becomes_error_with_message() {
        let response: MonitorLogsResponse = serde_json::from_value(json!({
            "success": false,
            "message": "Monitor not found",
        }))
        .unwrap();

        let err = response.into_result().unwrap_err();

        assert_eq!(err.to_string(), "Monitor not found");
    }

    #[test]
    fn missing_timestamp_is_rejected_at_the_boundary() {
        let parsed = serde_json::from_value::<MonitorLogsResponse>(json!({
            "success": true,
            "monitorLogs": [{ "responseTime": 10 }],
        }));

        assert!(parsed.is_err());
    }
}
