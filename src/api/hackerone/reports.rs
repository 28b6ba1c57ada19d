use super::HackerOneClient;
use super::types::Report;
use crate::api::transport::{Connector, Transport};
use crate::error::{Error, Result};
use crate::retry::with_retry;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

/// Window, in days, used when listing reports without an explicit lower bound.
pub const DEFAULT_REPORTS_WINDOW_DAYS: i64 = 3;

pub fn reports_since_default() -> DateTime<Utc> {
    Utc::now() - Duration::days(DEFAULT_REPORTS_WINDOW_DAYS)
}

impl<C: Connector> HackerOneClient<C> {
    /// Open (`new`) reports for the resolved program created after `since`.
    ///
    /// Only the first page the API returns is read. Nothing is retried here.
    pub async fn reports(&self, since: DateTime<Utc>) -> Result<Vec<Report>> {
        let program = self
            .program()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::InvalidArgument("Program cannot be nil".to_string()))?
            .to_string();

        let query = [
            ("filter[state][]", "new".to_string()),
            ("filter[program][]", program.clone()),
            (
                "filter[created_at__gt]",
                since.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ];

        let response = self.connection().await?.get("reports", &query).await?;
        let mut parsed: Value = serde_json::from_str(&response.body)?;

        let data = match parsed.get_mut("data").map(Value::take) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                return Err(Error::Protocol(format!(
                    "Expected data attribute in response: {}",
                    response.body
                )));
            }
            Some(_) => {
                return Err(Error::Protocol(format!(
                    "Expected data array in response: {}",
                    response.body
                )));
            }
        };

        debug!(program = %program, count = data.len(), "Fetched reports");
        let ranges = self.config.ranges();
        data.into_iter()
            .map(|item| Report::from_value(item, ranges))
            .collect()
    }

    /// Reports created within the last [`DEFAULT_REPORTS_WINDOW_DAYS`] days.
    pub async fn recent_reports(&self) -> Result<Vec<Report>> {
        self.reports(reports_since_default()).await
    }

    /// Single report by id. Transport failures are retried under the client's
    /// retry policy; an HTTP error status is not.
    pub async fn report(&self, id: &str) -> Result<Report> {
        let path = format!("reports/{}", id);
        let path = path.as_str();

        let response = with_retry("get_report", &self.retry, || async move {
            self.connection().await?.get(path, &[]).await
        })
        .await?;

        if !response.is_success() {
            return Err(Error::InvalidArgument(format!(
                "Could not retrieve HackerOne report #{}: {}",
                id, response.body
            )));
        }

        let mut parsed: Value = serde_json::from_str(&response.body)?;
        match parsed.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Report::from_value(data, self.config.ranges()),
            _ => Err(Error::Protocol(format!(
                "Expected data attribute in response: {}",
                response.body
            ))),
        }
    }
}
