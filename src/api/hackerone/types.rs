use crate::config::SeverityRanges;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
    None,
}

impl Severity {
    /// Bands are tested low to critical, first hit wins. Ranges include their
    /// start and exclude their end.
    pub fn classify(score: Option<f64>, ranges: &SeverityRanges) -> Self {
        let Some(score) = score else {
            return Severity::None;
        };

        [
            (&ranges.low, Severity::Low),
            (&ranges.medium, Severity::Medium),
            (&ranges.high, Severity::High),
            (&ranges.critical, Severity::Critical),
        ]
        .into_iter()
        .find(|(range, _)| range.contains(&score))
        .map(|(_, severity)| severity)
        .unwrap_or(Severity::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
            Severity::None => "none",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Weakness {
    pub name: String,
    pub external_id: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Bounty {
    pub amount: f64,
    pub bonus_amount: f64,
}

/// One vulnerability report as returned by the API.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub score: Option<f64>,
    pub severity: Severity,
    pub rating: Option<String>,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub triaged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub weakness: Option<Weakness>,
    pub reporter: Option<String>,
    pub issue_tracker_reference_id: Option<String>,
    pub vulnerability_information: Option<String>,
    pub bounties: Vec<Bounty>,
}

impl Report {
    /// Parse one `data` record, deriving the severity band from `ranges`.
    pub fn from_value(value: serde_json::Value, ranges: &SeverityRanges) -> Result<Self> {
        let record: ReportRecord = serde_json::from_value(value)?;
        Ok(Self::from_record(record, ranges))
    }

    fn from_record(record: ReportRecord, ranges: &SeverityRanges) -> Self {
        let ReportRecord {
            id,
            attributes,
            relationships,
        } = record;

        let severity_attrs = relationships.severity.and_then(|r| r.data).map(|d| d.attributes);
        let score = severity_attrs.as_ref().and_then(|s| s.score);
        let rating = severity_attrs.and_then(|s| s.rating);

        let weakness = relationships
            .weakness
            .and_then(|r| r.data)
            .map(|d| Weakness {
                name: d.attributes.name,
                external_id: d.attributes.external_id,
            });

        let reporter = relationships
            .reporter
            .and_then(|r| r.data)
            .map(|d| d.attributes.username);

        let bounties = relationships
            .bounties
            .and_then(|r| r.data)
            .unwrap_or_default()
            .into_iter()
            .map(|b| Bounty {
                amount: b.attributes.amount,
                bonus_amount: b.attributes.bonus_amount,
            })
            .collect();

        Self {
            id,
            title: attributes.title,
            score,
            severity: Severity::classify(score, ranges),
            rating,
            state: attributes.state,
            created_at: attributes.created_at,
            triaged_at: attributes.triaged_at,
            closed_at: attributes.closed_at,
            weakness,
            reporter,
            issue_tracker_reference_id: attributes.issue_tracker_reference_id,
            vulnerability_information: attributes.vulnerability_information,
            bounties,
        }
    }

    /// Weakness rendered as "CWE-79: Cross-site Scripting", or just the name.
    pub fn classification_label(&self) -> Option<String> {
        self.weakness.as_ref().map(|w| match &w.external_id {
            Some(external_id) if !external_id.is_empty() => {
                format!("{}: {}", external_id.to_uppercase(), w.name)
            }
            _ => w.name.clone(),
        })
    }

    /// Sum of every bounty and bonus awarded on the report.
    pub fn payment_total(&self) -> f64 {
        self.bounties.iter().map(|b| b.amount + b.bonus_amount).sum()
    }
}

// Wire shapes (JSON:API resource objects).

#[derive(Debug, Deserialize)]
struct ReportRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    attributes: ReportAttributes,
    #[serde(default)]
    relationships: ReportRelationships,
}

#[derive(Debug, Deserialize)]
struct ReportAttributes {
    title: String,
    state: String,
    created_at: DateTime<Utc>,
    triaged_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    issue_tracker_reference_id: Option<String>,
    vulnerability_information: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReportRelationships {
    reporter: Option<Relationship<Resource<UserAttributes>>>,
    severity: Option<Relationship<Resource<SeverityAttributes>>>,
    weakness: Option<Relationship<Resource<WeaknessAttributes>>>,
    bounties: Option<Relationship<Vec<Resource<BountyAttributes>>>>,
}

#[derive(Debug, Deserialize)]
struct Relationship<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Resource<A> {
    attributes: A,
}

#[derive(Debug, Deserialize)]
struct UserAttributes {
    username: String,
}

#[derive(Debug, Deserialize)]
struct SeverityAttributes {
    rating: Option<String>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeaknessAttributes {
    name: String,
    external_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BountyAttributes {
    #[serde(default, deserialize_with = "amount")]
    amount: f64,
    #[serde(default, deserialize_with = "amount")]
    bonus_amount: f64,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// Amounts arrive as decimal strings ("500.00"); null means nothing was awarded.
fn amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("amount out of range")),
        serde_json::Value::String(s) if s.is_empty() => Ok(0.0),
        serde_json::Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount {:?}: {}", s, e))),
        other => Err(serde::de::Error::custom(format!("invalid amount {}", other))),
    }
}
