use crate::error::ReportError;
use chrono::{DateTime, FixedOffset};
use log::debug;
use serde::{Deserialize, Deserializer};

/// A Toggl workspace as returned by the workspace listing endpoint.
///
/// Only `id` and `name` are guaranteed; everything else is optional and
/// fields the service adds later are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Workspace {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile: Option<i64>,
    #[serde(default)]
    pub premium: Option<bool>,
    #[serde(default)]
    pub admin: Option<bool>,
    #[serde(default)]
    pub default_hourly_rate: Option<f64>,
    #[serde(default)]
    pub default_currency: Option<String>,
    #[serde(default)]
    pub only_admins_may_create_projects: Option<bool>,
    #[serde(default)]
    pub only_admins_see_billable_rates: Option<bool>,
    #[serde(default)]
    pub only_admins_see_team_dashboard: Option<bool>,
    #[serde(default)]
    pub projects_billable_by_default: Option<bool>,
    #[serde(default)]
    pub rounding: Option<i32>,
    #[serde(default)]
    pub rounding_minutes: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_timestamp_opt")]
    pub at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

fn deserialize_timestamp_opt<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok()))
}

pub fn parse_workspaces(data: &str) -> Result<Vec<Workspace>, ReportError> {
    let workspaces: Vec<Workspace> = serde_json::from_str(data)?;
    debug!("Parsed {} workspaces", workspaces.len());
    Ok(workspaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_workspace() {
        let workspaces = parse_workspaces(r#"[{"id": 123, "name": "Acme"}]"#)
            .expect("workspaces should parse");
        assert_eq!(workspaces.len(), 1);
        assert_eq!(workspaces[0].id, 123);
        assert_eq!(workspaces[0].name, "Acme");
        assert_eq!(workspaces[0].premium, None);
        assert_eq!(workspaces[0].at, None);
    }

    #[test]
    fn parses_full_workspace_and_ignores_unknown_fields() {
        let payload = json!([
            {
                "id": 3134975,
                "name": "John's personal ws",
                "profile": 0,
                "premium": true,
                "admin": true,
                "default_hourly_rate": 50.5,
                "default_currency": "USD",
                "only_admins_may_create_projects": false,
                "only_admins_see_billable_rates": true,
                "only_admins_see_team_dashboard": false,
                "projects_billable_by_default": true,
                "rounding": 1,
                "rounding_minutes": 15,
                "at": "2013-08-28T16:22:21+00:00",
                "logo_url": "my_logo.png",
                "ical_enabled": true,
                "api_token": "secret"
            },
            { "id": 7, "name": "Side project", "at": "" }
        ]);
        let workspaces = parse_workspaces(&payload.to_string()).expect("workspaces should parse");
        assert_eq!(workspaces.len(), 2);

        let ws = &workspaces[0];
        assert_eq!(ws.id, 3134975);
        assert_eq!(ws.default_hourly_rate, Some(50.5));
        assert_eq!(ws.default_currency.as_deref(), Some("USD"));
        assert_eq!(ws.rounding_minutes, Some(15));
        assert_eq!(
            ws.at,
            DateTime::parse_from_rfc3339("2013-08-28T16:22:21+00:00").ok()
        );

        assert_eq!(workspaces[1].name, "Side project");
        assert_eq!(workspaces[1].at, None);
    }

    #[test]
    fn rejects_malformed_payloads() {
        for body in ["not json", r#"{"id": 1, "name": "x"}"#, "[1, 2]", r#"[{"id": 1}]"#] {
            let err = parse_workspaces(body).unwrap_err();
            assert!(matches!(err, ReportError::Decode(_)), "{body}: {err}");
        }
    }
}
