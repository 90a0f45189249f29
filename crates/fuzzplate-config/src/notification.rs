use serde::{Deserialize, Serialize};

/// Posts a message to a Microsoft Teams incoming webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsTemplate {
  pub url: String,
}

/// Files a work item in Azure DevOps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoTemplate {
  pub base_url: String,
  pub auth_token: String,
  pub project: String,
  #[serde(rename = "type")]
  pub work_item_type: String,
  #[serde(default)]
  pub unique_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationTemplate {
  Teams(TeamsTemplate),
  Ado(AdoTemplate),
}

/// Notification attached to a container; fired when new reports land in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
  pub config: NotificationTemplate,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_teams_notification_json() {
    let config = NotificationConfig {
      config: NotificationTemplate::Teams(TeamsTemplate {
        url: "https://example.invalid/hook".to_string(),
      }),
    };

    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["config"]["kind"], "teams");
    assert_eq!(value["config"]["url"], "https://example.invalid/hook");

    let parsed: NotificationConfig = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, config);
  }
}
