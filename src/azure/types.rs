use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work item id as the backend sends it. Azure DevOps ids are numeric but the
/// integration layer sometimes stringifies them, so keep whichever we got and
/// send it back the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for WorkItemId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for WorkItemId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: WorkItemId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw timestamp string, parsed on demand so bad values survive loading
    #[serde(default)]
    pub created_date: Option<String>,
}

impl WorkItem {
    /// Parsed creation timestamp, `None` when absent or unparsable
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_date.as_deref().and_then(parse_timestamp)
    }

    /// Epoch milliseconds used as the sort key
    pub fn created_millis(&self) -> Option<i64> {
        self.created_at().map(|d| d.timestamp_millis())
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) or a
/// bare `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Response of `getAzureDevOps`. Some deployments wrap the payload in `body`.
#[derive(Debug, Default, Deserialize)]
pub struct WorkItemsResponse {
    #[serde(default)]
    items: Option<Vec<WorkItem>>,
    #[serde(default)]
    body: Option<WorkItemsBody>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkItemsBody {
    #[serde(default)]
    items: Option<Vec<WorkItem>>,
}

impl WorkItemsResponse {
    pub fn into_items(self) -> Vec<WorkItem> {
        self.items
            .or_else(|| self.body.and_then(|b| b.items))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "requirementID")]
    pub requirement_id: serde_json::Value,
    #[serde(rename = "requirementName")]
    pub requirement_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "projectID")]
    pub project_id: serde_json::Value,
    #[serde(rename = "projectName")]
    pub project_name: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// Requirement list response: either `{ "data": [...] }` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProjectsResponse {
    Wrapped {
        #[serde(default)]
        data: Option<Vec<Project>>,
    },
    Bare(Vec<Project>),
}

impl ProjectsResponse {
    pub fn into_projects(self) -> Vec<Project> {
        match self {
            Self::Wrapped { data } => data.unwrap_or_default(),
            Self::Bare(projects) => projects,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItemsQuery {
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsQuery {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "orgID")]
    pub org_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRequest {
    #[serde(rename = "orgID")]
    pub org_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "projectName")]
    pub project_name: String,
    #[serde(rename = "requirementName")]
    pub requirement_name: String,
    #[serde(rename = "selectedWorkItemIds")]
    pub selected_work_item_ids: Vec<WorkItemId>,
}

/// Save response body. Only `statusCode` matters; it wins over the HTTP status.
#[derive(Debug, Default, Deserialize)]
pub struct SaveResponse {
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub status: u16,
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 202)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_absent_is_empty() {
        let resp: WorkItemsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_items().is_empty());
    }

    #[test]
    fn test_items_wrapped_in_body() {
        let json = r#"{"body":{"items":[{"id":7,"title":"Wrapped"}]}}"#;
        let items = serde_json::from_str::<WorkItemsResponse>(json).unwrap().into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, WorkItemId::Number(7));
    }

    #[test]
    fn test_id_keeps_wire_type() {
        let json = r#"{"items":[{"id":"AB-1"},{"id":42}]}"#;
        let items = serde_json::from_str::<WorkItemsResponse>(json).unwrap().into_items();
        assert_eq!(items[0].id, WorkItemId::from("AB-1"));
        assert_eq!(items[1].id, WorkItemId::from(42));
        assert_eq!(items[1].id.to_string(), "42");
    }

    #[test]
    fn test_created_date_formats() {
        let item = |raw: &str| WorkItem {
            id: 1.into(),
            title: None,
            description: None,
            created_date: Some(raw.to_string()),
        };
        assert!(item("2024-01-05T10:20:30Z").created_at().is_some());
        assert!(item("2024-01-05T10:20:30.123").created_at().is_some());
        assert!(item("2024-01-05").created_at().is_some());
        assert!(item("not a date").created_at().is_none());
        assert!(item("").created_at().is_none());
    }

    #[test]
    fn test_import_request_field_names() {
        let req = ImportRequest {
            org_id: "org".into(),
            user_id: "user".into(),
            project_name: "Apollo".into(),
            requirement_name: "REQ-1".into(),
            selected_work_item_ids: vec![WorkItemId::Number(3), WorkItemId::from("x")],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["orgID"], "org");
        assert_eq!(value["userID"], "user");
        assert_eq!(value["projectName"], "Apollo");
        assert_eq!(value["requirementName"], "REQ-1");
        assert_eq!(value["selectedWorkItemIds"], serde_json::json!([3, "x"]));
    }

    #[test]
    fn test_projects_response_shapes() {
        let wrapped = r#"{"data":[{"projectID":1,"projectName":"A","requirements":[{"requirementID":9,"requirementName":"R"}]}]}"#;
        let projects = serde_json::from_str::<ProjectsResponse>(wrapped).unwrap().into_projects();
        assert_eq!(projects[0].requirements[0].requirement_name, "R");

        let bare = r#"[{"projectID":"p","projectName":"B"}]"#;
        let projects = serde_json::from_str::<ProjectsResponse>(bare).unwrap().into_projects();
        assert_eq!(projects[0].project_name, "B");
        assert!(projects[0].requirements.is_empty());
    }

    #[test]
    fn test_save_outcome_success_codes() {
        assert!(SaveOutcome { status: 200 }.is_success());
        assert!(SaveOutcome { status: 202 }.is_success());
        assert!(!SaveOutcome { status: 201 }.is_success());
        assert!(!SaveOutcome { status: 500 }.is_success());
    }
}
