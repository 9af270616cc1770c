//! JSON bodies exchanged with the Sheets, Drive and OAuth endpoints.

use serde::{Deserialize, Serialize};

/// A block of cell values (`spreadsheets.values` resource)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Absent when the range is empty
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// One row of integers, as sent to `values:append`
    pub fn single_row(row: &[i64]) -> Self {
        Self {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: vec![row.iter().map(|v| serde_json::Value::from(*v)).collect()],
        }
    }

    /// Cell values rendered as strings
    pub fn into_strings(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect()
    }
}

/// Render one returned cell the way the sheet displays it
pub fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}

/// Response of `values:append`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    #[serde(default)]
    pub updates: Option<UpdateSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_cells: Option<u64>,
}

/// Response of Drive `files.list`
#[derive(Debug, Clone, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Response of the OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Google API error envelope: `{"error": {"code": .., "message": ..}}`
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// OAuth error envelope: `{"error": "..", "error_description": ".."}`
#[derive(Debug, Clone, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Pull a readable message out of an error response body
pub fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    if let Ok(parsed) = serde_json::from_str::<OAuthErrorBody>(body) {
        return match parsed.error_description {
            Some(description) => format!("{}: {}", parsed.error, description),
            None => parsed.error,
        };
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_range_to_strings() {
        let body = r#"{
            "range": "sales!A1:F3",
            "majorDimension": "ROWS",
            "values": [["cheese", "ham"], ["10", 20], [true, null]]
        }"#;
        let range: ValueRange = serde_json::from_str(body).unwrap();
        assert_eq!(
            range.into_strings(),
            vec![
                vec!["cheese", "ham"],
                vec!["10", "20"],
                vec!["TRUE", ""],
            ]
        );
    }

    #[test]
    fn test_empty_value_range() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range": "stock!A1:Z1000", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(range.into_strings().is_empty());
    }

    #[test]
    fn test_single_row_body() {
        let body = serde_json::to_value(ValueRange::single_row(&[1, 2, 3])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"majorDimension": "ROWS", "values": [[1, 2, 3]]})
        );
    }

    #[test]
    fn test_error_message() {
        let api = r#"{"error": {"code": 400, "message": "Unable to parse range: stock", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(api), "Unable to parse range: stock");

        let oauth = r#"{"error": "invalid_grant", "error_description": "Invalid JWT Signature."}"#;
        assert_eq!(error_message(oauth), "invalid_grant: Invalid JWT Signature.");

        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }
}
