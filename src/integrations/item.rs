use serde::{Deserialize, Serialize};

/// Provider-agnostic record describing one remote object (contact, file, ...).
///
/// Unset optional fields serialize as `null`; they are never defaulted to an
/// empty string, so consumers can tell "absent" from "present but empty".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub directory: bool,
    pub parent_path_or_name: Option<String>,
    pub parent_id: Option<String>,
    pub name: Option<String>,
    /// Provider-supplied creation timestamp, verbatim
    pub creation_time: Option<String>,
    /// Provider-supplied modification timestamp, verbatim
    pub last_modified_time: Option<String>,
    pub url: Option<String>,
    pub children: Option<Vec<String>>,
    pub mime_type: Option<String>,
    pub delta: Option<String>,
    pub drive_id: Option<String>,
    pub visibility: Option<bool>,

    // Contact details
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
}

impl Default for IntegrationItem {
    fn default() -> Self {
        Self {
            id: None,
            item_type: None,
            directory: false,
            parent_path_or_name: None,
            parent_id: None,
            name: None,
            creation_time: None,
            last_modified_time: None,
            url: None,
            children: None,
            mime_type: None,
            delta: None,
            drive_id: None,
            visibility: Some(true),
            firstname: None,
            lastname: None,
            email: None,
        }
    }
}
