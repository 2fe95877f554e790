use crate::integrations::item::IntegrationItem;
use crate::integrations::search::find_field;
use serde_json::Value;

/// Display name used when a record carries no usable `name` anywhere
pub const UNNAMED_ITEM: &str = "Unnamed Item";

/// Type tag used when a record has no `type`
pub const UNKNOWN_TYPE: &str = "unknown";

/// Transform a HubSpot CRM record into an integration item.
///
/// The display name is searched for across the whole record, while contact
/// details are read from `properties` only.
pub fn create_integration_item(record: &Value) -> IntegrationItem {
    let name = find_field(record, "name")
        .and_then(scalar_to_string)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNNAMED_ITEM.to_string());

    let properties = record.get("properties");
    let property = |key: &str| properties.and_then(|p| p.get(key)).and_then(scalar_to_string);

    IntegrationItem {
        id: record.get("id").and_then(scalar_to_string),
        item_type: Some(
            record
                .get("type")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        ),
        name: Some(name),
        creation_time: record.get("createdAt").and_then(scalar_to_string),
        last_modified_time: record.get("updatedAt").and_then(scalar_to_string),
        parent_id: record
            .get("parent")
            .and_then(|parent| parent.get("id"))
            .and_then(scalar_to_string),
        firstname: property("firstname"),
        lastname: property("lastname"),
        email: property("email"),
        ..Default::default()
    }
}

/// Strings as-is, numbers and booleans stringified; null and containers are absent.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
