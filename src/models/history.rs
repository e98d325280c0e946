use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of storefront interaction recorded by the widget
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    View,
    Click,
}

/// One entry of the client-side interaction history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub product_id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
}

impl HistoryEvent {
    pub fn view(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            event_type: EventType::View,
        }
    }

    pub fn click(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            event_type: EventType::Click,
        }
    }

    /// Reads a raw history entry, returning `None` when it is malformed
    ///
    /// Numeric product ids are accepted and read as their decimal form.
    pub fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;

        let product_id = match entry.get("productId")? {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };

        let event_type = match entry.get("type")?.as_str()? {
            "view" => EventType::View,
            "click" => EventType::Click,
            _ => return None,
        };

        Some(Self {
            product_id,
            event_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_view_and_click() {
        let view = HistoryEvent::from_value(&json!({"productId": "12", "type": "view"}));
        let click = HistoryEvent::from_value(&json!({"productId": "12", "type": "click"}));

        assert_eq!(view, Some(HistoryEvent::view("12")));
        assert_eq!(click, Some(HistoryEvent::click("12")));
    }

    #[test]
    fn test_from_value_numeric_id() {
        let event = HistoryEvent::from_value(&json!({"productId": 8812, "type": "view"}));
        assert_eq!(event, Some(HistoryEvent::view("8812")));
    }

    #[test]
    fn test_from_value_rejects_malformed_entries() {
        let malformed = [
            json!("12"),
            json!(null),
            json!({"type": "view"}),
            json!({"productId": "12"}),
            json!({"productId": "12", "type": "purchase"}),
            json!({"productId": ["12"], "type": "click"}),
        ];

        for entry in &malformed {
            assert_eq!(HistoryEvent::from_value(entry), None, "entry: {}", entry);
        }
    }

    #[test]
    fn test_event_type_serialization() {
        assert_eq!(serde_json::to_string(&EventType::Click).unwrap(), "\"click\"");
        assert_eq!(serde_json::to_string(&EventType::View).unwrap(), "\"view\"");
    }
}
