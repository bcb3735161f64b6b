//! Layout and style model.
//!
//! A layout is a tree of [`WidgetNode`]s. Each node carries a small set of
//! structural fields (type, id, children, style reference), its event
//! declarations, and an open property bag for everything else (position,
//! size, text, values).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root widget tree (`layout.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<WidgetNode>,
}

impl Layout {
    /// Create a layout with the given root.
    pub fn new(root: Option<WidgetNode>) -> Self {
        Self { version: 1, root }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A node in the widget tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWidget", into = "RawWidget")]
pub struct WidgetNode {
    /// Widget kind (`button`, `label`, ...). Open set.
    pub widget_type: String,
    /// User supplied id.
    pub id: Option<String>,
    /// Child widgets, in sibling order.
    pub children: Vec<WidgetNode>,
    /// Reference to a shared style by id.
    pub style_id: Option<String>,
    /// Event declarations keyed by property name (`onClick`, ...).
    pub events: IndexMap<String, EventBinding>,
    /// Everything else.
    pub properties: IndexMap<String, PropertyValue>,
}

impl WidgetNode {
    /// Create a new node of the given type.
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            id: None,
            children: Vec::new(),
            style_id: None,
            events: IndexMap::new(),
            properties: IndexMap::new(),
        }
    }

    /// Set the user id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach a shared style.
    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Add a child node.
    pub fn with_child(mut self, child: WidgetNode) -> Self {
        self.children.push(child);
        self
    }

    /// Declare an event binding.
    pub fn with_event(mut self, name: impl Into<String>, binding: EventBinding) -> Self {
        self.events.insert(name.into(), binding);
        self
    }

    /// Add a property.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The user id, if one is set and non-empty.
    pub fn user_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The event binding declared under `name`, or [`EventBinding::None`].
    pub fn event(&self, name: &str) -> &EventBinding {
        self.events.get(name).unwrap_or(&EventBinding::None)
    }

    /// Get a property value.
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Get a numeric property.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get_property(key).and_then(PropertyValue::as_number)
    }

    /// Get a string property.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_property(key).and_then(PropertyValue::as_str)
    }

    /// Get a boolean property.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_property(key).and_then(PropertyValue::as_bool)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(WidgetNode::node_count).sum::<usize>()
    }
}

/// Returns true for property names of the form `onXxx`.
pub fn is_event_property(key: &str) -> bool {
    key.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Wire form of a widget: structural fields plus a flattened bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawWidget {
    #[serde(rename = "type")]
    widget_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<WidgetNode>,
    #[serde(rename = "styleId", default, skip_serializing_if = "Option::is_none")]
    style_id: Option<Value>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

impl From<RawWidget> for WidgetNode {
    fn from(raw: RawWidget) -> Self {
        let mut events = IndexMap::new();
        let mut properties = IndexMap::new();
        for (key, value) in raw.rest {
            if is_event_property(&key) {
                events.insert(key, EventBinding::from(&value));
            } else {
                properties.insert(key, PropertyValue::from(value));
            }
        }

        Self {
            widget_type: raw.widget_type,
            id: raw.id,
            children: raw.children,
            style_id: match raw.style_id {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
            events,
            properties,
        }
    }
}

impl From<WidgetNode> for RawWidget {
    fn from(node: WidgetNode) -> Self {
        let mut rest = IndexMap::new();
        for (key, binding) in &node.events {
            if let Some(value) = binding.to_value() {
                rest.insert(key.clone(), value);
            }
        }
        for (key, value) in node.properties {
            rest.insert(key, Value::from(value));
        }

        Self {
            widget_type: node.widget_type,
            id: node.id,
            children: node.children,
            style_id: node.style_id.map(Value::String),
            rest,
        }
    }
}

/// How an event is wired to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventBinding {
    /// The user owns a handler function with this name.
    Handler(String),
    /// Generate a stub handler with an editable body.
    Stub,
    /// No binding.
    #[default]
    None,
}

impl EventBinding {
    fn to_value(&self) -> Option<Value> {
        match self {
            Self::Handler(name) => Some(Value::String(name.clone())),
            Self::Stub => Some(Value::Bool(true)),
            Self::None => None,
        }
    }
}

impl From<&Value> for EventBinding {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => Self::Handler(s.trim().to_string()),
            Value::Bool(true) => Self::Stub,
            Value::Object(map) if !map.is_empty() => Self::Stub,
            _ => Self::None,
        }
    }
}

/// A loosely typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(IndexMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Get as string if it's a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as number if it's a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as boolean if it's a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<PropertyValue> for Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Null => Value::Null,
            PropertyValue::Boolean(b) => Value::Bool(b),
            PropertyValue::Number(n) => {
                serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
            }
            PropertyValue::String(s) => Value::String(s),
            PropertyValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            PropertyValue::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Shared and theme styles (`styles.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    pub version: u32,
    #[serde(default)]
    pub shared: Vec<SharedStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Value>,
}

impl Styles {
    /// Create a style collection.
    pub fn new(shared: Vec<SharedStyle>) -> Self {
        Self { version: 1, shared, theme: None }
    }

    /// Styles that can be referenced, i.e. those with a non-empty id.
    pub fn named(&self) -> impl Iterator<Item = &SharedStyle> {
        self.shared.iter().filter(|s| !s.id.is_empty())
    }

    /// Look up a style by id.
    pub fn get(&self, id: &str) -> Option<&SharedStyle> {
        self.named().find(|s| s.id == id)
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// A named bundle of visual properties.
///
/// Known keys are `bg_color`, `bg_opa`, `border_width`, `border_color`,
/// `radius`, `pad_all` and `text_color`; anything else is kept but unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedStyle {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub properties: IndexMap<String, PropertyValue>,
}

impl SharedStyle {
    /// Create an empty style.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: IndexMap::new(),
        }
    }

    /// Set a style property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a numeric style property.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(PropertyValue::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_widget_tree() {
        let layout: Layout = serde_json::from_value(json!({
            "version": 1,
            "root": {
                "type": "obj",
                "id": "main screen",
                "children": [
                    { "type": "button", "x": 10, "y": 20, "onClick": true, "styleId": "primary" },
                    { "type": "slider", "onValueChanged": "  mySliderHandler " }
                ]
            }
        }))
        .unwrap();

        let root = layout.root.unwrap();
        assert_eq!(root.widget_type, "obj");
        assert_eq!(root.user_id(), Some("main screen"));
        assert_eq!(root.children.len(), 2);

        let button = &root.children[0];
        assert_eq!(button.get_number("x"), Some(10.0));
        assert_eq!(button.style_id.as_deref(), Some("primary"));
        assert_eq!(button.event("onClick"), &EventBinding::Stub);
        assert!(!button.properties.contains_key("onClick"));

        let slider = &root.children[1];
        assert_eq!(
            slider.event("onValueChanged"),
            &EventBinding::Handler("mySliderHandler".to_string())
        );
    }

    #[test]
    fn test_event_binding_variants() {
        assert_eq!(EventBinding::from(&json!("h")), EventBinding::Handler("h".into()));
        assert_eq!(EventBinding::from(&json!(true)), EventBinding::Stub);
        assert_eq!(EventBinding::from(&json!({"stub": 1})), EventBinding::Stub);
        assert_eq!(EventBinding::from(&json!({})), EventBinding::None);
        assert_eq!(EventBinding::from(&json!(false)), EventBinding::None);
        assert_eq!(EventBinding::from(&json!("   ")), EventBinding::None);
        assert_eq!(EventBinding::from(&json!(null)), EventBinding::None);
        assert_eq!(EventBinding::from(&json!(3)), EventBinding::None);
    }

    #[test]
    fn test_non_string_style_id_is_ignored() {
        let node: WidgetNode =
            serde_json::from_value(json!({"type": "obj", "styleId": 4})).unwrap();
        assert_eq!(node.style_id, None);
    }

    #[test]
    fn test_event_property_names() {
        assert!(is_event_property("onClick"));
        assert!(is_event_property("onValueChanged"));
        assert!(!is_event_property("on"));
        assert!(!is_event_property("once"));
        assert!(!is_event_property("text"));
    }

    #[test]
    fn test_widget_serializes_back_to_wire_form() {
        let node = WidgetNode::new("button")
            .with_id("ok")
            .with_event("onClick", EventBinding::Stub)
            .with_event("onPressed", EventBinding::None)
            .with_property("text", "OK");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"type": "button", "id": "ok", "onClick": true, "text": "OK"}));
    }

    #[test]
    fn test_styles_skip_unnamed() {
        let styles: Styles = serde_json::from_value(json!({
            "version": 1,
            "shared": [
                { "id": "card", "bg_color": 16777215, "radius": 4 },
                { "bg_color": 0 }
            ]
        }))
        .unwrap();

        assert_eq!(styles.named().count(), 1);
        let card = styles.get("card").unwrap();
        assert_eq!(card.number("bg_color"), Some(16777215.0));
        assert_eq!(card.number("radius"), Some(4.0));
        assert_eq!(card.number("pad_all"), None);
    }

    #[test]
    fn test_node_count() {
        let tree = WidgetNode::new("obj")
            .with_child(WidgetNode::new("button").with_child(WidgetNode::new("label")))
            .with_child(WidgetNode::new("label"));
        assert_eq!(tree.node_count(), 4);
    }
}
