//! Event binding resolution.

use convert_case::{Case, Casing};
use indexmap::IndexSet;
use lvcraft_core::{EventBinding, WidgetNode};

use crate::ids::c_symbol;

/// Recognized event properties and their LVGL event codes, in emission order.
pub const EVENT_TABLE: &[(&str, &str)] = &[
    ("onClick", "LV_EVENT_CLICKED"),
    ("onClicked", "LV_EVENT_CLICKED"),
    ("onValueChanged", "LV_EVENT_VALUE_CHANGED"),
    ("onPressed", "LV_EVENT_PRESSED"),
    ("onReleased", "LV_EVENT_RELEASED"),
    ("onFocus", "LV_EVENT_FOCUSED"),
    ("onFocused", "LV_EVENT_FOCUSED"),
    ("onDefocus", "LV_EVENT_DEFOCUSED"),
    ("onDefocused", "LV_EVENT_DEFOCUSED"),
];

/// Whether the handler is owned by the user or generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Explicit,
    Stub,
}

/// A binding resolved to a concrete handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvent {
    /// LVGL event code, e.g. `LV_EVENT_CLICKED`.
    pub event_code: &'static str,
    /// C function registered for the event.
    pub handler_name: String,
    /// Editable region id inside the stub. Equals the handler name.
    pub region_key: String,
    pub kind: HandlerKind,
}

impl ResolvedEvent {
    pub fn is_stub(&self) -> bool {
        self.kind == HandlerKind::Stub
    }
}

/// `onValueChanged` -> `valueChanged`.
pub fn event_suffix(property: &str) -> String {
    property
        .strip_prefix("on")
        .unwrap_or(property)
        .to_case(Case::Camel)
}

/// Name of the stub generated for `property` on the node `identifier`.
pub fn stub_handler_name(identifier: &str, property: &str) -> String {
    format!("ui_{}_{}", identifier, event_suffix(property))
}

/// Resolve every recognized event declared on `node`.
pub fn resolve_bindings(node: &WidgetNode, identifier: &str) -> Vec<ResolvedEvent> {
    EVENT_TABLE
        .iter()
        .filter_map(|&(property, event_code)| {
            let (handler_name, kind) = match node.event(property) {
                EventBinding::Handler(name) => (c_symbol(name), HandlerKind::Explicit),
                EventBinding::Stub => (stub_handler_name(identifier, property), HandlerKind::Stub),
                EventBinding::None => return None,
            };
            Some(ResolvedEvent {
                event_code,
                region_key: handler_name.clone(),
                handler_name,
                kind,
            })
        })
        .collect()
}

/// Stub handlers collected across a whole tree, first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct StubSet {
    handlers: IndexSet<String>,
}

impl StubSet {
    /// Record a stub. Returns false if a stub with this name already exists.
    pub fn insert(&mut self, event: &ResolvedEvent) -> bool {
        event.is_stub() && self.handlers.insert(event.handler_name.clone())
    }

    /// Handler names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
