//! Identifier assignment.
//!
//! Every node of a widget tree gets a C identifier keyed by its tree path.
//! Paths are `root` for the root and `<parent>_<index>` for children, so they
//! are unique by construction and synthesized identifiers inherit that. User
//! ids can still imitate a synthesized name; those collisions are resolved in
//! favour of the user id.

use indexmap::{IndexMap, IndexSet};
use lvcraft_core::WidgetNode;
use tracing::debug;

/// Path of the root node.
pub const ROOT_PATH: &str = "root";

/// Normalize arbitrary text into a lowercase C identifier.
///
/// Runs of characters outside `[A-Za-z0-9]` become a single `_`, leading and
/// trailing separators are dropped and a leading digit is escaped with `_`.
/// Empty input yields `obj`.
pub fn c_identifier(s: &str) -> String {
    escape_leading_digit(collapse_separators(s).to_lowercase())
}

/// Like [`c_identifier`] but keeps the original letter case.
///
/// Used for handler names the user owns, which must match their own
/// definition verbatim.
pub fn c_symbol(s: &str) -> String {
    escape_leading_digit(collapse_separators(s))
}

fn collapse_separators(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("obj");
    }
    out
}

fn escape_leading_digit(s: String) -> String {
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{s}")
    } else {
        s
    }
}

/// Path of the `index`-th child of the node at `parent`.
pub fn child_path(parent: &str, index: usize) -> String {
    format!("{parent}_{index}")
}

/// Tree path to identifier, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    ids: IndexMap<String, String>,
}

impl IdentifierMap {
    /// Identifier assigned to the node at `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.ids.get(path).map(String::as_str)
    }

    /// `(path, identifier)` pairs in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids.iter().map(|(p, id)| (p.as_str(), id.as_str()))
    }

    /// Identifiers in pre-order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.ids.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers claimed by more than one node.
    ///
    /// Only user supplied ids can collide. They are kept as written; the
    /// C compiler reports the redefinition.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for id in self.identifiers() {
            *counts.entry(id).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Assign an identifier to every node reachable from `root`.
///
/// A node with a user id gets `c_identifier(id)`; any other node gets
/// `<type>_<path>`. When a user id takes a synthesized name, the synthesized
/// one gets the first free `_<n>` suffix. Only identical user ids share an
/// identifier.
pub fn assign_ids(root: Option<&WidgetNode>) -> IdentifierMap {
    let mut map = IdentifierMap::default();
    let Some(root) = root else {
        return map;
    };

    let mut names = Names::default();
    names.collect(root, ROOT_PATH.to_string());
    assign(root, ROOT_PATH.to_string(), &mut names, &mut map);
    map
}

fn synthesized(node: &WidgetNode, path: &str) -> String {
    format!("{}_{}", c_identifier(&node.widget_type), path)
}

/// Names already claimed in a tree.
#[derive(Default)]
struct Names {
    user: IndexSet<String>,
    synthesized: IndexSet<String>,
    suffixed: IndexSet<String>,
}

impl Names {
    fn collect(&mut self, node: &WidgetNode, path: String) {
        match node.user_id() {
            Some(user_id) => self.user.insert(c_identifier(user_id)),
            None => self.synthesized.insert(synthesized(node, &path)),
        };
        for (i, child) in node.children.iter().enumerate() {
            self.collect(child, child_path(&path, i));
        }
    }

    fn is_taken(&self, name: &str) -> bool {
        self.user.contains(name) || self.synthesized.contains(name) || self.suffixed.contains(name)
    }

    /// `base` unless a user id claims it, else the first free `base_<n>`.
    fn resolve(&mut self, base: String) -> String {
        if !self.user.contains(&base) {
            return base;
        }
        let name = (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.is_taken(candidate))
            .unwrap_or_else(|| base.clone());
        debug!(identifier = %name, "synthesized identifier renamed to avoid a user id");
        self.suffixed.insert(name.clone());
        name
    }
}

fn assign(node: &WidgetNode, path: String, names: &mut Names, map: &mut IdentifierMap) {
    let id = match node.user_id() {
        Some(user_id) => c_identifier(user_id),
        None => names.resolve(synthesized(node, &path)),
    };
    map.ids.insert(path.clone(), id);

    for (i, child) in node.children.iter().enumerate() {
        assign(child, child_path(&path, i), names, map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_identifier() {
        assert_eq!(c_identifier("Main Screen"), "main_screen");
        assert_eq!(c_identifier("ok--button!!"), "ok_button");
        assert_eq!(c_identifier("__x__"), "x");
        assert_eq!(c_identifier("3d-view"), "_3d_view");
        assert_eq!(c_identifier("!!!"), "obj");
        assert_eq!(c_identifier(""), "obj");
    }

    #[test]
    fn test_c_symbol_keeps_case() {
        assert_eq!(c_symbol("mySliderHandler"), "mySliderHandler");
        assert_eq!(c_symbol("on-Tap handler"), "on_Tap_handler");
        assert_eq!(c_symbol("1st"), "_1st");
    }

    #[test]
    fn test_assign_ids_preorder() {
        let tree = WidgetNode::new("obj")
            .with_child(
                WidgetNode::new("Button")
                    .with_child(WidgetNode::new("label")),
            )
            .with_child(WidgetNode::new("slider").with_id("Volume Slider"));

        let map = assign_ids(Some(&tree));
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("root", "obj_root"),
                ("root_0", "button_root_0"),
                ("root_0_0", "label_root_0_0"),
                ("root_1", "volume_slider"),
            ]
        );
    }

    #[test]
    fn test_assign_ids_empty_root() {
        assert!(assign_ids(None).is_empty());
    }

    #[test]
    fn test_empty_user_id_is_synthesized() {
        let tree = WidgetNode::new("label").with_id("");
        assert_eq!(assign_ids(Some(&tree)).get("root"), Some("label_root"));
    }

    #[test]
    fn test_duplicate_user_ids_are_kept() {
        let tree = WidgetNode::new("obj")
            .with_child(WidgetNode::new("button").with_id("ok"))
            .with_child(WidgetNode::new("button").with_id("OK"));

        let map = assign_ids(Some(&tree));
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("root_0"), Some("ok"));
        assert_eq!(map.get("root_1"), Some("ok"));
        assert_eq!(map.duplicates(), vec!["ok"]);
    }

    #[test]
    fn test_user_id_imitating_synthesized_name() {
        let tree = WidgetNode::new("obj")
            .with_child(WidgetNode::new("button").with_id("label_root_1"))
            .with_child(WidgetNode::new("label"));

        let map = assign_ids(Some(&tree));
        assert_eq!(map.get("root_0"), Some("label_root_1"));
        assert_eq!(map.get("root_1"), Some("label_root_1_1"));
        assert!(map.duplicates().is_empty());
    }

    #[test]
    fn test_suffix_skips_names_in_use() {
        // `label_root_1_1` is synthesized and `label_root_1_2` is a user id.
        let tree = WidgetNode::new("obj")
            .with_child(WidgetNode::new("button").with_id("label_root_1"))
            .with_child(
                WidgetNode::new("label")
                    .with_child(WidgetNode::new("label"))
                    .with_child(WidgetNode::new("label")),
            )
            .with_child(WidgetNode::new("switch").with_id("label_root_1_2"));

        let map = assign_ids(Some(&tree));
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("root", "obj_root"),
                ("root_0", "label_root_1"),
                ("root_1", "label_root_1_3"),
                ("root_1_0", "label_root_1_0"),
                ("root_1_1", "label_root_1_1"),
                ("root_2", "label_root_1_2"),
            ]
        );
    }
}
