//! LVGL C code emitter.
//!
//! Produces the declarations document (`ui.h`) and the implementation
//! document (`ui.c`) for a layout and its shared styles. Output depends only
//! on the inputs: the tree is walked in pre-order and styles keep their
//! collection order.

use lvcraft_core::{Layout, SharedStyle, Styles, WidgetNode};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::Result;
use crate::events::{resolve_bindings, StubSet};
use crate::guards::marker::{region_lines, INIT_REGION};
use crate::ids::{assign_ids, c_identifier, child_path, IdentifierMap, ROOT_PATH};
use crate::templates::{TemplateEngine, HEADER_TEMPLATE};

/// First line of every generated document.
pub const BANNER: &str = "/* Generated by LVCraft - do not edit */";

const INDENT: &str = "  ";

/// Style properties understood by `lv_style_set_*`, in emission order.
pub const STYLE_PROPERTIES: &[&str] = &[
    "bg_color",
    "bg_opa",
    "border_width",
    "border_color",
    "radius",
    "pad_all",
    "text_color",
];

/// Color properties that may be set directly on a widget.
const INLINE_COLOR_PROPERTIES: &[&str] = &["bg_color", "border_color", "text_color"];

/// Widget kinds with a dedicated LVGL constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Obj,
    Button,
    Label,
    Image,
    Slider,
    Bar,
    Switch,
    Checkbox,
    Dropdown,
    Roller,
    Textarea,
    Canvas,
    Arc,
    Spinner,
}

impl WidgetKind {
    /// Classify a widget type tag. Unknown types are plain objects.
    pub fn from_type(widget_type: &str) -> Self {
        match widget_type.to_ascii_lowercase().as_str() {
            "btn" | "button" => Self::Button,
            "label" => Self::Label,
            "img" | "image" => Self::Image,
            "slider" => Self::Slider,
            "bar" => Self::Bar,
            "switch" => Self::Switch,
            "checkbox" => Self::Checkbox,
            "dropdown" => Self::Dropdown,
            "roller" => Self::Roller,
            "textarea" => Self::Textarea,
            "canvas" => Self::Canvas,
            "arc" => Self::Arc,
            "spinner" => Self::Spinner,
            _ => Self::Obj,
        }
    }

    /// LVGL constructor for this kind.
    pub fn create_fn(self) -> &'static str {
        match self {
            Self::Obj => "lv_obj_create",
            Self::Button => "lv_btn_create",
            Self::Label => "lv_label_create",
            Self::Image => "lv_img_create",
            Self::Slider => "lv_slider_create",
            Self::Bar => "lv_bar_create",
            Self::Switch => "lv_switch_create",
            Self::Checkbox => "lv_checkbox_create",
            Self::Dropdown => "lv_dropdown_create",
            Self::Roller => "lv_roller_create",
            Self::Textarea => "lv_textarea_create",
            Self::Canvas => "lv_canvas_create",
            Self::Arc => "lv_arc_create",
            Self::Spinner => "lv_spinner_create",
        }
    }

    fn text_setter(self) -> Option<&'static str> {
        match self {
            Self::Label => Some("lv_label_set_text"),
            Self::Checkbox => Some("lv_checkbox_set_text"),
            Self::Textarea => Some("lv_textarea_set_text"),
            _ => None,
        }
    }

    /// Prefix of the `_set_range` / `_set_value` functions.
    fn value_widget(self) -> Option<&'static str> {
        match self {
            Self::Slider => Some("lv_slider"),
            Self::Bar => Some("lv_bar"),
            Self::Arc => Some("lv_arc"),
            _ => None,
        }
    }
}

/// Whether a numeric property holds an RGB color.
pub fn is_color_property(key: &str) -> bool {
    key == "color" || key.ends_with("_color")
}

/// Plain decimal; integral values print without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// `lv_color_hex(0xrrggbb)`, lowercase and at least six digits wide.
pub fn format_color(n: f64) -> String {
    format!("lv_color_hex(0x{:06x})", n as u32)
}

/// Render a numeric property value for the given key.
pub fn format_value(key: &str, n: f64) -> String {
    if is_color_property(key) {
        format_color(n)
    } else {
        format_number(n)
    }
}

/// C variable holding a shared style.
pub fn style_var(style_id: &str) -> String {
    format!("ui_style_{}", c_identifier(style_id))
}

/// C variable holding a widget.
pub fn widget_var(identifier: &str) -> String {
    format!("ui_{identifier}")
}

/// Emitter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// File name of the declarations document, included by the source.
    pub header_name: String,
    /// File name of the implementation document.
    pub source_name: String,
    /// Name of the generated initializer.
    pub init_fn: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            header_name: "ui.h".to_string(),
            source_name: "ui.c".to_string(),
            init_fn: "ui_init".to_string(),
        }
    }
}

/// Output of one emission pass.
#[derive(Debug, Clone)]
pub struct EmittedDocuments {
    /// Declarations document.
    pub header: String,
    /// Implementation document, with empty editable regions.
    pub source: String,
    /// Identifiers assigned to the tree.
    pub identifiers: IdentifierMap,
    /// Stub handlers generated, in emission order.
    pub stubs: Vec<String>,
}

/// Walks a layout and writes LVGL C code.
pub struct Emitter<'a> {
    options: EmitOptions,
    templates: TemplateEngine<'a>,
}

impl<'a> Emitter<'a> {
    /// Create an emitter.
    pub fn new(options: EmitOptions) -> Result<Self> {
        Ok(Self {
            options,
            templates: TemplateEngine::new()?,
        })
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Emit both documents.
    pub fn emit(&self, layout: &Layout, styles: &Styles) -> Result<EmittedDocuments> {
        let root = layout.root.as_ref();
        let identifiers = assign_ids(root);
        for dup in identifiers.duplicates() {
            warn!(identifier = dup, "identifier used by more than one widget");
        }

        let mut construction = Vec::new();
        let mut stubs = StubSet::default();
        if let Some(root) = root {
            let ctx = WalkContext {
                identifiers: &identifiers,
                styles,
            };
            ctx.walk(root, ROOT_PATH.to_string(), "NULL", &mut construction, &mut stubs);
        }

        let header = self.emit_header(styles, &identifiers)?;
        let source = self.emit_source(root.is_some(), styles, &identifiers, &stubs, construction)?;

        debug!(
            widgets = identifiers.len(),
            styles = styles.named().count(),
            stubs = stubs.len(),
            "emitted documents"
        );

        Ok(EmittedDocuments {
            header,
            source,
            identifiers,
            stubs: stubs.iter().map(str::to_string).collect(),
        })
    }

    fn emit_header(&self, styles: &Styles, identifiers: &IdentifierMap) -> Result<String> {
        let mut declarations = String::new();

        let style_decls: Vec<String> = styles
            .named()
            .map(|s| format!("extern lv_style_t {};", style_var(&s.id)))
            .collect();
        let widget_decls: Vec<String> = identifiers
            .identifiers()
            .map(|id| format!("extern lv_obj_t *{};", widget_var(id)))
            .collect();

        for group in [style_decls, widget_decls] {
            if !group.is_empty() {
                declarations.push_str(&group.join("\n"));
                declarations.push_str("\n\n");
            }
        }

        self.templates.render(
            HEADER_TEMPLATE,
            &json!({
                "banner": BANNER,
                "header": self.options.header_name,
                "declarations": declarations,
                "init_fn": self.options.init_fn,
            }),
        )
    }

    fn emit_source(
        &self,
        has_root: bool,
        styles: &Styles,
        identifiers: &IdentifierMap,
        stubs: &StubSet,
        construction: Vec<String>,
    ) -> Result<String> {
        let mut lines = vec![
            BANNER.to_string(),
            format!("#include \"{}\"", self.options.header_name),
            String::new(),
        ];

        // Storage
        let named: Vec<&SharedStyle> = styles.named().collect();
        if !named.is_empty() {
            lines.extend(named.iter().map(|s| format!("lv_style_t {};", style_var(&s.id))));
            lines.push(String::new());
        }
        if !identifiers.is_empty() {
            lines.extend(
                identifiers
                    .identifiers()
                    .map(|id| format!("lv_obj_t *{} = NULL;", widget_var(id))),
            );
            lines.push(String::new());
        }

        // Stub handlers
        for handler in stubs.iter() {
            lines.push(format!("static void {handler}(lv_event_t * e) {{"));
            lines.push(format!("{INDENT}lv_obj_t * obj = lv_event_get_target(e);"));
            lines.push(format!("{INDENT}LV_UNUSED(obj);"));
            lines.extend(region_lines(handler, INDENT)?);
            lines.push("}".to_string());
            lines.push(String::new());
        }

        // Initializer
        lines.push(format!("void {}(void)", self.options.init_fn));
        lines.push("{".to_string());
        for style in &named {
            lines.extend(style_statements(style));
            lines.push(String::new());
        }
        if has_root {
            lines.extend(construction);
        } else {
            lines.push(format!("{INDENT}/* Empty layout */"));
        }
        lines.extend(region_lines(INIT_REGION, INDENT)?);
        lines.push("}".to_string());

        let mut source = lines.join("\n");
        source.push('\n');
        Ok(source)
    }
}

/// `lv_style_init` followed by one setter per present property.
fn style_statements(style: &SharedStyle) -> Vec<String> {
    let var = style_var(&style.id);
    let mut lines = vec![format!("{INDENT}lv_style_init(&{var});")];
    for &key in STYLE_PROPERTIES {
        if let Some(n) = style.number(key) {
            lines.push(format!(
                "{INDENT}lv_style_set_{key}(&{var}, {});",
                format_value(key, n)
            ));
        }
    }
    lines
}

/// Setters for the widget's own properties.
fn property_statements(node: &WidgetNode, kind: WidgetKind, var: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let (x, y) = (node.get_number("x"), node.get_number("y"));
    if x.is_some() || y.is_some() {
        lines.push(format!(
            "{INDENT}lv_obj_set_pos({var}, {}, {});",
            format_number(x.unwrap_or(0.0)),
            format_number(y.unwrap_or(0.0))
        ));
    }

    match (node.get_number("width"), node.get_number("height")) {
        (Some(w), Some(h)) => lines.push(format!(
            "{INDENT}lv_obj_set_size({var}, {}, {});",
            format_number(w),
            format_number(h)
        )),
        (Some(w), None) => {
            lines.push(format!("{INDENT}lv_obj_set_width({var}, {});", format_number(w)))
        }
        (None, Some(h)) => {
            lines.push(format!("{INDENT}lv_obj_set_height({var}, {});", format_number(h)))
        }
        (None, None) => {}
    }

    // Strings go in verbatim.
    if let (Some(setter), Some(text)) = (kind.text_setter(), node.get_str("text")) {
        lines.push(format!("{INDENT}{setter}({var}, \"{text}\");"));
    }

    if let Some(prefix) = kind.value_widget() {
        if let (Some(min), Some(max)) = (node.get_number("min"), node.get_number("max")) {
            lines.push(format!(
                "{INDENT}{prefix}_set_range({var}, {}, {});",
                format_number(min),
                format_number(max)
            ));
        }
        if let Some(value) = node.get_number("value") {
            let anim = if kind == WidgetKind::Arc { "" } else { ", LV_ANIM_OFF" };
            lines.push(format!(
                "{INDENT}{prefix}_set_value({var}, {}{anim});",
                format_number(value)
            ));
        }
    }

    for &key in INLINE_COLOR_PROPERTIES {
        if let Some(n) = node.get_number(key) {
            lines.push(format!(
                "{INDENT}lv_obj_set_style_{key}({var}, {}, 0);",
                format_color(n)
            ));
        }
    }

    lines
}

struct WalkContext<'m> {
    identifiers: &'m IdentifierMap,
    styles: &'m Styles,
}

impl WalkContext<'_> {
    /// Emit construction for `node` and its subtree.
    ///
    /// Stubs are recorded on entry so their order follows pre-order, while
    /// the node's event registrations are written after its children.
    fn walk(
        &self,
        node: &WidgetNode,
        path: String,
        parent_var: &str,
        lines: &mut Vec<String>,
        stubs: &mut StubSet,
    ) {
        let Some(identifier) = self.identifiers.get(&path) else {
            return;
        };
        let var = widget_var(identifier);
        let kind = WidgetKind::from_type(&node.widget_type);

        let events = resolve_bindings(node, identifier);
        for event in &events {
            stubs.insert(event);
        }

        lines.push(format!("{INDENT}{var} = {}({parent_var});", kind.create_fn()));

        if let Some(style_id) = node.style_id.as_deref() {
            if self.styles.get(style_id).is_some() {
                let style = style_var(style_id);
                lines.push(format!("{INDENT}lv_obj_add_style({var}, &{style}, 0);"));
            } else {
                debug!(widget = identifier, style = style_id, "unknown style reference");
            }
        }

        lines.extend(property_statements(node, kind, &var));

        for (i, child) in node.children.iter().enumerate() {
            self.walk(child, child_path(&path, i), &var, lines, stubs);
        }

        for event in &events {
            lines.push(format!(
                "{INDENT}lv_obj_add_event_cb({var}, {}, {}, NULL);",
                event.handler_name, event.event_code
            ));
        }
    }
}
