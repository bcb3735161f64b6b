//! Template engine for code generation.

use crate::error::{CodegenError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Name of the declarations document template.
pub const HEADER_TEMPLATE: &str = "lvgl_header";

const HEADER_SOURCE: &str = "{{{banner}}}
#ifndef {{include_guard header}}
#define {{include_guard header}}

#include \"lvgl.h\"

{{{declarations}}}void {{init_fn}}(void);

#endif
";

/// Template engine using Handlebars.
///
/// Output is C source, so HTML escaping is disabled and missing variables
/// are an error rather than an empty string.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Create a template engine with the built-in templates registered.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        Self::register_helpers(&mut handlebars);

        let mut engine = Self { handlebars };
        engine.register_template(HEADER_TEMPLATE, HEADER_SOURCE)?;
        Ok(engine)
    }

    /// Register a template.
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(CodegenError::InvalidTemplate)?;
        Ok(())
    }

    /// Render a template.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        if !self.handlebars.has_template(name) {
            return Err(CodegenError::TemplateNotFound(name.to_string()));
        }
        self.handlebars
            .render(name, data)
            .map_err(CodegenError::TemplateError)
    }

    /// Register custom helpers.
    fn register_helpers(handlebars: &mut Handlebars) {
        // `ui.h` -> `UI_H`
        handlebars.register_helper(
            "include_guard",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let param = h
                        .param(0)
                        .and_then(|v| v.value().as_str())
                        .unwrap_or("");
                    out.write(&include_guard(param))?;
                    Ok(())
                },
            ),
        );
    }
}

/// Preprocessor guard symbol for a header file name.
pub fn include_guard(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
