//! Simple variable substitution renderer.

use trestle_core::{
    application::ports::TemplateRenderer,
    domain::{RenderContext, TemplateBody},
    error::TrestleResult,
};
use tracing::{instrument, trace};

/// Simple renderer using `{{VARIABLE}}` substitution.
///
/// Bodies without placeholders are returned verbatim, so ERB and YAML pass
/// through untouched.
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.id))]
    fn render(&self, template: &TemplateBody, context: &RenderContext) -> TrestleResult<String> {
        if !template.is_parameterized() {
            trace!("Literal template");
            return Ok(template.content.clone());
        }
        Ok(context.render(&template.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_context_variables() {
        let body = TemplateBody::new("ruby-version", "{{RUBY_VERSION}}\n");
        let ctx = RenderContext::new("shop").with_variable("RUBY_VERSION", "3.3.0");
        assert_eq!(SimpleRenderer::new().render(&body, &ctx).unwrap(), "3.3.0\n");
    }

    #[test]
    fn rendering_is_deterministic() {
        let body = TemplateBody::new("x", "<%= yield %> {{APP_NAME_PASCAL}}");
        let ctx = RenderContext::new("corner-shop");
        let renderer = SimpleRenderer::new();
        assert_eq!(
            renderer.render(&body, &ctx).unwrap(),
            renderer.render(&body, &ctx).unwrap()
        );
    }
}
