//! Template identity, bodies, and the substitution context.
//!
//! Templates in Trestle are flat text files addressed by an id that mirrors
//! their location in the template source (`config/smtp.rb`,
//! `partials/_flashes.html.erb`). Rendering is plain `{{VARIABLE}}`
//! substitution driven by a [`RenderContext`] derived from the run's
//! [`Configuration`](super::configuration::Configuration).
//!
//! ```text
//! TemplateStore ──get(id)──▶ TemplateBody ──render(ctx)──▶ String ──▶ Filesystem
//! ```

use std::collections::HashMap;
use std::fmt;

/// Identifier of a template body inside a template store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw template content as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBody {
    pub id: TemplateId,
    pub content: String,
}

impl TemplateBody {
    pub fn new(id: impl Into<TemplateId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Whether the body contains any `{{...}}` placeholder at all.
    pub fn is_parameterized(&self) -> bool {
        self.content.contains("{{") && self.content.contains("}}")
    }
}

/// Context for template rendering and command argument substitution.
///
/// Immutable after creation; `with_variable` consumes and returns a new
/// context.
///
/// ## Built-in Variables
///
/// | Variable | Example |
/// |----------|---------|
/// | `APP_NAME` | "Corner Shop" |
/// | `APP_NAME_SNAKE` | "corner_shop" |
/// | `APP_NAME_KEBAB` | "corner-shop" |
/// | `APP_NAME_PASCAL` | "CornerShop" |
///
/// Option-derived variables (`DATABASE`, `DEPLOY_FLAGS`, ...) are added by
/// `Configuration::render_context`.
#[derive(Debug, Clone)]
pub struct RenderContext {
    app_name: String,
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(app_name: impl Into<String>) -> Self {
        let name = app_name.into();
        let mut vars = HashMap::new();

        vars.insert("APP_NAME".to_string(), name.clone());
        vars.insert("APP_NAME_SNAKE".to_string(), to_snake_case(&name));
        vars.insert("APP_NAME_KEBAB".to_string(), to_kebab_case(&name));
        vars.insert("APP_NAME_PASCAL".to_string(), to_pascal_case(&name));

        Self {
            app_name: name,
            variables: vars,
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every `{{VARIABLE}}` placeholder in one left-to-right pass.
    ///
    /// - `{{UNKNOWN}}` stays as literal text.
    /// - Substituted values are never rescanned, so a value that itself
    ///   contains `{{X}}` is written verbatim.
    /// - ERB tags (`<%= ... %>`) pass through untouched.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            match after_open.find("}}") {
                Some(end) => {
                    let key = after_open[..end].trim();
                    match self.variables.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("{{");
                            out.push_str(&after_open[..end]);
                            out.push_str("}}");
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// `"corner-shop"` → `"CornerShop"`; used for the Ruby application module.
fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split on `_`, `-`, whitespace, camelCase transitions and acronym
/// boundaries (`HTTPServer` → `http`, `server`). Words come back lowercase.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            let lower_to_upper = c.is_lowercase() && next.is_uppercase();
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase());

            if lower_to_upper || acronym_end {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_case_variants() {
        let ctx = RenderContext::new("corner shop");
        assert_eq!(ctx.get("APP_NAME_SNAKE"), Some("corner_shop"));
        assert_eq!(ctx.get("APP_NAME_KEBAB"), Some("corner-shop"));
        assert_eq!(ctx.get("APP_NAME_PASCAL"), Some("CornerShop"));
    }

    #[test]
    fn acronyms_split_cleanly() {
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_pascal_case("myApp"), "MyApp");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let ctx = RenderContext::new("shop");
        assert_eq!(ctx.render("{{APP_NAME}} {{NOPE}}"), "shop {{NOPE}}");
    }

    #[test]
    fn render_does_not_rescan_values() {
        let ctx = RenderContext::new("shop").with_variable("DEPLOY_FLAGS", "{{APP_NAME}}");
        assert_eq!(ctx.render("x {{DEPLOY_FLAGS}}"), "x {{APP_NAME}}");
    }

    #[test]
    fn render_passes_erb_through() {
        let ctx = RenderContext::new("shop");
        let erb = "<title><%= title %> | {{APP_NAME_PASCAL}}</title>";
        assert_eq!(ctx.render(erb), "<title><%= title %> | Shop</title>");
    }

    #[test]
    fn render_tolerates_unclosed_braces() {
        let ctx = RenderContext::new("shop");
        assert_eq!(ctx.render("a {{APP_NAME"), "a {{APP_NAME");
    }

    #[test]
    fn body_detects_placeholders() {
        assert!(TemplateBody::new("a", "{{APP_NAME}}").is_parameterized());
        assert!(!TemplateBody::new("a", "plain").is_parameterized());
    }
}
