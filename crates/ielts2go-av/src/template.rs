//! Variable substitution for text templates.

use std::collections::HashMap;

/// Variable substitution context for static text templates.
///
/// Supports variable substitution in strings using the `{varname}` syntax.
/// Braces that do not name a registered variable are left untouched, so
/// templates may freely contain CSS and JavaScript blocks. Substitution is a
/// single left-to-right pass: substituted values are never rescanned.
///
/// # Example
///
/// ```
/// use ielts2go_av::TemplateContext;
///
/// let ctx = TemplateContext::new()
///     .with_var("prefix", "lesson")
///     .with_var("segment_length", "4");
///
/// assert_eq!(ctx.substitute("{prefix}_master.m3u8"), "lesson_master.m3u8");
/// assert_eq!(ctx.substitute("body { margin: 0 }"), "body { margin: 0 }");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateContext {
    vars: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty template context.
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Add a variable.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Substitute variables in a string.
    pub fn substitute(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let known = after
                .find('}')
                .and_then(|close| self.vars.get(&after[..close]).map(|v| (close, v)));
            match known {
                Some((close, value)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::new()
    }
}
