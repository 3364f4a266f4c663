use std::sync::OnceLock;

use regex::Regex;

use paperweave_core::PaperweaveError;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap())
}

/// A `{{var}}`-style template. Rendering fails on an unbound placeholder: an
/// agent must never be sent a half-filled prompt.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, PaperweaveError> {
        let pattern = placeholder_pattern();
        for caps in pattern.captures_iter(&self.template) {
            let key = &caps[1];
            if !vars.iter().any(|(name, _)| *name == key) {
                return Err(PaperweaveError::InvalidConfig(format!(
                    "prompt variable '{key}' is not bound"
                )));
            }
        }
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bound_placeholders() {
        let template = PromptTemplate::new("NOTES:\n{{notes}}\n\nSUMMARY:\n{{ summary }}");
        let rendered = template
            .render(&[("notes", "n1"), ("summary", "s1")])
            .unwrap();
        assert_eq!(rendered, "NOTES:\nn1\n\nSUMMARY:\ns1");
    }

    #[test]
    fn missing_variable_is_an_error() {
        let template = PromptTemplate::new("TEXT:\n{{content}}");
        let result = template.render(&[("notes", "n1")]);
        assert!(matches!(result, Err(PaperweaveError::InvalidConfig(_))));
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let template = PromptTemplate::new("no variables here");
        assert_eq!(template.render(&[]).unwrap(), "no variables here");
    }
}
