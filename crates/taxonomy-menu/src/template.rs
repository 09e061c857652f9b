//! Token templates for menu link titles and descriptions
//!
//! Templates are plain text with `[type:name]` tokens, the same shape the
//! host's token service uses:
//!
//! ```text
//! Template: "[term:name] ([site:name])"
//! With:     term.name = "red", site name = "Paint Shop"
//! Result:   "red (Paint Shop)"
//! ```
//!
//! Tokens the renderer does not know are left verbatim, so a template can be
//! passed through several renderers without losing information.

use indexmap::IndexMap;

use crate::error::Result;
use crate::term::TermNode;

/// Renders a template with a term as substitution context.
pub trait TemplateRenderer {
    /// Render `template` for `term`.
    fn render(&self, template: &str, term: &TermNode) -> Result<String>;
}

/// Token values available while rendering one template.
///
/// Maps a token name such as `term:name` to its replacement text.
#[derive(Clone, Debug, Default)]
pub struct TokenContext {
    tokens: IndexMap<String, String>,
}

impl TokenContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the `term:*` tokens for a term.
    pub fn for_term(term: &TermNode) -> Self {
        let mut ctx = Self::new();
        ctx.bind("term:tid", term.id.to_string());
        ctx.bind("term:name", term.name.clone());
        ctx.bind("term:description", term.description.clone());
        ctx.bind("term:weight", term.weight.to_string());
        ctx.bind("term:vocabulary", term.vocabulary_id.to_string());
        ctx.bind("term:url", term.link_uri());
        ctx
    }

    /// Add or replace a token value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tokens.insert(name.into(), value.into());
    }

    /// Look up a token value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    /// Names of all bound tokens, in binding order.
    pub fn names(&self) -> Vec<&str> {
        self.tokens.keys().map(String::as_str).collect()
    }

    /// Number of bound tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no tokens are bound.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Replace every known `[type:name]` token in `template`.
    pub fn replace(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('[') {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];
            match token_at(candidate) {
                Some((name, len)) => {
                    match self.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&candidate[..len]),
                    }
                    rest = &candidate[len..];
                }
                None => {
                    out.push('[');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl FromIterator<(String, String)> for TokenContext {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut ctx = Self::new();
        for (name, value) in iter {
            ctx.bind(name, value);
        }
        ctx
    }
}

/// Parse a token at the start of `s` (which begins with `[`).
///
/// Returns the token name and the byte length including brackets.
fn token_at(s: &str) -> Option<(&str, usize)> {
    let end = s.find(']')?;
    let name = &s[1..end];
    let (kind, field) = name.split_once(':')?;
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'))
    };
    (valid(kind) && valid(field)).then_some((name, end + 1))
}

/// Default renderer for `term:*` and `site:*` tokens.
#[derive(Clone, Debug, Default)]
pub struct TokenRenderer {
    site_name: Option<String>,
}

impl TokenRenderer {
    /// Create a renderer without site tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide a value for `[site:name]`.
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = Some(name.into());
        self
    }
}

impl TemplateRenderer for TokenRenderer {
    fn render(&self, template: &str, term: &TermNode) -> Result<String> {
        let mut ctx = TokenContext::for_term(term);
        if let Some(site) = &self.site_name {
            ctx.bind("site:name", site.clone());
        }
        Ok(ctx.replace(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> TermNode {
        TermNode::new("colors", 7, "red").with_description("A warm color")
    }

    #[test]
    fn test_render_term_tokens() {
        let renderer = TokenRenderer::new();
        let out = renderer
            .render("[term:name] #[term:tid] in [term:vocabulary]", &red())
            .unwrap();
        assert_eq!(out, "red #7 in colors");
    }

    #[test]
    fn test_render_description_and_url() {
        let renderer = TokenRenderer::new();
        assert_eq!(
            renderer.render("[term:description]", &red()).unwrap(),
            "A warm color"
        );
        assert_eq!(
            renderer.render("[term:url]", &red()).unwrap(),
            "entity:taxonomy_term/7"
        );
    }

    #[test]
    fn test_render_site_name() {
        let renderer = TokenRenderer::new().with_site_name("Paint Shop");
        let out = renderer.render("[term:name] ([site:name])", &red()).unwrap();
        assert_eq!(out, "red (Paint Shop)");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let renderer = TokenRenderer::new();
        let out = renderer.render("[node:title] [term:name]", &red()).unwrap();
        assert_eq!(out, "[node:title] red");
    }

    #[test]
    fn test_site_token_without_site_name_is_kept() {
        let renderer = TokenRenderer::new();
        assert_eq!(renderer.render("[site:name]", &red()).unwrap(), "[site:name]");
    }

    #[test]
    fn test_brackets_that_are_not_tokens() {
        let ctx = TokenContext::for_term(&red());
        assert_eq!(ctx.replace("[x] [term:name"), "[x] [term:name");
        assert_eq!(ctx.replace("[[term:name]]"), "[red]");
        assert_eq!(ctx.replace("[]"), "[]");
    }

    #[test]
    fn test_render_keeps_whitespace() {
        let renderer = TokenRenderer::new();
        let term = TermNode::new("colors", 1, "red");
        assert_eq!(renderer.render("  [term:description]  ", &term).unwrap(), "    ");
        assert_eq!(
            renderer.render(" [term:name]\n", &term).unwrap(),
            " red\n"
        );
    }

    #[test]
    fn test_context_from_iter_keeps_order() {
        let ctx: TokenContext = vec![
            ("b:x".to_string(), "1".to_string()),
            ("a:y".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(ctx.names(), vec!["b:x", "a:y"]);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.replace("[a:y][b:x]"), "21");
    }
}
