//! Template rendering.
//!
//! Rendering is a hook: the engine hands every resolved [`Template`] to a
//! [`Render`] implementation together with a [`RenderContext`]. Applications
//! with their own template language plug in their own renderer.
//!
//! The default [`TemplateRenderer`] understands a small AIML-like subset:
//!
//! ```text
//! <star/>               first wildcard capture
//! <star index="2"/>     n-th wildcard capture (1-based), "" if missing
//! <sr/>                 shorthand for <srai><star/></srai>
//! <srai>TEXT</srai>     re-resolve TEXT through the engine and inline the answer
//! ```
//!
//! Everything else is copied literally and whitespace is collapsed. `<srai>`
//! blocks do not nest; the engine bounds redirect chains by depth.

use crate::Template;

/// Context available while rendering one template.
pub struct RenderContext<'a> {
    input: &'a str,
    captures: &'a [String],
    redirect: Option<&'a dyn Fn(&str) -> String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(input: &'a str, captures: &'a [String]) -> Self {
        RenderContext { input, captures, redirect: None }
    }

    /// Attach the callback used to resolve `<srai>` text.
    pub fn with_redirect(mut self, redirect: &'a dyn Fn(&str) -> String) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// The normalized sentence being answered.
    pub fn input(&self) -> &str {
        self.input
    }

    pub fn captures(&self) -> &[String] {
        self.captures
    }

    /// 1-based wildcard capture; `""` when out of range.
    pub fn star(&self, index: usize) -> &str {
        index.checked_sub(1).and_then(|i| self.captures.get(i)).map(String::as_str).unwrap_or("")
    }

    /// Resolve `text` through the engine, if a redirect is attached.
    pub fn redirect(&self, text: &str) -> Option<String> {
        self.redirect.map(|f| f(text))
    }
}

/// Turns a resolved template into response text.
pub trait Render: Send + Sync {
    fn render(&self, template: &Template, ctx: &RenderContext<'_>) -> String;
}

impl<F> Render for F
where
    F: Fn(&Template, &RenderContext<'_>) -> String + Send + Sync,
{
    fn render(&self, template: &Template, ctx: &RenderContext<'_>) -> String {
        self(template, ctx)
    }
}

/// Default renderer for `<star/>`, `<sr/>` and `<srai>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    fn expand_stars(text: &str, ctx: &RenderContext<'_>) -> String {
        let text = regex!(r"<sr\s*/>").replace_all(text, "<srai><star/></srai>");
        regex!(r#"<star\s*(?:index\s*=\s*"(\d+)"\s*)?/>"#)
            .replace_all(&text, |caps: &regex::Captures| {
                let index = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()).unwrap_or(1);
                ctx.star(index).to_string()
            })
            .into_owned()
    }

    fn expand_redirects(text: &str, ctx: &RenderContext<'_>) -> String {
        regex!(r"(?s)<srai>(.*?)</srai>")
            .replace_all(text, |caps: &regex::Captures| {
                let inner = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                ctx.redirect(inner).unwrap_or_else(|| inner.to_string())
            })
            .into_owned()
    }
}

impl Render for TemplateRenderer {
    fn render(&self, template: &Template, ctx: &RenderContext<'_>) -> String {
        let starred = Self::expand_stars(template.text(), ctx);
        let redirected = Self::expand_redirects(&starred, ctx);
        redirected.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, captures: &[&str]) -> String {
        let captures: Vec<String> = captures.iter().map(|s| s.to_string()).collect();
        let ctx = RenderContext::new("INPUT", &captures);
        TemplateRenderer.render(&Template::new("P", text), &ctx)
    }

    #[test]
    fn plain_text_is_copied_with_whitespace_collapsed() {
        assert_eq!(render("  Hello,\n   world!  ", &[]), "Hello, world!");
    }

    #[test]
    fn stars_expand_by_index() {
        assert_eq!(render("You said <star/>.", &["CATS"]), "You said CATS.");
        assert_eq!(render(r#"<star index="2"/> then <star index="1"/>"#, &["A", "B"]), "B then A");
        assert_eq!(render(r#"[<star index="3"/>]"#, &["A"]), "[]");
        assert_eq!(render("[<star/>]", &[]), "[]");
    }

    #[test]
    fn srai_without_redirect_keeps_inner_text() {
        assert_eq!(render("<srai>HELLO <star/></srai>", &["BOB"]), "HELLO BOB");
    }

    #[test]
    fn srai_and_sr_use_the_redirect() {
        let captures = vec!["THERE".to_string()];
        let redirect = |text: &str| format!("<{text}>");
        let ctx = RenderContext::new("HI THERE", &captures).with_redirect(&redirect);

        let out = TemplateRenderer.render(&Template::new("HI *", "Well: <srai>HELLO <star/></srai>"), &ctx);
        assert_eq!(out, "Well: <HELLO THERE>");

        let out = TemplateRenderer.render(&Template::new("HI *", "<sr/>!"), &ctx);
        assert_eq!(out, "<THERE>!");
    }

    #[test]
    fn closures_are_renderers() {
        let upper = |template: &Template, _: &RenderContext<'_>| template.text().to_uppercase();
        let ctx = RenderContext::new("", &[]);
        assert_eq!(upper.render(&Template::new("P", "shout"), &ctx), "SHOUT");
    }
}
