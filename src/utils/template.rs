//! String template rendering utilities.
//!
//! Placeholders are literal `{{name}}` tokens. Substitution is a single pass
//! over the template: inserted values are never rescanned, unknown tokens are
//! left as-is and nothing is escaped.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub struct TemplateVars;

impl TemplateVars {
    pub const HERO_HEADLINE: &'static str = "hero_headline";
    pub const HERO_LEAD: &'static str = "hero_lead";
    pub const HERO_IMAGE_URL: &'static str = "hero_image_url";
    pub const ABOUT_TEXT: &'static str = "about_text";
    pub const ABOUT_IMAGE_URL: &'static str = "about_image_url";
    pub const INGREDIENTS: &'static str = "ingredients";
    pub const PRODUCTS: &'static str = "products";
    pub const REVIEWS: &'static str = "reviews";
    pub const CONTACT_EMAIL: &'static str = "contact_email";
    pub const CONTACT_WWW: &'static str = "contact_www";
    pub const YEAR: &'static str = "year";
    pub const RATING_VALUE: &'static str = "rating_value";
    pub const RATING_PERCENT: &'static str = "rating_percent";
    pub const RATING_CLASS: &'static str = "rating_class";
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("placeholder pattern is valid"))
}

pub fn render_map(template: &str, variables: &BTreeMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            variables
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Placeholder names in the template that have no entry in `variables`.
pub fn unresolved(template: &str, variables: &BTreeMap<String, String>) -> Vec<String> {
    let mut names: Vec<String> = placeholder_regex()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|name| !variables.contains_key(name))
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_known_tokens() {
        let out = render_map("<h1>{{title}}</h1>{{title}}", &vars(&[("title", "Hi")]));
        assert_eq!(out, "<h1>Hi</h1>Hi");
    }

    #[test]
    fn leaves_unknown_tokens() {
        let out = render_map("a {{unknown}} b", &vars(&[("known", "x")]));
        assert_eq!(out, "a {{unknown}} b");
    }

    #[test]
    fn is_case_sensitive() {
        let out = render_map("{{Name}} {{name}}", &vars(&[("name", "x")]));
        assert_eq!(out, "{{Name}} x");
    }

    #[test]
    fn does_not_rescan_inserted_values() {
        let out = render_map(
            "{{a}}|{{b}}",
            &vars(&[("a", "{{b}}"), ("b", "B")]),
        );
        assert_eq!(out, "{{b}}|B");
    }

    #[test]
    fn inserts_html_verbatim() {
        let out = render_map("{{x}}", &vars(&[("x", "<b>&</b>")]));
        assert_eq!(out, "<b>&</b>");
    }

    #[test]
    fn reports_unresolved_names() {
        let names = unresolved("{{a}} {{b}} {{a}} {{c}}", &vars(&[("b", "")]));
        assert_eq!(names, vec!["a".to_string(), "c".to_string()]);
    }
}
