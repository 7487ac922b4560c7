//! HTML fragments for the entity collections.
//!
//! Each builder is a pure function from a sorted entity list to a string.
//! Cards are joined with `\n`; an empty list renders as an empty string.
//! Values are inserted as-is: the sheet is trusted content.

use crate::pivot::Entity;
use crate::utils::normalize::{clean_opt, review_percent};

fn field(entity: &Entity, name: &str) -> String {
    clean_opt(entity.get(name).map(String::as_str))
}

pub fn build_products_html(items: &[Entity], cta_label: &str) -> String {
    items
        .iter()
        .map(|p| {
            let title = field(p, "title");
            let subtitle = field(p, "subtitle");
            let img_url = field(p, "img_url");
            let amazon_url = field(p, "amazon_url");

            let button = if amazon_url.is_empty() {
                String::new()
            } else {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                    amazon_url, cta_label
                )
            };

            format!(
                concat!(
                    r#"<div class="product-card">"#,
                    r#"  <div class="img-frame img-4x5">"#,
                    r#"    <img src="{img}" alt="{title}" loading="lazy" decoding="async" width="800" height="1000">"#,
                    r#"  </div>"#,
                    r#"  <h3>{title}</h3>"#,
                    r#"  <p>{subtitle}</p>"#,
                    r#"  {button}"#,
                    r#"</div>"#,
                ),
                img = img_url,
                title = title,
                subtitle = subtitle,
                button = button,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_ingredients_html(items: &[Entity]) -> String {
    items
        .iter()
        .map(|ing| {
            let name = field(ing, "name");
            let blurb = field(ing, "blurb");
            let img_url = field(ing, "img_url");

            format!(
                concat!(
                    r#"<div class="ingredient">"#,
                    r#"  <div class="img-frame img-1x1">"#,
                    r#"    <img src="{img}" alt="{name}" loading="lazy" decoding="async" width="800" height="800">"#,
                    r#"  </div>"#,
                    r#"  <h3>{name}</h3>"#,
                    r#"  <p>{blurb}</p>"#,
                    r#"</div>"#,
                ),
                img = img_url,
                name = name,
                blurb = blurb,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"author - locale"`, without a dangling hyphen when either side is blank.
pub fn review_attribution(author: &str, locale: &str) -> String {
    [author, "-", locale]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == ' ' || c == '-')
        .to_string()
}

pub fn build_reviews_html(items: &[Entity]) -> String {
    items
        .iter()
        .map(|r| {
            let text = field(r, "text");
            let author = field(r, "author");
            let locale = field(r, "locale");
            let rating = field(r, "rating");

            format!(
                r#"
<div class="review" style="--percent:{percent}%">
  <div class="value-with-stars">
    <span class="stars"></span>
    <span class="rating-value">{rating}</span>
  </div>
  <p>{text}</p>
  <div class="author">{who}</div>
</div>
"#,
                percent = review_percent(&rating),
                rating = rating,
                text = text,
                who = review_attribution(&author, &locale),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
