//! Site generation: records → pivot → fragments → placeholders → file.
//!
//! The output file is written only once the page is fully rendered.

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::audit::{self, AuditReport};
use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::fragment;
use crate::pivot::{self, SiteModel};
use crate::record::Record;
use crate::retry::RetryPolicy;
use crate::source::{self, RecordSource};
use crate::utils::io;
use crate::utils::normalize::{clean, clean_opt, rating_to_class, rating_to_percent_str};
use crate::utils::template::{self, TemplateVars};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Run the asset audit after writing.
    pub audit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub output_path: String,
    pub records: usize,
    pub products: usize,
    pub ingredients: usize,
    pub reviews: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_placeholders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditReport>,
}

/// Placeholder values for one page.
pub fn build_mapping(model: &SiteModel, config: &SiteConfig, year: i32) -> BTreeMap<String, String> {
    let text = |key: &str| clean_opt(model.text(key));
    let image = |key: &str| clean_opt(model.image(key));

    let mut rating_value = text(TemplateVars::RATING_VALUE);
    if rating_value.is_empty() {
        rating_value = clean(&config.default_rating);
    }

    let entries = [
        (TemplateVars::HERO_HEADLINE, text("hero_headline")),
        (TemplateVars::HERO_LEAD, text("hero_lead")),
        (TemplateVars::HERO_IMAGE_URL, image("hero")),
        (TemplateVars::ABOUT_TEXT, text("about_text")),
        (TemplateVars::ABOUT_IMAGE_URL, image("about")),
        (
            TemplateVars::INGREDIENTS,
            fragment::build_ingredients_html(&model.ingredients),
        ),
        (
            TemplateVars::PRODUCTS,
            fragment::build_products_html(&model.products, &config.cta_label),
        ),
        (TemplateVars::REVIEWS, fragment::build_reviews_html(&model.reviews)),
        (TemplateVars::CONTACT_EMAIL, text("contact_email")),
        (TemplateVars::CONTACT_WWW, text("contact_www")),
        (TemplateVars::YEAR, format!("{:04}", year)),
        (TemplateVars::RATING_PERCENT, rating_to_percent_str(&rating_value)),
        (TemplateVars::RATING_CLASS, rating_to_class(&rating_value)),
        (TemplateVars::RATING_VALUE, rating_value),
    ];

    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Render the template for a record set. Pure apart from the year argument.
pub fn render_site(template_str: &str, records: &[Record], config: &SiteConfig, year: i32) -> String {
    let model = pivot::pivot(records);
    let mapping = build_mapping(&model, config, year);
    template::render_map(template_str, &mapping)
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn read_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::template_not_found(path.display().to_string()));
    }
    io::read_file(path, "read template")
}

/// Advisory audit of the written page. Failures are logged, never returned.
fn audit_output(config: &SiteConfig, output_path: &Path) -> Option<AuditReport> {
    let report = config
        .site_root()
        .and_then(|root| audit::audit_file(output_path, &root));
    match report {
        Ok(report) => {
            log_status!("audit", "{}", report);
            Some(report)
        }
        Err(e) => {
            log_status!("audit", "Skipped: {}", e.message);
            None
        }
    }
}

/// Generate from an explicit source.
pub fn generate_with(
    config: &SiteConfig,
    source: &dyn RecordSource,
    policy: &RetryPolicy,
    options: &GenerateOptions,
) -> Result<GenerateReport> {
    let template_path = config.template_path()?;
    let output_path: PathBuf = config.output_path()?;
    let template_str = read_template(&template_path)?;

    let records = source::fetch_records(source, policy)?;
    let model = pivot::pivot(&records);
    let mapping = build_mapping(&model, config, current_year());
    let html = template::render_map(&template_str, &mapping);

    let unresolved = template::unresolved(&template_str, &mapping);
    if !unresolved.is_empty() {
        log_status!("generate", "Unresolved placeholders left in output: {}", unresolved.join(", "));
    }

    io::write_file_creating_dirs(&output_path, &html, "write generated page")?;
    log_status!("generate", "Wrote {}", output_path.display());

    let audit = if options.audit {
        audit_output(config, &output_path)
    } else {
        None
    };

    Ok(GenerateReport {
        output_path: output_path.display().to_string(),
        records: records.len(),
        products: model.products.len(),
        ingredients: model.ingredients.len(),
        reviews: model.reviews.len(),
        unresolved_placeholders: unresolved,
        audit,
    })
}

/// Generate using the source selected by `config`.
pub fn run(config: &SiteConfig, options: &GenerateOptions) -> Result<GenerateReport> {
    config.validate_for_generate()?;
    let source = source::from_config(config)?;
    generate_with(config, source.as_ref(), &RetryPolicy::api(), options)
}
