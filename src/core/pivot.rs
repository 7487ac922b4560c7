//! Group flat records into the site model.
//!
//! `text` and `image` rows are singletons keyed by `key` (last write wins).
//! `product`, `ingredient` and `review` rows are merged field by field into
//! one entity per key; entities come out sorted by key.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::record::{Record, RecordType};

/// One multi-field entity (product, ingredient or review).
pub type Entity = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteModel {
    pub texts: HashMap<String, String>,
    pub images: HashMap<String, String>,
    pub products: Vec<Entity>,
    pub ingredients: Vec<Entity>,
    pub reviews: Vec<Entity>,
}

impl SiteModel {
    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn image(&self, key: &str) -> Option<&str> {
        self.images.get(key).map(String::as_str)
    }
}

fn accumulate(entities: &mut BTreeMap<String, Entity>, record: &Record) {
    let entity = entities.entry(record.key.clone()).or_default();
    if !record.field.is_empty() {
        entity.insert(record.field.clone(), record.value.clone());
    }
}

fn into_sorted(entities: BTreeMap<String, Entity>) -> Vec<Entity> {
    entities.into_values().collect()
}

pub fn pivot(records: &[Record]) -> SiteModel {
    let mut texts = HashMap::new();
    let mut images = HashMap::new();
    let mut products = BTreeMap::new();
    let mut ingredients = BTreeMap::new();
    let mut reviews = BTreeMap::new();

    for record in records {
        if record.key.is_empty() {
            continue;
        }

        match record.record_type {
            RecordType::Text => {
                texts.insert(record.key.clone(), record.value.clone());
            }
            RecordType::Image => {
                if record.field.is_empty() || record.field.eq_ignore_ascii_case("url") {
                    images.insert(record.key.clone(), record.value.clone());
                }
            }
            RecordType::Product => accumulate(&mut products, record),
            RecordType::Ingredient => accumulate(&mut ingredients, record),
            RecordType::Review => accumulate(&mut reviews, record),
        }
    }

    SiteModel {
        texts,
        images,
        products: into_sorted(products),
        ingredients: into_sorted(ingredients),
        reviews: into_sorted(reviews),
    }
}
