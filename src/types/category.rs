use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, Ord, PartialOrd, Deserialize, PartialEq)]
pub struct CategoryId(pub i32);

/// How a client names a category: by its id, or by its `type` string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCategoryRef")]
pub enum CategoryRef {
    ById(CategoryId),
    ByType(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryRef {
    Id(i32),
    Text(String),
}

impl From<RawCategoryRef> for CategoryRef {
    fn from(raw: RawCategoryRef) -> Self {
        match raw {
            RawCategoryRef::Id(id) => CategoryRef::ById(CategoryId(id)),
            RawCategoryRef::Text(text) => CategoryRef::parse(&text),
        }
    }
}

impl CategoryRef {
    /// A segment made only of ASCII digits names an id, anything else a type.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse::<i32>() {
                return CategoryRef::ById(CategoryId(id));
            }
        }
        CategoryRef::ByType(raw.to_string())
    }
}

impl std::fmt::Display for CategoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CategoryRef::ById(id) => write!(f, "{}", id.0),
            CategoryRef::ByType(kind) => write!(f, "{}", kind),
        }
    }
}

/// The `{id: type}` map the listings return.
pub fn category_map(categories: &[Category]) -> BTreeMap<i32, String> {
    categories
        .iter()
        .map(|category| (category.id.0, category.kind.clone()))
        .collect()
}
