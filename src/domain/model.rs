use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which catalog a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Product,
    Listing,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Product => write!(f, "product"),
            RecordKind::Listing => write!(f, "listing"),
        }
    }
}

/// A typed record that can be decoded from one line of a catalog file.
pub trait LineRecord: DeserializeOwned {
    const KIND: RecordKind;
    /// Keys that must be present in the JSON object.
    const REQUIRED_FIELDS: &'static [&'static str];
}

/// A canonical product. `manufacturer` is the join key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "scalar_text")]
    pub product_name: String,
    #[serde(deserialize_with = "scalar_text")]
    pub manufacturer: String,
    #[serde(deserialize_with = "scalar_text")]
    pub model: String,
    #[serde(
        default,
        deserialize_with = "optional_scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub family: Option<String>,
    // e.g. 2010-01-06T19:00:00.000-05:00
    #[serde(rename = "announced-date", deserialize_with = "scalar_text")]
    pub announced_date: String,
}

impl LineRecord for Product {
    const KIND: RecordKind = RecordKind::Product;
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["product_name", "manufacturer", "model", "announced-date"];
}

/// A marketplace listing. Serializes to exactly its four public attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(deserialize_with = "scalar_text")]
    pub title: String,
    #[serde(deserialize_with = "scalar_text")]
    pub manufacturer: String,
    #[serde(deserialize_with = "scalar_text")]
    pub currency: String,
    #[serde(deserialize_with = "scalar_text")]
    pub price: String,
}

impl LineRecord for Listing {
    const KIND: RecordKind = RecordKind::Listing;
    const REQUIRED_FIELDS: &'static [&'static str] = &["title", "manufacturer", "currency", "price"];
}

/// Any JSON scalar as text: strings as-is, numbers and booleans in their JSON
/// form, null as the empty string. Arrays and objects are rejected.
fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a scalar value, got {}",
            other
        ))),
    }
}

fn optional_scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a scalar value, got {}",
            other
        ))),
    }
}

/// Either kind of decoded line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Product(Product),
    Listing(Listing),
}

/// Products keyed by manufacturer. One product per key; later inserts win.
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    products: HashMap<String, Product>,
}

impl ProductIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the product's manufacturer, returning the product it replaced.
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        self.products.insert(product.manufacturer.clone(), product)
    }

    pub fn get(&self, manufacturer: &str) -> Option<&Product> {
        self.products.get(manufacturer)
    }

    pub fn contains(&self, manufacturer: &str) -> bool {
        self.products.contains_key(manufacturer)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Listings grouped by manufacturer.
///
/// Manufacturers iterate in the order they were first seen; each group keeps
/// its listings in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ListingIndex {
    order: Vec<String>,
    groups: HashMap<String, Vec<Listing>>,
}

impl ListingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listing: Listing) {
        match self.groups.get_mut(&listing.manufacturer) {
            Some(group) => group.push(listing),
            None => {
                self.order.push(listing.manufacturer.clone());
                self.groups
                    .insert(listing.manufacturer.clone(), vec![listing]);
            }
        }
    }

    pub fn get(&self, manufacturer: &str) -> Option<&[Listing]> {
        self.groups.get(manufacturer).map(Vec::as_slice)
    }

    /// Manufacturers in first-seen order.
    pub fn manufacturers(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of distinct manufacturers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn listing_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Consumes the index, yielding each manufacturer's group in first-seen order.
    pub fn into_groups(self) -> impl Iterator<Item = (String, Vec<Listing>)> {
        let mut groups = self.groups;
        self.order.into_iter().map(move |manufacturer| {
            let listings = groups.remove(&manufacturer).unwrap_or_default();
            (manufacturer, listings)
        })
    }
}

/// One output record: a product name and every listing attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListings {
    pub product_name: String,
    pub listings: Vec<Listing>,
}

/// Product name to listings, in the order entries were first created.
#[derive(Debug, Clone, Default)]
pub struct Association {
    entries: Vec<ProductListings>,
    positions: HashMap<String, usize>,
}

impl Association {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listings` to the entry for `product_name`, creating it if needed.
    pub fn extend(&mut self, product_name: &str, listings: Vec<Listing>) {
        match self.positions.get(product_name) {
            Some(&position) => self.entries[position].listings.extend(listings),
            None => {
                self.positions
                    .insert(product_name.to_string(), self.entries.len());
                self.entries.push(ProductListings {
                    product_name: product_name.to_string(),
                    listings,
                });
            }
        }
    }

    pub fn get(&self, product_name: &str) -> Option<&ProductListings> {
        self.positions
            .get(product_name)
            .map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductListings> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn listing_count(&self) -> usize {
        self.entries.iter().map(|e| e.listings.len()).sum()
    }
}

/// Both catalogs after ingestion, ready to be joined.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub products: ProductIndex,
    pub listings: ListingIndex,
}
