//! Collection item types
//!
//! `Keyed` is the seam the store is generic over; `CollectionItem` is the
//! wishlist's concrete item. Unknown JSON fields are kept in `extra` so a
//! slot written by a newer (or older) shape survives a read-modify-write.
//! Known scalar fields read leniently: `null` or a value of the wrong type
//! falls back to the field's default instead of failing the whole item.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// An item with a unique key within its collection
pub trait Keyed {
    type Key: PartialEq + Clone + Debug;

    /// The key uniqueness is enforced on
    fn key(&self) -> &Self::Key;
}

/// A product saved to the wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    /// Product id, unique within the collection
    pub id: u64,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Current price
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,

    /// Pre-discount price
    #[serde(default, deserialize_with = "lenient_f64")]
    pub original_price: f64,

    /// Image URI or path
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,

    #[serde(default, deserialize_with = "lenient_tag", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, deserialize_with = "lenient_tag", skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,

    #[serde(default, deserialize_with = "lenient_tag", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Fields this version does not know about, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionItem {
    /// Create an item with no tags
    pub fn new(id: u64, name: impl Into<String>, price: f64, original_price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            original_price,
            image: image.into(),
            origin: None,
            fabric: None,
            category: None,
            extra: Map::new(),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_fabric(mut self, fabric: impl Into<String>) -> Self {
        self.fabric = Some(fabric.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Amount saved against the original price, zero if not discounted
    pub fn discount(&self) -> f64 {
        (self.original_price - self.price).max(0.0)
    }

    /// Discount as a whole-number percentage of the original price
    pub fn discount_percent(&self) -> f64 {
        if self.original_price <= 0.0 {
            return 0.0;
        }
        (self.discount() / self.original_price * 100.0).round()
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_tag(deserializer)?.unwrap_or_default())
}

fn lenient_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl Keyed for CollectionItem {
    type Key = u64;

    fn key(&self) -> &u64 {
        &self.id
    }
}
