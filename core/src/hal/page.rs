//! Paginated HAL collections.
//!
//! A page holds the items embedded under `_embedded.<relation>` and its own
//! links. Whether another page exists depends only on the `next` relation;
//! an empty page that still links to `next` is not the end.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{HalClient, HalResource, Links, TemplateParams};
use crate::error::{ApiError, ApiResult};

pub const NEXT: &str = "next";

/// Item type that appears in an `_embedded` collection.
pub trait Embedded: DeserializeOwned {
    /// Key of the item array inside `_embedded`.
    const RELATION: &'static str;
}

/// One page of a collection. Each page is an independent snapshot;
/// advancing returns a new page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    links: Links,
    items: Vec<T>,
}

impl<T: Embedded> Page<T> {
    pub fn new(items: Vec<T>, links: Links) -> Self {
        Self { links, items }
    }

    pub fn has_next(&self) -> bool {
        self.links.contains(NEXT)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Fetch the page linked as `next`.
    ///
    /// Calling this on the last page is a caller error and fails with
    /// `NoMoreResults` without touching the network.
    pub async fn next_page(&self, client: &HalClient) -> ApiResult<Page<T>> {
        if !self.has_next() {
            return Err(ApiError::NoMoreResults);
        }
        client.follow(&self.links, NEXT, &TemplateParams::new()).await
    }
}

impl<T> HalResource for Page<T> {
    fn links(&self) -> &Links {
        &self.links
    }
}

impl<'a, T: Embedded> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'de, T: Embedded> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawPage {
            #[serde(rename = "_links", default)]
            links: Links,
            #[serde(rename = "_embedded", default)]
            embedded: serde_json::Map<String, serde_json::Value>,
        }

        let mut raw = RawPage::deserialize(deserializer)?;
        let items = match raw.embedded.remove(T::RELATION) {
            Some(value) => serde_json::from_value(value).map_err(D::Error::custom)?,
            None => Vec::new(),
        };
        Ok(Page {
            links: raw.links,
            items,
        })
    }
}

impl<T: Embedded + Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Items<'a, T>(&'a [T]);

        impl<T: Embedded + Serialize> Serialize for Items<'_, T> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(T::RELATION, self.0)?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("_links", &self.links)?;
        map.serialize_entry("_embedded", &Items(&self.items))?;
        map.end()
    }
}
