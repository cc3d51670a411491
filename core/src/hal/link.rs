//! HAL links and the per-document link table.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ApiError, ApiResult};

/// One entry of a `_links` object.
///
/// `templated` absent and `templated: false` both mean the href is a literal
/// URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub templated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: false,
        }
    }

    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: true,
        }
    }

    /// Substitute `{name}` placeholders with values from `params`.
    ///
    /// Literal links come back unchanged. Values are percent-encoded so an
    /// id cannot escape its path segment.
    pub fn expand(&self, params: &TemplateParams) -> ApiResult<String> {
        if !self.templated {
            return Ok(self.href.clone());
        }

        let mut out = String::with_capacity(self.href.len());
        let mut rest = self.href.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                return Err(ApiError::MissingTemplateParameter {
                    name: after.to_string(),
                });
            };
            let name = &after[..close];
            let value = params
                .get(name)
                .ok_or_else(|| ApiError::MissingTemplateParameter {
                    name: name.to_string(),
                })?;
            out.push_str(&urlencoding::encode(value));
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Named values for templated links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParams(Vec<(String, String)>);

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Relation name to link, in document order.
///
/// Relations are unique. Parsing a `_links` object that repeats a relation
/// fails; `insert` is the only way to replace an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    entries: Vec<(String, Link)>,
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relation: &str) -> Option<&Link> {
        self.entries
            .iter()
            .find(|(rel, _)| rel == relation)
            .map(|(_, link)| link)
    }

    pub fn resolve(&self, relation: &str) -> ApiResult<&Link> {
        self.get(relation).ok_or_else(|| ApiError::RelationNotFound {
            relation: relation.to_string(),
        })
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.get(relation).is_some()
    }

    /// Add or replace a relation, returning the previous link if any.
    pub fn insert(&mut self, relation: impl Into<String>, link: Link) -> Option<Link> {
        let relation = relation.into();
        match self.entries.iter_mut().find(|(rel, _)| *rel == relation) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, link)),
            None => {
                self.entries.push((relation, link));
                None
            }
        }
    }

    pub fn with(mut self, relation: impl Into<String>, link: Link) -> Self {
        self.insert(relation, link);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.entries.iter().map(|(rel, link)| (rel.as_str(), link))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (rel, link) in &self.entries {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinksVisitor;

        impl<'de> Visitor<'de> for LinksVisitor {
            type Value = Links;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a HAL `_links` object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Links, A::Error> {
                let mut links = Links::new();
                while let Some((rel, link)) = access.next_entry::<String, Link>()? {
                    if links.contains(&rel) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate link relation `{rel}`"
                        )));
                    }
                    links.entries.push((rel, link));
                }
                Ok(links)
            }
        }

        deserializer.deserialize_map(LinksVisitor)
    }
}
