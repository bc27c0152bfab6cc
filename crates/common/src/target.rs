//! Selector targets reported by the engine
//!
//! A target is a bare selector string, or a list of selectors when the path
//! to the element crosses a shadow root. The JSON token kind decides which.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorTarget {
    Single(String),
    /// Selectors from the host document down through nested shadow roots
    Multi(Vec<String>),
}

impl SelectorTarget {
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            SelectorTarget::Single(s) => vec![s.as_str()],
            SelectorTarget::Multi(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for SelectorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorTarget::Single(s) => f.write_str(s),
            SelectorTarget::Multi(list) => f.write_str(&list.join(",")),
        }
    }
}

impl From<&str> for SelectorTarget {
    fn from(s: &str) -> Self {
        SelectorTarget::Single(s.to_string())
    }
}

impl Serialize for SelectorTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SelectorTarget::Single(s) => serializer.serialize_str(s),
            SelectorTarget::Multi(list) => list.serialize(serializer),
        }
    }
}

struct TargetVisitor;

impl<'de> Visitor<'de> for TargetVisitor {
    type Value = SelectorTarget;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a selector string or an array of selector strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SelectorTarget::Single(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(SelectorTarget::Single(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut selectors = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(selector) = seq.next_element::<String>()? {
            selectors.push(selector);
        }
        Ok(SelectorTarget::Multi(selectors))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, _map: A) -> Result<Self::Value, A::Error> {
        Err(de::Error::custom("cannot interpret target: object"))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Err(E::custom("cannot interpret target: boolean"))
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Err(E::custom("cannot interpret target: number"))
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Err(E::custom("cannot interpret target: number"))
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Err(E::custom("cannot interpret target: number"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(E::custom("cannot interpret target: null"))
    }
}

impl<'de> Deserialize<'de> for SelectorTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TargetVisitor)
    }
}
