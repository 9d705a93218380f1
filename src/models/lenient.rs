//! Forgiving `deserialize_with` helpers for model-authored JSON.
//!
//! Backends quote numbers, emit `null` for text and occasionally send a
//! value of the wrong kind entirely. None of that should reject an
//! otherwise usable document, so each helper falls back to an empty or
//! zero value instead of erroring.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

lazy_static! {
    /// Leading number of strings like "25 minutes" or "4.5/10".
    static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*(\d+(?:\.\d+)?)").unwrap();
}

/// A value of the expected shape, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum ValueOrIgnored<T> {
    Value(T),
    Ignored(IgnoredAny),
}

impl<T> ValueOrIgnored<T> {
    fn into_option(self) -> Option<T> {
        match self {
            ValueOrIgnored::Value(v) => Some(v),
            ValueOrIgnored::Ignored(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(u64),
    Float(f64),
    String(String),
    Other(IgnoredAny),
}

pub(crate) fn leading_number(s: &str) -> Option<f64> {
    LEADING_NUMBER
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn number_value(value: NumberOrString) -> Option<f64> {
    match value {
        NumberOrString::Int(i) => Some(i as f64),
        NumberOrString::Float(f) if f.is_finite() => Some(f),
        NumberOrString::Float(_) => None,
        NumberOrString::String(s) => leading_number(&s),
        NumberOrString::Other(_) => None,
    }
}

/// Accepts `25`, `25.0`, `"25"` or `"25 minutes"`; anything else is `None`.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number_value(NumberOrString::deserialize(deserializer)?);
    Ok(value
        .filter(|f| *f >= 0.0)
        .map(|f| f.round().min(u32::MAX as f64) as u32))
}

pub(crate) fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32(deserializer)?.unwrap_or(0))
}

pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_value(NumberOrString::deserialize(deserializer)?).unwrap_or(0.0))
}

pub(crate) fn deserialize_lenient_f64_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Lenient(#[serde(deserialize_with = "deserialize_lenient_f64")] f64);

    Ok(ValueOrIgnored::<BTreeMap<String, Lenient>>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default()
        .into_iter()
        .map(|(k, Lenient(v))| (k, v))
        .collect())
}

/// Accepts strings, numbers and booleans; blanks, `null` and anything
/// structured become `None`.
pub(crate) fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Int(i64),
        Float(f64),
        Bool(bool),
        Other(IgnoredAny),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::String(s) if s.trim().is_empty() => None,
        Scalar::String(s) => Some(s),
        Scalar::Int(i) => Some(i.to_string()),
        Scalar::Float(f) => Some(f.to_string()),
        Scalar::Bool(b) => Some(b.to_string()),
        Scalar::Other(_) => None,
    })
}

/// Like [`deserialize_lenient_string`] but for required text, which is
/// empty when unusable.
pub(crate) fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_string(deserializer)?.unwrap_or_default())
}

/// Accepts a list of strings or a single string. Unusable items are dropped.
pub(crate) fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Item(#[serde(deserialize_with = "deserialize_lenient_string")] Option<String>);

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        Vec(Vec<Item>),
        Single(Item),
    }

    Ok(match StringOrVec::deserialize(deserializer)? {
        StringOrVec::Vec(items) => items.into_iter().filter_map(|Item(s)| s).collect(),
        StringOrVec::Single(Item(s)) => s.into_iter().collect(),
    })
}

/// A section or record of the wrong shape (including `null`) is replaced
/// by its default.
pub(crate) fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(ValueOrIgnored::<T>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default())
}

/// A list whose malformed entries are skipped rather than failing the list.
pub(crate) fn deserialize_lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(ValueOrIgnored::<Vec<ValueOrIgnored<T>>>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default()
        .into_iter()
        .filter_map(ValueOrIgnored::into_option)
        .collect())
}

/// Either `{"category": [items]}` or a bare `[items]`, which is filed
/// under `default_key`.
pub(crate) fn keyed_or_bare_list<'de, D, T>(
    deserializer: D,
    default_key: &str,
) -> Result<Option<BTreeMap<String, Vec<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeyedOrBare<T> {
        Bare(Vec<ValueOrIgnored<T>>),
        Keyed(BTreeMap<String, Vec<ValueOrIgnored<T>>>),
        Other(IgnoredAny),
    }

    fn usable<T>(items: Vec<ValueOrIgnored<T>>) -> Vec<T> {
        items
            .into_iter()
            .filter_map(ValueOrIgnored::into_option)
            .collect()
    }

    Ok(match KeyedOrBare::<T>::deserialize(deserializer)? {
        KeyedOrBare::Bare(items) => {
            let mut keyed = BTreeMap::new();
            keyed.insert(default_key.to_string(), usable(items));
            Some(keyed)
        }
        KeyedOrBare::Keyed(map) => Some(map.into_iter().map(|(k, v)| (k, usable(v))).collect()),
        KeyedOrBare::Other(_) => None,
    })
}
