//
//  bitbucket-provider
//  schema/data.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The flat attribute model reconcilers read from and write to.

use serde_json::{Map, Value};

use super::{is_zero, values_equal};

/// Attribute values of one resource instance plus its remote ID.
///
/// Reconcilers read configuration through the typed getters and write the
/// remote view back with [`set`](Self::set). An empty ID means the object
/// does not exist remotely and is dropped from state.
///
/// # Example
///
/// ```rust
/// use bitbucket_provider::schema::ResourceData;
/// use serde_json::json;
///
/// let config = json!({"owner": "acme", "key": "CORE", "is_private": true});
/// let mut d = ResourceData::for_create(config.as_object().cloned().unwrap());
///
/// assert_eq!(d.get_str("owner"), "acme");
/// assert!(d.get_bool("is_private"));
/// assert!(d.get_ok("description").is_none());
///
/// d.set_id("acme/CORE");
/// d.set("uuid", "{1234}");
/// assert_eq!(d.id(), "acme/CORE");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    id: String,
    attrs: Map<String, Value>,
    prior: Map<String, Value>,
    new_resource: bool,
}

impl ResourceData {
    /// Data for a resource about to be created from its configuration.
    pub fn for_create(config: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            attrs: config,
            prior: Map::new(),
            new_resource: true,
        }
    }

    /// Data for refreshing a resource already recorded in state.
    pub fn from_state(id: impl Into<String>, attrs: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            prior: attrs.clone(),
            attrs,
            new_resource: false,
        }
    }

    /// Data for an in-place update: configured values laid over the prior
    /// state, so computed attributes stay readable.
    pub fn for_update(id: impl Into<String>, prior: Map<String, Value>, config: Map<String, Value>) -> Self {
        let mut attrs = prior.clone();
        attrs.extend(config);
        Self {
            id: id.into(),
            attrs,
            prior,
            new_resource: false,
        }
    }

    /// Data for importing an existing remote object by ID.
    pub fn for_import(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the remote ID. An empty string drops the resource from state.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn is_new_resource(&self) -> bool {
        self.new_resource
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Returns the value unless it is absent or a zero value
    /// (`""`, `false`, `0`, empty list, `null`).
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key).filter(|v| !is_zero(v))
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.attrs.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    /// Like [`get_str`](Self::get_str), `None` for absent or empty strings.
    pub fn get_opt_str(&self, key: &str) -> Option<String> {
        self.get_ok(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.attrs.get(key).and_then(Value::as_bool).unwrap_or_default()
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.attrs.get(key).and_then(Value::as_i64).unwrap_or_default()
    }

    pub fn get_list(&self, key: &str) -> &[Value] {
        self.attrs
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// String elements of a list or set attribute.
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        self.get_list(key)
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }

    /// First element of a block attribute.
    pub fn get_block(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get_list(key).first().and_then(Value::as_object)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// Value recorded in state before this operation.
    pub fn prior(&self, key: &str) -> Option<&Value> {
        self.prior.get(key)
    }

    /// Whether `key` differs from the prior state. Always true for new resources.
    pub fn has_change(&self, key: &str) -> bool {
        if self.new_resource {
            return self.get_ok(key).is_some();
        }
        let null = Value::Null;
        !values_equal(
            self.prior.get(key).unwrap_or(&null),
            self.attrs.get(key).unwrap_or(&null),
        )
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn into_parts(self) -> (String, Map<String, Value>) {
        (self.id, self.attrs)
    }
}

/// Reads a string field from a block element.
pub fn block_str<'a>(block: &'a Map<String, Value>, key: &str) -> &'a str {
    block.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Reads a bool field from a block element.
pub fn block_bool(block: &Map<String, Value>, key: &str) -> bool {
    block.get(key).and_then(Value::as_bool).unwrap_or_default()
}
