//
//  bitbucket-provider
//  schema/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Attribute Schemas
//!
//! Every resource and data source declares a [`Schema`]: the flat set of
//! attributes its configuration block accepts, their types, and how they
//! behave across a plan.
//!
//! Values are plain [`serde_json::Value`]s. A configuration block is a
//! `serde_json::Map`; nested blocks are arrays of objects, even when at most
//! one element is allowed.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_provider::schema::{Attribute, Schema, Validation, ValueType};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .attr("name", Attribute::required(ValueType::String).validate(Validation::NotEmpty))
//!     .attr("is_private", Attribute::optional(ValueType::Bool).default_value(json!(true)));
//!
//! let mut config = json!({"name": "core"}).as_object().cloned().unwrap();
//! assert!(schema.validate(&config).is_empty());
//!
//! schema.apply_defaults(&mut config);
//! assert_eq!(config["is_private"], json!(true));
//! ```

mod data;

pub use data::*;

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

static NULL: Value = Value::Null;

/// The type of an attribute value.
#[derive(Debug, Clone)]
pub enum ValueType {
    String,
    Bool,
    Int,
    /// Ordered list of strings.
    StringList,
    /// Unordered set of strings; compared order-insensitively.
    StringSet,
    /// List of nested objects described by their own schema.
    Block(Schema),
}

impl ValueType {
    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::StringList => "list of strings",
            Self::StringSet => "set of strings",
            Self::Block(_) => "block",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::StringList | Self::StringSet => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Block(_) => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value validation applied to a configured attribute.
///
/// For list and set attributes the validation applies to every element.
#[derive(Debug, Clone)]
pub enum Validation {
    /// The string must not be empty.
    NotEmpty,
    /// The string must be one of the listed values.
    OneOf(&'static [&'static str]),
    /// The string must match the regex; the second field describes it.
    Matches(&'static Lazy<Regex>, &'static str),
}

impl Validation {
    fn check(&self, value: &Value) -> Result<(), String> {
        let s = value.as_str().unwrap_or_default();
        match self {
            Self::NotEmpty if s.is_empty() => Err("must not be empty".to_string()),
            Self::OneOf(allowed) if !allowed.contains(&s) => Err(format!(
                "expected one of [{}], got {:?}",
                allowed.join(", "),
                s
            )),
            Self::Matches(re, description) if !re.is_match(s) => {
                Err(format!("must be {}, got {:?}", description, s))
            }
            _ => Ok(()),
        }
    }
}

/// Rules under which a difference between state and configuration is ignored.
#[derive(Debug, Clone)]
pub enum DiffSuppress {
    /// Ignore the change when the value in state starts with the prefix.
    /// Used for values the API rewrites to its own canonical URLs.
    OldHasPrefix(&'static str),
}

impl DiffSuppress {
    fn suppresses(&self, old: &Value, _new: &Value) -> bool {
        match self {
            Self::OldHasPrefix(prefix) => old.as_str().is_some_and(|s| s.starts_with(*prefix)),
        }
    }
}

/// A single attribute declaration.
///
/// Built with one of [`required`](Self::required), [`optional`](Self::optional)
/// or [`computed`](Self::computed) and refined with the builder methods.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub value_type: ValueType,
    pub required: bool,
    pub optional: bool,
    /// Set by the remote side. Combined with `optional`, the configuration
    /// may also supply it.
    pub computed: bool,
    /// Changing the attribute replaces the remote object.
    pub force_new: bool,
    /// Redacted whenever state or plans are rendered.
    pub sensitive: bool,
    pub default: Option<Value>,
    pub max_items: Option<usize>,
    pub validation: Option<Validation>,
    pub diff_suppress: Option<DiffSuppress>,
    pub description: &'static str,
}

impl Attribute {
    fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            max_items: None,
            validation: None,
            diff_suppress: None,
            description: "",
        }
    }

    pub fn required(value_type: ValueType) -> Self {
        Self {
            required: true,
            ..Self::new(value_type)
        }
    }

    pub fn optional(value_type: ValueType) -> Self {
        Self {
            optional: true,
            ..Self::new(value_type)
        }
    }

    pub fn computed(value_type: ValueType) -> Self {
        Self {
            computed: true,
            ..Self::new(value_type)
        }
    }

    /// Marks an optional attribute as also computed.
    pub fn or_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn validate(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn diff_suppress(mut self, rule: DiffSuppress) -> Self {
        self.diff_suppress = Some(rule);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Computed-only attributes are never read from configuration.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    /// Whether `old` (state) and `new` (configuration) are the same value
    /// under this attribute's comparison rules.
    fn equal(&self, old: &Value, new: Option<&Value>) -> bool {
        let new = match new {
            Some(value) => value,
            None if self.computed => return true,
            None => &NULL,
        };

        if let Some(rule) = &self.diff_suppress {
            if rule.suppresses(old, new) {
                return true;
            }
        }

        match &self.value_type {
            ValueType::StringSet => string_set(old) == string_set(new),
            ValueType::Block(schema) => {
                let empty = Vec::new();
                let old_items = old.as_array().unwrap_or(&empty);
                let new_items = new.as_array().unwrap_or(&empty);
                if new_items.is_empty() && self.computed {
                    return true;
                }
                old_items.len() == new_items.len()
                    && old_items
                        .iter()
                        .zip(new_items)
                        .all(|(o, n)| schema.objects_equal(o, n))
            }
            _ => values_equal(old, new),
        }
    }
}

/// Errors found while validating a configuration block.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{0}: required attribute is missing")]
    MissingRequired(String),

    #[error("{0}: unknown attribute")]
    UnknownAttribute(String),

    #[error("{path}: expected {expected}")]
    TypeMismatch { path: String, expected: String },

    #[error("{0}: attribute is computed and cannot be set")]
    ComputedOnly(String),

    #[error("{path}: {reason}")]
    Invalid { path: String, reason: String },

    #[error("{path}: at most {max} item(s) allowed, got {got}")]
    TooManyItems { path: String, max: usize, got: usize },
}

impl SchemaError {
    /// Qualifies the attribute path, e.g. with the block address.
    pub fn with_prefix(self, prefix: &str) -> Self {
        let join = |path: String| format!("{prefix}.{path}");
        match self {
            Self::MissingRequired(path) => Self::MissingRequired(join(path)),
            Self::UnknownAttribute(path) => Self::UnknownAttribute(join(path)),
            Self::TypeMismatch { path, expected } => Self::TypeMismatch {
                path: join(path),
                expected,
            },
            Self::ComputedOnly(path) => Self::ComputedOnly(join(path)),
            Self::Invalid { path, reason } => Self::Invalid {
                path: join(path),
                reason,
            },
            Self::TooManyItems { path, max, got } => Self::TooManyItems {
                path: join(path),
                max,
                got,
            },
        }
    }
}

/// One attribute whose configured value differs from state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub name: String,
    pub old: Value,
    pub new: Value,
    /// The change cannot be applied in place.
    pub force_new: bool,
}

/// The attribute declarations of a resource or data source.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute declaration.
    pub fn attr(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Iterates attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (*name, attr))
    }

    /// Validates a configuration block, collecting every error found.
    pub fn validate(&self, config: &Map<String, Value>) -> Vec<SchemaError> {
        let mut errors = Vec::new();
        self.validate_at("", config, &mut errors);
        errors
    }

    fn validate_at(&self, prefix: &str, config: &Map<String, Value>, errors: &mut Vec<SchemaError>) {
        for key in config.keys() {
            if !self.attributes.contains_key(key.as_str()) {
                errors.push(SchemaError::UnknownAttribute(format!("{prefix}{key}")));
            }
        }

        for (name, attr) in &self.attributes {
            let path = format!("{prefix}{name}");
            let value = match config.get(*name) {
                Some(Value::Null) | None => {
                    if attr.required {
                        errors.push(SchemaError::MissingRequired(path));
                    }
                    continue;
                }
                Some(value) => value,
            };

            if attr.is_computed_only() {
                errors.push(SchemaError::ComputedOnly(path));
                continue;
            }

            if !attr.value_type.matches(value) {
                errors.push(SchemaError::TypeMismatch {
                    path,
                    expected: attr.value_type.to_string(),
                });
                continue;
            }

            if let (Some(max), Some(items)) = (attr.max_items, value.as_array()) {
                if items.len() > max {
                    errors.push(SchemaError::TooManyItems {
                        path: path.clone(),
                        max,
                        got: items.len(),
                    });
                }
            }

            match &attr.value_type {
                ValueType::Block(nested) => {
                    for (i, item) in value.as_array().into_iter().flatten().enumerate() {
                        if let Some(object) = item.as_object() {
                            nested.validate_at(&format!("{path}.{i}."), object, errors);
                        }
                    }
                }
                ValueType::StringList | ValueType::StringSet => {
                    if let Some(validation) = &attr.validation {
                        for item in value.as_array().into_iter().flatten() {
                            if let Err(reason) = validation.check(item) {
                                errors.push(SchemaError::Invalid {
                                    path: path.clone(),
                                    reason,
                                });
                            }
                        }
                    }
                }
                _ => {
                    if let Some(validation) = &attr.validation {
                        if let Err(reason) = validation.check(value) {
                            errors.push(SchemaError::Invalid { path, reason });
                        }
                    }
                }
            }
        }
    }

    /// Fills defaults for absent optional attributes, recursing into blocks.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for (name, attr) in &self.attributes {
            match config.get_mut(*name) {
                None | Some(Value::Null) => {
                    if let Some(default) = &attr.default {
                        config.insert(name.to_string(), default.clone());
                    }
                }
                Some(Value::Array(items)) => {
                    if let ValueType::Block(nested) = &attr.value_type {
                        for item in items.iter_mut() {
                            if let Some(object) = item.as_object_mut() {
                                nested.apply_defaults(object);
                            }
                        }
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Writes `null` for every configurable, non-computed attribute the block
    /// leaves unset, so an update clears what state recorded for it.
    pub fn fill_unset(&self, config: &mut Map<String, Value>) {
        for (name, attr) in &self.attributes {
            if !attr.computed && !config.contains_key(*name) {
                config.insert(name.to_string(), Value::Null);
            }
        }
    }

    /// Computes the configured attributes whose value differs from state.
    ///
    /// Computed-only attributes and unset optional+computed attributes never
    /// produce a change.
    pub fn diff(&self, config: &Map<String, Value>, state: &Map<String, Value>) -> Vec<AttributeChange> {
        self.attributes
            .iter()
            .filter(|(_, attr)| !attr.is_computed_only())
            .filter_map(|(name, attr)| {
                let old = state.get(*name).cloned().unwrap_or(Value::Null);
                let new = config.get(*name);
                if attr.equal(&old, new) {
                    return None;
                }
                Some(AttributeChange {
                    name: name.to_string(),
                    old,
                    new: new.cloned().unwrap_or(Value::Null),
                    force_new: attr.force_new,
                })
            })
            .collect()
    }

    fn objects_equal(&self, old: &Value, new: &Value) -> bool {
        let empty = Map::new();
        let old = old.as_object().unwrap_or(&empty);
        let new = new.as_object().unwrap_or(&empty);
        self.attributes
            .iter()
            .filter(|(_, attr)| !attr.is_computed_only())
            .all(|(name, attr)| {
                attr.equal(old.get(*name).unwrap_or(&NULL), new.get(*name))
            })
    }

    /// Replaces every sensitive attribute value with a placeholder.
    pub fn redact(&self, attributes: &Map<String, Value>) -> Map<String, Value> {
        let mut redacted = attributes.clone();
        for (name, attr) in &self.attributes {
            if attr.sensitive {
                if let Some(value) = redacted.get_mut(*name) {
                    if !is_zero(value) {
                        *value = Value::String("(sensitive)".to_string());
                    }
                }
            }
        }
        redacted
    }
}

/// Zero values: null, "", false, 0, empty list and empty object.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Equality where an absent value equals its type's zero value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    if is_zero(a) && is_zero(b) {
        return true;
    }
    a == b
}

fn string_set(value: &Value) -> Vec<&str> {
    let mut items: Vec<&str> = value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect();
    items.sort_unstable();
    items.dedup();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> Schema {
        Schema::new()
            .attr("owner", Attribute::required(ValueType::String).force_new())
            .attr(
                "slug",
                Attribute::optional(ValueType::String)
                    .or_computed()
                    .validate(Validation::Matches(&SLUG, "a lowercase slug")),
            )
            .attr(
                "fork_policy",
                Attribute::optional(ValueType::String)
                    .default_value(json!("allow_forks"))
                    .validate(Validation::OneOf(&["allow_forks", "no_forks"])),
            )
            .attr("events", Attribute::required(ValueType::StringSet))
            .attr("uuid", Attribute::computed(ValueType::String))
            .attr(
                "link",
                Attribute::optional(ValueType::Block(Schema::new().attr(
                    "href",
                    Attribute::optional(ValueType::String)
                        .diff_suppress(DiffSuppress::OldHasPrefix("https://bitbucket.org/account")),
                )))
                .or_computed()
                .max_items(1),
            )
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = object(json!({
            "slug": "Not A Slug",
            "fork_policy": "sometimes",
            "events": "repo:push",
            "uuid": "{x}",
            "colour": "red",
            "link": [{"href": "a"}, {"href": "b"}]
        }));
        let errors = sample().validate(&config);

        assert!(errors.contains(&SchemaError::MissingRequired("owner".into())));
        assert!(errors.contains(&SchemaError::UnknownAttribute("colour".into())));
        assert!(errors.contains(&SchemaError::ComputedOnly("uuid".into())));
        assert!(errors.contains(&SchemaError::TypeMismatch {
            path: "events".into(),
            expected: "set of strings".into()
        }));
        assert!(errors.contains(&SchemaError::TooManyItems {
            path: "link".into(),
            max: 1,
            got: 2
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SchemaError::Invalid { path, .. } if path == "slug")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, SchemaError::Invalid { path, .. } if path == "fork_policy")));
    }

    #[test]
    fn test_validate_nested_block_paths() {
        let config = object(json!({
            "owner": "acme",
            "events": [],
            "link": [{"href": 3}]
        }));
        let errors = sample().validate(&config);
        assert_eq!(
            errors,
            vec![SchemaError::TypeMismatch {
                path: "link.0.href".into(),
                expected: "string".into()
            }]
        );
    }

    #[test]
    fn test_apply_defaults_keeps_explicit_values() {
        let mut config = object(json!({"owner": "acme"}));
        sample().apply_defaults(&mut config);
        assert_eq!(config["fork_policy"], json!("allow_forks"));

        let mut config = object(json!({"owner": "acme", "fork_policy": "no_forks"}));
        sample().apply_defaults(&mut config);
        assert_eq!(config["fork_policy"], json!("no_forks"));
    }

    #[test]
    fn test_diff_ignores_computed_and_unset_optional_computed() {
        let config = object(json!({"owner": "acme", "events": ["b", "a"]}));
        let state = object(json!({
            "owner": "acme",
            "events": ["a", "b"],
            "slug": "widgets",
            "uuid": "{1}",
            "link": [{"href": "x"}]
        }));
        assert!(sample().diff(&config, &state).is_empty());
    }

    #[test]
    fn test_diff_reports_force_new() {
        let config = object(json!({"owner": "other", "events": ["a"], "fork_policy": "no_forks"}));
        let state = object(json!({"owner": "acme", "events": ["a"], "fork_policy": "allow_forks"}));
        let changes = sample().diff(&config, &state);

        assert_eq!(changes.len(), 2);
        let fork = changes.iter().find(|c| c.name == "fork_policy").unwrap();
        assert!(!fork.force_new);
        let owner = changes.iter().find(|c| c.name == "owner").unwrap();
        assert!(owner.force_new);
        assert_eq!(owner.old, json!("acme"));
        assert_eq!(owner.new, json!("other"));
    }

    #[test]
    fn test_diff_suppress_in_nested_block() {
        let config = object(json!({
            "owner": "acme",
            "events": [],
            "link": [{"href": "https://example.com/logo.png"}]
        }));
        let state = object(json!({
            "owner": "acme",
            "events": [],
            "link": [{"href": "https://bitbucket.org/account/user/acme/projects/CORE/avatar/32"}]
        }));
        assert!(sample().diff(&config, &state).is_empty());

        let state = object(json!({
            "owner": "acme",
            "events": [],
            "link": [{"href": "https://example.com/old.png"}]
        }));
        let changes = sample().diff(&config, &state);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "link");
    }

    #[test]
    fn test_zero_values_compare_equal() {
        assert!(values_equal(&Value::Null, &json!("")));
        assert!(values_equal(&json!(false), &Value::Null));
        assert!(!values_equal(&json!(true), &Value::Null));
    }

    #[test]
    fn test_redact_sensitive() {
        let schema = Schema::new()
            .attr("url", Attribute::required(ValueType::String))
            .attr("secret", Attribute::optional(ValueType::String).sensitive());
        let attrs = object(json!({"url": "https://x", "secret": "hunter2"}));
        let redacted = schema.redact(&attrs);
        assert_eq!(redacted["secret"], json!("(sensitive)"));
        assert_eq!(redacted["url"], json!("https://x"));
    }
}
