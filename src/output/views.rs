//
//  bitbucket-provider
//  output/views.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Printable views of plans, state entries and schemas, with sensitive
//! values redacted.

use console::style;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{format_action, format_value, print_field, print_header, truncate, TableBuilder, TableOutput};
use crate::provider::Provider;
use crate::reconcile::{Action, ApplySummary, Plan};
use crate::schema::{Attribute, Schema, ValueType};
use crate::state::{ResourceState, StateFile};

const REDACTED: &str = "(sensitive)";

fn schema_for(provider: &Provider, type_name: &str) -> Schema {
    provider
        .resource(type_name)
        .map(|r| r.schema())
        .unwrap_or_default()
}

fn is_sensitive(schema: &Schema, name: &str) -> bool {
    schema.get(name).is_some_and(|a| a.sensitive)
}

/// A plan ready for display.
#[derive(Debug, Serialize)]
pub struct PlanView {
    #[serde(flatten)]
    plan: Plan,
    add: usize,
    change: usize,
    destroy: usize,
}

impl PlanView {
    pub fn new(plan: &Plan, provider: &Provider) -> Self {
        let mut plan = plan.clone();
        for change in &mut plan.changes {
            let schema = schema_for(provider, &change.type_name);
            change.config = schema.redact(&change.config);
            if let Action::Update { changed } | Action::Replace { changed } = &mut change.action {
                for attribute in changed.iter_mut().filter(|c| is_sensitive(&schema, &c.name)) {
                    attribute.old = Value::String(REDACTED.to_string());
                    attribute.new = Value::String(REDACTED.to_string());
                }
            }
        }

        let (add, change, destroy) = plan.counts();
        Self {
            plan,
            add,
            change,
            destroy,
        }
    }
}

impl TableOutput for PlanView {
    fn print_table(&self, color: bool) {
        for address in &self.plan.dropped {
            println!("{} was deleted outside bbp and dropped from state", address);
        }

        if !self.plan.has_changes() {
            println!("No changes. Remote objects match the manifest.");
            return;
        }

        for change in &self.plan.changes {
            if change.action == Action::NoOp {
                continue;
            }
            println!("{} {}", format_action(&change.action, color), change.address);

            match &change.action {
                Action::Create => {
                    for (name, value) in change.config.iter().filter(|(_, v)| !v.is_null()) {
                        println!("      {} = {}", name, format_value(value));
                    }
                }
                Action::Update { changed } | Action::Replace { changed } => {
                    for c in changed {
                        let forces = if c.force_new {
                            " (forces replacement)"
                        } else {
                            ""
                        };
                        println!(
                            "      {}: {} => {}{}",
                            c.name,
                            format_value(&c.old),
                            format_value(&c.new),
                            forces
                        );
                    }
                }
                Action::Delete | Action::NoOp => {}
            }
        }

        println!();
        let summary = format!(
            "Plan: {} to add, {} to change, {} to destroy.",
            self.add, self.change, self.destroy
        );
        if color {
            println!("{}", style(summary).bold());
        } else {
            println!("{}", summary);
        }
    }
}

impl TableOutput for ApplySummary {
    fn print_table(&self, color: bool) {
        let text = format!(
            "Resources: {} added, {} changed, {} destroyed.",
            self.added, self.changed, self.destroyed
        );
        if color {
            println!("{}", style(text).green());
        } else {
            println!("{}", text);
        }
    }
}

/// `bbp validate`.
#[derive(Debug, Serialize)]
pub struct ValidateSummary {
    pub valid: bool,
    pub resources: usize,
    pub data: usize,
}

impl TableOutput for ValidateSummary {
    fn print_table(&self, color: bool) {
        let text = format!(
            "The manifest is valid: {} resources, {} data sources.",
            self.resources, self.data
        );
        if color {
            println!("{} {}", style("✓").green().bold(), text);
        } else {
            println!("✓ {}", text);
        }
    }
}

/// `bbp refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub dropped: Vec<String>,
}

impl TableOutput for RefreshSummary {
    fn print_table(&self, _color: bool) {
        for address in &self.dropped {
            println!("{} was deleted outside bbp and dropped from state", address);
        }
        println!("Refreshed {} resources.", self.refreshed);
    }
}

#[derive(Debug, Serialize)]
struct StateRow {
    address: String,
    id: String,
}

/// `bbp state list`.
#[derive(Debug, Serialize)]
pub struct StateList {
    resources: Vec<StateRow>,
}

impl StateList {
    pub fn new(state: &StateFile) -> Self {
        Self {
            resources: state
                .resources
                .iter()
                .map(|r| StateRow {
                    address: r.address(),
                    id: r.id.clone(),
                })
                .collect(),
        }
    }
}

impl TableOutput for StateList {
    fn print_table(&self, color: bool) {
        if self.resources.is_empty() {
            println!("No resources in state.");
            return;
        }
        let mut table = TableBuilder::new().color(color).headers(["Address", "ID"]);
        for row in &self.resources {
            table = table.row([row.address.clone(), row.id.clone()]);
        }
        table.print();
    }
}

/// `bbp state show`: one entry with sensitive attributes redacted.
#[derive(Debug, Serialize)]
pub struct ResourceView {
    address: String,
    #[serde(rename = "type")]
    type_name: String,
    name: String,
    id: String,
    attributes: Map<String, Value>,
}

impl ResourceView {
    pub fn new(entry: &ResourceState, provider: &Provider) -> Self {
        let schema = schema_for(provider, &entry.type_name);
        Self {
            address: entry.address(),
            type_name: entry.type_name.clone(),
            name: entry.name.clone(),
            id: entry.id.clone(),
            attributes: schema.redact(&entry.attributes),
        }
    }
}

impl TableOutput for ResourceView {
    fn print_table(&self, color: bool) {
        print_header(&self.address);
        print_field("id", &self.id, color);
        for (name, value) in &self.attributes {
            print_field(name, &format_value(value), color);
        }
    }
}

#[derive(Debug, Serialize)]
struct AttributeView {
    name: String,
    #[serde(rename = "type")]
    value_type: String,
    mode: &'static str,
    force_new: bool,
    sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "is_blank")]
    description: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<AttributeView>,
}

fn is_blank(s: &&str) -> bool {
    s.is_empty()
}

fn mode(attribute: &Attribute) -> &'static str {
    match (attribute.required, attribute.optional, attribute.computed) {
        (true, _, _) => "required",
        (false, true, true) => "optional, computed",
        (false, true, false) => "optional",
        _ => "computed",
    }
}

fn attribute_views(schema: &Schema) -> Vec<AttributeView> {
    schema
        .attributes()
        .map(|(name, attribute)| AttributeView {
            name: name.to_string(),
            value_type: attribute.value_type.to_string(),
            mode: mode(attribute),
            force_new: attribute.force_new,
            sensitive: attribute.sensitive,
            default: attribute.default.clone(),
            description: attribute.description,
            attributes: match &attribute.value_type {
                ValueType::Block(nested) => attribute_views(nested),
                _ => Vec::new(),
            },
        })
        .collect()
}

/// `bbp schema <type>`.
#[derive(Debug, Serialize)]
pub struct SchemaView {
    #[serde(rename = "type")]
    type_name: String,
    kind: &'static str,
    importable: bool,
    attributes: Vec<AttributeView>,
}

impl SchemaView {
    pub fn resource(type_name: &str, schema: &Schema, importable: bool) -> Self {
        Self {
            type_name: type_name.to_string(),
            kind: "resource",
            importable,
            attributes: attribute_views(schema),
        }
    }

    pub fn data_source(type_name: &str, schema: &Schema) -> Self {
        Self {
            type_name: type_name.to_string(),
            kind: "data source",
            importable: false,
            attributes: attribute_views(schema),
        }
    }
}

fn add_rows(mut table: TableBuilder, prefix: &str, attributes: &[AttributeView]) -> TableBuilder {
    for a in attributes {
        let name = format!("{}{}", prefix, a.name);
        let mut flags = Vec::new();
        if a.force_new {
            flags.push("forces replacement");
        }
        if a.sensitive {
            flags.push("sensitive");
        }
        table = table.row([
            name.clone(),
            a.value_type.clone(),
            a.mode.to_string(),
            a.default.as_ref().map(format_value).unwrap_or_default(),
            flags.join(", "),
            truncate(a.description, 60),
        ]);
        table = add_rows(table, &format!("{}.", name), &a.attributes);
    }
    table
}

impl TableOutput for SchemaView {
    fn print_table(&self, color: bool) {
        print_header(&format!("{} ({})", self.type_name, self.kind));
        if self.kind == "resource" {
            print_field("importable", if self.importable { "yes" } else { "no" }, color);
        }
        let table = TableBuilder::new()
            .color(color)
            .headers(["Attribute", "Type", "Mode", "Default", "Flags", "Description"]);
        add_rows(table, "", &self.attributes).print();
    }
}

/// `bbp schema` without a type.
#[derive(Debug, Serialize)]
pub struct TypeList {
    resources: Vec<&'static str>,
    data_sources: Vec<&'static str>,
}

impl TypeList {
    pub fn new(provider: &Provider) -> Self {
        Self {
            resources: provider.resource_types().collect(),
            data_sources: provider.data_source_types().collect(),
        }
    }
}

impl TableOutput for TypeList {
    fn print_table(&self, color: bool) {
        let mut table = TableBuilder::new().color(color).headers(["Type", "Kind"]);
        for name in &self.resources {
            table = table.row([*name, "resource"]);
        }
        for name in &self.data_sources {
            table = table.row([*name, "data source"]);
        }
        table.print();
    }
}
