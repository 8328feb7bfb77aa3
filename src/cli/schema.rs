//
//  bitbucket-provider
//  cli/schema.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Args;

use crate::output::views::{SchemaView, TypeList};

use super::session::offline_provider;
use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Type to describe; lists every type when omitted
    pub type_name: Option<String>,

    /// Describe the data source of that name instead of the resource
    #[arg(long)]
    pub data: bool,
}

impl SchemaCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let provider = offline_provider()?;

        let Some(type_name) = self.type_name.as_deref() else {
            return session.writer.write(&TypeList::new(&provider));
        };

        let view = if self.data {
            let source = provider.data_source(type_name)?;
            SchemaView::data_source(source.type_name(), &source.schema())
        } else {
            let resource = provider.resource(type_name)?;
            SchemaView::resource(resource.type_name(), &resource.schema(), resource.importable())
        };
        session.writer.write(&view)
    }
}
