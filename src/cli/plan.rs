//
//  bitbucket-provider
//  cli/plan.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Read-only commands: `validate`, `plan` and `refresh`.
//!
//! `plan` refreshes state in memory only. `refresh` writes the refreshed
//! state back.

use anyhow::Result;
use clap::Args;

use crate::output::views::{PlanView, RefreshSummary, ValidateSummary};
use crate::reconcile::{plan, read_data, refresh, validate};

use super::session::offline_provider;
use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct ValidateCommand {}

impl ValidateCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let manifest = session.manifest()?;
        let desired = validate(&offline_provider()?, &manifest)?;

        session.writer.write(&ValidateSummary {
            valid: true,
            resources: desired.resources.len(),
            data: desired.data.len(),
        })
    }
}

#[derive(Args, Debug)]
pub struct PlanCommand {}

impl PlanCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let manifest = session.manifest()?;
        let provider = session.provider(&manifest).await?;
        let mut state = session.state()?;

        let plan = plan(&provider, &manifest, &mut state).await?;
        session.writer.write(&PlanView::new(&plan, &provider))
    }
}

#[derive(Args, Debug)]
pub struct RefreshCommand {}

impl RefreshCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let manifest = session.manifest()?;
        let provider = session.provider(&manifest).await?;
        let mut state = session.state()?;

        let desired = validate(&provider, &manifest)?;
        let dropped = refresh(&provider, &mut state).await?;
        read_data(&provider, &desired, &mut state).await?;
        session.save_state(&mut state)?;

        session.writer.write(&RefreshSummary {
            refreshed: state.resources.len(),
            dropped,
        })
    }
}
