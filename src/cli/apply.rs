//
//  bitbucket-provider
//  cli/apply.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Commands that change remote objects or take them under management.

use anyhow::Result;
use clap::Args;

use crate::output::views::{PlanView, ResourceView};
use crate::reconcile::{apply, destroy, import, plan};
use crate::state::StateFile;

use super::session::confirm;
use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct ApplyCommand {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub auto_approve: bool,
}

impl ApplyCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let manifest = session.manifest()?;
        let provider = session.provider(&manifest).await?;
        let mut state = session.state()?;

        let plan = plan(&provider, &manifest, &mut state).await?;
        session.save_state(&mut state)?;

        let view = PlanView::new(&plan, &provider);
        if !session.writer.is_json() || !plan.has_changes() {
            session.writer.write(&view)?;
        }
        if !plan.has_changes() {
            return Ok(());
        }

        confirm(self.auto_approve, "apply", "Apply these changes?")?;

        let summary = apply(&provider, &plan, &mut state, |s: &mut StateFile| {
            s.save(&session.state_path)
        })
        .await?;

        session.writer.write_success("Apply complete");
        session.writer.write(&summary)
    }
}

#[derive(Args, Debug)]
pub struct DestroyCommand {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub auto_approve: bool,
}

impl DestroyCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let mut state = session.state()?;

        if state.resources.is_empty() {
            session.writer.write_info("No managed resources to destroy.");
            return Ok(());
        }

        let manifest = session.manifest()?;
        let provider = session.provider(&manifest).await?;

        if !session.writer.is_json() {
            for entry in state.resources.iter().rev() {
                println!("  - {}", entry.address());
            }
        }
        confirm(
            self.auto_approve,
            "destroy",
            &format!("Destroy {} managed resources?", state.resources.len()),
        )?;

        let summary = destroy(&provider, &mut state, |s: &mut StateFile| {
            s.save(&session.state_path)
        })
        .await?;
        session.save_state(&mut state)?;

        session.writer.write_success("Destroy complete");
        session.writer.write(&summary)
    }
}

#[derive(Args, Debug)]
pub struct ImportCommand {
    /// Manifest address to import into (TYPE.NAME)
    pub address: String,

    /// Remote ID, in the format the resource type expects
    pub id: String,
}

impl ImportCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        let manifest = session.manifest()?;
        let provider = session.provider(&manifest).await?;
        let mut state = session.state()?;

        let entry = import(&provider, &manifest, &mut state, &self.address, &self.id).await?;
        session.save_state(&mut state)?;

        session
            .writer
            .write_success(&format!("Imported {} ({})", self.address, entry.id));
        if session.writer.is_json() {
            session.writer.write(&ResourceView::new(&entry, &provider))?;
        }
        Ok(())
    }
}
