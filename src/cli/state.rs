//
//  bitbucket-provider
//  cli/state.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bbp state`: inspect and edit the state file without touching Bitbucket.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::views::{ResourceView, StateList};

use super::session::offline_provider;
use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct StateCommand {
    #[command(subcommand)]
    pub command: StateSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StateSubcommand {
    /// List managed resources
    #[command(visible_alias = "ls")]
    List,

    /// Show one managed resource
    Show(AddressArgs),

    /// Stop managing a resource without deleting it
    Rm(AddressArgs),
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Resource address (TYPE.NAME)
    pub address: String,
}

impl StateCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        match &self.command {
            StateSubcommand::List => list(&session),
            StateSubcommand::Show(args) => show(&session, args),
            StateSubcommand::Rm(args) => remove(&session, args),
        }
    }
}

fn list(session: &Session) -> Result<()> {
    let state = session.state()?;
    session.writer.write(&StateList::new(&state))
}

fn show(session: &Session, args: &AddressArgs) -> Result<()> {
    let state = session.state()?;
    let entry = state
        .find(&args.address)
        .ok_or_else(|| anyhow::anyhow!("no resource {:?} in state", args.address))?;
    session
        .writer
        .write(&ResourceView::new(entry, &offline_provider()?))
}

fn remove(session: &Session, args: &AddressArgs) -> Result<()> {
    let mut state = session.state()?;
    let entry = state
        .remove(&args.address)
        .ok_or_else(|| anyhow::anyhow!("no resource {:?} in state", args.address))?;
    session.save_state(&mut state)?;

    session.writer.write_success(&format!(
        "Removed {} ({}) from state; the remote object was not deleted",
        args.address, entry.id
    ));
    Ok(())
}
