//
//  bitbucket-provider
//  reconcile/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Reconciliation
//!
//! Compares a [`Manifest`] with the [`StateFile`](crate::state::StateFile)
//! and drives the resource reconcilers to close the gap.
//!
//! ## Flow
//!
//! 1. [`validate`]: schema-check every block, collecting all errors
//! 2. [`refresh`]: re-read managed resources, dropping vanished ones
//! 3. [`read_data`]: evaluate data sources into `data.<type>.<name>`
//! 4. [`diff`]: classify each block as create, update, replace, delete or no-op
//! 5. [`apply`]: execute the plan, persisting state after every step
//!
//! [`plan`] runs steps 1 to 4. [`import`] and [`destroy`] are separate entry
//! points.

mod apply;
mod manifest;
mod plan;

pub use apply::*;
pub use manifest::*;
pub use plan::*;
