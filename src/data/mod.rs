//
//  bitbucket-provider
//  data/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Data Sources
//!
//! Read-only lookups. A data source takes its configured arguments, reads
//! the remote object and fills in the computed attributes. Nothing is ever
//! written to Bitbucket.
//!
//! - `bitbucket_project` - [`project`]
//! - `bitbucket_projects` - [`projects`]
//! - `bitbucket_repository` - [`repository`]
//! - `bitbucket_current_user` - [`current_user`]

pub mod current_user;
pub mod project;
pub mod projects;
pub mod repository;

use crate::resource::DataSource;

/// Every data source this crate provides.
pub fn all() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(project::ProjectData),
        Box::new(projects::ProjectsData),
        Box::new(repository::RepositoryData),
        Box::new(current_user::CurrentUserData),
    ]
}
