//
//  bitbucket-provider
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Terminal prompts used before destructive commands and when storing
//! credentials.

pub mod prompt;

pub use prompt::*;
