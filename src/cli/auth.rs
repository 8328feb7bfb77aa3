//
//  bitbucket-provider
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Keyring commands.
//!
//! A stored token is the last fallback when neither the manifest nor the
//! environment provides credentials. Tokens are keyed by API host, so a
//! token stored for a proxy `base_url` is only used with that proxy.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::api::client::DEFAULT_BASE_URL;
use crate::api::cloud::users::User;
use crate::api::BitbucketClient;
use crate::auth::{AuthCredential, KeyringStore};
use crate::config::api_host;
use crate::interactive::{is_interactive, prompt_password, read_line_from_stdin};

use super::{GlobalOptions, Session};

/// Manage the token stored in the system keyring.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store an OAuth access token in the keyring
    #[command(name = "store-token")]
    StoreToken(StoreTokenArgs),

    /// Remove the stored token
    Clear(HostArgs),
}

#[derive(Args, Debug)]
pub struct HostArgs {
    /// API root the token belongs to
    #[arg(long, env = "BITBUCKET_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Args, Debug)]
pub struct StoreTokenArgs {
    #[command(flatten)]
    pub host: HostArgs,

    /// Read token from standard input
    #[arg(long)]
    pub with_token: bool,

    /// Store the token without checking it against the API
    #[arg(long)]
    pub no_verify: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::new(global)?;
        match &self.command {
            AuthSubcommand::StoreToken(args) => store_token(&session, args).await,
            AuthSubcommand::Clear(args) => clear(&session, args),
        }
    }
}

async fn store_token(session: &Session, args: &StoreTokenArgs) -> Result<()> {
    let token = if args.with_token {
        read_line_from_stdin()?
    } else if is_interactive() {
        prompt_password("Paste your access token")?
    } else {
        anyhow::bail!("no terminal to prompt on; pass --with-token and pipe the token on stdin");
    };

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        anyhow::bail!("Invalid token format");
    }

    if !args.no_verify {
        let client = BitbucketClient::cloud()?
            .with_base_url(args.host.base_url.as_str())
            .with_auth(AuthCredential::bearer(token.as_str()));
        let user: User = client
            .get("/user")
            .await
            .context("Token is invalid or expired")?;
        session
            .writer
            .write_info(&format!("Token belongs to {}", user.display_name));
    }

    let host = api_host(&args.host.base_url);
    KeyringStore::new().store(&host, &token)?;
    session
        .writer
        .write_success(&format!("Stored token for {}", host));
    Ok(())
}

fn clear(session: &Session, args: &HostArgs) -> Result<()> {
    let host = api_host(&args.base_url);
    KeyringStore::new().delete(&host)?;
    session
        .writer
        .write_success(&format!("Removed stored token for {}", host));
    Ok(())
}
