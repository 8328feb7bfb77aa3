//
//  bitbucket-provider
//  api/cloud/pipelines.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipelines configuration payloads.
//!
//! Known hosts live under
//! `/repositories/{workspace}/{repo}/pipelines_config/ssh/known_hosts/`.
//! Pipelines can fetch from these hosts over SSH without an interactive
//! host-key prompt.

use serde::{Deserialize, Serialize};

/// SSH key algorithms Bitbucket accepts for known hosts.
pub const KNOWN_HOST_KEY_TYPES: &[&str] =
    &["ssh-ed25519", "ecdsa-sha2-nistp256", "ssh-rsa", "ssh-dss"];

/// A pipelines known host.
///
/// # Example
///
/// ```rust
/// use bitbucket_provider::api::cloud::PipelineKnownHost;
///
/// let json = r#"{
///     "type": "pipeline_known_host",
///     "uuid": "{6f0cbd6a-0000-0000-0000-000000000000}",
///     "hostname": "example.com",
///     "public_key": {
///         "type": "pipeline_ssh_public_key",
///         "key_type": "ssh-ed25519",
///         "key": "AAAAC3NzaC1lZDI1NTE5AAAAIKqP3Cr632C2dNhhgKVcon4ldUSAeKiku2yP9O9/bDtY",
///         "md5_fingerprint": "md5:b2:ed:49:17:6a:f1:99:b7:28:82:77:7a:22:a2:b5:60",
///         "sha256_fingerprint": "SHA256:0v5Fdx6O2DQ1bUWFkExMVCpQk9oCuq8ruTxNQFk3vLs"
///     }
/// }"#;
///
/// let host: PipelineKnownHost = serde_json::from_str(json).unwrap();
/// assert_eq!(host.public_key.key_type, "ssh-ed25519");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineKnownHost {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uuid: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,

    #[serde(default)]
    pub public_key: PipelineSshPublicKey,
}

/// Public key of a known host.
///
/// Fingerprints are computed by Bitbucket and never sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSshPublicKey {
    #[serde(default)]
    pub key_type: String,

    #[serde(default)]
    pub key: String,

    #[serde(default, skip_serializing)]
    pub md5_fingerprint: String,

    #[serde(default, skip_serializing)]
    pub sha256_fingerprint: String,
}
