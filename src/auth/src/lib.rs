// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Authentication components for clients of services hosted on Cloud Run.
//!
//! This crate finds a [service account key] on disk, and uses it to create
//! [self-signed JWTs] whose audience is the target service. Applications
//! attach these tokens as bearer tokens to their requests.
//!
//! The typical flow is:
//!
//! 1. Resolve the key file with [locator::resolve_from_fs].
//! 2. Load it with [credentials::from_file], using the service URL as the
//!    audience.
//! 3. Call [credentials::Credentials::headers] and attach the headers to the
//!    request.
//!
//! [service account key]: https://cloud.google.com/iam/docs/keys-create-delete#creating
//! [self-signed JWTs]: https://google.aip.dev/auth/4111

pub mod build_errors;
pub mod errors;

/// Types and functions to work with service account [Credentials].
///
/// [Credentials]: https://cloud.google.com/docs/authentication#credentials
pub mod credentials;

/// Find the service account key file used to sign requests.
pub mod locator;

/// Parse `KEY=value` project configuration files.
pub mod project_config;

/// Types and functions to work with auth [Tokens].
///
/// [Tokens]: https://cloud.google.com/docs/authentication#token
pub mod token;

pub(crate) mod constants;

/// A `Result` alias where the `Err` case is
/// `cloud_run_auth::errors::CredentialsError`.
pub(crate) type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;

/// A `Result` alias where the `Err` case is `cloud_run_auth::build_errors::Error`.
pub type BuildResult<T> = std::result::Result<T, crate::build_errors::Error>;
