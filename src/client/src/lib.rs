// Copyright 2025 Google LLC
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

//! Call a service hosted on Cloud Run, authenticating with a service account
//! key.

pub mod args;
pub mod report;
pub mod request;

use args::Args;
use cloud_run_auth::{credentials, locator};
use serde_json::Value;

pub const DESCRIPTION: &str = concat!(
    "This program sends one authenticated request to the `/process` endpoint",
    " of a Cloud Run service. It finds a service account key file, signs a",
    " JWT whose audience is the service URL, and prints the JSON response."
);

/// Locates the key file, creates the credentials, and sends the request.
pub async fn run(args: &Args) -> anyhow::Result<Value> {
    args.validate()?;
    let reference = locator::resolve_from_fs(&args.locator_options())?;
    tracing::info!(
        "using service account key {} ({:?})",
        reference.path().display(),
        reference.source()
    );
    let credentials = credentials::from_file(reference.path(), Some(args.base_url()))?;
    let client = reqwest::Client::new();
    request::send(&client, args.base_url(), &credentials, &args.request_body()).await
}
