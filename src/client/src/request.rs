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

use cloud_run_auth::credentials::Credentials;
use serde::Serialize;
use serde_json::Value;

pub const PROCESS_PATH: &str = "/process";

/// The body of a `POST /process` request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRequest {
    pub command: String,
    pub directory: String,
}

/// Returns the URL for the `/process` endpoint of `service_url`.
pub fn process_url(service_url: &str) -> String {
    format!("{}{PROCESS_PATH}", service_url.trim_end_matches('/'))
}

/// Sends `body` to the service and returns the JSON response.
///
/// The response body is returned even if the status code is not a success,
/// as long as it is valid JSON. Services usually describe their errors in
/// the body.
pub async fn send(
    client: &reqwest::Client,
    service_url: &str,
    credentials: &Credentials,
    body: &ProcessRequest,
) -> anyhow::Result<Value> {
    let headers = credentials.headers().await?;
    let url = process_url(service_url);
    tracing::info!("sending POST request to {url}");
    let response = client.post(&url).headers(headers).json(body).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{url} returned {status}");
    }
    let value = response.json::<Value>().await?;
    Ok(value)
}
