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

pub(crate) const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub(crate) const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Where the locator looks for the project identifier.
pub(crate) const DEFAULT_CONFIG_FILE: &str = ".env";
pub(crate) const PROJECT_ID_KEY: &str = "PROJECT_ID";
/// `{project_id}` is replaced with the value of [PROJECT_ID_KEY].
pub(crate) const PROJECT_KEY_FILE_PATTERN: &str = "service-account-{project_id}.json";
pub(crate) const DEFAULT_KEY_FILE: &str = "service_account.json";
pub(crate) const PROVISIONING_HINT: &str =
    "Run ./scripts/download-service-account-key.sh to download it";
