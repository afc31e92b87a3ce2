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

use crate::request::ProcessRequest;
use anyhow::bail;
use clap::Parser;
use clap::builder::{OsStringValueParser, TypedValueParser};
use cloud_run_auth::locator::Options;
use std::path::PathBuf;

pub const DEFAULT_SERVICE_URL: &str = "https://your-service-name-xxxxx.run.app";
pub const DEFAULT_COMMAND: &str = r#"echo "Hello from authenticated Rust client""#;
pub const DEFAULT_DIRECTORY: &str = "/tmp";

/// Configuration options for the client.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = super::DESCRIPTION)]
pub struct Args {
    /// The base URL of the Cloud Run service.
    ///
    /// This is also the audience of the self-signed JWT.
    #[arg(long, env = "SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,

    /// Use this service account key file.
    ///
    /// When set, the project configuration and the default key file are not
    /// consulted. An empty value is ignored.
    #[arg(
        long,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    pub key_file: Option<PathBuf>,

    /// A `KEY=value` file containing the `PROJECT_ID`.
    #[arg(long, env = "CLIENT_CONFIG_FILE", default_value = ".env")]
    pub config: PathBuf,

    /// The command sent to the service.
    #[arg(long, default_value = DEFAULT_COMMAND)]
    pub command: String,

    /// The directory where the service runs the command.
    #[arg(long, default_value = DEFAULT_DIRECTORY)]
    pub directory: String,

    /// Log progress to stderr.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.service_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "invalid service URL {}, the scheme must be http or https",
                self.service_url
            )
        }
        Ok(())
    }

    /// The service URL without any trailing `/`.
    pub fn base_url(&self) -> &str {
        self.service_url.trim_end_matches('/')
    }

    /// The configuration for the credential locator.
    pub fn locator_options(&self) -> Options {
        self.key_file
            .iter()
            .fold(Options::default().with_config_file(&self.config), |o, k| {
                o.with_override_path(k)
            })
    }

    /// The body of the request.
    pub fn request_body(&self) -> ProcessRequest {
        ProcessRequest {
            command: self.command.clone(),
            directory: self.directory.clone(),
        }
    }
}
