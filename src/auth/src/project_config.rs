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

use std::collections::HashMap;

/// The contents of a `KEY=value` configuration file, such as a `.env` file
/// created by the project setup scripts.
///
/// Parsing never fails: blank lines, comments (`# ...`) and lines without a
/// `=` are skipped.
///
/// # Example
/// ```
/// # use cloud_run_auth::project_config::ProjectConfig;
/// let config = ProjectConfig::parse("# setup\nexport PROJECT_ID=\"acme\"\nREGION=us-central1\n");
/// assert_eq!(config.get("PROJECT_ID"), Some("acme"));
/// assert_eq!(config.get("REGION"), Some("us-central1"));
/// assert_eq!(config.get("MISSING"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectConfig {
    values: HashMap<String, String>,
}

impl ProjectConfig {
    /// Parses the contents of a `KEY=value` file.
    ///
    /// Malformed lines are skipped. If a key appears more than once the last
    /// value wins.
    pub fn parse(contents: &str) -> Self {
        let values = contents
            .lines()
            .filter_map(parse_line)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values }
    }

    /// Returns the value for `key`, if it is present and not empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| {
            value
                .strip_prefix(*q)
                .and_then(|v| v.strip_suffix(*q))
        })
        .unwrap_or(value)
}
