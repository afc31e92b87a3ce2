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

//! Console messages for the outcome of a run.

use cloud_run_auth::build_errors::Error as LoadError;
use serde_json::Value;

/// Formats a successful response.
pub fn response_message(response: &Value) -> String {
    format!("Response: {response}")
}

/// Formats a failed run for the console.
///
/// Missing key files include the remediation hint on a separate line. All
/// other errors include their full chain of causes.
pub fn error_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<LoadError>() {
        Some(e) if e.is_not_found() => match e.remediation() {
            Some(hint) => format!("Error: {e}\n{hint}"),
            None => format!("Error: {e}"),
        },
        Some(e) if e.is_unreadable() => format!("Error: {e}"),
        _ => format!("Error: {error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_run_auth::credentials;
    use cloud_run_auth::locator::{Options, resolve};
    use serde_json::json;

    #[test]
    fn response() {
        let got = response_message(&json!({"output": "hello"}));
        assert_eq!(got, r#"Response: {"output":"hello"}"#);
    }

    #[test]
    fn not_found() {
        let err = resolve(&Options::default(), |_| false, |_| None).unwrap_err();
        let got = error_message(&anyhow::Error::from(err));
        let lines = got.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2, "{got}");
        assert!(lines[0].starts_with("Error: "), "{got}");
        assert!(lines[0].contains("service_account.json"), "{got}");
        assert_eq!(
            lines[1],
            "Run ./scripts/download-service-account-key.sh to download it"
        );
    }

    #[test]
    fn unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = credentials::from_file(&path, None).unwrap_err();
        let got = error_message(&anyhow::Error::from(err));
        assert!(got.starts_with("Error: "), "{got}");
        assert!(got.contains("missing.json"), "{got}");
        assert_eq!(got.lines().count(), 1, "{got}");
    }

    #[test]
    fn other() {
        let err = anyhow::anyhow!("connection refused").context("cannot send request");
        let got = error_message(&err);
        assert_eq!(got, "Error: cannot send request: connection refused");
    }
}
