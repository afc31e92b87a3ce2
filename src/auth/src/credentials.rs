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

pub mod service_account;

use crate::build_errors::Error as BuilderError;
use crate::constants::SERVICE_ACCOUNT_TYPE;
use crate::token::Token;
use crate::{BuildResult, Result};
use http::HeaderMap;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// An implementation of [crate::credentials::dynamic::CredentialsProvider].
///
/// Represents a [Credentials] used to obtain auth [Token][crate::token::Token]s
/// and the corresponding request headers.
///
/// [Credentials]: https://cloud.google.com/docs/authentication#credentials
#[derive(Clone, Debug)]
pub struct Credentials {
    // Use an `Arc` to hold the inner implementation.
    inner: Arc<dyn dynamic::CredentialsProvider>,
}

impl<T> std::convert::From<T> for Credentials
where
    T: dynamic::CredentialsProvider + 'static,
{
    fn from(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }
}

impl Credentials {
    /// Creates a new token.
    pub async fn token(&self) -> Result<Token> {
        self.inner.token().await
    }

    /// Returns the headers that authenticate a request, typically a single
    /// sensitive `Authorization: Bearer ...` header.
    pub async fn headers(&self) -> Result<HeaderMap> {
        self.inner.headers().await
    }
}

pub mod dynamic {
    use super::Result;
    use crate::token::Token;
    use http::HeaderMap;

    /// A trait for credential types that can provide tokens and the headers
    /// to authenticate requests.
    ///
    /// Applications rarely need to implement this trait, other than to mock
    /// credentials in tests.
    #[async_trait::async_trait]
    pub trait CredentialsProvider: Send + Sync + std::fmt::Debug {
        /// Asynchronously constructs an auth token.
        async fn token(&self) -> Result<Token>;

        /// Asynchronously constructs the auth headers.
        async fn headers(&self) -> Result<HeaderMap>;
    }
}

/// Loads service account credentials from a key file.
///
/// The `audience` is typically the URL of the target service. Without an
/// audience the token carries the `cloud-platform` scope instead.
///
/// Returns an error where
/// [is_unreadable()][crate::build_errors::Error::is_unreadable] is `true` if
/// the file cannot be opened or read, and where
/// [is_parsing()][crate::build_errors::Error::is_parsing] is `true` if the
/// file does not contain a service account key.
pub fn from_file<P: AsRef<Path>>(path: P, audience: Option<&str>) -> BuildResult<Credentials> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| BuilderError::unreadable(path, e))?;
    let json = serde_json::from_str::<Value>(&contents).map_err(BuilderError::parsing)?;
    tracing::info!("loaded service account key from {}", path.display());
    from_json(json, audience)
}

/// Creates service account credentials from the JSON contents of a key file.
///
/// Keys without a `"type"` field are accepted. Any type other than
/// `"service_account"` is rejected.
pub fn from_json(json: Value, audience: Option<&str>) -> BuildResult<Credentials> {
    match json.get("type") {
        None => {}
        Some(Value::String(t)) if t == SERVICE_ACCOUNT_TYPE => {}
        Some(Value::String(t)) => {
            return Err(BuilderError::unknown_type(format!(
                "expected `{SERVICE_ACCOUNT_TYPE}`, found `{t}`"
            )));
        }
        Some(other) => {
            return Err(BuilderError::parsing(format!(
                "expected a string for the `type` field, found `{other}`"
            )));
        }
    }
    let key = serde_json::from_value::<service_account::ServiceAccountKey>(json)
        .map_err(BuilderError::parsing)?;
    let builder = service_account::Builder::new(key);
    let builder = audience
        .into_iter()
        .fold(builder, |b, aud| b.with_audience(aud));
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::service_account::tests::generate_pkcs8_private_key;
    use http::header::AUTHORIZATION;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    fn key_json(private_key: &str) -> Value {
        json!({
            "type": "service_account",
            "client_email": "test-client-email",
            "private_key_id": "test-private-key-id",
            "private_key": private_key,
            "project_id": "test-project-id",
        })
    }

    fn create_temp_file(content: &str) -> std::io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    #[tokio::test]
    async fn from_file_success() -> TestResult {
        let contents = key_json(&generate_pkcs8_private_key()).to_string();
        let file = create_temp_file(&contents)?;
        let credentials = from_file(file.path(), Some("https://test-service.run.app"))?;
        let headers = credentials.headers().await?;
        let value = headers.get(AUTHORIZATION).unwrap().to_str()?;
        assert!(value.starts_with("Bearer "), "{value}");
        assert_eq!(value.matches('.').count(), 2, "{value}");
        Ok(())
    }

    #[test]
    fn from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service_account.json");
        let err = from_file(&path, None).unwrap_err();
        assert!(err.is_unreadable(), "{err:?}");
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.to_string().contains("service_account.json"), "{err}");
    }

    #[test]
    fn from_file_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = from_file(dir.path(), None).unwrap_err();
        assert!(err.is_unreadable(), "{err:?}");
    }

    #[test_case("not json"; "not json")]
    #[test_case("[]"; "not an object")]
    #[test_case(r#"{"type": "service_account"}"#; "missing fields")]
    #[test_case(r#"{"type": 42}"#; "bad type field")]
    fn from_file_parsing(contents: &str) -> TestResult {
        let file = create_temp_file(contents)?;
        let err = from_file(file.path(), None).unwrap_err();
        assert!(err.is_parsing(), "{err:?}");
        Ok(())
    }

    #[test]
    fn from_json_unknown_type() {
        let mut json = key_json("");
        json["type"] = json!("authorized_user");
        let err = from_json(json, None).unwrap_err();
        assert!(err.is_unknown_type(), "{err:?}");
        assert!(err.to_string().contains("authorized_user"), "{err}");
    }

    #[test]
    fn from_json_without_type() -> TestResult {
        let mut json = key_json("");
        json.as_object_mut().unwrap().remove("type");
        let credentials = from_json(json, None)?;
        let fmt = format!("{credentials:?}");
        assert!(fmt.contains("ServiceAccountCredentials"), "{fmt}");
        Ok(())
    }

    #[tokio::test]
    async fn from_json_bad_key_fails_on_token() {
        let credentials = from_json(key_json("not-a-pem"), Some("aud")).unwrap();
        let err = credentials.token().await.unwrap_err();
        assert!(err.to_string().contains("missing PEM section"), "{err}");
    }

    #[derive(Debug)]
    struct Fake;

    #[async_trait::async_trait]
    impl dynamic::CredentialsProvider for Fake {
        async fn token(&self) -> Result<Token> {
            Ok(Token {
                token: "fake-token".to_string(),
                token_type: "Bearer".to_string(),
                expires_at: None,
            })
        }

        async fn headers(&self) -> Result<HeaderMap> {
            Ok(HeaderMap::new())
        }
    }

    #[tokio::test]
    async fn from_provider() -> TestResult {
        let credentials = Credentials::from(Fake);
        assert_eq!(credentials.token().await?.token, "fake-token");
        assert!(credentials.headers().await?.is_empty());
        Ok(())
    }
}
