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

//! Selects the service account key file used to sign requests.
//!
//! The locator tries, in order:
//!
//! 1. An explicit override, typically from the
//!    `GOOGLE_APPLICATION_CREDENTIALS` environment variable or a command-line
//!    flag. The override is returned as-is, even if the file does not exist.
//! 2. A project-specific key file. The project id is read from a `KEY=value`
//!    configuration file (by default `PROJECT_ID` in `.env`) and formatted
//!    into a naming pattern (by default `service-account-{project_id}.json`).
//!    This path is only used if it exists.
//! 3. A default key file (by default `service_account.json`), only used if
//!    it exists.
//!
//! If none of these apply the locator returns an error where
//! [is_not_found()][crate::build_errors::Error::is_not_found] is `true`. The
//! error carries a hint describing how to provision the key.
//!
//! [resolve] is a pure function: the existence check and the configuration
//! reader are parameters. [resolve_from_fs] uses the local filesystem.
//!
//! # Example
//! ```
//! # use cloud_run_auth::locator::{Options, Source, resolve};
//! # use std::path::Path;
//! let options = Options::default();
//! let exists = |p: &Path| p == Path::new("service-account-acme.json");
//! let read_config = |_: &Path| Some("PROJECT_ID=acme".to_string());
//! let found = resolve(&options, exists, read_config)?;
//! assert_eq!(found.path(), Path::new("service-account-acme.json"));
//! assert_eq!(found.source(), Source::Project);
//! assert_eq!(found.project_id(), Some("acme"));
//! # Ok::<(), cloud_run_auth::build_errors::Error>(())
//! ```

use crate::BuildResult;
use crate::build_errors::Error;
use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_KEY_FILE, PROJECT_ID_KEY, PROJECT_KEY_FILE_PATTERN,
    PROVISIONING_HINT,
};
use crate::project_config::ProjectConfig;
use std::path::{Path, PathBuf};

const PROJECT_ID_PLACEHOLDER: &str = "{project_id}";

/// Which rule selected a [CredentialReference].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// The explicit override.
    Override,
    /// The project-specific key file.
    Project,
    /// The default key file.
    Default,
}

/// The result of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialReference {
    path: PathBuf,
    project_id: Option<String>,
    source: Source,
}

impl CredentialReference {
    /// The path of the service account key file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The project id found in the configuration file, if it was consulted
    /// and contained one.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The rule that selected [path][CredentialReference::path].
    pub fn source(&self) -> Source {
        self.source
    }

    /// Consumes the reference, returning the key file path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Configures the locator.
///
/// The defaults match the layout created by the project setup scripts.
#[derive(Clone, Debug)]
pub struct Options {
    override_path: Option<PathBuf>,
    config_file: PathBuf,
    project_id_key: String,
    project_pattern: String,
    default_path: PathBuf,
    remediation: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            override_path: None,
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            project_id_key: PROJECT_ID_KEY.to_string(),
            project_pattern: PROJECT_KEY_FILE_PATTERN.to_string(),
            default_path: PathBuf::from(DEFAULT_KEY_FILE),
            remediation: PROVISIONING_HINT.to_string(),
        }
    }
}

impl Options {
    /// Sets the explicit override.
    ///
    /// An empty path is treated as if no override was given.
    pub fn with_override_path<P: Into<PathBuf>>(mut self, v: P) -> Self {
        self.override_path = Some(v.into()).filter(|p: &PathBuf| !p.as_os_str().is_empty());
        self
    }

    /// Sets the configuration file that may contain the project id.
    pub fn with_config_file<P: Into<PathBuf>>(mut self, v: P) -> Self {
        self.config_file = v.into();
        self
    }

    /// Sets the configuration key holding the project id.
    pub fn with_project_id_key<S: Into<String>>(mut self, v: S) -> Self {
        self.project_id_key = v.into();
        self
    }

    /// Sets the naming pattern for project-specific key files.
    ///
    /// Every `{project_id}` in the pattern is replaced by the project id.
    pub fn with_project_pattern<S: Into<String>>(mut self, v: S) -> Self {
        self.project_pattern = v.into();
        self
    }

    /// Sets the default key file.
    pub fn with_default_path<P: Into<PathBuf>>(mut self, v: P) -> Self {
        self.default_path = v.into();
        self
    }

    /// Sets the hint included in "not found" errors.
    pub fn with_remediation<S: Into<String>>(mut self, v: S) -> Self {
        self.remediation = v.into();
        self
    }

    /// The configuration file that may contain the project id.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    fn project_path(&self, project_id: &str) -> PathBuf {
        PathBuf::from(self.project_pattern.replace(PROJECT_ID_PLACEHOLDER, project_id))
    }
}

/// Resolves the key file path.
///
/// # Parameters
/// * `options` - the locator configuration.
/// * `exists` - returns `true` if a candidate key file exists.
/// * `read_config` - returns the contents of the configuration file, or
///   `None` if it cannot be read.
///
/// The function has no side effects beyond calling `exists` and
/// `read_config`, so the same inputs always produce the same result.
pub fn resolve<E, R>(
    options: &Options,
    exists: E,
    read_config: R,
) -> BuildResult<CredentialReference>
where
    E: Fn(&Path) -> bool,
    R: Fn(&Path) -> Option<String>,
{
    if let Some(path) = &options.override_path {
        tracing::debug!("using key file override {}", path.display());
        return Ok(CredentialReference {
            path: path.clone(),
            project_id: None,
            source: Source::Override,
        });
    }

    let project_id = read_config(&options.config_file)
        .and_then(|contents| {
            ProjectConfig::parse(&contents)
                .get(&options.project_id_key)
                .map(str::to_string)
        })
        .filter(|id| {
            let valid = is_valid_project_id(id);
            if !valid {
                tracing::debug!("ignoring project id {id:?}, it is not a plain file name");
            }
            valid
        });

    let mut candidates = Vec::new();
    if let Some(id) = &project_id {
        let path = options.project_path(id);
        if exists(&path) {
            tracing::debug!("using key file {} for project {id}", path.display());
            return Ok(CredentialReference {
                path,
                project_id,
                source: Source::Project,
            });
        }
        tracing::debug!("key file {} for project {id} does not exist", path.display());
        candidates.push(path);
    } else {
        tracing::debug!(
            "no {} found in {}",
            options.project_id_key,
            options.config_file.display()
        );
    }

    if exists(&options.default_path) {
        tracing::debug!("using default key file {}", options.default_path.display());
        return Ok(CredentialReference {
            path: options.default_path.clone(),
            project_id,
            source: Source::Default,
        });
    }
    candidates.push(options.default_path.clone());

    Err(Error::not_found(&candidates, &options.remediation))
}

// A project id must be a single file name component.
fn is_valid_project_id(id: &str) -> bool {
    !id.contains(['/', '\\']) && id != "." && id != ".."
}

/// Resolves the key file path using the local filesystem.
///
/// A candidate "exists" if it is a regular file (or a symlink to one).
/// A configuration file that is missing or unreadable is ignored.
pub fn resolve_from_fs(options: &Options) -> BuildResult<CredentialReference> {
    resolve(options, Path::is_file, |path| {
        std::fs::read_to_string(path)
            .inspect_err(|e| {
                tracing::debug!("cannot read configuration file {}: {e}", path.display())
            })
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    fn config(contents: &'static str) -> impl Fn(&Path) -> Option<String> {
        move |_: &Path| Some(contents.to_string())
    }

    fn no_config(_: &Path) -> Option<String> {
        None
    }

    fn existing(paths: &'static [&'static str]) -> impl Fn(&Path) -> bool {
        move |p: &Path| paths.iter().any(|e| p == Path::new(e))
    }

    #[test_case(None; "without config")]
    #[test_case(Some("PROJECT_ID=acme"); "with config")]
    fn override_wins(contents: Option<&'static str>) -> TestResult {
        let options = Options::default().with_override_path("/keys/override.json");
        let got = resolve(
            &options,
            existing(&["service-account-acme.json", "service_account.json"]),
            move |_| contents.map(str::to_string),
        )?;
        assert_eq!(got.path(), Path::new("/keys/override.json"));
        assert_eq!(got.source(), Source::Override);
        assert_eq!(got.project_id(), None);
        Ok(())
    }

    #[test]
    fn override_skips_existence_check() -> TestResult {
        let options = Options::default().with_override_path("does-not-exist.json");
        let got = resolve(
            &options,
            |p| panic!("unexpected existence check for {}", p.display()),
            |p| panic!("unexpected config read for {}", p.display()),
        )?;
        assert_eq!(got.path(), Path::new("does-not-exist.json"));
        Ok(())
    }

    #[test]
    fn empty_override_is_ignored() -> TestResult {
        let options = Options::default().with_override_path("");
        let got = resolve(&options, existing(&["service_account.json"]), no_config)?;
        assert_eq!(got.source(), Source::Default);
        Ok(())
    }

    #[test]
    fn project_specific() -> TestResult {
        let got = resolve(
            &Options::default(),
            existing(&["service-account-acme.json", "service_account.json"]),
            config("PROJECT_ID=acme\n"),
        )?;
        assert_eq!(got.path(), Path::new("service-account-acme.json"));
        assert_eq!(got.source(), Source::Project);
        assert_eq!(got.project_id(), Some("acme"));
        Ok(())
    }

    #[test]
    fn project_specific_missing_falls_back_to_default() -> TestResult {
        let got = resolve(
            &Options::default(),
            existing(&["service_account.json"]),
            config("PROJECT_ID=acme\n"),
        )?;
        assert_eq!(got.path(), Path::new("service_account.json"));
        assert_eq!(got.source(), Source::Default);
        assert_eq!(got.project_id(), Some("acme"));
        Ok(())
    }

    #[test_case(None; "no config file")]
    #[test_case(Some(""); "empty config file")]
    #[test_case(Some("REGION=us-central1"); "config without project")]
    fn default_without_project(contents: Option<&'static str>) -> TestResult {
        let got = resolve(
            &Options::default(),
            existing(&["service_account.json"]),
            move |_| contents.map(str::to_string),
        )?;
        assert_eq!(got.path(), Path::new("service_account.json"));
        assert_eq!(got.source(), Source::Default);
        assert_eq!(got.project_id(), None);
        Ok(())
    }

    #[test_case("PROJECT_ID=../../etc/acme"; "parent directories")]
    #[test_case("PROJECT_ID=acme/keys"; "nested")]
    #[test_case("PROJECT_ID=..\\acme"; "windows separator")]
    #[test_case("PROJECT_ID=.."; "parent")]
    fn project_id_with_path_components(contents: &'static str) -> TestResult {
        let checked = std::cell::RefCell::new(Vec::new());
        let got = resolve(
            &Options::default(),
            |p: &Path| {
                checked.borrow_mut().push(p.to_path_buf());
                true
            },
            config(contents),
        )?;
        assert_eq!(got.source(), Source::Default);
        assert_eq!(got.project_id(), None);
        assert_eq!(
            checked.into_inner(),
            vec![PathBuf::from("service_account.json")]
        );
        Ok(())
    }

    #[test]
    fn not_found() {
        let got = resolve(&Options::default(), existing(&[]), config("PROJECT_ID=acme"));
        let err = got.unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
        assert_eq!(err.remediation(), Some(PROVISIONING_HINT));
        let msg = err.to_string();
        assert!(msg.contains("service-account-acme.json"), "{msg}");
        assert!(msg.contains("service_account.json"), "{msg}");
    }

    #[test]
    fn not_found_without_config() {
        let got = resolve(&Options::default(), existing(&[]), no_config);
        let err = got.unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
        assert!(!err.to_string().contains("service-account-"), "{err}");
    }

    #[test]
    fn idempotent() {
        let options = Options::default();
        let exists = existing(&["service-account-acme.json"]);
        let read_config = config("PROJECT_ID=acme");
        let first = resolve(&options, &exists, &read_config).ok();
        let second = resolve(&options, &exists, &read_config).ok();
        assert!(first.is_some());
        assert_eq!(first, second);

        let exists = existing(&[]);
        let first = resolve(&options, &exists, &read_config).map_err(|e| e.to_string());
        let second = resolve(&options, &exists, &read_config).map_err(|e| e.to_string());
        assert!(first.is_err());
        assert_eq!(first, second);
    }

    #[test]
    fn at_most_two_existence_checks() {
        let checks = Cell::new(0);
        let _ = resolve(
            &Options::default(),
            |_| {
                checks.set(checks.get() + 1);
                false
            },
            config("PROJECT_ID=acme"),
        );
        assert_eq!(checks.get(), 2);
    }

    #[test]
    fn custom_options() -> TestResult {
        let options = Options::default()
            .with_config_file("settings.conf")
            .with_project_id_key("GCP_PROJECT")
            .with_project_pattern("keys/{project_id}/sa.json")
            .with_default_path("keys/default.json")
            .with_remediation("ask an admin");
        let read_config = |p: &Path| {
            assert_eq!(p, Path::new("settings.conf"));
            Some("PROJECT_ID=wrong\nGCP_PROJECT=acme".to_string())
        };
        let got = resolve(&options, existing(&["keys/acme/sa.json"]), read_config)?;
        assert_eq!(got.path(), Path::new("keys/acme/sa.json"));
        assert_eq!(options.config_file(), Path::new("settings.conf"));

        let err = resolve(&options, existing(&[]), no_config).unwrap_err();
        assert_eq!(err.remediation(), Some("ask an admin"));
        Ok(())
    }

    #[test]
    fn from_fs() -> TestResult {
        let dir = tempfile::tempdir()?;
        let config_file = dir.path().join(".env");
        let mut file = std::fs::File::create(&config_file)?;
        writeln!(file, "PROJECT_ID=acme")?;
        let pattern = format!("{}/service-account-{{project_id}}.json", dir.path().display());
        let default_path = dir.path().join("service_account.json");
        let options = Options::default()
            .with_config_file(&config_file)
            .with_project_pattern(pattern)
            .with_default_path(&default_path);

        let err = resolve_from_fs(&options).unwrap_err();
        assert!(err.is_not_found(), "{err:?}");

        std::fs::write(&default_path, "{}")?;
        let got = resolve_from_fs(&options)?;
        assert_eq!(got.path(), default_path.as_path());
        assert_eq!(got.project_id(), Some("acme"));

        let project_path = dir.path().join("service-account-acme.json");
        std::fs::write(&project_path, "{}")?;
        let got = resolve_from_fs(&options)?;
        assert_eq!(got.clone().into_path(), project_path);
        assert_eq!(got.source(), Source::Project);
        Ok(())
    }

    #[test]
    fn from_fs_ignores_directories() -> TestResult {
        let dir = tempfile::tempdir()?;
        let options = Options::default()
            .with_config_file(dir.path().join("missing.env"))
            .with_default_path(dir.path());
        let err = resolve_from_fs(&options).unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
        Ok(())
    }
}
