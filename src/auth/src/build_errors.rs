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

//! Errors created while locating and loading credentials.

use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for the [locator](crate::locator) and the
/// [credentials](crate::credentials) loaders.
///
/// Applications rarely need to create instances of this error type. Use the
/// `is_*()` predicates to decide how to report a failure.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// No usable service account key file was found.
    ///
    /// Use [Error::remediation] to tell the user how to provision the key.
    pub fn is_not_found(&self) -> bool {
        matches!(self.0, ErrorKind::NotFound { .. })
    }

    /// A key file was selected, but it could not be opened or read.
    pub fn is_unreadable(&self) -> bool {
        matches!(self.0, ErrorKind::Unreadable { .. })
    }

    /// A problem parsing a credentials JSON specification.
    pub fn is_parsing(&self) -> bool {
        matches!(self.0, ErrorKind::Parsing(_))
    }

    /// The credentials type is invalid or unknown.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.0, ErrorKind::UnknownType(_))
    }

    /// The remediation hint for [Error::is_not_found] errors.
    pub fn remediation(&self) -> Option<&str> {
        match &self.0 {
            ErrorKind::NotFound { hint, .. } => Some(hint.as_str()),
            _ => None,
        }
    }

    /// The path involved in [Error::is_unreadable] errors.
    pub fn path(&self) -> Option<&Path> {
        match &self.0 {
            ErrorKind::Unreadable { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }

    /// None of the candidate paths holds a key file.
    pub(crate) fn not_found<T: Into<String>>(candidates: &[PathBuf], hint: T) -> Error {
        let candidates = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Error(ErrorKind::NotFound {
            candidates,
            hint: hint.into(),
        })
    }

    /// The key file at `path` cannot be opened or read.
    pub(crate) fn unreadable<T>(path: &Path, source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Unreadable {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// A problem parsing a credentials specification.
    pub(crate) fn parsing<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Parsing(source.into()))
    }

    /// The credential type is unknown or invalid.
    pub(crate) fn unknown_type<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::UnknownType(source.into()))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("service account key file not found, tried [{candidates}]")]
    NotFound { candidates: String, hint: String },
    #[error("service account key file {} cannot be opened or read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("cannot parse the credentials file {0}")]
    Parsing(#[source] BoxError),
    #[error("unknown or invalid credentials type {0}")]
    UnknownType(#[source] BoxError),
}
