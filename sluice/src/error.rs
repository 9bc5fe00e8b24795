//! Error types and result definitions for reconciliation operations.
//!
//! Provides a structured error with classification and captured callsite
//! metadata. Every fallible operation in this crate returns [`SluiceResult`].

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use sluice_client::ApiClientError;

/// Convenient result type for reconciliation operations using [`SluiceError`].
pub type SluiceResult<T> = Result<T, SluiceError>;

/// Specific categories of errors that can occur during reconciliation.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Local validation errors, raised before any network call.
    ValidationError,
    InvalidDestinationField,
    InvalidIdentifier,

    // Collaborator errors.
    NotFound,
    RemoteApiError,
    DeserializationError,

    // Caller-initiated abort.
    OperationCanceled,

    // Configuration errors.
    ConfigError,

    // Unknown / uncategorized.
    Unknown,
}

/// Detailed payload stored inside a [`SluiceError`].
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

/// Main error type for reconciliation operations.
///
/// Carries an [`ErrorKind`] for classification, a static description, optional
/// dynamic detail naming the resource and operation that failed, an optional
/// source error, and the callsite that raised it.
#[derive(Debug, Clone)]
pub struct SluiceError {
    payload: ErrorPayload,
}

impl SluiceError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));
        self
    }

    /// Replaces the dynamic detail of this error and returns the modified
    /// instance.
    pub fn with_detail<D>(mut self, detail: D) -> Self
    where
        D: Into<Cow<'static, str>>,
    {
        self.payload.detail = Some(detail.into());
        self
    }

    /// Creates a [`SluiceError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
    ) -> Self {
        SluiceError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source: None,
                location: Location::caller(),
            },
        }
    }
}

/// Equality compares only the kind, so tests can assert on classification.
impl PartialEq for SluiceError {
    fn eq(&self, other: &SluiceError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl fmt::Display for SluiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let location = self.payload.location;
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.payload.kind,
            self.payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        if let Some(detail) = self.payload.detail.as_deref() {
            write!(f, "\n  Detail: {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for SluiceError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`SluiceError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for SluiceError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> SluiceError {
        SluiceError::from_components(kind, Cow::Borrowed(desc), None)
    }
}

/// Creates a [`SluiceError`] from an error kind, static description, and
/// dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for SluiceError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> SluiceError {
        SluiceError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()))
    }
}

impl From<ApiClientError> for SluiceError {
    #[track_caller]
    fn from(error: ApiClientError) -> SluiceError {
        let kind = match &error {
            ApiClientError::NotFound { .. } => ErrorKind::NotFound,
            ApiClientError::Deserialize(_) => ErrorKind::DeserializationError,
            _ => ErrorKind::RemoteApiError,
        };

        SluiceError::from_components(
            kind,
            Cow::Borrowed("control-plane call failed"),
            Some(Cow::Owned(error.to_string())),
        )
        .with_source(error)
    }
}
