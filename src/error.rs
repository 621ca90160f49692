use serde::Serialize;
use thiserror::Error;

/// Boxed underlying cause kept for diagnostics.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// User-facing text for failures while setting up the connection or calling
/// a service that answered with a fault.
pub const MSG_SERVICE_UNSTABLE: &str =
    "No momento o sistema da prefeitura está instável ou inoperante, tente novamente mais tarde.";

/// User-facing text for transport failures during a call.
pub const MSG_CONNECTION_FAILURE: &str =
    "Não foi possível se conectar ao sistema da prefeitura, tente novamente mais tarde.";

/// User-facing text for an unusable client certificate.
pub const MSG_CERTIFICATE_LOAD: &str =
    "Não foi possível carregar o certificado digital, verifique o arquivo configurado.";

/// Errors surfaced by the NFS-e client.
///
/// Every lower-level failure is wrapped into one of these at the boundary where
/// it happens. The original cause stays reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NfseError {
    /// The combined certificate/key file is missing, unreadable or unusable.
    #[error("{message}: {source}")]
    CertificateLoad {
        message: String,
        #[source]
        source: Cause,
    },

    /// Setting up the connection to the service failed.
    #[error("{message}: {source}")]
    ServiceUnavailable {
        message: String,
        #[source]
        source: Cause,
    },

    /// A transport-level failure happened during a call.
    #[error("{message}: {source}")]
    ConnectionFailure {
        message: String,
        #[source]
        source: Cause,
    },

    /// The service answered, but with a fault or an unusable response.
    #[error("{message}: {source}")]
    ServiceUnstable {
        message: String,
        #[source]
        source: Cause,
    },

    /// The configured method name cannot be used as an XML element name.
    #[error("invalid method name '{name}': {reason}")]
    InvalidMethodName { name: String, reason: String },
}

impl NfseError {
    pub(crate) fn certificate_load(source: impl Into<Cause>) -> Self {
        Self::CertificateLoad {
            message: MSG_CERTIFICATE_LOAD.into(),
            source: source.into(),
        }
    }

    pub(crate) fn service_unavailable(source: impl Into<Cause>) -> Self {
        Self::ServiceUnavailable {
            message: MSG_SERVICE_UNSTABLE.into(),
            source: source.into(),
        }
    }

    pub(crate) fn connection_failure(source: impl Into<Cause>) -> Self {
        Self::ConnectionFailure {
            message: MSG_CONNECTION_FAILURE.into(),
            source: source.into(),
        }
    }

    pub(crate) fn service_unstable(source: impl Into<Cause>) -> Self {
        Self::ServiceUnstable {
            message: MSG_SERVICE_UNSTABLE.into(),
            source: source.into(),
        }
    }

    /// Stable kind for programmatic branching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CertificateLoad { .. } => ErrorKind::CertificateLoadFailure,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            Self::ServiceUnstable { .. } => ErrorKind::ServiceUnstable,
            Self::InvalidMethodName { .. } => ErrorKind::InvalidMethodName,
        }
    }

    /// Human-readable message without the underlying cause.
    pub fn message(&self) -> &str {
        match self {
            Self::CertificateLoad { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::ConnectionFailure { message, .. }
            | Self::ServiceUnstable { message, .. } => message,
            Self::InvalidMethodName { reason, .. } => reason,
        }
    }
}

/// Error kinds, one per [`NfseError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
pub enum ErrorKind {
    CertificateLoadFailure,
    ServiceUnavailable,
    ConnectionFailure,
    ServiceUnstable,
    InvalidMethodName,
}

impl ErrorKind {
    /// Get the string code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CertificateLoadFailure => "CERTIFICATE_LOAD_FAILURE",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::ConnectionFailure => "CONNECTION_FAILURE",
            Self::ServiceUnstable => "SERVICE_UNSTABLE",
            Self::InvalidMethodName => "INVALID_METHOD_NAME",
        }
    }

    /// Whether retrying later may succeed without changing configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable | Self::ConnectionFailure | Self::ServiceUnstable
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from loading or validating [`Settings`](crate::Settings).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid YAML for the expected shape.
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A required value is missing or empty.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kind_codes() {
        assert_eq!(ErrorKind::ConnectionFailure.as_str(), "CONNECTION_FAILURE");
        assert_eq!(ErrorKind::ServiceUnstable.to_string(), "SERVICE_UNSTABLE");
    }

    #[test]
    fn certificate_failure_is_not_retryable() {
        assert!(!ErrorKind::CertificateLoadFailure.is_retryable());
        assert!(!ErrorKind::InvalidMethodName.is_retryable());
        assert!(ErrorKind::ServiceUnavailable.is_retryable());
        assert!(ErrorKind::ConnectionFailure.is_retryable());
        assert!(ErrorKind::ServiceUnstable.is_retryable());
    }

    #[test]
    fn cause_is_preserved() {
        let err = NfseError::connection_failure("connection refused");
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
        assert_eq!(err.message(), MSG_CONNECTION_FAILURE);
        assert!(err.to_string().ends_with("connection refused"));
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
    }
}
