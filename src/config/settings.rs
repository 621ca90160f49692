use serde::{Deserialize, Serialize};
use std::path::Path;

use super::descriptor::{BindingStyle, CertificateBundle, Encoding, ServiceDescriptor, SoapVersion};
use super::{DEFAULT_CONNECTION_TIMEOUT_MS, HOMOLOGATION_URL, PRODUCTION_URL};
use crate::error::SettingsError;

/// Top-level settings for one issuer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Which endpoint to talk to.
    pub environment: Environment,

    /// Client certificate bundle
    pub certificate: CertificateBundle,

    /// Web service binding options
    pub webservice: WebServiceConfig,
}

/// Target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    /// Test environment ("homologação").
    #[default]
    Homologation,
}

/// Web service options as written in the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServiceConfig {
    pub endpoints: Endpoints,
    pub soap_version: SoapVersion,
    pub style: BindingStyle,
    #[serde(rename = "use")]
    pub encoding: Encoding,
    pub trace: bool,
    pub compression: bool,
    pub connection_timeout_ms: u64,
    pub cache_wsdl: bool,
    pub ssl_verify_peer: bool,
    pub ssl_verify_peer_name: bool,
    pub soap_action_base: Option<String>,
    pub probe_on_connect: bool,
}

impl Default for WebServiceConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            soap_version: SoapVersion::Soap11,
            style: BindingStyle::Document,
            encoding: Encoding::Literal,
            trace: false,
            compression: false,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            cache_wsdl: true,
            ssl_verify_peer: true,
            ssl_verify_peer_name: true,
            soap_action_base: None,
            probe_on_connect: true,
        }
    }
}

/// Endpoint URL per environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub production: String,
    pub homologation: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            production: PRODUCTION_URL.to_string(),
            homologation: HOMOLOGATION_URL.to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a YAML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loading NFS-e settings");
        Self::from_yaml_str(&content)
    }

    /// Check that the values needed to build a client are present.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.endpoint().trim().is_empty() {
            return Err(SettingsError::Invalid(format!(
                "no endpoint configured for the {:?} environment",
                self.environment
            )));
        }
        if self.certificate.combined_file.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "certificate.combined_file must not be empty".into(),
            ));
        }
        if self.webservice.connection_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "webservice.connection_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint URL of the active environment.
    pub fn endpoint(&self) -> &str {
        match self.environment {
            Environment::Production => &self.webservice.endpoints.production,
            Environment::Homologation => &self.webservice.endpoints.homologation,
        }
    }

    /// Resolve the immutable descriptor for the active environment.
    pub fn service_descriptor(&self) -> ServiceDescriptor {
        let ws = &self.webservice;
        ServiceDescriptor {
            url: self.endpoint().to_string(),
            soap_version: ws.soap_version,
            style: ws.style,
            encoding: ws.encoding,
            trace_enabled: ws.trace,
            compression_enabled: ws.compression,
            connection_timeout_ms: ws.connection_timeout_ms,
            cache_descriptor: ws.cache_wsdl,
            ssl_verify_peer: ws.ssl_verify_peer,
            ssl_verify_peer_hostname: ws.ssl_verify_peer_name,
            soap_action_base: ws.soap_action_base.clone(),
            probe_on_connect: ws.probe_on_connect,
        }
    }
}
