//! Read-only service and certificate descriptors handed to the client.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// SOAP versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoapVersion {
    /// SOAP 1.1 (namespace: http://schemas.xmlsoap.org/soap/envelope/)
    #[default]
    #[serde(rename = "1.1")]
    Soap11,
    /// SOAP 1.2 (namespace: http://www.w3.org/2003/05/soap-envelope)
    #[serde(rename = "1.2")]
    Soap12,
}

impl SoapVersion {
    /// `Content-Type` header for a request carrying `soap_action`.
    pub fn content_type(&self, soap_action: &str) -> String {
        match self {
            Self::Soap11 => "text/xml; charset=utf-8".to_string(),
            Self::Soap12 if soap_action.is_empty() => {
                "application/soap+xml; charset=utf-8".to_string()
            }
            Self::Soap12 => format!("application/soap+xml; charset=utf-8; action=\"{soap_action}\""),
        }
    }
}

/// SOAP binding style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BindingStyle {
    Rpc,
    #[default]
    Document,
}

/// SOAP body encoding (`use` attribute of the binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Encoded,
    #[default]
    Literal,
}

/// Endpoint and binding options for one web service.
///
/// Built once by [`Settings::service_descriptor`](crate::Settings::service_descriptor)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// WSDL or endpoint URL. Also sent as the call-time location.
    pub url: String,
    pub soap_version: SoapVersion,
    pub style: BindingStyle,
    pub encoding: Encoding,
    /// Keep the last request/response bodies on the client.
    pub trace_enabled: bool,
    /// Accept gzip-compressed responses.
    pub compression_enabled: bool,
    pub connection_timeout_ms: u64,
    pub cache_descriptor: bool,
    pub ssl_verify_peer: bool,
    pub ssl_verify_peer_hostname: bool,
    /// Prefix for the SOAPAction header; `None` sends an empty action.
    pub soap_action_base: Option<String>,
    /// Check the endpoint answers before the first call. On by default;
    /// turn it off to build clients without touching the network.
    pub probe_on_connect: bool,
}

impl ServiceDescriptor {
    /// Descriptor with default binding options for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            soap_version: SoapVersion::default(),
            style: BindingStyle::default(),
            encoding: Encoding::default(),
            trace_enabled: false,
            compression_enabled: false,
            connection_timeout_ms: super::DEFAULT_CONNECTION_TIMEOUT_MS,
            cache_descriptor: true,
            ssl_verify_peer: true,
            ssl_verify_peer_hostname: true,
            soap_action_base: None,
            probe_on_connect: true,
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// SOAPAction value for `operation`.
    pub fn soap_action(&self, operation: &str) -> String {
        match &self.soap_action_base {
            Some(base) => format!("{base}{operation}"),
            None => String::new(),
        }
    }
}

/// Location of the combined certificate + private key PEM file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CertificateBundle {
    /// Directory holding the bundle.
    pub directory: PathBuf,
    /// File name of the PEM with certificate chain and unencrypted key.
    pub combined_file: String,
}

impl CertificateBundle {
    pub fn new(directory: impl AsRef<Path>, combined_file: impl Into<String>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            combined_file: combined_file.into(),
        }
    }

    /// Full path of the bundle file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.combined_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soap_11_content_type_ignores_action() {
        assert_eq!(
            SoapVersion::Soap11.content_type("urn:x"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn soap_12_content_type_carries_action() {
        assert_eq!(
            SoapVersion::Soap12.content_type("urn:x"),
            "application/soap+xml; charset=utf-8; action=\"urn:x\""
        );
        assert_eq!(
            SoapVersion::Soap12.content_type(""),
            "application/soap+xml; charset=utf-8"
        );
    }

    #[test]
    fn soap_action_from_base() {
        let mut desc = ServiceDescriptor::new("https://example.test/nfse");
        assert_eq!(desc.soap_action("GerarNfse"), "");
        desc.soap_action_base = Some("http://ws.bhiss.pbh.gov.br/".into());
        assert_eq!(
            desc.soap_action("GerarNfse"),
            "http://ws.bhiss.pbh.gov.br/GerarNfse"
        );
    }

    #[test]
    fn bundle_path_joins_directory() {
        let bundle = CertificateBundle::new("/etc/nfse/certs", "empresa.pem");
        assert_eq!(bundle.path(), PathBuf::from("/etc/nfse/certs/empresa.pem"));
    }
}
