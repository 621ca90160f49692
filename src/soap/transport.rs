//! Transport seam between the client and the network.

use thiserror::Error;

use crate::config::SoapVersion;

/// One envelope ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    /// URL the envelope is posted to.
    pub location: String,
    /// Operation name used for dispatch (method without the `Request` suffix).
    pub operation: String,
    /// SOAPAction value, possibly empty.
    pub soap_action: String,
    pub soap_version: SoapVersion,
    /// Complete wire envelope.
    pub envelope: String,
}

impl SoapRequest {
    pub fn content_type(&self) -> String {
        self.soap_version.content_type(&self.soap_action)
    }
}

/// Status and body as received, before any SOAP interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Low-level failures. Every variant maps to a connection failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// DNS, refused connection or any failure before a response arrived.
    #[error("connection error: {0}")]
    Connect(String),

    /// The configured timeout elapsed.
    #[error("timed out: {0}")]
    Timeout(String),

    /// TLS handshake or certificate verification failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The request could not be built or sent.
    #[error("request error: {0}")]
    Request(String),

    /// Reading the response body failed.
    #[error("error reading response body: {0}")]
    Body(String),
}

/// Sends SOAP envelopes. Implemented over reqwest by `HttpTransport`;
/// tests plug in recording fakes.
pub trait Transport {
    /// Post `request` and return whatever the server answered.
    fn send(&self, request: &SoapRequest) -> Result<RawResponse, TransportError>;

    /// Check that `location` is reachable. Called at construction when probing is on.
    fn probe(&self, location: &str) -> Result<(), TransportError> {
        let _ = location;
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &SoapRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request)
    }

    fn probe(&self, location: &str) -> Result<(), TransportError> {
        (**self).probe(location)
    }
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use reqwest::blocking::Client;
    use reqwest::header::{CONTENT_TYPE, HeaderValue};

    use super::{RawResponse, SoapRequest, Transport, TransportError};
    use crate::config::{ServiceDescriptor, SoapVersion};
    use crate::tls::TlsClientContext;

    /// Blocking reqwest transport authenticated with a client certificate.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
    }

    impl HttpTransport {
        /// Build the HTTP client from the binding options and the TLS context.
        pub fn new(
            descriptor: &ServiceDescriptor,
            tls: &TlsClientContext,
        ) -> Result<Self, reqwest::Error> {
            let timeout = descriptor.connection_timeout();
            let client = Client::builder()
                .use_rustls_tls()
                .identity(tls.identity().clone())
                .danger_accept_invalid_certs(!tls.verify_peer())
                .danger_accept_invalid_hostnames(!tls.verify_peer_hostname())
                .connect_timeout(timeout)
                .timeout(timeout)
                .gzip(descriptor.compression_enabled)
                .build()?;
            Ok(Self::from_client(client))
        }

        /// Wrap an already configured client, e.g. one without a client
        /// certificate talking to a local endpoint.
        pub fn from_client(client: Client) -> Self {
            Self { client }
        }
    }

    impl Transport for HttpTransport {
        fn send(&self, request: &SoapRequest) -> Result<RawResponse, TransportError> {
            let content_type = HeaderValue::from_str(&request.content_type())
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let mut builder = self
                .client
                .post(&request.location)
                .header(CONTENT_TYPE, content_type)
                .body(request.envelope.clone());
            if request.soap_version == SoapVersion::Soap11 {
                builder = builder.header("SOAPAction", format!("\"{}\"", request.soap_action));
            }

            let resp = builder.send().map_err(classify)?;
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .map_err(|e| TransportError::Body(e.to_string()))?;
            Ok(RawResponse { status, body })
        }

        fn probe(&self, location: &str) -> Result<(), TransportError> {
            let resp = self.client.get(location).send().map_err(classify)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Connect(format!(
                    "HTTP {status} while probing {location}"
                )));
            }
            Ok(())
        }
    }

    fn classify(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if is_tls(&e) {
            TransportError::Tls(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }

    fn is_tls(e: &reqwest::Error) -> bool {
        let mut source = std::error::Error::source(e);
        while let Some(err) = source {
            let text = err.to_string().to_ascii_lowercase();
            if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
                return true;
            }
            source = err.source();
        }
        false
    }
}
