//! Protocol Client: one service binding, one request/response cycle per call.

use tracing::{debug, info, instrument, warn};

use super::envelope::{build_envelope, derive_operation, validate_method_name};
use super::response::{ResponseError, SoapResponse};
use super::sanitize::sanitize;
use super::transport::{SoapRequest, Transport, TransportError};
use crate::config::ServiceDescriptor;
use crate::error::NfseError;

/// Failure raised while a call is in flight, before it is mapped to an [`NfseError`].
#[derive(Debug)]
pub enum CallFailure {
    /// Nothing usable came back from the network.
    Transport(TransportError),
    /// The service answered with a fault, an error status or garbage.
    Remote(ResponseError),
}

/// Map an in-flight failure to the public taxonomy.
pub fn map_fault(failure: CallFailure) -> NfseError {
    match failure {
        CallFailure::Transport(e) => NfseError::connection_failure(e),
        CallFailure::Remote(e) => NfseError::service_unstable(e),
    }
}

/// SOAP client for a single BHISS method.
///
/// Holds the transport by composition; the envelope and fault mapping are
/// explicit steps of [`call`](Self::call). One instance serves one caller at a
/// time, and concurrent callers each build their own.
#[derive(Debug)]
pub struct NfseClient<T> {
    descriptor: ServiceDescriptor,
    method: String,
    transport: T,
    payload: Option<String>,
    last_request: Option<String>,
    last_response: Option<String>,
}

#[cfg(feature = "http")]
impl NfseClient<super::transport::HttpTransport> {
    /// Load the certificate, build the HTTPS transport and bind to `method`.
    ///
    /// # Errors
    ///
    /// `InvalidMethodName` for a method that cannot be an element name,
    /// `CertificateLoad` when the bundle is unusable, `ServiceUnavailable`
    /// when the settings are incomplete, the transport cannot be set up or
    /// the availability probe fails.
    pub fn connect(settings: &crate::Settings, method: &str) -> Result<Self, NfseError> {
        validate_method_name(method)?;
        settings.validate().map_err(NfseError::service_unavailable)?;
        let descriptor = settings.service_descriptor();
        let tls = crate::tls::TlsClientContext::from_bundle(&settings.certificate, &descriptor)?;
        let transport = super::transport::HttpTransport::new(&descriptor, &tls)
            .map_err(NfseError::service_unavailable)?;
        Self::with_transport(descriptor, method, transport)
    }
}

impl<T: Transport> NfseClient<T> {
    /// Bind `method` to an existing transport.
    ///
    /// The endpoint must be an `http` or `https` URL; when
    /// `probe_on_connect` is set the transport is asked to reach it first.
    pub fn with_transport(
        descriptor: ServiceDescriptor,
        method: &str,
        transport: T,
    ) -> Result<Self, NfseError> {
        validate_method_name(method)?;
        check_location(&descriptor.url)?;
        if descriptor.probe_on_connect {
            transport.probe(&descriptor.url).map_err(|e| {
                warn!(location = %descriptor.url, error = %e, "NFS-e service probe failed");
                NfseError::service_unavailable(e)
            })?;
        }
        info!(
            method,
            location = %descriptor.url,
            soap_version = ?descriptor.soap_version,
            "NFS-e client ready"
        );
        Ok(Self {
            descriptor,
            method: method.to_string(),
            transport,
            payload: None,
            last_request: None,
            last_response: None,
        })
    }

    /// Hold `xml` as the business payload for the next call.
    pub fn set_payload(&mut self, xml: impl Into<String>) {
        self.payload = Some(xml.into());
    }

    /// Method name as configured, used inside the envelope.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Operation name used for dispatch.
    pub fn operation(&self) -> &str {
        derive_operation(&self.method)
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Last envelope sent, when tracing is enabled.
    pub fn last_request(&self) -> Option<&str> {
        self.last_request.as_deref()
    }

    /// Last raw response body, when tracing is enabled.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Build the wire request for the held payload.
    pub fn build_request(&self) -> SoapRequest {
        let payload = match &self.payload {
            Some(xml) => sanitize(xml),
            None => {
                warn!(method = %self.method, "No payload set, sending an empty nfseDadosMsg");
                String::new()
            }
        };
        let operation = self.operation();
        SoapRequest {
            location: self.descriptor.url.clone(),
            operation: operation.to_string(),
            soap_action: self.descriptor.soap_action(operation),
            soap_version: self.descriptor.soap_version,
            envelope: build_envelope(&self.method, &payload),
        }
    }

    /// Send the held payload and wait for the answer.
    ///
    /// No retries happen here.
    ///
    /// # Errors
    ///
    /// `ConnectionFailure` when the transport fails, `ServiceUnstable` when the
    /// service answers with a fault, a non-2xx status or a malformed body.
    #[instrument(skip(self), fields(method = %self.method))]
    pub fn call(&mut self) -> Result<SoapResponse, NfseError> {
        let request = self.build_request();
        debug!(
            operation = %request.operation,
            location = %request.location,
            bytes = request.envelope.len(),
            "Sending NFS-e request"
        );
        if self.descriptor.trace_enabled {
            self.last_request = Some(request.envelope.clone());
            self.last_response = None;
        }

        let raw = self.transport.send(&request).map_err(|e| {
            warn!(operation = %request.operation, error = %e, "NFS-e transport failure");
            map_fault(CallFailure::Transport(e))
        })?;

        if self.descriptor.trace_enabled {
            self.last_response = Some(raw.body.clone());
        }

        let response = SoapResponse::new(raw.status, raw.body);
        response.check().map_err(|e| {
            warn!(operation = %request.operation, status = response.status, error = %e, "NFS-e service failure");
            map_fault(CallFailure::Remote(e))
        })?;

        info!(operation = %request.operation, status = response.status, "NFS-e call completed");
        Ok(response)
    }
}

#[cfg(feature = "http")]
fn check_location(url: &str) -> Result<(), NfseError> {
    let invalid = |reason: String| {
        NfseError::service_unavailable(format!("invalid service location '{url}': {reason}"))
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    Ok(())
}

#[cfg(not(feature = "http"))]
fn check_location(url: &str) -> Result<(), NfseError> {
    let valid = url
        .split_once("://")
        .is_some_and(|(scheme, rest)| matches!(scheme, "http" | "https") && !rest.is_empty());
    if valid {
        Ok(())
    } else {
        Err(NfseError::service_unavailable(format!(
            "invalid service location '{url}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::soap::transport::RawResponse;

    #[derive(Debug)]
    struct Fixed;

    impl Transport for Fixed {
        fn send(&self, _request: &SoapRequest) -> Result<RawResponse, TransportError> {
            Ok(RawResponse {
                status: 200,
                body: r#"<S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/"><S:Body/></S:Envelope>"#.into(),
            })
        }
    }

    #[test]
    fn transport_failures_map_to_connection_failure() {
        let err = map_fault(CallFailure::Transport(TransportError::Timeout("30s".into())));
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    }

    #[test]
    fn remote_failures_map_to_service_unstable() {
        let err = map_fault(CallFailure::Remote(ResponseError::Status { status: 500 }));
        assert_eq!(err.kind(), ErrorKind::ServiceUnstable);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn location_must_be_http() {
        let desc = ServiceDescriptor::new("ftp://example.test");
        let err = NfseClient::with_transport(desc, "GerarNfse", Fixed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);

        let desc = ServiceDescriptor::new("");
        assert!(NfseClient::with_transport(desc, "GerarNfse", Fixed).is_err());
    }

    #[cfg(feature = "http")]
    #[test]
    fn location_needs_a_host() {
        for url in ["https://", "https://:443/nfse", "not a url", "mailto:nfse@pbh.gov.br"] {
            let err = NfseClient::with_transport(ServiceDescriptor::new(url), "GerarNfse", Fixed)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ServiceUnavailable, "{url}");
        }
    }

    #[test]
    fn request_carries_operation_and_location() {
        let desc = ServiceDescriptor::new("https://example.test/nfse?wsdl");
        let mut client = NfseClient::with_transport(desc, "GerarNfseRequest", Fixed).unwrap();
        client.set_payload("<GerarNfseEnvio/>\n");
        let req = client.build_request();
        assert_eq!(req.operation, "GerarNfse");
        assert_eq!(req.location, "https://example.test/nfse?wsdl");
        assert_eq!(req.soap_action, "");
        assert!(req.envelope.contains("<ns2:GerarNfseRequest "));
        assert!(req.envelope.contains("<![CDATA[<GerarNfseEnvio/>]]>"));
    }

    #[test]
    fn trace_is_off_by_default() {
        let desc = ServiceDescriptor::new("https://example.test/nfse");
        let mut client = NfseClient::with_transport(desc, "GerarNfse", Fixed).unwrap();
        client.call().unwrap();
        assert!(client.last_request().is_none());
        assert!(client.last_response().is_none());
    }
}
