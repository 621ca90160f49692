//! # bhiss-nfse
//!
//! Protocol-layer client for the Belo Horizonte BHISS NFS-e web service
//! (ABRASF 1.00 layout): builds the non-standard SOAP envelope the service
//! expects, authenticates with a client certificate over mutual TLS, and
//! reduces every transport or protocol failure to a small set of error kinds.
//!
//! The signed business XML (the `Lote`, the `Rps`, the signature) is produced
//! elsewhere; this crate only sanitizes and ships it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bhiss_nfse::{NfseClient, Settings};
//!
//! let settings = Settings::load("nfse.yaml").unwrap();
//! let mut client = NfseClient::connect(&settings, "RecepcionarLoteRpsRequest").unwrap();
//! client.set_payload(r#"<?xml version="1.0"?><EnviarLoteRpsEnvio>...</EnviarLoteRpsEnvio>"#);
//!
//! match client.call() {
//!     Ok(response) => println!("{}", response.output_xml().unwrap_or_default()),
//!     Err(e) if e.kind().is_retryable() => eprintln!("try again later: {e}"),
//!     Err(e) => eprintln!("configuration problem: {e}"),
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `http` (default) | reqwest/rustls transport, certificate loading, `NfseClient::connect` |
//!
//! Without `http` the sanitizer, envelope builder, response parser and the
//! client orchestration over a caller-supplied [`Transport`] remain available.

pub mod config;
pub mod error;
pub mod soap;

#[cfg(feature = "http")]
pub mod tls;

pub use crate::config::{
    BindingStyle, CertificateBundle, Encoding, Environment, ServiceDescriptor, Settings,
    SoapVersion,
};
pub use crate::error::{ErrorKind, NfseError, SettingsError};
pub use crate::soap::{NfseClient, RawResponse, SoapRequest, SoapResponse, Transport, TransportError};

#[cfg(feature = "http")]
pub use crate::soap::HttpTransport;
#[cfg(feature = "http")]
pub use crate::tls::TlsClientContext;
