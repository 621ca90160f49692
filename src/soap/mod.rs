//! BHISS SOAP layer: payload sanitizing, envelope construction, transport
//! and the protocol client.
//!
//! # Example
//!
//! ```
//! use bhiss_nfse::soap::*;
//!
//! let payload = sanitize("<?xml version=\"1.0\"?>\n<Lote>...</Lote>");
//! assert_eq!(payload, "<Lote>...</Lote>");
//!
//! let envelope = build_envelope("RecepcionarLoteRpsRequest", &payload);
//! assert!(envelope.contains("<nfseDadosMsg><![CDATA[<Lote>...</Lote>]]></nfseDadosMsg>"));
//! assert_eq!(derive_operation("RecepcionarLoteRpsRequest"), "RecepcionarLoteRps");
//! ```

mod client;
mod envelope;
mod response;
mod sanitize;
mod transport;

pub use client::{CallFailure, NfseClient, map_fault};
pub use envelope::{
    BHISS_NS, CABECALHO, SOAP_ENV_NS, build_envelope, derive_operation, validate_method_name,
};
pub use response::{ResponseError, SoapFault, SoapResponse};
pub use sanitize::{NOISE_FRAGMENTS, XML_DECLARATIONS, sanitize};
pub use transport::{RawResponse, SoapRequest, Transport, TransportError};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
