//! Settings Provider: per-environment endpoint, binding options and the
//! certificate bundle location.
//!
//! Settings are read from YAML; every key is optional and falls back to the
//! Belo Horizonte defaults.
//!
//! # Example
//!
//! ```
//! use bhiss_nfse::config::*;
//!
//! let settings = Settings::from_yaml_str(r#"
//! environment: homologation
//! certificate:
//!   directory: /etc/nfse/certs
//!   combined_file: empresa.pem
//! "#).unwrap();
//!
//! let desc = settings.service_descriptor();
//! assert_eq!(desc.url, HOMOLOGATION_URL);
//! assert_eq!(desc.soap_version, SoapVersion::Soap11);
//! ```

mod descriptor;
mod settings;

pub use descriptor::{BindingStyle, CertificateBundle, Encoding, ServiceDescriptor, SoapVersion};
pub use settings::{Endpoints, Environment, Settings, WebServiceConfig};

/// BHISS production endpoint.
pub const PRODUCTION_URL: &str = "https://bhissdigitalws.pbh.gov.br/bhiss-ws/nfse?wsdl";

/// BHISS test ("homologação") endpoint.
pub const HOMOLOGATION_URL: &str = "https://bhisshomologaws.pbh.gov.br/bhiss-ws/nfse?wsdl";

pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 30_000;
