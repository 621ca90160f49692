//! Wire envelope for BHISS calls.

use crate::error::NfseError;

/// SOAP 1.1 envelope namespace. BHISS expects it regardless of the binding version.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace of the operation element.
pub const BHISS_NS: &str = "http://ws.bhiss.pbh.gov.br";

/// Fixed ABRASF 1.00 header carried in `nfseCabecMsg`.
pub const CABECALHO: &str = r#"<cabecalho xmlns="http://www.abrasf.org.br/nfse.xsd" versao="1.00"><versaoDados>1.00</versaoDados></cabecalho>"#;

const REQUEST_SUFFIX: &str = "Request";

/// Compose the envelope for `method` with an already sanitized payload.
///
/// `method` is used verbatim as the local name of the operation element,
/// suffix included. No validation happens here; see [`validate_method_name`].
pub fn build_envelope(method: &str, payload: &str) -> String {
    let mut data = String::with_capacity(payload.len() + CABECALHO.len() + 2 * method.len() + 320);
    data.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    data.push_str(&format!(r#"<S:Envelope xmlns:S="{SOAP_ENV_NS}">"#));
    data.push_str("<S:Body>");
    data.push_str(&format!(r#"<ns2:{method} xmlns:ns2="{BHISS_NS}">"#));
    data.push_str("<nfseCabecMsg>");
    data.push_str(&format!("<![CDATA[{CABECALHO}]]>"));
    data.push_str("</nfseCabecMsg>");
    data.push_str("<nfseDadosMsg>");
    data.push_str(&format!("<![CDATA[{payload}]]>"));
    data.push_str("</nfseDadosMsg>");
    data.push_str(&format!("</ns2:{method}>"));
    data.push_str("</S:Body>");
    data.push_str("</S:Envelope>");
    data
}

/// Operation name used for dispatch: `method` without a trailing `Request`.
pub fn derive_operation(method: &str) -> &str {
    method.strip_suffix(REQUEST_SUFFIX).unwrap_or(method)
}

/// Check that `method` can be used as an unprefixed XML element name.
///
/// Only the ASCII subset of NCName is accepted, `[A-Za-z_][A-Za-z0-9_.-]*`,
/// which covers every BHISS operation. Non-ASCII names are rejected even
/// where XML would allow them.
pub fn validate_method_name(method: &str) -> Result<(), NfseError> {
    let invalid = |reason: &str| NfseError::InvalidMethodName {
        name: method.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = method.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("method name is empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid("must start with a letter or underscore"));
    }
    if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))) {
        return Err(invalid(&format!("character {c:?} is not allowed in an element name")));
    }
    if derive_operation(method).is_empty() {
        return Err(invalid("operation name is empty once the Request suffix is removed"));
    }
    Ok(())
}
