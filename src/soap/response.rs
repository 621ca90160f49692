//! Response inspection: SOAP Fault detection and `outputXML` extraction.
//!
//! Uses quick-xml, which does not expand external entities.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// Raw response returned by a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as received
    pub body: String,
}

/// A SOAP 1.1 or 1.2 Fault reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("SOAP fault {code}: {reason}")]
pub struct SoapFault {
    /// `faultcode` (1.1) or `Code/Value` (1.2)
    pub code: String,
    /// `faultstring` (1.1) or `Reason/Text` (1.2)
    pub reason: String,
}

/// Why a received response is not usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResponseError {
    #[error(transparent)]
    Fault(#[from] SoapFault),

    #[error("HTTP status {status} without a SOAP fault")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Default)]
pub(crate) struct ResponseParts {
    pub fault: Option<SoapFault>,
    pub output_xml: Option<String>,
}

impl SoapResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The Fault carried by the body, if any.
    pub fn fault(&self) -> Option<SoapFault> {
        parse_parts(&self.body).ok().and_then(|parts| parts.fault)
    }

    /// Content of the `outputXML` element, unescaped.
    ///
    /// BHISS returns the ABRASF response document as text inside this element,
    /// either entity-escaped or wrapped in CDATA.
    pub fn output_xml(&self) -> Option<String> {
        parse_parts(&self.body).ok().and_then(|parts| parts.output_xml)
    }

    /// Classify the response: faults and non-2xx statuses are errors.
    ///
    /// A body that is not a SOAP envelope is malformed, unless the status is
    /// already an error, in which case the status is reported.
    pub(crate) fn check(&self) -> Result<(), ResponseError> {
        let parts = match parse_parts(&self.body) {
            Ok(parts) => parts,
            Err(_) if !self.is_success() => {
                return Err(ResponseError::Status {
                    status: self.status,
                });
            }
            Err(e) => return Err(e),
        };
        if let Some(fault) = parts.fault {
            return Err(fault.into());
        }
        if !self.is_success() {
            return Err(ResponseError::Status {
                status: self.status,
            });
        }
        Ok(())
    }
}

/// Field being collected while walking the document.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Code,
    Reason,
    Output,
}

pub(crate) fn parse_parts(xml: &str) -> Result<ResponseParts, ResponseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut in_fault = false;
    let mut code = String::new();
    let mut reason = String::new();
    let mut output: Option<String> = None;
    let mut root: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ResponseError::Malformed(e.to_string()))?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                root.get_or_insert_with(|| name.clone());
                if name == "Fault" {
                    in_fault = true;
                }
                if name == "outputXML" && output.is_none() {
                    output = Some(String::new());
                }
                path.push(name);
            }
            Event::Empty(e) => {
                root.get_or_insert_with(|| {
                    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
                });
                if e.local_name().as_ref() == b"Fault" {
                    in_fault = true;
                }
                if e.local_name().as_ref() == b"outputXML" && output.is_none() {
                    output = Some(String::new());
                }
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(t) => {
                if path.is_empty() {
                    return Err(ResponseError::Malformed(
                        "text outside the root element".into(),
                    ));
                }
                let text = t
                    .unescape()
                    .map_err(|e| ResponseError::Malformed(e.to_string()))?;
                collect(&path, in_fault, &text, &mut code, &mut reason, &mut output);
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(&c)
                    .map_err(|e| ResponseError::Malformed(e.to_string()))?;
                collect(&path, in_fault, text, &mut code, &mut reason, &mut output);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if root.as_deref() != Some("Envelope") {
        return Err(ResponseError::Malformed(
            "response is not a SOAP envelope".into(),
        ));
    }
    if let Some(open) = path.last() {
        return Err(ResponseError::Malformed(format!(
            "element {open} is not closed"
        )));
    }

    let fault = in_fault.then(|| SoapFault {
        code: code.trim().to_string(),
        reason: reason.trim().to_string(),
    });
    Ok(ResponseParts {
        fault,
        output_xml: output,
    })
}

fn slot_for(path: &[String], in_fault: bool) -> Option<Slot> {
    let current = path.last()?.as_str();
    let parent = path.len().checked_sub(2).map(|i| path[i].as_str());
    match (current, parent) {
        ("outputXML", _) => Some(Slot::Output),
        ("faultcode", _) if in_fault => Some(Slot::Code),
        ("faultstring", _) if in_fault => Some(Slot::Reason),
        ("Value", Some("Code")) if in_fault => Some(Slot::Code),
        ("Text", Some("Reason")) if in_fault => Some(Slot::Reason),
        _ => None,
    }
}

fn collect(
    path: &[String],
    in_fault: bool,
    text: &str,
    code: &mut String,
    reason: &mut String,
    output: &mut Option<String>,
) {
    match slot_for(path, in_fault) {
        Some(Slot::Code) if code.is_empty() => code.push_str(text),
        Some(Slot::Reason) => reason.push_str(text),
        Some(Slot::Output) => {
            if let Some(out) = output {
                out.push_str(text);
            }
        }
        _ => {}
    }
}
