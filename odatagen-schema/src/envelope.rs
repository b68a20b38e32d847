//! Service error envelopes.
//!
//! A service that cannot produce metadata often answers with an error body
//! instead of an EDMX document. Recognized shapes:
//!
//! - JSON `{"message": "..."}`
//! - JSON `{"error": {"message": "..."}}` (OData JSON error format)
//! - XML `<error><message>...</message></error>` (OData XML error format)

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonEnvelope {
    OData { error: JsonErrorBody },
    Flat { message: String },
}

#[derive(Debug, Deserialize)]
struct JsonErrorBody {
    message: String,
}

/// Extracts the message a service embedded in an error body.
///
/// Returns `None` if the bytes are not a recognized error envelope.
#[must_use]
pub fn service_message(bytes: &[u8]) -> Option<String> {
    json_message(bytes).or_else(|| xml_message(bytes))
}

fn json_message(bytes: &[u8]) -> Option<String> {
    match serde_json::from_slice::<JsonEnvelope>(bytes).ok()? {
        JsonEnvelope::OData { error } => Some(error.message),
        JsonEnvelope::Flat { message } => Some(message),
    }
}

fn xml_message(bytes: &[u8]) -> Option<String> {
    // Untrimmed: entity references split the message into several events
    let mut reader = Reader::from_reader(bytes);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut message: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).ok()? {
            Event::Start(ref e) => {
                let name = e.local_name();
                if depth == 0 && name.as_ref() != b"error" {
                    return None;
                }
                if depth == 1 && name.as_ref() == b"message" {
                    message = Some(String::new());
                }
                depth += 1;
            }
            Event::Empty(ref e) if depth == 0 => {
                if e.local_name().as_ref() != b"error" {
                    return None;
                }
            }
            Event::Text(ref t) => {
                if let Some(message) = message.as_mut() {
                    message.push_str(&t.xml_content().ok()?);
                }
            }
            Event::CData(ref c) => {
                if let Some(message) = message.as_mut() {
                    message.push_str(&c.decode().ok()?);
                }
            }
            Event::GeneralRef(ref r) => {
                if let Some(message) = message.as_mut() {
                    match r.resolve_char_ref().ok()? {
                        Some(ch) => message.push(ch),
                        None => {
                            let entity = r.decode().ok()?;
                            match resolve_predefined_entity(&entity) {
                                Some(text) => message.push_str(text),
                                None => message.push_str(&format!("&{entity};")),
                            }
                        }
                    }
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some(text) = message.take() {
                        let text = text.trim();
                        return (!text.is_empty()).then(|| text.to_string());
                    }
                }
                if depth == 0 {
                    return None;
                }
            }
            Event::Eof => return None,
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_json_message() {
        let body = br#"{"message": "Service unavailable"}"#;
        assert_eq!(service_message(body).as_deref(), Some("Service unavailable"));
    }

    #[test]
    fn test_odata_json_error() {
        let body = br#"{"error": {"code": "", "message": "Resource not found for the segment '$metadata'."}}"#;
        assert_eq!(
            service_message(body).as_deref(),
            Some("Resource not found for the segment '$metadata'.")
        );
    }

    #[test]
    fn test_odata_xml_error() {
        let body = br#"<?xml version="1.0" encoding="utf-8"?>
<m:error xmlns:m="http://docs.oasis-open.org/odata/ns/metadata">
    <m:code/>
    <m:message xml:lang="en-US">Access denied</m:message>
</m:error>"#;
        assert_eq!(service_message(body).as_deref(), Some("Access denied"));
    }

    #[test]
    fn test_xml_error_with_references() {
        let body = b"<error><code/><message>Tom &amp; Jerry not found</message></error>";
        assert_eq!(
            service_message(body).as_deref(),
            Some("Tom & Jerry not found")
        );

        let body = br#"<m:error xmlns:m="http://docs.oasis-open.org/odata/ns/metadata">
    <m:message>
        Segment &apos;$metadata&apos; &#8212; &lt;denied&gt;
    </m:message>
</m:error>"#;
        assert_eq!(
            service_message(body).as_deref(),
            Some("Segment '$metadata' \u{2014} <denied>")
        );
    }

    #[test]
    fn test_nested_message_is_not_the_error_message() {
        let body = b"<error><innererror><message>inner</message></innererror></error>";
        assert!(service_message(body).is_none());
    }

    #[test]
    fn test_unrecognized_bodies() {
        assert!(service_message(b"").is_none());
        assert!(service_message(br#"{"status": 500}"#).is_none());
        assert!(service_message(b"<html><body>oops</body></html>").is_none());
        assert!(service_message(b"<error><code>1</code></error>").is_none());
    }
}
