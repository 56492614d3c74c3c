use serde_json::Value;
use xmltree::Element;

use crate::client::ResponseFormat;
use crate::error::{Error, Result};

/// A decoded CBIBS response body, in whichever format the client was
/// configured for.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The decoded JSON document.
    Json(Value),
    /// The root element of the parsed XML document.
    Xml(Element),
}

/// The shape CBIBS uses to report a bad key in JSON mode, e.g.
/// `{"error": "Invalid API Key"}`. Returned with HTTP 200, so it has to be
/// probed for explicitly after a successful transport call.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
}

const INVALID_KEY_MARKER: &str = "Invalid API Key";

/// Decodes a response body according to the configured format.
///
/// In JSON mode this also performs the best-effort invalid-key probe; the
/// service does not signal bad keys consistently in XML mode, so XML
/// payloads are returned as-is.
pub(crate) fn parse_body(format: ResponseFormat, body: &str) -> Result<Payload> {
    match format {
        ResponseFormat::Json => {
            let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
                format,
                message: e.to_string(),
            })?;

            if let Ok(ApiErrorBody { error: Some(msg) }) =
                serde_json::from_value::<ApiErrorBody>(value.clone())
            {
                if msg == INVALID_KEY_MARKER {
                    return Err(Error::Auth(msg));
                }
            }

            Ok(Payload::Json(value))
        }
        ResponseFormat::Xml => {
            let root = Element::parse(body.as_bytes()).map_err(|e| Error::Decode {
                format,
                message: e.to_string(),
            })?;
            Ok(Payload::Xml(root))
        }
    }
}
