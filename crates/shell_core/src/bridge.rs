use serde::Deserialize;
use thiserror::Error;

use crate::{Effect, Notice, ShellFeatures};

/// Highest bridge message version this host understands.
///
/// Messages without a `version` field are treated as version 1.
pub const BRIDGE_PROTOCOL_VERSION: u32 = 1;

const SPREADSHEET_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PNG_MIME: &str = "image/png";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed bridge message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported bridge protocol version {0}")]
    UnsupportedVersion(u32),
    #[error("{kind} message is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    ExcelExport,
    ImageCapture,
}

impl ExportKind {
    /// Page-side rule: any blob whose MIME type mentions "image" is a capture.
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.contains("image") {
            ExportKind::ImageCapture
        } else {
            ExportKind::ExcelExport
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            ExportKind::ExcelExport => "EXCEL_EXPORT",
            ExportKind::ImageCapture => "IMAGE_CAPTURE",
        }
    }

    pub fn default_mime_type(self) -> &'static str {
        match self {
            ExportKind::ExcelExport => SPREADSHEET_MIME,
            ExportKind::ImageCapture => PNG_MIME,
        }
    }

    pub fn default_dialog_title(self) -> &'static str {
        match self {
            ExportKind::ExcelExport => "Save Document",
            ExportKind::ImageCapture => "Save Image",
        }
    }

    /// Uniform type identifier passed to share sheets that use one.
    pub fn uniform_type_identifier(self) -> Option<&'static str> {
        match self {
            ExportKind::ExcelExport => None,
            ExportKind::ImageCapture => Some("public.png"),
        }
    }
}

/// Page-generated file the host should persist and share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub kind: ExportKind,
    /// Name as supplied by the page; not yet safe to use as a path.
    pub filename: String,
    /// Base64 payload without the data-URL prefix.
    pub data: String,
    pub mime_type: Option<String>,
    pub dialog_title: Option<String>,
}

impl ExportRequest {
    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| self.kind.default_mime_type())
    }

    pub fn dialog_title(&self) -> &str {
        self.dialog_title
            .as_deref()
            .unwrap_or_else(|| self.kind.default_dialog_title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    Export(ExportRequest),
    BlobClicked { url: String },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum WireKind {
    ExcelExport,
    ImageCapture,
    BlobUrlClicked,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(rename = "type")]
    kind: WireKind,
    version: Option<u32>,
    filename: Option<String>,
    data: Option<String>,
    mime_type: Option<String>,
    dialog_title: Option<String>,
    url: Option<String>,
}

impl BridgeMessage {
    /// Decodes one JSON message posted by page script.
    pub fn decode(text: &str) -> Result<Self, BridgeError> {
        let wire: WireMessage = serde_json::from_str(text)?;
        let version = wire.version.unwrap_or(BRIDGE_PROTOCOL_VERSION);
        if version > BRIDGE_PROTOCOL_VERSION {
            return Err(BridgeError::UnsupportedVersion(version));
        }

        let kind = match wire.kind {
            WireKind::BlobUrlClicked => {
                let url = wire.url.ok_or(BridgeError::MissingField {
                    kind: "BLOB_URL_CLICKED",
                    field: "url",
                })?;
                return Ok(BridgeMessage::BlobClicked { url });
            }
            WireKind::ExcelExport => ExportKind::ExcelExport,
            WireKind::ImageCapture => ExportKind::ImageCapture,
        };

        let filename = wire.filename.ok_or(BridgeError::MissingField {
            kind: kind.wire_name(),
            field: "filename",
        })?;
        let data = wire.data.ok_or(BridgeError::MissingField {
            kind: kind.wire_name(),
            field: "data",
        })?;

        Ok(BridgeMessage::Export(ExportRequest {
            kind,
            filename,
            data,
            mime_type: non_empty(wire.mime_type),
            dialog_title: non_empty(wire.dialog_title),
        }))
    }
}

/// Turns a raw page message into host effects.
///
/// Returns no effects when the bridge is disabled for this deployment.
pub fn route_bridge_message(
    text: &str,
    features: &ShellFeatures,
) -> Result<Vec<Effect>, BridgeError> {
    if !features.bridge {
        return Ok(Vec::new());
    }
    let effect = match BridgeMessage::decode(text)? {
        BridgeMessage::Export(request) => Effect::ExportArtifact(request),
        BridgeMessage::BlobClicked { .. } => Effect::Notify(Notice::unsupported_content()),
    };
    Ok(vec![effect])
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
