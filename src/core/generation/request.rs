//! Request types for the generation API.
//!
//! A [`GenerationRequest`] bundles everything the backend needs for one
//! lip-sync render: the portrait image, the dialogue script, and the voice
//! the script is spoken in. Requests are built fresh per submission,
//! validated at construction, and immutable afterwards.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};

// =============================================================================
// Image Format
// =============================================================================

/// JPEG SOI marker.
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// PNG signature prefix.
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Supported portrait image encodings.
///
/// The backend accepts JPEG and PNG portraits. The multipart file part must
/// carry the MIME type of the actual encoding, so unknown bytes are rejected
/// rather than mislabeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG portrait
    #[default]
    Jpeg,
    /// PNG portrait
    Png,
}

impl ImageFormat {
    /// MIME type sent with the multipart file part.
    #[inline]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// File extension used for the uploaded part's filename.
    #[inline]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Parse from a file extension (`jpg`, `jpeg`, `png`), case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detect the encoding from the file's magic numbers.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(&PNG_MAGIC) {
            Some(Self::Png)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// =============================================================================
// Voices
// =============================================================================

/// Speech-synthesis voices supported by the generation backend.
///
/// The backend exposes a fixed set of four neural voices; the wire
/// identifier (e.g. `en-US-ChristopherNeural`) selects the profile used to
/// synthesize the script audio before lip-sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Voice {
    /// US English, male
    #[default]
    #[serde(rename = "en-US-ChristopherNeural")]
    ChristopherNeural,
    /// US English, female
    #[serde(rename = "en-US-AriaNeural")]
    AriaNeural,
    /// British English, female
    #[serde(rename = "en-GB-SoniaNeural")]
    SoniaNeural,
    /// Indian English, male
    #[serde(rename = "en-IN-PrabhatNeural")]
    PrabhatNeural,
}

impl Voice {
    /// Convert to the wire identifier sent in the `voice` form field.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChristopherNeural => "en-US-ChristopherNeural",
            Self::AriaNeural => "en-US-AriaNeural",
            Self::SoniaNeural => "en-GB-SoniaNeural",
            Self::PrabhatNeural => "en-IN-PrabhatNeural",
        }
    }

    /// All supported voices, in presentation order.
    pub fn all() -> &'static [Voice] {
        &[
            Self::ChristopherNeural,
            Self::AriaNeural,
            Self::SoniaNeural,
            Self::PrabhatNeural,
        ]
    }

    /// Parse a wire identifier, case-insensitive.
    ///
    /// Unknown identifiers are an error listing the supported set, so a typo
    /// never silently falls back to a different voice.
    pub fn parse(s: &str) -> ClientResult<Self> {
        let lowered = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|voice| voice.as_str().to_lowercase() == lowered)
            .ok_or_else(|| {
                ClientError::Configuration(format!(
                    "unsupported voice: {s}. Supported voices: {}",
                    Self::all()
                        .iter()
                        .map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    /// Human-readable catalog of the supported voices.
    pub fn catalog() -> serde_json::Value {
        serde_json::json!({
            "voices": Self::all().iter().map(|v| v.as_str()).collect::<Vec<_>>(),
            "default": Self::default().as_str(),
        })
    }
}

impl std::str::FromStr for Voice {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Generation Request
// =============================================================================

/// One generation submission: portrait, script, and voice.
///
/// Construction enforces the submission precondition (image and script both
/// present); a constructed request is always sendable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    image_bytes: Bytes,
    image_format: ImageFormat,
    script_text: String,
    voice: Voice,
}

impl GenerationRequest {
    /// Build a request, validating the inputs.
    ///
    /// Fails with a configuration error when the image is empty, when the
    /// bytes are not the declared encoding (checked against the magic
    /// numbers, so the multipart content-type is never a lie), or when the
    /// script is empty or whitespace-only.
    pub fn new(
        image_bytes: impl Into<Bytes>,
        image_format: ImageFormat,
        script_text: impl Into<String>,
        voice: Voice,
    ) -> ClientResult<Self> {
        let image_bytes = image_bytes.into();
        let script_text = script_text.into();

        if image_bytes.is_empty() {
            return Err(ClientError::Configuration(
                "portrait image is empty".to_string(),
            ));
        }
        match ImageFormat::sniff(&image_bytes) {
            Some(actual) if actual == image_format => {}
            Some(actual) => {
                return Err(ClientError::Configuration(format!(
                    "portrait encoding mismatch: declared {image_format}, bytes are {actual}"
                )));
            }
            None => {
                return Err(ClientError::Configuration(
                    "portrait is not a recognizable JPEG or PNG".to_string(),
                ));
            }
        }
        if script_text.trim().is_empty() {
            return Err(ClientError::Configuration(
                "script text is empty".to_string(),
            ));
        }

        Ok(Self {
            image_bytes,
            image_format,
            script_text,
            voice,
        })
    }

    /// The portrait bytes, shared without copying.
    pub fn image_bytes(&self) -> Bytes {
        self.image_bytes.clone()
    }

    /// The portrait's encoding.
    pub fn image_format(&self) -> ImageFormat {
        self.image_format
    }

    /// Filename attached to the multipart file part.
    pub fn image_filename(&self) -> String {
        format!("avatar.{}", self.image_format.extension())
    }

    /// The dialogue script.
    pub fn script_text(&self) -> &str {
        &self.script_text
    }

    /// The selected voice.
    pub fn voice(&self) -> Voice {
        self.voice
    }
}
