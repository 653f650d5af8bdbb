use bytes::Bytes;
use serde::Serialize;

use crate::voice::{Gender, VoiceSelector};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    PlainText,
    Ssml,
}

impl ContentType {
    /// Only `ssml` (any case) selects SSML; everything else is plain text.
    pub fn from_flag(value: &str) -> Self {
        if value.eq_ignore_ascii_case("ssml") {
            ContentType::Ssml
        } else {
            ContentType::PlainText
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ContentType::PlainText => "text/plain",
            ContentType::Ssml => "application/ssml+xml",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub content: String,
    pub content_type: ContentType,
    pub voice: VoiceSelector,
}

impl SpeechRequest {
    pub fn new(content: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            content: content.into(),
            content_type,
            voice: VoiceSelector::default(),
        }
    }

    /// Apply voice flags; empty values leave the field untouched.
    pub fn with_voice_overrides(
        mut self,
        name: Option<String>,
        gender: Option<Gender>,
        language: Option<String>,
    ) -> Self {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.voice.name = Some(name);
        }
        if let Some(gender) = gender {
            self.voice.gender = Some(gender);
        }
        if let Some(language) = language.filter(|l| !l.is_empty()) {
            self.voice.language = Some(language);
        }
        self
    }
}

/// Audio returned by the service. The bytes are opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResult {
    pub audio: Bytes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateSpeechBody<'a> {
    input: Input<'a>,
    output_format: OutputFormat,
    parameters: Parameters,
    voice: &'a VoiceSelector,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Input<'a> {
    data: &'a str,
    #[serde(rename = "Type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutputFormat {
    codec: &'static str,
    sample_rate: u32,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            codec: "MP3",
            sample_rate: 22050,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Parameters {
    rate: &'static str,
    volume: &'static str,
    sentence_break: u32,
    paragraph_break: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            rate: "medium",
            volume: "medium",
            sentence_break: 400,
            paragraph_break: 650,
        }
    }
}

impl<'a> From<&'a SpeechRequest> for CreateSpeechBody<'a> {
    fn from(request: &'a SpeechRequest) -> Self {
        Self {
            input: Input {
                data: &request.content,
                kind: request.content_type.mime_type(),
            },
            output_format: OutputFormat::default(),
            parameters: Parameters::default(),
            voice: &request.voice,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListVoicesBody<'a> {
    pub(crate) voice: &'a VoiceSelector,
}
