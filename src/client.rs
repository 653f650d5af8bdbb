use std::time::SystemTime;

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::signing::{self, SigningScope};
use crate::speech::{CreateSpeechBody, ListVoicesBody, SpeechRequest, SpeechResult};
use crate::voice::{VoiceDescriptor, VoiceSelector};

pub const DEFAULT_REGION: &str = "eu-west-1";

const SERVICE_NAME: &str = "tts";
const JSON: &str = "application/json";
const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// The remote text-to-speech service. Each call is a single attempt.
#[allow(async_fn_in_trait)]
pub trait SpeechService {
    /// Voices matching every constraint set on `selector`.
    async fn list_voices(&self, selector: &VoiceSelector) -> Result<Vec<VoiceDescriptor>>;

    async fn create_speech(&self, request: &SpeechRequest) -> Result<SpeechResult>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Vec<VoiceDescriptor>,
}

/// HTTP client for the Ivona Speech Cloud.
#[derive(Debug, Clone)]
pub struct IvonaClient {
    http: reqwest::Client,
    credentials: Credentials,
    endpoint: Url,
    region: String,
}

impl IvonaClient {
    /// Client for the public endpoint of `region`, e.g. `eu-west-1`.
    pub fn new(credentials: Credentials, region: &str) -> Result<Self> {
        let endpoint = Url::parse(&format!("https://tts.{region}.ivonacloud.com"))
            .map_err(|_| Error::InvalidRegion(region.to_owned()))?;
        Ok(Self::with_endpoint(credentials, endpoint, region))
    }

    pub fn with_endpoint(credentials: Credentials, endpoint: Url, region: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            endpoint,
            region: region.to_owned(),
        }
    }

    /// Sign and send one `POST /{action}` request.
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    async fn post(&self, action: &str, body: Vec<u8>) -> Result<reqwest::Response> {
        let mut url = self.endpoint.clone();
        url.set_path(action);

        let scope = SigningScope {
            region: &self.region,
            service: SERVICE_NAME,
            time: SystemTime::now(),
        };
        let signed_headers = signing::sign_request(
            &self.credentials,
            &scope,
            "POST",
            url.as_str(),
            &[("content-type", JSON)],
            &body,
        )?;

        let mut request = self.http.post(url).header(CONTENT_TYPE, JSON);
        for (name, value) in signed_headers {
            request = request.header(name, value);
        }
        let response = request.body(body).send().await?;

        let status = response.status();
        if let Some(request_id) = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            debug!("{} request id: {}", action, request_id);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("{} failed with {}: {}", action, status, message);
            return Err(Error::Service { status, message });
        }

        Ok(response)
    }
}

impl SpeechService for IvonaClient {
    #[instrument(skip(self))]
    async fn list_voices(&self, selector: &VoiceSelector) -> Result<Vec<VoiceDescriptor>> {
        let body = serde_json::to_vec(&ListVoicesBody { voice: selector })?;
        let response = self.post("/ListVoices", body).await?;
        let list: ListVoicesResponse = serde_json::from_slice(&response.bytes().await?)?;
        debug!("Service returned {} voices", list.voices.len());
        Ok(list.voices)
    }

    #[instrument(skip(self, request), fields(voice = ?request.voice))]
    async fn create_speech(&self, request: &SpeechRequest) -> Result<SpeechResult> {
        let body = serde_json::to_vec(&CreateSpeechBody::from(request))?;
        let response = self.post("/CreateSpeech", body).await?;
        let audio = response.bytes().await?;
        debug!("Received {} bytes of audio", audio.len());
        Ok(SpeechResult { audio })
    }
}
