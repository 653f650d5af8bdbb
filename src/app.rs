use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::cli::{Cli, Invocation, Synthesis, TextSource};
use crate::client::SpeechService;
use crate::credentials::{self, Credentials};
use crate::error::{Error, Result};
use crate::output;
use crate::speech::SpeechRequest;
use crate::voice::VoiceSelector;

/// How a run ended successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Required arguments were missing; the caller prints usage.
    Usage,
    /// Number of voices printed.
    Listed(usize),
    Wrote { path: PathBuf, bytes: usize },
}

/// Interpret `cli`, resolve credentials, build the service with `connect`
/// and perform the listing or synthesis it asks for. Listing lines go to
/// `out`.
///
/// Nothing touches the network when arguments are missing or the
/// credentials cannot be read.
#[instrument(skip_all)]
pub async fn run<S, F, W>(
    cli: &Cli,
    config_path: Option<&Path>,
    connect: F,
    out: &mut W,
) -> Result<Outcome>
where
    S: SpeechService,
    F: FnOnce(Credentials, &str) -> Result<S>,
    W: Write,
{
    let invocation = cli.interpret();
    if matches!(invocation, Invocation::Usage) {
        return Ok(Outcome::Usage);
    }

    let credentials = credentials::resolve(
        cli.access_key.as_deref(),
        cli.secret_key.as_deref(),
        config_path,
    )
    .await?;
    let service = connect(credentials, &cli.region)?;

    match invocation {
        Invocation::Usage => Ok(Outcome::Usage),
        Invocation::ListVoices(selector) => list_voices(&service, &selector, out).await,
        Invocation::Synthesize(synthesis) => synthesize(&service, synthesis).await,
    }
}

/// Print one line per voice matching `selector`.
pub async fn list_voices<S, W>(service: &S, selector: &VoiceSelector, out: &mut W) -> Result<Outcome>
where
    S: SpeechService,
    W: Write,
{
    let voices = service.list_voices(selector).await?;
    for voice in &voices {
        writeln!(out, "{voice}").map_err(Error::Listing)?;
    }
    out.flush().map_err(Error::Listing)?;
    Ok(Outcome::Listed(voices.len()))
}

#[instrument(skip(service))]
pub async fn synthesize<S: SpeechService>(service: &S, synthesis: Synthesis) -> Result<Outcome> {
    let content = match synthesis.text {
        TextSource::Inline(text) => text,
        TextSource::File(path) => match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(source) => return Err(Error::ReadText { path, source }),
        },
    };

    let request = SpeechRequest::new(content, synthesis.content_type).with_voice_overrides(
        synthesis.name,
        synthesis.gender,
        synthesis.language,
    );
    let result = service.create_speech(&request).await?;

    output::write_audio(&synthesis.output, &result.audio).await?;

    Ok(Outcome::Wrote {
        path: synthesis.output,
        bytes: result.audio.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::normalize_args;
    use crate::speech::{ContentType, SpeechResult};
    use crate::voice::{Gender, VoiceDescriptor};
    use bytes::Bytes;
    use clap::Parser;
    use reqwest::StatusCode;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ListVoices(VoiceSelector),
        CreateSpeech(SpeechRequest),
    }

    #[derive(Clone, Default)]
    struct FakeService {
        voices: Vec<VoiceDescriptor>,
        audio: Bytes,
        fail: bool,
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl SpeechService for FakeService {
        async fn list_voices(&self, selector: &VoiceSelector) -> Result<Vec<VoiceDescriptor>> {
            self.calls.borrow_mut().push(Call::ListVoices(selector.clone()));
            Ok(self.voices.clone())
        }

        async fn create_speech(&self, request: &SpeechRequest) -> Result<SpeechResult> {
            self.calls.borrow_mut().push(Call::CreateSpeech(request.clone()));
            if self.fail {
                return Err(Error::Service {
                    status: StatusCode::BAD_REQUEST,
                    message: "InvalidVoiceException".into(),
                });
            }
            Ok(SpeechResult {
                audio: self.audio.clone(),
            })
        }
    }

    fn cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("ivona-speak").chain(args.iter().copied());
        Cli::try_parse_from(normalize_args(argv)).unwrap()
    }

    struct Harness {
        service: FakeService,
        connected: Cell<bool>,
        out: Vec<u8>,
    }

    impl Harness {
        fn new(service: FakeService) -> Self {
            Self {
                service,
                connected: Cell::new(false),
                out: Vec::new(),
            }
        }

        async fn invoke(&mut self, cli: &Cli, config_path: &Path) -> Result<Outcome> {
            let service = self.service.clone();
            let connected = &self.connected;
            run(
                cli,
                Some(config_path),
                |_credentials, _region| {
                    connected.set(true);
                    Ok(service)
                },
                &mut self.out,
            )
            .await
        }

        fn calls(&self) -> Vec<Call> {
            self.service.calls.borrow().clone()
        }
    }

    #[tokio::test]
    async fn missing_output_prints_usage_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let mut harness = Harness::new(FakeService::default());

        let outcome = harness
            .invoke(&cli(&["Hello"]), &dir.path().join(".ivonaapi"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Usage);
        assert!(!harness.connected.get());
        assert!(harness.calls().is_empty());
    }

    #[tokio::test]
    async fn unreadable_config_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let mut harness = Harness::new(FakeService::default());

        let err = harness
            .invoke(
                &cli(&["Hello", output.to_str().unwrap()]),
                &dir.path().join(".ivonaapi"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ConfigFile { .. }));
        assert!(!harness.connected.get());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn synthesis_writes_audio_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let audio = Bytes::from_static(b"ID3\x04\x00\xff\xfb");
        let mut harness = Harness::new(FakeService {
            audio: audio.clone(),
            ..Default::default()
        });

        let outcome = harness
            .invoke(
                &cli(&[
                    "-access-key=AK",
                    "-secret-key=SK",
                    "-gender=MALE",
                    "-name",
                    "Eric",
                    "Hello world",
                    output.to_str().unwrap(),
                ]),
                &dir.path().join(".ivonaapi"),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Wrote {
                path: output.clone(),
                bytes: audio.len()
            }
        );
        assert_eq!(std::fs::read(&output).unwrap(), audio);

        let calls = harness.calls();
        let Call::CreateSpeech(request) = &calls[0] else {
            panic!("expected CreateSpeech");
        };
        assert_eq!(request.content, "Hello world");
        assert_eq!(request.content_type, ContentType::PlainText);
        assert_eq!(request.voice.gender, Some(Gender::Male));
        assert_eq!(request.voice.name.as_deref(), Some("Eric"));
        assert_eq!(request.voice.language, None);
    }

    #[tokio::test]
    async fn text_file_supplies_content() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".ivonaapi");
        std::fs::write(&config, "AK\nSK\n").unwrap();
        let text = dir.path().join("hello.txt");
        std::fs::write(&text, "Hello").unwrap();
        let output = dir.path().join("out.mp3");
        let mut harness = Harness::new(FakeService {
            audio: Bytes::from_static(b"audio"),
            ..Default::default()
        });

        harness
            .invoke(
                &cli(&[
                    "-format=ssml",
                    "-text-file",
                    text.to_str().unwrap(),
                    output.to_str().unwrap(),
                ]),
                &config,
            )
            .await
            .unwrap();

        assert!(harness.connected.get());
        let calls = harness.calls();
        let Call::CreateSpeech(request) = &calls[0] else {
            panic!("expected CreateSpeech");
        };
        assert_eq!(request.content, "Hello");
        assert_eq!(request.content_type, ContentType::Ssml);
        assert_eq!(std::fs::read(&output).unwrap(), b"audio");
    }

    #[tokio::test]
    async fn missing_text_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let text = dir.path().join("missing.txt");
        let mut harness = Harness::new(FakeService::default());

        let err = harness
            .invoke(
                &cli(&[
                    "-access-key=AK",
                    "-secret-key=SK",
                    "-text-file",
                    text.to_str().unwrap(),
                    output.to_str().unwrap(),
                ]),
                &dir.path().join(".ivonaapi"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ReadText { .. }));
        assert!(harness.calls().is_empty());
    }

    #[tokio::test]
    async fn service_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let mut harness = Harness::new(FakeService {
            fail: true,
            ..Default::default()
        });

        let err = harness
            .invoke(
                &cli(&["-access-key=AK", "-secret-key=SK", "Hi", output.to_str().unwrap()]),
                &dir.path().join(".ivonaapi"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Service { .. }));
        assert_eq!(harness.calls().len(), 1);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn listing_prints_one_line_per_voice() {
        let dir = tempfile::tempdir().unwrap();
        let mut harness = Harness::new(FakeService {
            voices: vec![
                VoiceDescriptor {
                    name: "Brian".into(),
                    language: "en-GB".into(),
                    gender: "Male".into(),
                },
                VoiceDescriptor {
                    name: "Eric".into(),
                    language: "en-US".into(),
                    gender: "Male".into(),
                },
            ],
            ..Default::default()
        });

        let outcome = harness
            .invoke(
                &cli(&["-access-key=AK", "-secret-key=SK", "-list-voices", "male"]),
                &dir.path().join(".ivonaapi"),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Listed(2));
        assert_eq!(
            harness.calls(),
            vec![Call::ListVoices(VoiceSelector {
                gender: Some(Gender::Male),
                ..Default::default()
            })]
        );
        assert_eq!(
            String::from_utf8(harness.out.clone()).unwrap(),
            "Brian, Male, en-GB\t(-name=Brian -gender=Male -language=en-GB)\n\
             Eric, Male, en-US\t(-name=Eric -gender=Male -language=en-US)\n"
        );
    }
}
