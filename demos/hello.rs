use std::path::Path;

use ivona_speak::{write_audio, ContentType, Gender, IvonaClient, SpeechRequest, SpeechService};

#[tokio::main]
async fn main() {
    let credentials = ivona_speak::resolve_credentials(None, None, None).await.unwrap();
    let client = IvonaClient::new(credentials, ivona_speak::DEFAULT_REGION).unwrap();

    let request = SpeechRequest::new("Good evening, and welcome.", ContentType::PlainText)
        .with_voice_overrides(None, Some(Gender::Female), Some("en-GB".into()));
    let speech = client.create_speech(&request).await.unwrap();

    write_audio(Path::new("test.mp3"), &speech.audio).await.unwrap();
}
