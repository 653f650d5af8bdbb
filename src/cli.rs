use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::client::DEFAULT_REGION;
use crate::speech::ContentType;
use crate::voice::{Gender, UnknownGender, VoiceSelector};

/// Long flags that may also be written with a single dash (`-name=Eric`).
const LONG_FLAGS: &[&str] = &[
    "access-key",
    "secret-key",
    "list-voices",
    "name",
    "gender",
    "language",
    "text-file",
    "format",
    "region",
    "help",
    "version",
];

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ivona-speak")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert text to speech with the Ivona Speech Cloud")]
#[command(override_usage = "ivona-speak [OPTIONS] <TEXT> <OUTPUT-FILE>\n       \
    ivona-speak [OPTIONS] --text-file <PATH> <OUTPUT-FILE>\n       \
    ivona-speak [OPTIONS] --list-voices <FILTER>")]
pub struct Cli {
    /// Ivona Speech Cloud access key
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    pub access_key: Option<String>,

    /// Ivona Speech Cloud secret key
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    pub secret_key: Option<String>,

    /// List available voices and exit (e.g. "all", "male", "male,en-US")
    #[arg(long, value_name = "FILTER")]
    pub list_voices: Option<String>,

    /// Voice name (e.g. "Eric")
    #[arg(long)]
    pub name: Option<String>,

    /// Voice gender ("male" or "female")
    #[arg(long, value_parser = parse_gender)]
    pub gender: Option<GenderOverride>,

    /// Voice language (e.g. "en-US")
    #[arg(long)]
    pub language: Option<String>,

    /// Read the text to speak from a file
    #[arg(long, value_name = "PATH")]
    pub text_file: Option<PathBuf>,

    /// Content type of the text: "text" or "ssml"
    #[arg(long)]
    pub format: Option<String>,

    /// Speech Cloud region
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Text to speak followed by the output file
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// `-gender=` parses to `Some(None)`: the flag was given but overrides
/// nothing. Aliased so clap does not treat the field as an optional-value
/// flag.
pub type GenderOverride = Option<Gender>;

fn parse_gender(value: &str) -> Result<GenderOverride, UnknownGender> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Where the text to speak comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub text: TextSource,
    pub content_type: ContentType,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub language: Option<String>,
    pub output: PathBuf,
}

/// What a command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Required arguments are missing; print usage and stop.
    Usage,
    ListVoices(VoiceSelector),
    Synthesize(Synthesis),
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    ///
    /// Help, version and parse errors are printed to stderr before exiting.
    pub fn parse_args() -> Self {
        Self::try_parse_normalized(std::env::args_os()).unwrap_or_else(|err| {
            eprint!("{}", err.render());
            std::process::exit(err.exit_code())
        })
    }

    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }

    pub fn interpret(&self) -> Invocation {
        if let Some(filter) = self.list_voices.as_deref().filter(|f| !f.is_empty()) {
            return Invocation::ListVoices(VoiceSelector::from_filter(filter));
        }

        let text_file = self
            .text_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty());

        // With a text file every positional is an output candidate and the
        // last one wins. Without one, the first positional is the text.
        let (text, output) = match (text_file, self.args.as_slice()) {
            (Some(path), [.., output]) => (TextSource::File(path.clone()), output),
            (None, [text, output, ..]) => (TextSource::Inline(text.clone()), output),
            _ => return Invocation::Usage,
        };

        Invocation::Synthesize(Synthesis {
            text,
            content_type: ContentType::from_flag(self.format.as_deref().unwrap_or_default()),
            name: self.name.clone(),
            gender: self.gender.flatten(),
            language: self.language.clone(),
            output: PathBuf::from(output),
        })
    }
}

/// Rewrite Go-style single-dash long flags (`-name=Eric`, `-name Eric`)
/// to their double-dash form. Arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut end_of_flags = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if end_of_flags {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                end_of_flags = true;
                return arg;
            }
            match s.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or_default();
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{s}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
