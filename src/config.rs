use crate::error::{Error, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;

/// Normalise a credential name from argv or the prompt. Surrounding
/// whitespace is dropped and the rest must be non-empty. Both tools go
/// through here so one spelling always names one credential.
pub fn validate_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::InvalidName(raw.to_string()));
    }
    Ok(name)
}

/// What to do when `hello-creator` finds the name already taken.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingPolicy {
    /// Export the existing credential's public key and exit 171.
    Reuse,
    /// Write nothing and exit 171.
    Fail,
}

/// Creates a Windows Hello key credential and saves its public key to
/// '<name>.pem'.
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "hello-creator")]
pub struct CreatorConfig {
    /// Name of the key credential. Prompted for when omitted.
    pub name: Option<String>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Directory the PEM file is written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = ExistingPolicy::Reuse)]
    pub on_exists: ExistingPolicy,
}

/// Authenticates the user with Windows Hello and writes a signature of
/// stdin, made with the private key of credential <name>, to stdout.
#[derive(clap::Parser, Debug, Clone)]
#[command(name = "hello-authenticator")]
pub struct AuthenticatorConfig {
    /// Name of the key credential to sign with.
    pub name: String,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Result of reading the command line.
#[derive(Debug)]
pub enum Invocation<C> {
    Run(C),
    /// Help was requested; the text is ready to print.
    Help(String),
    /// The command line was rejected; the text includes usage.
    Invalid(String),
}

impl<C: Parser> Invocation<C> {
    /// Parse `args` (including the program name). `/?` is accepted as a help
    /// flag alongside `-h` and `--help`.
    pub fn parse<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.iter().skip(1).any(|a| a == "/?") {
            return Invocation::Help(C::command().render_help().to_string());
        }
        match C::try_parse_from(&args) {
            Ok(cfg) => Invocation::Run(cfg),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Invocation::Help(e.to_string())
            }
            Err(e) => Invocation::Invalid(e.to_string()),
        }
    }
}
