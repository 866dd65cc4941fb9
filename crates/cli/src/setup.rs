//! Interactive first-run setup
//!
//! Asks for keys and an endpoint, shows a summary and writes a `.s3cfg` in
//! the working directory or the home directory.

use std::io;
use std::path::{Path, PathBuf};

use console::{Term, style};

use s4_core::credentials::{DEFAULT_HOST_BASE, DEFAULT_REGION};
use s4_core::{Error, Result, S3Config};

/// Line-oriented terminal used by the setup dialog.
pub trait Prompt {
    fn say(&mut self, line: &str) -> io::Result<()>;
    fn ask(&mut self, question: &str) -> io::Result<String>;
    fn ask_secret(&mut self, question: &str) -> io::Result<String>;
}

impl Prompt for Term {
    fn say(&mut self, line: &str) -> io::Result<()> {
        self.write_line(line)
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.write_str(question)?;
        self.read_line()
    }

    fn ask_secret(&mut self, question: &str) -> io::Result<String> {
        self.write_str(question)?;
        self.read_secure_line()
    }
}

/// Outcome of a setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Saved { config: S3Config, path: PathBuf },
    Declined,
}

/// Walk the user through creating credentials and save them.
pub fn run(prompt: &mut impl Prompt) -> Result<SetupOutcome> {
    prompt.say(&style("s4 interactive setup").bold().to_string())?;
    prompt.say("")?;
    prompt.say("No .s3cfg configuration file found.")?;

    let answer = prompt.ask("Would you like to create one interactively? (y/N) ")?;
    if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        return Ok(SetupOutcome::Declined);
    }

    prompt.say("")?;
    prompt.say("Common configurations:")?;
    prompt.say("  • AWS S3: your AWS credentials and s3.amazonaws.com")?;
    prompt.say("  • MinIO local: your MinIO credentials and localhost:9000")?;
    prompt.say("  • Other S3-compatible: your service's endpoint and credentials")?;
    prompt.say("")?;

    let access_key = required(prompt.ask("Access Key ID: ")?, "access key")?;
    let secret_key = required(prompt.ask_secret("Secret Access Key: ")?, "secret key")?;
    let endpoint = prompt.ask(&format!("S3 Endpoint (default: {DEFAULT_HOST_BASE}): "))?;
    let region = prompt.ask(&format!("Region (default: {DEFAULT_REGION}): "))?;

    let config = build_config(access_key, secret_key, &endpoint, &region);

    prompt.say("")?;
    prompt.say("Configuration summary:")?;
    prompt.say(&format!("  Endpoint: {}", config.endpoint_url()?))?;
    prompt.say(&format!("  Region: {}", config.region))?;
    prompt.say(&format!("  HTTPS: {}", config.use_https))?;
    prompt.say("")?;

    prompt.say("Where would you like to save this configuration?")?;
    prompt.say("1. Current directory (.s3cfg)")?;
    prompt.say("2. Home directory (~/.s3cfg)")?;
    let choice = prompt.ask("Choice (1-2, default: 2): ")?;
    let path = save_location(&choice, dirs::home_dir().as_deref())?;

    config.save(&path)?;
    tracing::info!(path = %path.display(), "saved credentials");

    Ok(SetupOutcome::Saved { config, path })
}

/// Build a config from raw answers, applying defaults for blank fields.
pub fn build_config(
    access_key: String,
    secret_key: String,
    endpoint: &str,
    region: &str,
) -> S3Config {
    let endpoint = match endpoint.trim() {
        "" => DEFAULT_HOST_BASE,
        host => host,
    };
    let region = match region.trim() {
        "" => DEFAULT_REGION,
        region => region,
    };

    S3Config::new(access_key, secret_key)
        .with_endpoint(endpoint)
        .with_region(region)
}

/// Resolve the save-location answer.
pub fn save_location(choice: &str, home: Option<&Path>) -> Result<PathBuf> {
    match choice.trim() {
        "1" => Ok(PathBuf::from(".s3cfg")),
        "" | "2" => home
            .map(|h| h.join(".s3cfg"))
            .ok_or_else(|| Error::Config("cannot determine home directory".into())),
        other => Err(Error::Validation(format!("invalid choice '{other}'"))),
    }
}

fn required(value: String, what: &str) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(Error::Validation(format!("{what} cannot be empty")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted {
        answers: VecDeque<&'static str>,
        output: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                output: Vec::new(),
            }
        }

        fn next(&mut self) -> io::Result<String> {
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more answers"))
        }
    }

    impl Prompt for Scripted {
        fn say(&mut self, line: &str) -> io::Result<()> {
            self.output.push(line.to_string());
            Ok(())
        }

        fn ask(&mut self, _question: &str) -> io::Result<String> {
            self.next()
        }

        fn ask_secret(&mut self, _question: &str) -> io::Result<String> {
            self.next()
        }
    }

    #[test]
    fn test_declined() {
        let mut prompt = Scripted::new(&["n"]);
        assert_eq!(run(&mut prompt).unwrap(), SetupOutcome::Declined);

        let mut prompt = Scripted::new(&[""]);
        assert_eq!(run(&mut prompt).unwrap(), SetupOutcome::Declined);
    }

    #[test]
    fn test_empty_access_key_rejected() {
        let mut prompt = Scripted::new(&["y", "  "]);
        let err = run(&mut prompt).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_invalid_choice_rejected() {
        let mut prompt = Scripted::new(&["yes", "ak", "sk", "", "", "3"]);
        let err = run(&mut prompt).unwrap_err();
        assert!(err.to_string().contains("invalid choice"));
        assert!(prompt.output.iter().any(|l| l == "  Endpoint: https://s3.amazonaws.com"));
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config("ak".into(), "sk".into(), "", " ");
        assert_eq!(config.host_base, DEFAULT_HOST_BASE);
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(config.use_https);
        assert!(!config.path_style());
    }

    #[test]
    fn test_build_config_local_endpoint() {
        let config = build_config("ak".into(), "sk".into(), "localhost:9000", "eu-west-1");
        assert_eq!(config.host_bucket, "localhost:9000/%(bucket)s");
        assert!(!config.use_https);
        assert!(config.path_style());
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn test_save_location() {
        let home = Path::new("/home/me");
        assert_eq!(save_location("1", Some(home)).unwrap(), PathBuf::from(".s3cfg"));
        assert_eq!(
            save_location("", Some(home)).unwrap(),
            PathBuf::from("/home/me/.s3cfg")
        );
        assert_eq!(
            save_location("2\n", Some(home)).unwrap(),
            PathBuf::from("/home/me/.s3cfg")
        );
        assert!(save_location("", None).is_err());
    }
}
