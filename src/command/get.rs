//! `get <bucket>.<key> [flag value]...`
//!
//! Reads one value. Options:
//!
//! | Flag | Priority | Effect |
//! |------|----------|--------|
//! | `-f <text\|hex\|base64>` | 0 | re-render the value |
//! | `-e <file>` | 1 | write the raw bytes to `<file>`, report `ok` |

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use base64::Engine;
use tracing::debug;

use super::{require_args, Command, CommandBase, CommandError, CommandOption, OptionFactory, OptionPipeline};
use crate::cli::Output;
use crate::domain::FieldAddress;
use crate::storage::Store;

pub const NAME: &str = "get";
pub const DESCRIPTION: &str = "get the value stored under a key";

const FORMAT_FLAG: &str = "-f";
const EXPORT_FLAG: &str = "-e";

const FORMAT_PRIORITY: u8 = 0;
const EXPORT_PRIORITY: u8 = 1;

/// Result reported after a successful export
pub const EXPORTED: &str = "ok";

/// Value read by `get`, as seen by its options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Raw bytes from the store
    pub data: Vec<u8>,

    /// What will be reported
    pub result: String,
}

impl Fetched {
    pub fn new(data: Vec<u8>) -> Self {
        let result = ValueEncoding::Text.render(&data);
        Self { data, result }
    }
}

/// How `-f` renders a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueEncoding {
    /// UTF-8, invalid sequences replaced
    #[default]
    Text,
    Hex,
    Base64,
}

impl ValueEncoding {
    pub fn render(self, data: &[u8]) -> String {
        match self {
            ValueEncoding::Text => String::from_utf8_lossy(data).into_owned(),
            ValueEncoding::Hex => data.iter().map(|b| format!("{:02x}", b)).collect(),
            ValueEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(data),
        }
    }
}

impl FromStr for ValueEncoding {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ValueEncoding::Text),
            "hex" => Ok(ValueEncoding::Hex),
            "base64" => Ok(ValueEncoding::Base64),
            other => Err(CommandError::InvalidParams(format!(
                "unknown format '{}', expected text, hex or base64",
                other
            ))),
        }
    }
}

/// `-f`: renders the value in another encoding
#[derive(Debug, Default)]
pub struct FormatOption {
    encoding: ValueEncoding,
}

impl CommandOption<Fetched> for FormatOption {
    fn flag(&self) -> &'static str {
        FORMAT_FLAG
    }

    fn priority(&self) -> u8 {
        FORMAT_PRIORITY
    }

    fn set(&mut self, arg: &str) -> Result<(), CommandError> {
        self.encoding = arg.parse()?;
        Ok(())
    }

    fn apply(&self, target: &mut Fetched) -> Result<(), CommandError> {
        target.result = self.encoding.render(&target.data);
        Ok(())
    }
}

/// `-e`: writes the raw value to a file
#[derive(Debug, Default)]
pub struct ExportOption {
    file: PathBuf,
}

impl CommandOption<Fetched> for ExportOption {
    fn flag(&self) -> &'static str {
        EXPORT_FLAG
    }

    fn priority(&self) -> u8 {
        EXPORT_PRIORITY
    }

    fn set(&mut self, arg: &str) -> Result<(), CommandError> {
        if arg.is_empty() {
            return Err(CommandError::InvalidParams("export needs a file path".to_string()));
        }
        self.file = PathBuf::from(arg);
        Ok(())
    }

    fn apply(&self, target: &mut Fetched) -> Result<(), CommandError> {
        fs::write(&self.file, &target.data)?;
        debug!(file = %self.file.display(), bytes = target.data.len(), "value exported");
        target.result = EXPORTED.to_string();
        Ok(())
    }
}

fn format_option() -> Box<dyn CommandOption<Fetched>> {
    Box::new(FormatOption::default())
}

fn export_option() -> Box<dyn CommandOption<Fetched>> {
    Box::new(ExportOption::default())
}

/// Flags `get` understands
const KNOWN_OPTIONS: &[(&str, OptionFactory<Fetched>)] = &[
    (FORMAT_FLAG, format_option),
    (EXPORT_FLAG, export_option),
];

pub struct Get {
    base: CommandBase,
    target: Option<(String, String)>,
    options: OptionPipeline<Fetched>,
    fetched: Option<Fetched>,
}

impl Get {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            target: None,
            options: OptionPipeline::new(),
            fetched: None,
        })
    }

    /// Reported result, once executed
    pub fn result(&self) -> Option<&str> {
        self.fetched.as_ref().map(|f| f.result.as_str())
    }
}

impl Command for Get {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        require_args(NAME, args, 1, "<bucket>.<key> [-f text|hex|base64] [-e file]")?;

        let address: FieldAddress = args[0].parse()?;
        let key = address.key().ok_or_else(|| {
            CommandError::InvalidParams(format!("'{}' does not name a key, expected <bucket>.<key>", address))
        })?;

        self.options = OptionPipeline::parse(&args[1..], KNOWN_OPTIONS)?;
        self.target = Some((address.bucket_name().to_string(), key.to_string()));
        self.base.params = args.to_vec();
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        let (bucket, key) = self
            .target
            .as_ref()
            .ok_or_else(|| CommandError::not_parsed(NAME))?;

        let mut fetched = Fetched::new(store.get(bucket, key)?);
        self.options.run(&mut fetched)?;
        self.fetched = Some(fetched);
        Ok(())
    }

    fn report(&self, output: &Output) {
        let (Some((bucket, key)), Some(fetched)) = (&self.target, &self.fetched) else {
            return;
        };

        if output.is_json() {
            output.data(&serde_json::json!({
                "bucket": bucket,
                "key": key,
                "value": fetched.result,
            }));
        } else {
            output.line(&fetched.result);
        }
    }
}
