//! # Commands
//!
//! Every invocation resolves exactly one command by name and drives it
//! through a fixed lifecycle:
//!
//! ```text
//! registry.resolve(name) -> parse(args) -> exec(store) -> report(output)
//!      Unconfigured          Parsed         Executed       Reported
//! ```
//!
//! `parse` validates the argument shape without touching storage. `exec`
//! runs against the [`Store`] handed in by the driver and returns storage
//! errors unchanged. `report` formats the result and cannot fail.
//!
//! ## Built-in Commands
//!
//! | Name | Arguments | Effect |
//! |------|-----------|--------|
//! | `ls` | | list buckets |
//! | `keys` | `<bucket>` | list keys of a bucket |
//! | `get` | `<bucket>.<key> [-f fmt] [-e file]` | read a value |
//! | `set` | `<bucket>.<key> <value>` | write a value |
//! | `create` | `<bucket>...` | create buckets |
//! | `del` | `(<bucket>.<key> \| <bucket>)...` | delete keys and buckets |
//! | `stat` | | entry counts per bucket |

mod bucket;
mod del;
mod get;
mod list;
mod options;
mod registry;
mod set;
mod stat;

use thiserror::Error;

use crate::cli::Output;
use crate::domain::AddressError;
use crate::storage::{Store, StoreError};

pub use bucket::Create;
pub use del::Del;
pub use get::{ExportOption, Fetched, FormatOption, Get, ValueEncoding};
pub use list::{Keys, Ls};
pub use options::{CommandOption, OptionFactory, OptionPipeline};
pub use registry::{CommandRegistry, Configure, Constructor};
pub use set::Set;
pub use stat::Stat;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AddressError> for CommandError {
    fn from(err: AddressError) -> Self {
        CommandError::InvalidParams(err.to_string())
    }
}

impl CommandError {
    pub(crate) fn not_parsed(name: &str) -> Self {
        CommandError::InvalidParams(format!("{} was executed before its arguments were parsed", name))
    }
}

/// Fields shared by every command variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBase {
    /// Name the command is registered under
    pub name: String,

    /// One-line description shown by `help`
    pub description: String,

    /// Raw arguments from the last successful parse
    pub params: Vec<String>,
}

impl CommandBase {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Applies configuration functions in order
    pub fn configure(mut self, opts: &[Configure<'_>]) -> Self {
        for opt in opts {
            opt(&mut self);
        }
        self
    }
}

/// A command variant
pub trait Command {
    /// Shared fields of the command
    fn base(&self) -> &CommandBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn description(&self) -> &str {
        &self.base().description
    }

    /// Validates and stores the arguments that follow the command name
    fn parse(&mut self, args: &[String]) -> Result<(), CommandError>;

    /// Runs the command against the store and records its result
    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError>;

    /// Writes the recorded result
    fn report(&self, output: &Output);
}

/// Fails with `InvalidParams` unless `args` holds at least `min` values
pub(crate) fn require_args(name: &str, args: &[String], min: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min {
        return Err(CommandError::InvalidParams(format!("usage: {} {}", name, usage)));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_applies_in_order() {
        let rename: Configure<'_> = &|base: &mut CommandBase| base.name = "first".to_string();
        let rename_again: Configure<'_> = &|base: &mut CommandBase| base.name = format!("{}-second", base.name);

        let base = CommandBase::new("get", "read").configure(&[rename, rename_again]);
        assert_eq!(base.name, "first-second");
        assert_eq!(base.description, "read");
        assert!(base.params.is_empty());
    }

    #[test]
    fn address_errors_become_invalid_params() {
        let err: CommandError = AddressError::EmptyKey("users.".to_string()).into();
        assert!(matches!(err, CommandError::InvalidParams(_)));
    }

    #[test]
    fn store_errors_pass_through_unchanged() {
        let err: CommandError = StoreError::BucketNotFound("users".to_string()).into();
        assert_eq!(err.to_string(), "bucket does not exist: users");
    }
}
