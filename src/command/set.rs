//! `set <bucket>.<key> <value>`

use super::{require_args, Command, CommandBase, CommandError};
use crate::cli::Output;
use crate::domain::FieldAddress;
use crate::storage::Store;

pub const NAME: &str = "set";
pub const DESCRIPTION: &str = "set the value of a key in an existing bucket";

pub struct Set {
    base: CommandBase,
    entry: Option<(String, String, String)>,
    done: bool,
}

impl Set {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            entry: None,
            done: false,
        })
    }
}

impl Command for Set {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        const USAGE: &str = "<bucket>.<key> <value>";
        require_args(NAME, args, 2, USAGE)?;
        if args.len() > 2 {
            return Err(CommandError::InvalidParams(format!("usage: {} {}", NAME, USAGE)));
        }

        let address: FieldAddress = args[0].parse()?;
        let key = address.key().ok_or_else(|| {
            CommandError::InvalidParams(format!("'{}' does not name a key, expected <bucket>.<key>", address))
        })?;

        self.entry = Some((address.bucket_name().to_string(), key.to_string(), args[1].clone()));
        self.base.params = args.to_vec();
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        let (bucket, key, value) = self
            .entry
            .as_ref()
            .ok_or_else(|| CommandError::not_parsed(NAME))?;

        store.set(bucket, key, value.as_bytes())?;
        self.done = true;
        Ok(())
    }

    fn report(&self, output: &Output) {
        if self.done {
            output.success("ok");
        }
    }
}
