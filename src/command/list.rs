//! Enumeration commands: `ls` lists buckets, `keys <bucket>` lists keys

use super::{Command, CommandBase, CommandError};
use crate::cli::Output;
use crate::domain::FieldAddress;
use crate::storage::Store;

pub const LS: &str = "ls";
pub const LS_DESCRIPTION: &str = "list all buckets";

pub const KEYS: &str = "keys";
pub const KEYS_DESCRIPTION: &str = "list all keys in a bucket";

fn report_names(output: &Output, names: &[String]) {
    if output.is_json() {
        output.data(&names);
    } else {
        for name in names {
            output.line(name);
        }
    }
}

pub struct Ls {
    base: CommandBase,
    parsed: bool,
    buckets: Option<Vec<String>>,
}

impl Ls {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            parsed: false,
            buckets: None,
        })
    }
}

impl Command for Ls {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        if !args.is_empty() {
            return Err(CommandError::InvalidParams(format!("usage: {} (takes no arguments)", LS)));
        }
        self.base.params = Vec::new();
        self.parsed = true;
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        if !self.parsed {
            return Err(CommandError::not_parsed(LS));
        }
        self.buckets = Some(store.buckets()?);
        Ok(())
    }

    fn report(&self, output: &Output) {
        if let Some(buckets) = &self.buckets {
            report_names(output, buckets);
        }
    }
}

pub struct Keys {
    base: CommandBase,
    bucket: Option<String>,
    keys: Option<Vec<String>>,
}

impl Keys {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            bucket: None,
            keys: None,
        })
    }
}

impl Command for Keys {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        let [arg] = args else {
            return Err(CommandError::InvalidParams(format!("usage: {} <bucket>", KEYS)));
        };

        let address: FieldAddress = arg.parse()?;
        if address.is_entry() {
            return Err(CommandError::InvalidParams(format!(
                "'{}' names a key, expected a bucket",
                address
            )));
        }

        self.bucket = Some(address.bucket_name().to_string());
        self.base.params = args.to_vec();
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        let bucket = self
            .bucket
            .as_ref()
            .ok_or_else(|| CommandError::not_parsed(KEYS))?;
        self.keys = Some(store.keys(bucket)?);
        Ok(())
    }

    fn report(&self, output: &Output) {
        if let Some(keys) = &self.keys {
            report_names(output, keys);
        }
    }
}
