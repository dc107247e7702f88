//! `del (<bucket>.<key> | <bucket>)...`
//!
//! Addresses are processed left to right. A failed key deletion is logged
//! and skipped; a failed bucket deletion stops the command and is returned.

use tracing::warn;

use super::{require_args, Command, CommandBase, CommandError};
use crate::cli::Output;
use crate::domain::FieldAddress;
use crate::storage::Store;

pub const NAME: &str = "del";
pub const DESCRIPTION: &str = "delete keys or whole buckets";

pub struct Del {
    base: CommandBase,
    addresses: Vec<FieldAddress>,
    parsed: bool,
    deleted: Vec<String>,
}

impl Del {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            addresses: Vec::new(),
            parsed: false,
            deleted: Vec::new(),
        })
    }
}

impl Command for Del {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        require_args(NAME, args, 1, "(<bucket>.<key> | <bucket>)...")?;

        self.addresses = args
            .iter()
            .map(|arg| arg.parse::<FieldAddress>())
            .collect::<Result<Vec<_>, _>>()?;
        self.base.params = args.to_vec();
        self.parsed = true;
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        if !self.parsed {
            return Err(CommandError::not_parsed(NAME));
        }

        for address in &self.addresses {
            match address.key() {
                Some(key) => {
                    if let Err(err) = store.delete_key(address.bucket_name(), key) {
                        warn!(%address, error = %err, "ignoring failed key deletion");
                        continue;
                    }
                }
                None => store.delete_bucket(address.bucket_name())?,
            }
            self.deleted.push(address.to_string());
        }
        Ok(())
    }

    fn report(&self, output: &Output) {
        if !self.parsed {
            return;
        }

        if output.is_json() {
            output.data(&serde_json::json!({ "deleted": self.deleted }));
        } else {
            output.success("ok");
        }
    }
}
