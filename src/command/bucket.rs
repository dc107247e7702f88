//! `create <bucket>...`

use super::{require_args, Command, CommandBase, CommandError};
use crate::cli::Output;
use crate::domain::FieldAddress;
use crate::storage::Store;

pub const NAME: &str = "create";
pub const DESCRIPTION: &str = "create one or more empty buckets";

pub struct Create {
    base: CommandBase,
    buckets: Vec<String>,
    created: Option<Vec<String>>,
}

impl Create {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            buckets: Vec::new(),
            created: None,
        })
    }
}

impl Command for Create {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        require_args(NAME, args, 1, "<bucket>...")?;

        let mut buckets = Vec::with_capacity(args.len());
        for arg in args {
            let address: FieldAddress = arg.parse()?;
            if address.is_entry() {
                return Err(CommandError::InvalidParams(format!(
                    "'{}' names a key, expected a bucket",
                    address
                )));
            }
            buckets.push(address.bucket_name().to_string());
        }

        self.buckets = buckets;
        self.base.params = args.to_vec();
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        if self.buckets.is_empty() {
            return Err(CommandError::not_parsed(NAME));
        }

        for bucket in &self.buckets {
            store.create_bucket(bucket)?;
        }
        self.created = Some(self.buckets.clone());
        Ok(())
    }

    fn report(&self, output: &Output) {
        let Some(created) = &self.created else {
            return;
        };

        if output.is_json() {
            output.data(&serde_json::json!({ "created": created }));
        } else {
            output.success("ok");
        }
    }
}
