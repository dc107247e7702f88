//! `stat`: entry counts and payload sizes per bucket

use super::{Command, CommandBase, CommandError};
use crate::cli::Output;
use crate::storage::{BucketStats, Store};

pub const NAME: &str = "stat";
pub const DESCRIPTION: &str = "show entry counts and sizes per bucket";

pub struct Stat {
    base: CommandBase,
    parsed: bool,
    stats: Option<Vec<BucketStats>>,
}

impl Stat {
    pub fn open(base: CommandBase) -> Box<dyn Command> {
        Box::new(Self {
            base,
            parsed: false,
            stats: None,
        })
    }
}

impl Command for Stat {
    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn parse(&mut self, args: &[String]) -> Result<(), CommandError> {
        if !args.is_empty() {
            return Err(CommandError::InvalidParams(format!("usage: {} (takes no arguments)", NAME)));
        }
        self.parsed = true;
        Ok(())
    }

    fn exec(&mut self, store: &mut Store) -> Result<(), CommandError> {
        if !self.parsed {
            return Err(CommandError::not_parsed(NAME));
        }
        self.stats = Some(store.stats()?);
        Ok(())
    }

    fn report(&self, output: &Output) {
        let Some(stats) = &self.stats else {
            return;
        };

        if output.is_json() {
            let entries: u64 = stats.iter().map(|s| s.entries).sum();
            output.data(&serde_json::json!({
                "buckets": stats.len(),
                "entries": entries,
                "per_bucket": stats,
            }));
            return;
        }

        output.row(&["BUCKET", "ENTRIES", "BYTES"]);
        for s in stats {
            let (entries, bytes) = (s.entries.to_string(), s.bytes.to_string());
            output.row(&[s.name.as_str(), entries.as_str(), bytes.as_str()]);
        }
    }
}
