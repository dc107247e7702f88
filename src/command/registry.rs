//! Name to command resolution
//!
//! The registry is filled once at startup and only read afterwards. Each
//! entry maps a command name to its description and a constructor that
//! turns a configured [`CommandBase`] into a ready-to-parse command.

use std::collections::BTreeMap;

use super::{bucket, del, get, list, set, stat};
use super::{Command, CommandBase, CommandError};

/// Builds a command variant from its configured base
pub type Constructor = fn(CommandBase) -> Box<dyn Command>;

/// Mutates a field of the base before the variant is constructed
pub type Configure<'a> = &'a dyn Fn(&mut CommandBase);

struct Registration {
    description: String,
    open: Constructor,
}

/// Registered command variants, keyed by name
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Registration>,
}

impl CommandRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in command
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register(list::LS, list::LS_DESCRIPTION, list::Ls::open)
            .register(list::KEYS, list::KEYS_DESCRIPTION, list::Keys::open)
            .register(get::NAME, get::DESCRIPTION, get::Get::open)
            .register(set::NAME, set::DESCRIPTION, set::Set::open)
            .register(bucket::NAME, bucket::DESCRIPTION, bucket::Create::open)
            .register(del::NAME, del::DESCRIPTION, del::Del::open)
            .register(stat::NAME, stat::DESCRIPTION, stat::Stat::open);
        registry
    }

    /// Registers a command. A later registration under the same name
    /// replaces the earlier one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        open: Constructor,
    ) -> &mut Self {
        self.commands.insert(
            name.into(),
            Registration {
                description: description.into(),
                open,
            },
        );
        self
    }

    /// Returns true if a command is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Returns an unconfigured instance of the named command after applying
    /// the configuration functions to its base
    pub fn resolve(&self, name: &str, opts: &[Configure<'_>]) -> Result<Box<dyn Command>, CommandError> {
        let registration = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        let base = CommandBase::new(name, registration.description.clone()).configure(opts);
        Ok((registration.open)(base))
    }

    /// Lists `(name, description)` pairs in name order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.commands
            .iter()
            .map(|(name, reg)| (name.as_str(), reg.description.as_str()))
    }
}
