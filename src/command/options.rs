//! Post-processing options attached to a command
//!
//! Options arrive as trailing `flag value` pairs. Each flag maps to a factory
//! that builds a fresh option per parse; the pipeline then runs the options
//! in ascending priority, keeping argument order among equal priorities.

use super::CommandError;

/// A named, priority-ranked step applied to a command's result
pub trait CommandOption<T> {
    /// Flag that selects the option on the command line
    fn flag(&self) -> &'static str;

    /// Lower runs first
    fn priority(&self) -> u8;

    /// Stores the option's argument
    fn set(&mut self, arg: &str) -> Result<(), CommandError>;

    /// Applies the option; may rewrite the target and perform a side effect
    fn apply(&self, target: &mut T) -> Result<(), CommandError>;
}

pub type OptionFactory<T> = fn() -> Box<dyn CommandOption<T>>;

/// Ordered set of options configured for one invocation
pub struct OptionPipeline<T> {
    steps: Vec<Box<dyn CommandOption<T>>>,
}

impl<T> Default for OptionPipeline<T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<T> OptionPipeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pipeline from `flag value` pairs, looking each flag up in
    /// `known`
    pub fn parse(pairs: &[String], known: &[(&str, OptionFactory<T>)]) -> Result<Self, CommandError> {
        if pairs.len() % 2 != 0 {
            return Err(CommandError::InvalidParams(format!(
                "options must come in flag/value pairs, got {} argument(s)",
                pairs.len()
            )));
        }

        let mut pipeline = Self::new();
        for pair in pairs.chunks(2) {
            let (flag, value) = (&pair[0], &pair[1]);
            let factory = known
                .iter()
                .find(|(name, _)| *name == flag.as_str())
                .map(|(_, factory)| factory)
                .ok_or_else(|| CommandError::InvalidParams(format!("unknown option: {}", flag)))?;

            let mut option = factory();
            option.set(value)?;
            pipeline.push(option);
        }
        Ok(pipeline)
    }

    pub fn push(&mut self, option: Box<dyn CommandOption<T>>) {
        self.steps.push(option);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Flags in the order they will run
    pub fn flags(&self) -> Vec<&'static str> {
        let mut steps: Vec<_> = self.steps.iter().collect();
        steps.sort_by_key(|option| option.priority());
        steps.iter().map(|option| option.flag()).collect()
    }

    /// Applies every option to `target` in priority order, stopping at the
    /// first failure
    pub fn run(&mut self, target: &mut T) -> Result<(), CommandError> {
        // sort_by_key is stable
        self.steps.sort_by_key(|option| option.priority());
        for option in &self.steps {
            option.apply(target)?;
        }
        Ok(())
    }
}
