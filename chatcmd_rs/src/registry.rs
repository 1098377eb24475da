//! Command registry: alias lookup plus "did you mean" suggestions.

use std::fmt;

use strsim::levenshtein;
use tracing::debug;

use crate::command::Command;
use crate::error::CommandBuildError;

/// Name → command lookup over a set of registered commands.
///
/// Created once at startup, read-only afterwards. Lookups are
/// case-insensitive over every alias of every command.
pub struct CommandRegistry<C> {
    commands: Vec<Command<C>>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field(
                "commands",
                &self.commands.iter().map(Command::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<C> CommandRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command; every alias must be free.
    pub fn register(&mut self, command: Command<C>) -> Result<(), CommandBuildError> {
        for alias in command.aliases() {
            if self.get(alias).is_some() {
                return Err(CommandBuildError::AliasCollision {
                    alias: alias.clone(),
                });
            }
        }
        debug!(command = command.name(), "command registered");
        self.commands.push(command);
        Ok(())
    }

    /// Look a command up by any of its aliases, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&Command<C>> {
        let name = name.to_lowercase();
        self.commands
            .iter()
            .find(|c| c.aliases().iter().any(|a| *a == name))
    }

    /// Suggest the closest registered alias when a lookup failed.
    /// Only names within Levenshtein distance 2 qualify.
    pub fn suggest(&self, input: &str) -> Option<&str> {
        let input = input.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for command in &self.commands {
            for alias in command.aliases() {
                let distance = levenshtein(&input, alias);
                if distance <= 2 && best.is_none_or(|(_, d)| distance < d) {
                    best = Some((alias, distance));
                }
            }
        }

        best.map(|(alias, _)| alias)
    }

    pub fn commands(&self) -> &[Command<C>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CommandRegistry<()> {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                Command::builder("greet")
                    .alias("hello")
                    .pattern_no_args(|_, _, _| {})
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(Command::quick("version", |_, _, _| {}).unwrap())
            .unwrap();
        registry
    }

    #[test]
    fn test_lookup_by_any_alias_case_insensitive() {
        let registry = registry();
        assert_eq!(registry.get("greet").unwrap().name(), "greet");
        assert_eq!(registry.get("hello").unwrap().name(), "greet");
        assert_eq!(registry.get("GREET").unwrap().name(), "greet");
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_alias_collision() {
        let mut registry = registry();
        let err = registry
            .register(Command::quick("hello", |_, _, _| {}).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            CommandBuildError::AliasCollision { alias } if alias == "hello"
        ));
    }

    #[test]
    fn test_suggestion() {
        let registry = registry();
        assert_eq!(registry.suggest("gret"), Some("greet"));
        assert_eq!(registry.suggest("vers1on"), Some("version"));
        assert_eq!(registry.suggest("somethingelse"), None);
    }
}
