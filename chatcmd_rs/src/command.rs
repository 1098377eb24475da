//! Commands: aliases, a declared option vocabulary, and an ordered list of
//! patterns tried first-declared-first.

use std::fmt;

use tracing::debug;

use crate::argument::{ArgValue, Argument};
use crate::error::CommandBuildError;
use crate::option::{CommandOption, Options};
use crate::pattern::CommandPattern;

/// A named command. Built once through [`CommandBuilder`]; immutable
/// afterwards.
pub struct Command<C> {
    aliases: Vec<String>,
    options: Vec<CommandOption<C>>,
    patterns: Vec<CommandPattern<C>>,
    short_description: String,
    description: String,
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("aliases", &self.aliases)
            .field("options", &self.options)
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

impl<C> Command<C> {
    /// Start building a command; `name` becomes the canonical (first) alias.
    pub fn builder(name: &str) -> CommandBuilder<C> {
        CommandBuilder::new(name)
    }

    /// Shorthand for a command with a single zero-argument pattern.
    pub fn quick<F>(name: &str, handler: F) -> Result<Self, CommandBuildError>
    where
        F: Fn(&C, &Options<'_, C>, &[ArgValue]) + Send + Sync + 'static,
    {
        Self::builder(name).pattern_no_args(handler).build()
    }

    /// Canonical name: the first registered alias.
    pub fn name(&self) -> &str {
        &self.aliases[0]
    }

    /// All aliases, lowercase, canonical name first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The declared option vocabulary.
    pub fn options(&self) -> &[CommandOption<C>] {
        &self.options
    }

    pub fn patterns(&self) -> &[CommandPattern<C>] {
        &self.patterns
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Try each pattern in registration order; the first whose mapping
    /// succeeds has its handler invoked, and execution stops there.
    ///
    /// Returns whether any pattern matched. Mapping failures stay silent —
    /// they only drive the fallthrough.
    pub fn execute(&self, ctx: &C, options: &Options<'_, C>, arguments: &[String]) -> bool {
        for (i, pattern) in self.patterns.iter().enumerate() {
            match pattern.try_map(ctx, arguments) {
                Ok(mapped) => {
                    debug!(command = self.name(), pattern = i, "pattern matched");
                    pattern.execute(ctx, options, &mapped);
                    return true;
                }
                Err(_) => continue,
            }
        }

        debug!(command = self.name(), "no pattern matched");
        false
    }
}

/// Compile-time/explicit registration of aliases, options and patterns —
/// every overload is declared as an `(argument list, handler)` pair.
pub struct CommandBuilder<C> {
    aliases: Vec<String>,
    options: Vec<CommandOption<C>>,
    patterns: Vec<CommandPattern<C>>,
    short_description: String,
    description: String,
    error: Option<CommandBuildError>,
}

impl<C> CommandBuilder<C> {
    pub fn new(name: &str) -> Self {
        Self {
            aliases: vec![name.to_lowercase()],
            options: Vec::new(),
            patterns: Vec::new(),
            short_description: String::new(),
            description: String::new(),
            error: None,
        }
    }

    /// Add an alternative name. Aliases are normalized to lowercase.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_lowercase());
        self
    }

    pub fn describe(mut self, short: &str, long: &str) -> Self {
        self.short_description = short.to_owned();
        self.description = long.to_owned();
        self
    }

    /// Declare an option. Two options of the same command must not collide on
    /// either the long or the short name.
    pub fn option(mut self, option: CommandOption<C>) -> Self {
        if self.error.is_none() {
            let collision = self.options.iter().any(|o| {
                o.long_name() == option.long_name() || o.short_name() == option.short_name()
            });
            if collision {
                self.error = Some(CommandBuildError::OptionCollision {
                    name: option.long_name().to_owned(),
                });
            }
        }
        self.options.push(option);
        self
    }

    /// Register one overload: an ordered argument list and its handler. At
    /// most the last argument may be repeatable.
    pub fn pattern<F>(self, arguments: Vec<Argument<C>>, handler: F) -> Self
    where
        F: Fn(&C, &Options<'_, C>, &[ArgValue]) + Send + Sync + 'static,
    {
        self.raw_pattern(CommandPattern::new(arguments, handler))
    }

    /// Register a zero-argument overload.
    pub fn pattern_no_args<F>(mut self, handler: F) -> Self
    where
        F: Fn(&C, &Options<'_, C>, &[ArgValue]) + Send + Sync + 'static,
    {
        self.patterns.push(CommandPattern::no_args(handler));
        self
    }

    /// Register an already-built pattern. At most the last argument may be
    /// repeatable.
    pub fn raw_pattern(mut self, pattern: CommandPattern<C>) -> Self {
        if self.error.is_none() && pattern.misplaced_repeatable() {
            self.error = Some(CommandBuildError::MisplacedRepeatable);
        }
        self.patterns.push(pattern);
        self
    }

    pub fn build(self) -> Result<Command<C>, CommandBuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.aliases.is_empty() || self.aliases.iter().any(String::is_empty) {
            return Err(CommandBuildError::NoAliases);
        }

        Ok(Command {
            aliases: self.aliases,
            options: self.options,
            patterns: self.patterns,
            short_description: self.short_description,
            description: self.description,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
