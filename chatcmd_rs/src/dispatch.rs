//! Full pipeline: raw line → command lookup → tokenize → resolve options →
//! execute the first matching pattern.

use tracing::debug;

use crate::error::DispatchError;
use crate::option::Options;
use crate::processor::Processor;
use crate::registry::CommandRegistry;

/// What a successful dispatch ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Canonical name of the command whose pattern executed.
    pub command: String,
}

/// Ties a [`Processor`] and a [`CommandRegistry`] together.
///
/// The dispatcher is the library's outermost surface: the transport layer
/// hands it one stripped line (prefix already removed) plus whatever context
/// the argument mappers need, and gets back either the command that ran or a
/// diagnostic error.
#[derive(Debug)]
pub struct Dispatcher<C> {
    processor: Processor,
    registry: CommandRegistry<C>,
}

impl<C> Dispatcher<C> {
    pub fn new(processor: Processor, registry: CommandRegistry<C>) -> Self {
        Self {
            processor,
            registry,
        }
    }

    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Dispatch one line.
    ///
    /// The first whitespace-delimited token names the command; the remainder
    /// of the line is tokenized and matched against the command's patterns.
    pub fn dispatch(&self, ctx: &C, line: &str) -> Result<Dispatch, DispatchError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(DispatchError::EmptyInput);
        }

        let (name, remainder) = match line.split_once(' ') {
            Some((name, remainder)) => (name, remainder),
            None => (line, ""),
        };

        let Some(command) = self.registry.get(name) else {
            debug!(name, "unknown command");
            return Err(DispatchError::UnknownCommand {
                name: name.to_owned(),
                suggestion: self.registry.suggest(name).map(str::to_owned),
            });
        };

        let invocation = self.processor.process(remainder)?;
        let options = Options::resolve(command.options(), &invocation.options)?;

        if command.execute(ctx, &options, &invocation.arguments) {
            Ok(Dispatch {
                command: command.name().to_owned(),
            })
        } else {
            Err(DispatchError::NoPatternMatched {
                command: command.name().to_owned(),
                arguments: invocation.arguments,
                options: options
                    .iter()
                    .map(|(name, raw)| (name.to_owned(), raw.to_owned()))
                    .collect(),
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
