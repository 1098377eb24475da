//! One callable overload of a command: an ordered argument-type list plus a
//! handler.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::argument::{ArgValue, Argument};
use crate::error::MappingError;
use crate::option::Options;

/// Handler closure invoked with the caller context, the resolved options and
/// the mapped arguments.
pub type Handler<C> = Arc<dyn Fn(&C, &Options<'_, C>, &[ArgValue]) + Send + Sync>;

/// An ordered list of argument types and the handler to run when an
/// invocation's positional arguments map against it.
///
/// At most the last argument may be repeatable; it then greedily consumes all
/// remaining tokens, each mapped independently.
pub struct CommandPattern<C> {
    arguments: Vec<Argument<C>>,
    handler: Handler<C>,
}

impl<C> Clone for CommandPattern<C> {
    fn clone(&self) -> Self {
        Self {
            arguments: self.arguments.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C> fmt::Debug for CommandPattern<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPattern")
            .field("arguments", &self.arguments)
            .finish()
    }
}

impl<C> CommandPattern<C> {
    pub fn new<F>(arguments: Vec<Argument<C>>, handler: F) -> Self
    where
        F: Fn(&C, &Options<'_, C>, &[ArgValue]) + Send + Sync + 'static,
    {
        Self {
            arguments,
            handler: Arc::new(handler),
        }
    }

    /// A pattern taking no positional arguments.
    pub fn no_args<F>(handler: F) -> Self
    where
        F: Fn(&C, &Options<'_, C>, &[ArgValue]) + Send + Sync + 'static,
    {
        Self::new(Vec::new(), handler)
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    fn last_is_repeatable(&self) -> bool {
        self.arguments.last().is_some_and(Argument::is_repeatable)
    }

    /// True if a repeatable argument sits anywhere but the last slot.
    /// Such a pattern is rejected at command build time.
    pub(crate) fn misplaced_repeatable(&self) -> bool {
        self.arguments
            .iter()
            .rev()
            .skip(1)
            .any(Argument::is_repeatable)
    }

    /// Number of raw arguments this pattern requires: a repeatable tail may
    /// match zero tokens.
    fn min_arity(&self) -> usize {
        if self.last_is_repeatable() {
            self.arguments.len() - 1
        } else {
            self.arguments.len()
        }
    }

    /// Try to map raw positional arguments against this pattern.
    ///
    /// Errors are silent signals: the dispatcher falls through to the next
    /// pattern, nothing is surfaced to the user here.
    pub fn try_map(&self, ctx: &C, raw_args: &[String]) -> Result<Vec<ArgValue>, MappingError> {
        let count = raw_args.len();
        if count < self.min_arity()
            || (count > self.arguments.len() && !self.last_is_repeatable())
        {
            return Err(MappingError::WrongArgumentCount {
                expected: self.arguments.len(),
                got: count,
            });
        }

        let mut mapped = Vec::with_capacity(count);

        for (i, raw) in raw_args.iter().enumerate() {
            // Past the declared arity, tokens map through the repeated tail.
            let argument = match self.arguments.get(i) {
                Some(argument) => argument,
                None => match self.arguments.last() {
                    Some(last) => last,
                    None => {
                        return Err(MappingError::WrongArgumentCount {
                            expected: 0,
                            got: count,
                        });
                    }
                },
            };

            match argument.try_map(ctx, raw) {
                Some(value) => mapped.push(value),
                None => {
                    trace!(raw, slot = i, "argument failed to map, pattern falls through");
                    return Err(MappingError::Unmappable { raw: raw.clone() });
                }
            }
        }

        Ok(mapped)
    }

    /// Run the handler with already-mapped arguments.
    pub fn execute(&self, ctx: &C, options: &Options<'_, C>, arguments: &[ArgValue]) {
        (self.handler)(ctx, options, arguments);
    }
}

// ============================================================================
// Tests
// ============================================================================
