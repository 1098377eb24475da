//! # chatcmd
//!
//! **Shell-like command parsing and typed dispatch for chat bots.**
//! Parse once, dispatch anywhere.
//!
//! One line of free-form text goes in; a validated, strongly-typed handler
//! call comes out. The grammar (quoting, escaping, short/long options) is
//! implemented by hand over a cursor; overload resolution picks the first
//! declared pattern whose argument types accept the parsed tokens.
//!
//! ## Features
//!
//! - **Hand-written tokenizer** - quoted strings, escapes, `-abc` short
//!   chains and `--long` options with positioned syntax errors
//! - **Typed arguments** - regex + mapper pairs, built-ins for strings,
//!   words, widening integers, floats, booleans and URLs
//! - **Pattern dispatch** - first declared signature that accepts the
//!   tokens wins; repeatable tail arguments for variadic handlers
//! - **Opaque context** - every mapper sees a caller-supplied context for
//!   resolving domain references (users, channels, whatever your bot knows)
//!
//! ## Quick start
//!
//! ```rust
//! use chatcmd::{Argument, Command, CommandOption, CommandRegistry, Dispatcher, Processor};
//!
//! // Context type is yours; mappers see it, handlers see it.
//! let mut registry: CommandRegistry<()> = CommandRegistry::new();
//! registry
//!     .register(
//!         Command::builder("echo")
//!             .option(CommandOption::flag("force", 'f'))
//!             .pattern(vec![Argument::string().repeatable()], |_ctx, options, args| {
//!                 let loud = options.has("force");
//!                 for arg in args {
//!                     let _ = (loud, arg.as_str());
//!                 }
//!             })
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(Processor::new(), registry);
//! let outcome = dispatcher.dispatch(&(), "echo 'hello there' -f").unwrap();
//! assert_eq!(outcome.command, "echo");
//! ```
//!
//! The crate performs no I/O: transport, prefixes and persistence belong to
//! the caller.

// ============================================================================
// Core Modules
// ============================================================================

/// Scanning cursor over an immutable line of input.
pub mod cursor;

/// Error types: positioned syntax errors, silent mapping signals, dispatch
/// diagnostics.
pub mod error;

/// The tokenizer output: ordered arguments + insertion-ordered options.
pub mod invocation;

/// The tokenizer itself and its configuration switches.
pub mod processor;

/// Typed argument matchers and the argument-type registry.
pub mod argument;

/// Named options and the resolved per-invocation option bag.
pub mod option;

/// Command patterns: one callable overload each.
pub mod pattern;

/// Commands and the explicit builder that registers patterns and options.
pub mod command;

/// Command registry with alias lookup and fuzzy suggestions.
pub mod registry;

/// The full line → handler pipeline.
pub mod dispatch;

// ============================================================================
// Public surface
// ============================================================================

pub use argument::{ArgValue, Argument, ArgumentRegistry};
pub use command::{Command, CommandBuilder};
pub use cursor::Cursor;
pub use dispatch::{Dispatch, Dispatcher};
pub use error::{
    CommandBuildError, DispatchError, MappingError, SyntaxError, SyntaxErrorKind,
    UnknownOptionError,
};
pub use invocation::ParsedInvocation;
pub use option::{CommandOption, Options};
pub use pattern::{CommandPattern, Handler};
pub use processor::{Processor, ProcessorConfig};
pub use registry::CommandRegistry;
