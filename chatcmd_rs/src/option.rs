//! Named options and the resolved option bag handed to handlers.

use std::fmt;

use indexmap::IndexMap;

use crate::argument::{ArgValue, Argument};
use crate::error::UnknownOptionError;

/// A named flag with a long name, a one-character short name and, optionally,
/// a typed argument. An option without an argument type is a pure boolean
/// flag.
pub struct CommandOption<C> {
    long: String,
    short: char,
    argument: Option<Argument<C>>,
}

impl<C> Clone for CommandOption<C> {
    fn clone(&self) -> Self {
        Self {
            long: self.long.clone(),
            short: self.short,
            argument: self.argument.clone(),
        }
    }
}

impl<C> fmt::Debug for CommandOption<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandOption")
            .field("long", &self.long)
            .field("short", &self.short)
            .field("typed", &self.argument.is_some())
            .finish()
    }
}

impl<C> CommandOption<C> {
    /// A boolean flag: `--force` / `-f`.
    pub fn flag(long: &str, short: char) -> Self {
        Self {
            long: long.to_owned(),
            short,
            argument: None,
        }
    }

    /// An option carrying a typed argument: `--name <STRING>` / `-n <STRING>`.
    pub fn with_argument(long: &str, short: char, argument: Argument<C>) -> Self {
        Self {
            long: long.to_owned(),
            short,
            argument: Some(argument),
        }
    }

    pub fn long_name(&self) -> &str {
        &self.long
    }

    pub fn short_name(&self) -> char {
        self.short
    }

    pub fn argument(&self) -> Option<&Argument<C>> {
        self.argument.as_ref()
    }

    /// True if `name` designates this option: a single character matches the
    /// short name, anything longer the long name.
    pub fn answers_to(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c == self.short,
            _ => name == self.long,
        }
    }
}

/// The options of one invocation, resolved against a command's declared
/// vocabulary.
///
/// Construction fails on the first raw key that designates none of the
/// declared options — a vocabulary mismatch, reported as its own error kind
/// rather than a mapping failure.
pub struct Options<'a, C> {
    entries: Vec<(&'a CommandOption<C>, String)>,
}

impl<C> fmt::Debug for Options<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(o, raw)| (o.long_name(), raw)))
            .finish()
    }
}

impl<'a, C> Options<'a, C> {
    /// Resolve the raw option map produced by the tokenizer against the
    /// declared vocabulary, preserving the raw map's order.
    pub fn resolve(
        declared: &'a [CommandOption<C>],
        raw: &IndexMap<String, String>,
    ) -> Result<Self, UnknownOptionError> {
        let mut entries = Vec::with_capacity(raw.len());

        for (name, argument) in raw {
            let option = declared
                .iter()
                .find(|o| o.answers_to(name))
                .ok_or_else(|| UnknownOptionError { name: name.clone() })?;
            entries.push((option, argument.clone()));
        }

        Ok(Self { entries })
    }

    /// An empty bag (an invocation with no options).
    pub fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Presence check by short or long name.
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(o, _)| o.answers_to(name))
    }

    /// Presence check for a specific declared option.
    pub fn has_option(&self, option: &CommandOption<C>) -> bool {
        self.entries
            .iter()
            .any(|(o, _)| o.long_name() == option.long_name())
    }

    /// Lazily map the stored raw string of the named option through its
    /// argument type.
    ///
    /// `None` when the option is absent, has no declared argument type, was
    /// used flag-style (empty raw string), or fails to map.
    pub fn get(&self, ctx: &C, name: &str) -> Option<ArgValue> {
        let (option, raw) = self.entries.iter().find(|(o, _)| o.answers_to(name))?;
        if raw.is_empty() {
            return None;
        }
        option.argument()?.try_map(ctx, raw)
    }

    /// Raw `(long name, raw argument)` pairs in invocation order, for
    /// diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(o, raw)| (o.long_name(), raw.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
