//! Typed argument matchers: a compiled pattern plus a mapping function from
//! matched text (and the caller's resolution context) to a typed value.
//!
//! The context type `C` is opaque to this crate. Built-in argument types
//! ignore it; domain-reference types use it to look entities up and return
//! `None` when the referenced entity cannot be found.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

static STRING_RE: Lazy<Regex> = Lazy::new(|| anchored(".*"));
static WORD_RE: Lazy<Regex> = Lazy::new(|| anchored(r"\S+"));
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| anchored(r"[-+]?\d+"));
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| anchored(r"[+-]?\d*\.?\d*"));
static BOOLEAN_RE: Lazy<Regex> =
    Lazy::new(|| anchored(r"0|1|t(?:rue)?|f(?:alse)?|y(?:es)?|no?|o(?:n|ff)"));

/// Compile a pattern anchored at both ends, case-insensitive.
///
/// Only called on patterns known at compile time; user-supplied patterns go
/// through [`Argument::new`] which surfaces the compile error.
fn anchored(raw: &str) -> Regex {
    Regex::new(&format!("(?i)^(?:{raw})$")).expect("built-in pattern compiles")
}

/// A value mapped out of one raw token.
///
/// Numeric variants mirror the widening policy: integers land in the
/// narrowest of `Int`/`Long`/`Big` that holds them (`Big` is arbitrary
/// precision, so every digit string maps), floats in `Float` or `Double`.
/// Domain references resolved through the context are carried as
/// [`ArgValue::Other`].
#[derive(Debug, Clone)]
pub enum ArgValue {
    Str(String),
    Int(i32),
    Long(i64),
    Big(BigInt),
    Float(f32),
    Double(f64),
    Bool(bool),
    Url(Url),
    Other(Arc<dyn Any + Send + Sync>),
}

impl ArgValue {
    /// Wrap a domain value resolved through the context.
    pub fn other<T: Any + Send + Sync>(value: T) -> Self {
        ArgValue::Other(Arc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value if it fits 64 bits, widening `Int` as needed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(v) => Some(i64::from(*v)),
            ArgValue::Long(v) => Some(*v),
            ArgValue::Big(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Integer value if it fits 128 bits.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            ArgValue::Int(v) => Some(i128::from(*v)),
            ArgValue::Long(v) => Some(i128::from(*v)),
            ArgValue::Big(v) => i128::try_from(v).ok(),
            _ => None,
        }
    }

    /// Integer value at arbitrary precision.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            ArgValue::Int(v) => Some(BigInt::from(*v)),
            ArgValue::Long(v) => Some(BigInt::from(*v)),
            ArgValue::Big(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(f64::from(*v)),
            ArgValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            ArgValue::Url(u) => Some(u),
            _ => None,
        }
    }

    /// Borrow a domain value of a concrete type, if this is one.
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            ArgValue::Other(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

type Mapper<C> = Arc<dyn Fn(&Captures<'_>, &C) -> Option<ArgValue> + Send + Sync>;

/// A reusable matcher pairing an anchored, case-insensitive pattern with a
/// mapping function.
///
/// Immutable; [`repeatable`](Argument::repeatable) derives a flagged copy for
/// the tail slot of a pattern.
pub struct Argument<C> {
    pattern: Regex,
    mapper: Mapper<C>,
    repeatable: bool,
}

impl<C> Clone for Argument<C> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            mapper: Arc::clone(&self.mapper),
            repeatable: self.repeatable,
        }
    }
}

impl<C> fmt::Debug for Argument<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("pattern", &self.pattern.as_str())
            .field("repeatable", &self.repeatable)
            .finish()
    }
}

impl<C> Argument<C> {
    /// Build an argument type from a raw pattern and a mapper. The pattern is
    /// compiled anchored at both ends and case-insensitive.
    pub fn new<F>(pattern: &str, mapper: F) -> Result<Self, regex::Error>
    where
        F: Fn(&Captures<'_>, &C) -> Option<ArgValue> + Send + Sync + 'static,
    {
        Ok(Self {
            pattern: Regex::new(&format!("(?i)^(?:{pattern})$"))?,
            mapper: Arc::new(mapper),
            repeatable: false,
        })
    }

    fn from_compiled<F>(pattern: &Regex, mapper: F) -> Self
    where
        F: Fn(&Captures<'_>, &C) -> Option<ArgValue> + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.clone(),
            mapper: Arc::new(mapper),
            repeatable: false,
        }
    }

    /// Match anything.
    pub fn string() -> Self {
        Self::from_compiled(&STRING_RE, |m, _| Some(ArgValue::Str(m[0].to_owned())))
    }

    /// Match a single word (no whitespace).
    pub fn word() -> Self {
        Self::from_compiled(&WORD_RE, |m, _| Some(ArgValue::Str(m[0].to_owned())))
    }

    /// Match an integer, widening `i32 -> i64 -> BigInt` as the digits
    /// demand. Every token the pattern accepts maps; oversized digit strings
    /// land in the arbitrary-precision tail instead of failing.
    pub fn integer() -> Self {
        Self::from_compiled(&INTEGER_RE, |m, _| {
            let num = &m[0];
            if let Ok(v) = num.parse::<i32>() {
                Some(ArgValue::Int(v))
            } else if let Ok(v) = num.parse::<i64>() {
                Some(ArgValue::Long(v))
            } else {
                num.parse::<BigInt>().ok().map(ArgValue::Big)
            }
        })
    }

    /// Match a floating point number, trying `f32` then `f64`.
    ///
    /// Pattern-matching tokens that still fail both parses (`"."`, `"+"`)
    /// map to `Float(0.0)`. Historical quirk, kept.
    pub fn float() -> Self {
        Self::from_compiled(&FLOAT_RE, |m, _| {
            let num = &m[0];
            if let Ok(v) = num.parse::<f32>() {
                Some(ArgValue::Float(v))
            } else if let Ok(v) = num.parse::<f64>() {
                Some(ArgValue::Double(v))
            } else {
                Some(ArgValue::Float(0.0))
            }
        })
    }

    /// Match a boolean, case-insensitive.
    /// Truthy: `1 t true y yes on`. Falsy: `0 f false n no off`.
    pub fn boolean() -> Self {
        Self::from_compiled(&BOOLEAN_RE, |m, _| {
            let truthy = matches!(
                m[0].to_ascii_lowercase().as_str(),
                "1" | "t" | "true" | "y" | "yes" | "on"
            );
            Some(ArgValue::Bool(truthy))
        })
    }

    /// Match anything that parses as an absolute URL.
    pub fn url() -> Self {
        Self::from_compiled(&STRING_RE, |m, _| {
            Url::parse(&m[0]).ok().map(ArgValue::Url)
        })
    }

    /// Match exactly the given literal (special characters escaped),
    /// mapping to the matched text.
    pub fn exact(literal: &str) -> Self {
        let pattern = anchored(&regex::escape(literal));
        Self {
            pattern,
            mapper: Arc::new(|m: &Captures<'_>, _: &C| Some(ArgValue::Str(m[0].to_owned()))),
            repeatable: false,
        }
    }

    /// Derive a value-equal copy flagged as repeatable. Used for the last
    /// slot of a pattern to greedily consume all remaining tokens.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Match the token against the pattern and, on success, run the mapper.
    ///
    /// `None` means either the pattern did not match or the mapper declined
    /// (a domain reference that resolved to nothing).
    pub fn try_map(&self, ctx: &C, raw: &str) -> Option<ArgValue> {
        let captures = self.pattern.captures(raw)?;
        (self.mapper)(&captures, ctx)
    }
}

/// Explicit, read-after-construction registry of named argument types.
///
/// Built once at startup and handed to whatever layer translates declarative
/// command descriptions into [`Argument`] lists. Names are stored uppercase.
pub struct ArgumentRegistry<C> {
    entries: IndexMap<String, Argument<C>>,
}

impl<C> Default for ArgumentRegistry<C> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<C> fmt::Debug for ArgumentRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<C> ArgumentRegistry<C> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in argument types:
    /// STRING, WORD, INTEGER, FLOAT, BOOLEAN, URL.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("STRING", Argument::string());
        registry.register("WORD", Argument::word());
        registry.register("INTEGER", Argument::integer());
        registry.register("FLOAT", Argument::float());
        registry.register("BOOLEAN", Argument::boolean());
        registry.register("URL", Argument::url());
        registry
    }

    /// Register an argument type under a name (uppercased). Re-registering a
    /// name replaces the previous entry.
    pub fn register(&mut self, name: &str, argument: Argument<C>) {
        self.entries.insert(name.to_uppercase(), argument);
    }

    /// Look up an argument type by name, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&Argument<C>> {
        self.entries.get(&name.to_uppercase())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Context-free test alias.
    type Arg = Argument<()>;

    #[test]
    fn test_string_matches_anything() {
        let arg = Arg::string();
        assert_eq!(
            arg.try_map(&(), "hey you").unwrap().as_str(),
            Some("hey you")
        );
        assert_eq!(arg.try_map(&(), "").unwrap().as_str(), Some(""));
    }

    #[test]
    fn test_word_rejects_whitespace() {
        let arg = Arg::word();
        assert!(arg.try_map(&(), "hello").is_some());
        assert!(arg.try_map(&(), "hello world").is_none());
        assert!(arg.try_map(&(), "").is_none());
    }

    #[test]
    fn test_integer_widens() {
        let arg = Arg::integer();

        assert!(matches!(arg.try_map(&(), "42"), Some(ArgValue::Int(42))));
        assert!(matches!(arg.try_map(&(), "-7"), Some(ArgValue::Int(-7))));
        assert!(matches!(
            arg.try_map(&(), "4294967296"),
            Some(ArgValue::Long(4294967296))
        ));
        assert!(matches!(
            arg.try_map(&(), "170141183460469231731687303715884105727"),
            Some(ArgValue::Big(v)) if v == BigInt::from(i128::MAX)
        ));
        // Past 128 bits the chain keeps widening instead of failing.
        let value = arg
            .try_map(&(), "170141183460469231731687303715884105728")
            .unwrap();
        assert_eq!(value.as_bigint(), Some(BigInt::from(i128::MAX) + 1));
        assert_eq!(value.as_i128(), None);
        assert!(arg.try_map(&(), "12.5").is_none());
        assert!(arg.try_map(&(), "twelve").is_none());
    }

    #[test]
    fn test_float() {
        let arg = Arg::float();
        assert!(matches!(arg.try_map(&(), "1.5"), Some(ArgValue::Float(v)) if v == 1.5));
        assert!(matches!(arg.try_map(&(), "-0.25"), Some(ArgValue::Float(v)) if v == -0.25));
        assert!(arg.try_map(&(), "not a number").is_none());
        // The historical zero fallback for pattern-matching non-numbers.
        assert!(matches!(arg.try_map(&(), "."), Some(ArgValue::Float(v)) if v == 0.0));
    }

    #[test]
    fn test_boolean_vocabulary() {
        let arg = Arg::boolean();
        for raw in ["1", "t", "true", "y", "yes", "on", "TRUE", "Yes", "ON"] {
            assert_eq!(arg.try_map(&(), raw).unwrap().as_bool(), Some(true), "{raw}");
        }
        for raw in ["0", "f", "false", "n", "no", "off", "False", "NO", "Off"] {
            assert_eq!(arg.try_map(&(), raw).unwrap().as_bool(), Some(false), "{raw}");
        }
        assert!(arg.try_map(&(), "maybe").is_none());
    }

    #[test]
    fn test_url() {
        let arg = Arg::url();
        let value = arg.try_map(&(), "https://example.com/a?b=c").unwrap();
        assert_eq!(value.as_url().unwrap().host_str(), Some("example.com"));
        assert!(arg.try_map(&(), "not a url").is_none());
    }

    #[test]
    fn test_exact_escapes_special_characters() {
        let arg = Arg::exact("$ hey !.");
        assert!(arg.try_map(&(), "$ hey !.").is_some());
        assert!(arg.try_map(&(), "hey").is_none());
    }

    #[test]
    fn test_match_is_case_insensitive_and_anchored() {
        let arg = Arg::new("hey", |m, _| Some(ArgValue::Str(m[0].to_owned()))).unwrap();
        assert!(arg.try_map(&(), "HEY").is_some());
        assert!(arg.try_map(&(), "hey you").is_none());
        assert!(arg.try_map(&(), "say hey").is_none());
    }

    #[test]
    fn test_repeatable_is_a_derived_copy() {
        let arg = Arg::word();
        assert!(!arg.is_repeatable());
        let repeatable = arg.clone().repeatable();
        assert!(repeatable.is_repeatable());
        assert!(!arg.is_repeatable());
    }

    #[test]
    fn test_mapper_sees_the_context() {
        struct Ctx {
            known: Vec<&'static str>,
        }
        let arg: Argument<Ctx> = Argument::new(r"@(?P<name>\w+)", |m, ctx: &Ctx| {
            let name = m.name("name")?.as_str();
            ctx.known
                .iter()
                .find(|k| **k == name)
                .map(|k| ArgValue::other(k.to_string()))
        })
        .unwrap();

        let ctx = Ctx {
            known: vec!["jeff"],
        };
        let value = arg.try_map(&ctx, "@jeff").unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "jeff");
        assert!(arg.try_map(&ctx, "@nobody").is_none());
    }

    #[test]
    fn test_registry() {
        let registry: ArgumentRegistry<()> = ArgumentRegistry::with_builtins();
        assert!(registry.get("BOOLEAN").is_some());
        assert!(registry.get("boolean").is_some());
        assert!(registry.get("TEST").is_none());

        let mut registry = registry;
        registry.register("test", Argument::word());
        assert!(registry.get("TEST").is_some());
    }
}
