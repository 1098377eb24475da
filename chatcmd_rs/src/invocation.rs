//! The value produced by tokenizing one line of input.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered positional arguments plus an insertion-ordered option map, as
/// produced by [`Processor::process`](crate::Processor::process).
///
/// An option mapped to `""` means "flag present, no argument". The map keeps
/// insertion order so that downstream serialization sees options in the order
/// the user wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedInvocation {
    /// Positional arguments in the order they appeared.
    pub arguments: Vec<String>,

    /// Raw options: short names are single characters, long names full words.
    pub options: IndexMap<String, String>,
}

impl ParsedInvocation {
    /// True if the line carried no arguments and no options.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty() && self.options.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_options_in_insertion_order() {
        let mut invocation = ParsedInvocation::default();
        invocation.arguments.push("add".into());
        invocation.options.insert("force".into(), String::new());
        invocation.options.insert("name".into(), "np mek".into());
        invocation.options.insert("o".into(), "lol".into());

        let json = serde_json::to_string(&invocation).unwrap();
        assert_eq!(
            json,
            r#"{"arguments":["add"],"options":{"force":"","name":"np mek","o":"lol"}}"#
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(ParsedInvocation::default().is_empty());
    }
}
