//! Shell-like tokenizer: quoting, escaping, and short/long option grammar.
//!
//! One line of free-form text goes in, a [`ParsedInvocation`] comes out.
//! Positional arguments are parsed until the first top-level `-`; from that
//! point on the rest of the line belongs to the options section and anything
//! in it that is not an option is a syntax error.

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::invocation::ParsedInvocation;

/// Character that introduces an option (`-x`) or, doubled, a long option
/// (`--example`).
pub const PREFIX_OPTION: char = '-';
/// Token separator.
pub const WORD_SEPARATOR: char = ' ';
/// Escape character: the following character is taken literally.
pub const ESCAPE_CHAR: char = '\\';
/// Single quote: groups words, double quotes inside are literal.
pub const SINGLE_QUOTE: char = '\'';
/// Double quote: groups words, single quotes inside are literal.
pub const DOUBLE_QUOTE: char = '"';

/// Independently togglable grammar switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Suppress duplicate-option errors; the last write wins.
    pub allow_duplicate_option: bool,

    /// Option arguments are still consumed syntactically but discarded from
    /// the result map.
    pub ignore_option_arguments: bool,

    /// The escape character loses its special meaning and is kept literally.
    pub ignore_escape_character: bool,
}

/// The tokenizer. Holds only immutable configuration, so one processor can be
/// shared and reused; every [`process`](Processor::process) call runs over its
/// own [`Cursor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Processor {
    config: ProcessorConfig,
}

impl Processor {
    /// A processor with all switches off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Tokenize a whole input line.
    ///
    /// The input is trimmed first; an empty line yields an empty invocation.
    /// Returns a positioned [`SyntaxError`] on malformed input.
    pub fn process(&self, input: &str) -> Result<ParsedInvocation, SyntaxError> {
        let mut invocation = ParsedInvocation::default();

        let input = input.trim();
        if input.is_empty() {
            return Ok(invocation);
        }

        let mut cursor = Cursor::new(input);

        while cursor.has_next() {
            let Some(n) = cursor.next_token() else { break };

            if n == PREFIX_OPTION {
                cursor.backward();
                invocation.options = self.process_options(&mut cursor)?;
            } else if n != WORD_SEPARATOR {
                cursor.backward();
                invocation.arguments.push(self.process_argument(&mut cursor)?);
            }
            // Pure separators are skipped.
        }

        Ok(invocation)
    }

    /// Parse one positional argument, from the current position until a
    /// separator or exhaustion. Honors escapes and quoted substrings:
    /// `ab'cd e'f` accumulates to `abcd ef`.
    pub fn process_argument(&self, cursor: &mut Cursor) -> Result<String, SyntaxError> {
        let mut buffer = String::new();

        while cursor.has_next() {
            let Some(n) = cursor.next_token() else { break };
            if n == WORD_SEPARATOR {
                break;
            }

            if n == ESCAPE_CHAR && !self.config.ignore_escape_character {
                buffer.push(self.process_escape_character(cursor)?);
            } else if n == SINGLE_QUOTE || n == DOUBLE_QUOTE {
                cursor.backward();
                buffer.push_str(&self.process_quoted_string(cursor)?);
            } else {
                buffer.push(n);
            }
        }

        Ok(buffer)
    }

    /// Return the next character literally, regardless of its usual meaning.
    /// Fails when the escape character was the last character of the input.
    pub fn process_escape_character(&self, cursor: &mut Cursor) -> Result<char, SyntaxError> {
        cursor
            .next_token()
            .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::NothingToEscape, cursor.offset()))
    }

    /// Parse a quoted string, starting just before the opening quote.
    ///
    /// The string closes on the same quote character that opened it; the other
    /// quote character is literal inside. An unterminated quote is an error
    /// anchored at the opening quote.
    pub fn process_quoted_string(&self, cursor: &mut Cursor) -> Result<String, SyntaxError> {
        let opening = cursor
            .next_token()
            .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::UnterminatedQuote, cursor.offset()))?;
        let start = cursor.offset();

        let closing = if opening == SINGLE_QUOTE {
            SINGLE_QUOTE
        } else {
            DOUBLE_QUOTE
        };

        let mut buffer = String::new();

        while cursor.has_next() {
            let Some(n) = cursor.next_token() else { break };

            if n == ESCAPE_CHAR && !self.config.ignore_escape_character {
                buffer.push(self.process_escape_character(cursor)?);
            } else if n == closing {
                return Ok(buffer);
            } else {
                buffer.push(n);
            }
        }

        Err(SyntaxError::new(SyntaxErrorKind::UnterminatedQuote, start))
    }

    /// Parse the options section. Consumes the cursor to completion: once this
    /// starts, everything remaining must be options and their arguments.
    pub fn process_options(
        &self,
        cursor: &mut Cursor,
    ) -> Result<IndexMap<String, String>, SyntaxError> {
        let mut options: IndexMap<String, String> = IndexMap::new();

        let mut prev_was_prefix = false;

        while cursor.has_next() {
            let Some(n) = cursor.next_token() else { break };

            if prev_was_prefix {
                if n == PREFIX_OPTION {
                    // Second prefix marks a long option.
                    let start = cursor.offset();
                    let (name, argument) = self.process_long_option(cursor)?;

                    if !self.config.allow_duplicate_option && options.contains_key(&name) {
                        return Err(SyntaxError::new(SyntaxErrorKind::DuplicateOption, start));
                    }
                    options.insert(name, argument);
                } else if (n == ESCAPE_CHAR && !self.config.ignore_escape_character)
                    || n == WORD_SEPARATOR
                    || n == SINGLE_QUOTE
                    || n == DOUBLE_QUOTE
                {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::IllegalOptionCharacter,
                        cursor.offset(),
                    ));
                } else {
                    // Ordinary character: a chain of short options.
                    cursor.backward();
                    let start = cursor.offset();
                    let chain = self.process_short_options(cursor)?;

                    // A bare short flag may repeat; a repeat carrying a
                    // non-empty argument is always an error. Asymmetry kept
                    // from the original grammar.
                    if !self.config.allow_duplicate_option {
                        for (name, argument) in &chain {
                            if options.contains_key(name) && !argument.is_empty() {
                                return Err(SyntaxError::new(
                                    SyntaxErrorKind::DuplicateOption,
                                    start,
                                ));
                            }
                        }
                    }
                    options.extend(chain);
                }

                prev_was_prefix = false;
            } else if n == PREFIX_OPTION {
                prev_was_prefix = true;
            } else {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::NotAnOptionPrefix,
                    cursor.offset(),
                ));
            }
        }

        Ok(options)
    }

    /// Parse one long option name and, if present, its argument.
    ///
    /// Starts just after `--`. The name runs until a separator and must not
    /// contain a prefix, escape or quote character. Whatever follows that is
    /// not a new option is consumed as this option's argument.
    pub fn process_long_option(
        &self,
        cursor: &mut Cursor,
    ) -> Result<(String, String), SyntaxError> {
        let mut buffer = String::new();

        while cursor.has_next() {
            let Some(n) = cursor.next_token() else { break };
            if n == WORD_SEPARATOR {
                break;
            }

            if n == PREFIX_OPTION
                || (n == ESCAPE_CHAR && !self.config.ignore_escape_character)
                || n == SINGLE_QUOTE
                || n == DOUBLE_QUOTE
            {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::IllegalOptionCharacter,
                    cursor.offset(),
                ));
            }
            buffer.push(n);
        }

        if buffer.is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::AnonymousLongOption,
                cursor.offset(),
            ));
        }

        let argument = self.process_option_argument(cursor)?;
        Ok((buffer, argument))
    }

    /// Parse a chain of short options (`-noff`) and the optional argument of
    /// the last one.
    pub fn process_short_options(
        &self,
        cursor: &mut Cursor,
    ) -> Result<IndexMap<String, String>, SyntaxError> {
        let mut chain: IndexMap<String, String> = IndexMap::new();

        let mut last_option: Option<char> = None;

        while cursor.has_next() {
            let Some(n) = cursor.next_token() else { break };
            if n == WORD_SEPARATOR {
                break;
            }

            if (n == ESCAPE_CHAR && !self.config.ignore_escape_character)
                || n == SINGLE_QUOTE
                || n == DOUBLE_QUOTE
            {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::IllegalOptionCharacter,
                    cursor.offset(),
                ));
            }

            last_option = Some(n);
            chain.insert(n.to_string(), String::new());
        }

        let Some(last) = last_option else {
            return Err(SyntaxError::new(
                SyntaxErrorKind::EmptyShortOptionChain,
                cursor.offset(),
            ));
        };

        // Only the last option of the chain may take an argument.
        let argument = self.process_option_argument(cursor)?;
        if !argument.is_empty() {
            chain.insert(last.to_string(), argument);
        }

        Ok(chain)
    }

    /// Consume the argument following an option, if any. A `-` right after
    /// the separator starts the next option instead. Honors the
    /// `ignore_option_arguments` switch: the text is consumed either way.
    fn process_option_argument(&self, cursor: &mut Cursor) -> Result<String, SyntaxError> {
        if !cursor.has_next() {
            return Ok(String::new());
        }
        let Some(n) = cursor.next_token() else {
            return Ok(String::new());
        };

        if n == PREFIX_OPTION {
            cursor.backward();
            return Ok(String::new());
        }

        cursor.backward();
        let argument = self.process_argument(cursor)?;
        if self.config.ignore_option_arguments {
            Ok(String::new())
        } else {
            Ok(argument)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn process(input: &str) -> ParsedInvocation {
        Processor::new().process(input).unwrap()
    }

    fn options_of(input: &str) -> IndexMap<String, String> {
        let mut cursor = Cursor::new(input);
        Processor::new().process_options(&mut cursor).unwrap()
    }

    fn options_err(input: &str) -> SyntaxError {
        let mut cursor = Cursor::new(input);
        Processor::new().process_options(&mut cursor).unwrap_err()
    }

    // ------------------------------------------------------------------
    // Escapes
    // ------------------------------------------------------------------

    #[test]
    fn test_escape_character() {
        let processor = Processor::new();
        for (input, expected) in [
            ("\\d", 'd'),
            ("\\\\", '\\'),
            ("\\-", '-'),
            ("\\\"", '"'),
            ("\\'", '\''),
        ] {
            let mut cursor = Cursor::new(input);
            cursor.next_token();
            assert_eq!(
                processor.process_escape_character(&mut cursor).unwrap(),
                expected,
                "escaping {input:?}"
            );
        }
    }

    #[test]
    fn test_escape_at_end_of_input() {
        let err = Processor::new().process("oops\\").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::NothingToEscape);
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_ignored_escape_is_literal() {
        let processor = Processor::with_config(ProcessorConfig {
            ignore_escape_character: true,
            ..Default::default()
        });
        let invocation = processor.process("a\\b").unwrap();
        assert_eq!(invocation.arguments, vec!["a\\b"]);
    }

    // ------------------------------------------------------------------
    // Quoted strings
    // ------------------------------------------------------------------

    #[test]
    fn test_quoted_string() {
        let processor = Processor::new();
        for (input, expected) in [
            ("\"Hey\"", "Hey"),
            ("'hey'", "hey"),
            ("\"Hi, fellow 'humans' \\\"!\"", "Hi, fellow 'humans' \"!"),
        ] {
            let mut cursor = Cursor::new(input);
            assert_eq!(
                processor.process_quoted_string(&mut cursor).unwrap(),
                expected,
                "parsing {input:?}"
            );
        }
    }

    #[test]
    fn test_quoted_string_failures() {
        let processor = Processor::new();
        for input in ["'Hi\"", "Hi", "'Hey, how are you ?\"", "'Hi\\'"] {
            let mut cursor = Cursor::new(input);
            let err = processor.process_quoted_string(&mut cursor).unwrap_err();
            assert_eq!(
                err.kind,
                SyntaxErrorKind::UnterminatedQuote,
                "parsing {input:?}"
            );
        }
    }

    #[test]
    fn test_unterminated_quote_anchored_at_opening_quote() {
        let err = Processor::new().process("add 'me first").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedQuote);
        assert_eq!(err.position, 4);
    }

    // ------------------------------------------------------------------
    // Positional arguments
    // ------------------------------------------------------------------

    #[test]
    fn test_argument_splitting() {
        for (input, expected) in [
            ("add   me lol", vec!["add", "me", "lol"]),
            ("add 'me lol'", vec!["add", "me lol"]),
            ("'add' me lol", vec!["add", "me", "lol"]),
            ("add \\' me", vec!["add", "'", "me"]),
        ] {
            assert_eq!(process(input).arguments, expected, "splitting {input:?}");
        }
    }

    #[test]
    fn test_quotes_concatenate_inside_argument() {
        assert_eq!(process("ab'cd e'f").arguments, vec!["abcd ef"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(process("").is_empty());
        assert!(process("   ").is_empty());
    }

    // ------------------------------------------------------------------
    // Options
    // ------------------------------------------------------------------

    #[test]
    fn test_short_option_forms() {
        let expectations: &[(&str, &[(&str, &str)])] = &[
            ("-n", &[("n", "")]),
            ("-noff", &[("n", ""), ("o", ""), ("f", "")]),
            ("-no Hey", &[("n", ""), ("o", "Hey")]),
            ("-no 'Hey dude'", &[("n", ""), ("o", "Hey dude")]),
            ("-n -o 'Hi'", &[("n", ""), ("o", "Hi")]),
            ("-no --force", &[("n", ""), ("o", ""), ("force", "")]),
            (
                "-no Hey --force false",
                &[("n", ""), ("o", "Hey"), ("force", "false")],
            ),
        ];

        for (input, expected) in expectations {
            let options = options_of(input);
            assert_eq!(options.len(), expected.len(), "parsing {input:?}");
            for (name, argument) in *expected {
                assert_eq!(
                    options.get(*name).map(String::as_str),
                    Some(*argument),
                    "option {name:?} of {input:?}"
                );
            }
        }
    }

    #[test]
    fn test_option_failures() {
        for input in [
            "-no Hey dude",
            "-no Hi --force no dude",
            "---hey",
            "--force hi !",
            "--",
            "- hey",
            "-- yo h",
            "-n hey -n ho",
            "-n -n hy",
            "--force --force",
            "--force bite --force",
            "--force --force bite",
        ] {
            options_err(input);
        }
    }

    #[test]
    fn test_option_failure_kinds() {
        assert_eq!(
            options_err("---hey").kind,
            SyntaxErrorKind::IllegalOptionCharacter
        );
        assert_eq!(options_err("--").kind, SyntaxErrorKind::AnonymousLongOption);
        assert_eq!(
            options_err("-- yo h").kind,
            SyntaxErrorKind::AnonymousLongOption
        );
        assert_eq!(
            options_err("- hey").kind,
            SyntaxErrorKind::IllegalOptionCharacter
        );
        assert_eq!(
            options_err("--force --force").kind,
            SyntaxErrorKind::DuplicateOption
        );
        assert_eq!(
            options_err("-n hey -n ho").kind,
            SyntaxErrorKind::DuplicateOption
        );
        assert_eq!(
            options_err("-no Hey dude").kind,
            SyntaxErrorKind::NotAnOptionPrefix
        );
    }

    #[test]
    fn test_bare_short_flag_duplicate_is_lenient() {
        // A short flag repeated with no argument is tolerated even without
        // allow_duplicate_option.
        let options = options_of("-n -n");
        assert_eq!(options.len(), 1);
        assert_eq!(options.get("n").map(String::as_str), Some(""));
    }

    #[test]
    fn test_trailing_lone_prefix_is_ignored() {
        let options = options_of("-n -");
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_allow_duplicate_option() {
        let processor = Processor::with_config(ProcessorConfig {
            allow_duplicate_option: true,
            ..Default::default()
        });

        let invocation = processor.process("--force a --force b").unwrap();
        assert_eq!(
            invocation.options.get("force").map(String::as_str),
            Some("b")
        );
        // Last write wins but the first insertion keeps its slot.
        assert_eq!(invocation.options.len(), 1);

        let invocation = processor.process("-n hey -n ho").unwrap();
        assert_eq!(invocation.options.get("n").map(String::as_str), Some("ho"));
    }

    #[test]
    fn test_ignore_option_arguments() {
        let processor = Processor::with_config(ProcessorConfig {
            ignore_option_arguments: true,
            ..Default::default()
        });

        let invocation = processor.process("--name 'np mek' -o lol").unwrap();
        assert_eq!(invocation.options.get("name").map(String::as_str), Some(""));
        assert_eq!(invocation.options.get("o").map(String::as_str), Some(""));
    }

    // ------------------------------------------------------------------
    // Whole lines
    // ------------------------------------------------------------------

    #[test]
    fn test_full_round_trip() {
        let invocation = process("add 'me first' yup --force --name 'np mek' -o lol");

        assert_eq!(invocation.arguments, vec!["add", "me first", "yup"]);
        assert_eq!(
            invocation.options.keys().collect::<Vec<_>>(),
            vec!["force", "name", "o"]
        );
        assert_eq!(invocation.options.get("force").map(String::as_str), Some(""));
        assert_eq!(
            invocation.options.get("name").map(String::as_str),
            Some("np mek")
        );
        assert_eq!(invocation.options.get("o").map(String::as_str), Some("lol"));
    }

    #[test]
    fn test_no_arguments_after_options_section() {
        // Once `-` is seen at top level the rest of the line is options only.
        let err = Processor::new().process("add --force trailing junk").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::NotAnOptionPrefix);
    }

    #[test]
    fn test_escaped_prefix_is_a_positional_argument() {
        let invocation = process("add \\-not-an-option");
        assert_eq!(invocation.arguments, vec!["add", "-not-an-option"]);
        assert!(invocation.options.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let input = "add 'me first' yup --force --name 'np mek' -o lol";
        let processor = Processor::new();
        assert_eq!(
            processor.process(input).unwrap(),
            processor.process(input).unwrap()
        );
    }
}
