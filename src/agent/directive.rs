//! Parsing of `Action:` lines in model output.
//!
//! A directive is a single line of the form
//!
//! ```text
//! Action: <tool_name>: <argument>
//! ```
//!
//! where `tool_name` is made of ASCII letters, digits and underscores. The
//! keyword is case-sensitive and must start the line.

use regex::Regex;
use std::sync::OnceLock;

/// Pattern a directive line must match in full.
///
/// `.` also matches `\r` and U+2028 here, so a CRLF-terminated directive is
/// accepted and the trailing `\r` is trimmed from the argument.
pub const DIRECTIVE_PATTERN: &str = r"^Action: ([A-Za-z0-9_]+): (.*)$";

const ACTION_KEYWORD: &str = "Action:";

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DIRECTIVE_PATTERN).expect("Invalid directive regex"))
}

/// A request to run one tool with one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub tool_name: String,
    pub argument: String,
}

/// Result of scanning one assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// The first line matching the directive pattern.
    Directive(Directive),
    /// No line mentions an action.
    NoDirective,
    /// A line looks like an action but does not match the pattern, and no
    /// valid directive exists anywhere in the message.
    Malformed { line: String },
}

/// Scan `content` line by line and return the first directive found.
///
/// Lines are split on `\n` only. The argument is the trimmed remainder of
/// the line, so a trailing `\r` is dropped.
pub fn parse_directive(content: &str) -> Parsed {
    let re = directive_regex();
    let mut malformed = None;

    for line in content.split('\n') {
        if let Some(caps) = re.captures(line) {
            return Parsed::Directive(Directive {
                tool_name: caps[1].to_string(),
                argument: caps[2].trim().to_string(),
            });
        }
        if malformed.is_none() && line.trim_start().starts_with(ACTION_KEYWORD) {
            malformed = Some(line.to_string());
        }
    }

    match malformed {
        Some(line) => Parsed::Malformed { line },
        None => Parsed::NoDirective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(tool_name: &str, argument: &str) -> Parsed {
        Parsed::Directive(Directive {
            tool_name: tool_name.to_string(),
            argument: argument.to_string(),
        })
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            parse_directive("Action: getLocation: null"),
            directive("getLocation", "null")
        );
    }

    #[test]
    fn test_directive_after_thought() {
        let content = "Thought: I should look up the user's location.\nAction: getLocation: null\nPAUSE";
        assert_eq!(parse_directive(content), directive("getLocation", "null"));
    }

    #[test]
    fn test_first_match_wins() {
        let content = "Action: getCurrentWeather: Oslo\nAction: getLocation: null";
        assert_eq!(parse_directive(content), directive("getCurrentWeather", "Oslo"));
    }

    #[test]
    fn test_argument_keeps_inner_colons() {
        assert_eq!(
            parse_directive("Action: getCurrentWeather: Salt Lake City: UT  "),
            directive("getCurrentWeather", "Salt Lake City: UT")
        );
    }

    #[test]
    fn test_empty_argument() {
        assert_eq!(parse_directive("Action: getLocation: "), directive("getLocation", ""));
    }

    #[test]
    fn test_crlf_is_trimmed() {
        assert_eq!(
            parse_directive("Thought: hm\r\nAction: getCurrentWeather: Bergen\r\nPAUSE"),
            directive("getCurrentWeather", "Bergen")
        );
    }

    #[test]
    fn test_trailing_carriage_return_is_accepted() {
        assert_eq!(
            parse_directive("Thought\nAction: getLocation: null\r"),
            directive("getLocation", "null")
        );
    }

    #[test]
    fn test_line_separator_stays_in_argument() {
        assert_eq!(
            parse_directive("Action: getLocation: null\u{2028}x"),
            directive("getLocation", "null\u{2028}x")
        );
    }

    #[test]
    fn test_final_answer_is_no_directive() {
        assert_eq!(
            parse_directive("Answer: Go for a hike up Ensign Peak."),
            Parsed::NoDirective
        );
        assert_eq!(parse_directive(""), Parsed::NoDirective);
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        assert!(matches!(
            parse_directive("action: getLocation: null"),
            Parsed::NoDirective
        ));
    }

    #[test]
    fn test_malformed_lines() {
        for content in [
            "Action: getLocation",
            "Action: get Location: null",
            "Action: getLocation:null",
            "  Action: getLocation: null",
            "Action: get-location: null",
        ] {
            assert_eq!(
                parse_directive(content),
                Parsed::Malformed {
                    line: content.to_string()
                },
                "{content:?}"
            );
        }
    }

    #[test]
    fn test_valid_line_beats_earlier_malformed_line() {
        let content = "Action: getLocation\nAction: getLocation: null";
        assert_eq!(parse_directive(content), directive("getLocation", "null"));
    }

    #[test]
    fn test_non_ascii_identifier_rejected() {
        assert!(matches!(
            parse_directive("Action: hentVær: Oslo"),
            Parsed::Malformed { .. }
        ));
    }
}
