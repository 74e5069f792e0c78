//! Macro argument parsing.
//!
//! The macro body is a single comma-separated list. Tokens containing `=` are
//! options; everything else is a page name pattern.

use crate::{Error, Result};
use std::collections::HashMap;

/// The default `date_format` option.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The default `bgcolor` option.
pub const DEFAULT_BGCOLOR: &str = "#F0F0F0";

/// The sort direction of the rendered rows, by modification time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Order {
    /// Oldest first. Selected by `order=reverse`.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// How page names are labelled in the table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PageNameMode {
    /// The full page name.
    #[default]
    Full,
    /// Only the last `/`-delimited segment of the page name. Selected by
    /// `pagename=short`.
    Short,
}

impl PageNameMode {
    /// Returns the label for the given page name.
    pub fn label<'a>(self, name: &'a str) -> &'a str {
        match self {
            PageNameMode::Full => name,
            PageNameMode::Short => name.rsplit('/').next().unwrap_or(name),
        }
    }
}

/// Resolved macro options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// The `bgcolor` attribute of the table.
    pub bgcolor: String,
    /// The strftime-style format for absolute timestamps.
    pub date_format: String,
    /// The row order.
    pub order: Order,
    /// The page name label mode.
    pub pagename: PageNameMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bgcolor: DEFAULT_BGCOLOR.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            order: Order::default(),
            pagename: PageNameMode::default(),
        }
    }
}

impl Options {
    /// Resolves options from raw `key=value` pairs. Unknown keys are ignored.
    fn from_map(map: HashMap<&str, &str>) -> Self {
        let mut options = Self::default();
        for (key, value) in map {
            match key {
                "bgcolor" => options.bgcolor = value.to_string(),
                "date_format" => options.date_format = value.to_string(),
                "order" => {
                    options.order = if value == "reverse" {
                        Order::Ascending
                    } else {
                        Order::Descending
                    };
                }
                "pagename" => {
                    options.pagename = if value == "short" {
                        PageNameMode::Short
                    } else {
                        PageNameMode::Full
                    };
                }
                _ => log::debug!("WikiStatusList: ignoring unknown option '{key}'"),
            }
        }
        options
    }
}

/// A single trimmed macro argument.
#[derive(Debug, Eq, PartialEq)]
enum Token<'a> {
    /// A `key=value` option.
    Option(&'a str, &'a str),
    /// A page name pattern.
    Pattern(&'a str),
}

impl<'a> Token<'a> {
    /// Classifies a non-empty token by the presence of `=`, splitting on the
    /// first one only. Whitespace around the `=` is part of the key and
    /// value.
    fn new(token: &'a str) -> Result<Self> {
        if let Some((key, value)) = token.split_once('=') {
            if key.is_empty() {
                Err(Error::MalformedOption(token.to_string()))
            } else {
                Ok(Token::Option(key, value))
            }
        } else {
            Ok(Token::Pattern(token))
        }
    }
}

/// Parsed macro arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacroArgs {
    /// Page name patterns. Never empty.
    pub patterns: Vec<String>,
    /// Resolved options.
    pub options: Options,
}

impl MacroArgs {
    /// Parses a raw macro body.
    ///
    /// Empty tokens are skipped, so `None`, `""`, and `","` all select every
    /// page.
    pub fn parse(content: Option<&str>) -> Result<Self> {
        let mut patterns = Vec::new();
        let mut options = HashMap::new();

        for token in content.unwrap_or_default().split(',').map(str::trim) {
            if token.is_empty() {
                continue;
            }

            match Token::new(token)? {
                // Later duplicates replace earlier ones
                Token::Option(key, value) => {
                    options.insert(key, value);
                }
                Token::Pattern(pattern) => patterns.push(pattern.to_string()),
            }
        }

        if patterns.is_empty() {
            patterns.push("*".to_string());
        }

        Ok(Self {
            patterns,
            options: Options::from_map(options),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_patterns_and_options() {
        let args = MacroArgs::parse(Some("Foo*, Bar, order=reverse, bgcolor=#fff")).unwrap();
        assert_eq!(args.patterns, ["Foo*", "Bar"]);
        assert_eq!(args.options.order, Order::Ascending);
        assert_eq!(args.options.bgcolor, "#fff");
        assert_eq!(args.options.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(args.options.pagename, PageNameMode::Full);
    }

    #[test]
    fn splits_on_first_equals_only() {
        assert_eq!(Token::new("a=b=c").unwrap(), Token::Option("a", "b=c"));
        assert_eq!(Token::new("a = b").unwrap(), Token::Option("a ", " b"));
        assert_eq!(Token::new("Foo*").unwrap(), Token::Pattern("Foo*"));

        let args = MacroArgs::parse(Some("date_format=%H=%M")).unwrap();
        assert_eq!(args.options.date_format, "%H=%M");
    }

    #[test]
    fn defaults_to_match_all() {
        for content in [None, Some(""), Some(" , "), Some("order=reverse")] {
            let args = MacroArgs::parse(content).unwrap();
            assert_eq!(args.patterns, ["*"], "{content:?}");
        }
    }

    #[test]
    fn defaults() {
        let args = MacroArgs::parse(None).unwrap();
        assert_eq!(args.options, Options::default());
        assert_eq!(args.options.bgcolor, "#F0F0F0");
        assert_eq!(args.options.order, Order::Descending);
    }

    #[test]
    fn last_duplicate_wins() {
        let args = MacroArgs::parse(Some("bgcolor=red, bgcolor=blue")).unwrap();
        assert_eq!(args.options.bgcolor, "blue");
    }

    #[test]
    fn order_only_reverses_on_exact_value() {
        for value in ["REVERSE", "asc", "", "reversed"] {
            let args = MacroArgs::parse(Some(&format!("order={value}"))).unwrap();
            assert_eq!(args.options.order, Order::Descending, "{value}");
        }
    }

    #[test]
    fn keeps_whitespace_around_equals() {
        let args = MacroArgs::parse(Some("order = reverse, pagename=short ")).unwrap();
        assert_eq!(args.options.order, Order::Descending);
        assert_eq!(args.options.pagename, PageNameMode::Short);

        let args = MacroArgs::parse(Some("bgcolor= red")).unwrap();
        assert_eq!(args.options.bgcolor, " red");
    }

    #[test]
    fn pagename_mode() {
        let args = MacroArgs::parse(Some("pagename=short")).unwrap();
        assert_eq!(args.options.pagename, PageNameMode::Short);
        assert_eq!(args.options.pagename.label("Docs/Install"), "Install");
        assert_eq!(PageNameMode::Full.label("Docs/Install"), "Docs/Install");
        assert_eq!(PageNameMode::Short.label("WikiStart"), "WikiStart");

        let args = MacroArgs::parse(Some("pagename=long")).unwrap();
        assert_eq!(args.options.pagename, PageNameMode::Full);
    }

    #[test]
    fn ignores_unknown_options() {
        let args = MacroArgs::parse(Some("Foo, color=red")).unwrap();
        assert_eq!(args.patterns, ["Foo"]);
        assert_eq!(args.options, Options::default());
    }

    #[test]
    fn rejects_empty_option_name() {
        let err = MacroArgs::parse(Some("Foo, =bar")).unwrap_err();
        assert!(matches!(err, Error::MalformedOption(ref token) if token == "=bar"));
    }
}
