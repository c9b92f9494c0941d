use std::ops::Range;
use std::sync::OnceLock;

use phoney_core::PlaceholderKind;
use regex::{CaptureMatches, Regex};

const PLACEHOLDER_PATTERN: &str =
    r"\{\{(?:\[(?P<array>[^\[\]{}:]*)\]|(?P<name>[^\[\]{}:]*))(?::(?P<params>(?:[^{}]|\{[^{}]|\}[^{}])*))?\}\}";

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"))
}

/// A `{{...}}` token found inside a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken<'t> {
    pub kind: PlaceholderKind,
    /// Generator name with surrounding whitespace removed.
    pub generator_name: &'t str,
    /// Raw `key=value` parameters in source order, trimmed, empties dropped.
    pub raw_params: Vec<&'t str>,
    /// Byte range of the whole token in the source string.
    pub span: Range<usize>,
}

impl PlaceholderToken<'_> {
    pub fn is_array(&self) -> bool {
        self.kind == PlaceholderKind::Array
    }

    /// True when the token is the only non-whitespace content of `text`.
    pub fn covers(&self, text: &str) -> bool {
        text[..self.span.start].trim().is_empty() && text[self.span.end..].trim().is_empty()
    }
}

/// Lazy left-to-right scan over the placeholders in `text`.
///
/// Malformed braces are not tokens and stay literal text. A parameter value
/// may hold a lone `{` or `}` followed by another character; `}}` always
/// closes the token. Tokens with an
/// empty generator name (`{{}}`, `{{ :a=1}}`) are skipped the same way.
pub fn parse_placeholders(text: &str) -> Placeholders<'_> {
    Placeholders {
        matches: placeholder_regex().captures_iter(text),
    }
}

pub struct Placeholders<'t> {
    matches: CaptureMatches<'static, 't>,
}

impl<'t> Iterator for Placeholders<'t> {
    type Item = PlaceholderToken<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        for captures in self.matches.by_ref() {
            let whole = captures.get(0)?;
            let (kind, name) = match (captures.name("array"), captures.name("name")) {
                (Some(array), _) => (PlaceholderKind::Array, array.as_str()),
                (None, Some(name)) if captures.name("params").is_some() => {
                    (PlaceholderKind::Parameterized, name.as_str())
                }
                (None, Some(name)) => (PlaceholderKind::Scalar, name.as_str()),
                (None, None) => continue,
            };
            let generator_name = name.trim();
            if generator_name.is_empty() {
                continue;
            }
            let raw_params = captures
                .name("params")
                .map(|params| {
                    params
                        .as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|param| !param.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            return Some(PlaceholderToken {
                kind,
                generator_name,
                raw_params,
                span: whole.range(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<PlaceholderToken<'_>> {
        parse_placeholders(text).collect()
    }

    #[test]
    fn recognizes_the_three_shapes() {
        let found = tokens("{{name}}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PlaceholderKind::Scalar);
        assert_eq!(found[0].generator_name, "name");
        assert!(found[0].raw_params.is_empty());

        let found = tokens("{{random_int:min=1, max=10}}");
        assert_eq!(found[0].kind, PlaceholderKind::Parameterized);
        assert_eq!(found[0].generator_name, "random_int");
        assert_eq!(found[0].raw_params, vec!["min=1", "max=10"]);

        let found = tokens("{{[word]:count=3}}");
        assert_eq!(found[0].kind, PlaceholderKind::Array);
        assert_eq!(found[0].generator_name, "word");
        assert_eq!(found[0].raw_params, vec!["count=3"]);
    }

    #[test]
    fn array_without_params_is_still_an_array() {
        let found = tokens("{{[city]}}");
        assert_eq!(found.len(), 1);
        assert!(found[0].is_array());
        assert!(found[0].raw_params.is_empty());
    }

    #[test]
    fn finds_multiple_tokens_left_to_right() {
        let text = "{{first_name}} {{last_name}}";
        let found = tokens(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].generator_name, "first_name");
        assert_eq!(found[1].generator_name, "last_name");
        assert_eq!(&text[found[1].span.clone()], "{{last_name}}");
        assert!(!found[0].covers(text));
    }

    #[test]
    fn malformed_braces_are_literal() {
        assert!(tokens("{{name}").is_empty());
        assert!(tokens("{name}}").is_empty());
        assert!(tokens("{{}}").is_empty());
        assert!(tokens("plain text").is_empty());
        assert!(tokens("{{[bad]name}}").is_empty());
    }

    #[test]
    fn lone_braces_are_allowed_in_param_values() {
        let found = tokens("{{bothify:text=#}#}}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_params, vec!["text=#}#"]);

        let found = tokens("{{lexify:text={??}, extra=1}}");
        assert_eq!(found[0].raw_params, vec!["text={??}", "extra=1"]);

        let text = "{{random_int:min=1}} and {{name}}";
        let found = tokens(text);
        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[0].span.clone()], "{{random_int:min=1}}");
    }

    #[test]
    fn covers_ignores_surrounding_whitespace() {
        let text = "  {{uuid4}} ";
        let found = tokens(text);
        assert!(found[0].covers(text));
    }

    #[test]
    fn scan_is_restartable() {
        let text = "{{a}} and {{b}}";
        let first: Vec<_> = parse_placeholders(text).collect();
        let second: Vec<_> = parse_placeholders(text).collect();
        assert_eq!(first, second);
    }
}
