//! `{variable}` substitution for prompts and agent command arguments.
//!
//! - `{name}` is replaced by the value of `name` (surrounding spaces ignored)
//! - `{{` and `}}` render literal braces; a lone `}` is kept as-is
//! - an undefined variable is an error, never an empty substitution
//!
//! Substituted values are inserted verbatim and never re-scanned, so a
//! research question containing braces cannot inject placeholders.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Render `template`, substituting `{name}` placeholders from `variables`.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(idx) = rest.find(['{', '}']) {
        out.push_str(&rest[..idx]);
        let position = offset + idx;
        let tail = &rest[idx..];

        let consumed = if tail.starts_with("{{") {
            out.push('{');
            2
        } else if tail.starts_with("}}") {
            out.push('}');
            2
        } else if tail.starts_with('}') {
            out.push('}');
            1
        } else {
            let close = tail
                .find('}')
                .ok_or(TemplateError::UnmatchedBrace { position })?;
            let raw_name = &tail[1..close];
            if raw_name.is_empty() {
                return Err(TemplateError::EmptyVariableName { position });
            }
            let name = raw_name.trim();
            let value = variables
                .get(name)
                .ok_or_else(|| TemplateError::UndefinedVariable {
                    name: name.to_string(),
                    position,
                })?;
            out.push_str(value);
            close + 1
        };

        rest = &tail[consumed..];
        offset = position + consumed;
    }

    out.push_str(rest);
    Ok(out)
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_variables() {
        let vars = vars([("project", "sleep_study"), ("dir", "/p/data")]);
        let result = render_template("Project {project} reads {dir}.", &vars).unwrap();
        assert_eq!(result, "Project sleep_study reads /p/data.");
    }

    #[test]
    fn plain_and_empty_templates_pass_through() {
        let empty = HashMap::new();
        assert_eq!(render_template("", &empty).unwrap(), "");
        assert_eq!(render_template("no placeholders", &empty).unwrap(), "no placeholders");
    }

    #[test]
    fn escaped_braces_render_literally() {
        let vars = vars([("x", "value")]);
        assert_eq!(
            render_template("{{escaped}} and {x} and a }} b", &vars).unwrap(),
            "{escaped} and value and a } b"
        );
    }

    #[test]
    fn lone_closing_brace_is_kept() {
        assert_eq!(render_template("a } b", &HashMap::new()).unwrap(), "a } b");
    }

    #[test]
    fn whitespace_around_name_is_ignored() {
        let vars = vars([("name", "Ada")]);
        assert_eq!(render_template("Hi { name }!", &vars).unwrap(), "Hi Ada!");
    }

    #[test]
    fn values_are_not_rescanned() {
        let vars = vars([("prompt", "use {other} and {{x}}")]);
        assert_eq!(
            render_template("[{prompt}]", &vars).unwrap(),
            "[use {other} and {{x}}]"
        );
    }

    #[test]
    fn multibyte_text_keeps_positions() {
        let vars = vars([("q", "ß")]);
        assert_eq!(render_template("é {q} ü", &vars).unwrap(), "é ß ü");

        let err = render_template("é {missing}", &HashMap::new()).unwrap_err();
        // byte offset: 'é' is two bytes, then a space
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "missing".to_string(),
                position: 3
            }
        );
    }

    #[test]
    fn undefined_variable_is_error() {
        let err = render_template("Hello {name}", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "name".to_string(),
                position: 6
            }
        );
        assert!(err.to_string().contains("undefined variable 'name'"));
    }

    #[test]
    fn unmatched_brace_is_error() {
        let err = render_template("Hello {name", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 6 });
    }

    #[test]
    fn empty_name_is_error() {
        let err = render_template("a {{b}} {}", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyVariableName { position: 8 });
    }
}
