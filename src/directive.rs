use crate::error::ValidationError;
use crate::messages::Message;

/// A parsed rule directive: `name` or `name:param`.
///
/// `name` keeps its original casing for reporting; comparisons against rule
/// names are case-insensitive and done by the caller via [`Directive::is`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Directive {
    pub name: String,
    /// `None` when the directive has no `:`; `Some("")` for `name:`.
    pub param: Option<String>,
}

impl Directive {
    /// Case-insensitive comparison of the rule name.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Parses a directive string, splitting on the first `:` and trimming both
/// parts.
///
/// # Errors
///
/// Returns a configuration error when `directive` is empty or whitespace.
pub fn parse_directive(directive: &str) -> Result<Directive, ValidationError> {
    let trimmed = directive.trim();
    if trimmed.is_empty() {
        return Err(Message::EmptyDirective.into());
    }

    let directive = match trimmed.split_once(':') {
        Some((name, param)) => Directive {
            name: name.trim().to_string(),
            param: Some(param.trim().to_string()),
        },
        None => Directive {
            name: trimmed.to_string(),
            param: None,
        },
    };
    Ok(directive)
}
