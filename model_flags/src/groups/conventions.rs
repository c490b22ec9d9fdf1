//! Shared formatting conventions for flag help text.

use std::fmt::Display;

/// Column at which [`help_wrap`] breaks lines.
pub const HELP_WIDTH: usize = 80;

/// Marks a deliberately indented help line.
///
/// A line starting with this zero-width no-break space keeps the whitespace
/// that follows it; the marker itself is removed.
pub const INDENT_MARKER: char = '\u{feff}';

/// Wraps help text to [`HELP_WIDTH`] columns.
///
/// Explicit newlines are kept, and every line keeps its leading indentation
/// on its continuation lines. Runs of inner whitespace collapse to a single
/// space.
///
/// # Examples
///
/// ```
/// use model_flags::help_wrap;
///
/// let text = help_wrap("Pick a number.\n\u{feff}  if --foo=fizz:\n\u{feff}    1, 2, 3");
/// assert_eq!(text, "Pick a number.\n  if --foo=fizz:\n    1, 2, 3");
/// ```
#[must_use]
pub fn help_wrap(text: &str) -> String {
    text.split('\n').map(wrap_line).collect::<Vec<_>>().join("\n")
}

fn wrap_line(line: &str) -> String {
    let unmarked = line.strip_prefix(INDENT_MARKER).unwrap_or(line);
    let indent: String = unmarked.chars().take_while(|c| c.is_whitespace()).collect();
    let indent_width = indent.chars().count();

    let mut wrapped: Vec<String> = Vec::new();
    let mut current = indent.clone();
    let mut width = indent_width;
    for word in unmarked.split_whitespace() {
        let word_width = word.chars().count();
        let occupied = width > indent_width;
        if occupied && width + 1 + word_width > HELP_WIDTH {
            wrapped.push(std::mem::replace(&mut current, indent.clone()));
            width = indent_width;
        } else if occupied {
            current.push(' ');
            width += 1;
        }
        current.push_str(word);
        width += word_width;
    }
    if width > indent_width {
        wrapped.push(current);
    }
    wrapped.join("\n")
}

/// Renders `choices` for help text, separated by `", "`.
///
/// # Examples
///
/// ```
/// use model_flags::to_choices_str;
///
/// assert_eq!(to_choices_str(["fizz", "bang"]), "fizz, bang");
/// assert_eq!(to_choices_str([1, 2, 3]), "1, 2, 3");
/// ```
#[must_use]
pub fn to_choices_str<I>(choices: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    choices
        .into_iter()
        .map(|choice| choice.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
