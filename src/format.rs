//! Positional placeholder formatting: `{0}`, `{1,-8}`, `{2:N2}`, `{{`, `}}`.

use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unbalanced brace at position {0}")]
    UnbalancedBrace(usize),

    #[error("invalid placeholder '{{{placeholder}}}' at position {position}")]
    InvalidPlaceholder { position: usize, placeholder: String },

    #[error("placeholder {{{index}}} needs {} argument(s), got {count}", index + 1)]
    IndexOutOfRange { index: usize, count: usize },
}

/// Widths at or above this are rejected instead of padded.
const MAX_ALIGNMENT: u64 = 1_000_000;

/// A parsed `{index[,alignment][:format]}` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder {
    index: usize,
    /// Minimum width; negative pads on the right.
    alignment: i64,
}

/// Replaces positional placeholders in `template` with `args`.
///
/// Format strings after `:` are accepted but not interpreted; arguments are
/// rendered with their `Display` implementation.
///
/// # Examples
/// ```
/// use fallback_translator::format::format_positional;
///
/// let text = format_positional("{0} is required", &[&"Name"]).unwrap();
/// assert_eq!(text, "Name is required");
/// ```
pub fn format_positional(template: &str, args: &[&dyn Display]) -> Result<String, FormatError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    output.push('{');
                    continue;
                }

                let mut body = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    if inner == '{' {
                        return Err(FormatError::UnbalancedBrace(position));
                    }
                    body.push(inner);
                }
                if !closed {
                    return Err(FormatError::UnbalancedBrace(position));
                }

                let placeholder = parse_placeholder(&body).ok_or_else(|| {
                    FormatError::InvalidPlaceholder { position, placeholder: body.clone() }
                })?;
                let arg = args.get(placeholder.index).ok_or(FormatError::IndexOutOfRange {
                    index: placeholder.index,
                    count: args.len(),
                })?;
                push_aligned(&mut output, &arg.to_string(), placeholder.alignment);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(FormatError::UnbalancedBrace(position));
                }
                output.push('}');
            }
            _ => output.push(c),
        }
    }

    Ok(output)
}

fn parse_placeholder(body: &str) -> Option<Placeholder> {
    let spec = body.split_once(':').map_or(body, |(spec, _format)| spec);
    let (index, alignment) = match spec.split_once(',') {
        Some((index, alignment)) => (index, alignment.trim().parse::<i64>().ok()?),
        None => (spec, 0),
    };
    if alignment.unsigned_abs() >= MAX_ALIGNMENT {
        return None;
    }

    let index = index.trim();
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(Placeholder { index: index.parse().ok()?, alignment })
}

fn push_aligned(output: &mut String, value: &str, alignment: i64) {
    let width = usize::try_from(alignment.unsigned_abs()).unwrap_or(usize::MAX);
    let padding = width.saturating_sub(value.chars().count());

    if alignment < 0 {
        output.push_str(value);
        output.extend(std::iter::repeat_n(' ', padding));
    } else {
        output.extend(std::iter::repeat_n(' ', padding));
        output.push_str(value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single("{0} is required", "Name is required")]
    #[case::repeated("{0}/{0}", "Name/Name")]
    #[case::second("{1} of {0}", "42 of Name")]
    #[case::no_placeholders("Required", "Required")]
    #[case::escaped("{{{0}}}", "{Name}")]
    #[case::right_aligned("[{1,4}]", "[  42]")]
    #[case::left_aligned("[{0,-6}]", "[Name  ]")]
    #[case::format_string("{1:N2}", "42")]
    fn formats_placeholders(#[case] template: &str, #[case] expected: &str) {
        let result = format_positional(template, &[&"Name", &42]).unwrap();

        assert_that!(result, eq(expected));
    }

    #[rstest]
    fn missing_argument_is_reported() {
        let result = format_positional("{0} and {2}", &[&"a", &"b"]);

        assert_eq!(result, Err(FormatError::IndexOutOfRange { index: 2, count: 2 }));
    }

    #[rstest]
    #[case::open("{0", 0)]
    #[case::lone_close("a } b", 2)]
    #[case::nested("{{0}", 3)]
    fn unbalanced_braces_are_reported(#[case] template: &str, #[case] position: usize) {
        let result = format_positional(template, &[&"a"]);

        assert_eq!(result, Err(FormatError::UnbalancedBrace(position)));
    }

    #[rstest]
    #[case("{name}")]
    #[case("{}")]
    #[case("{-1}")]
    #[case("{0,x}")]
    #[case::huge_width("{0,100000000000}")]
    #[case::huge_left_width("{0,-1000000}")]
    fn invalid_placeholders_are_reported(#[case] template: &str) {
        let result = format_positional(template, &[&"a"]);

        assert!(matches!(result, Err(FormatError::InvalidPlaceholder { .. })));
    }

    #[rstest]
    fn widest_accepted_alignment_pads() {
        let result = format_positional("{0,999999}", &[&"a"]).unwrap();

        assert_that!(result.len(), eq(999_999));
        assert_that!(result, ends_with(" a"));
    }

    #[rstest]
    fn error_message_mentions_expected_count() {
        let err = FormatError::IndexOutOfRange { index: 1, count: 0 };

        assert_that!(err.to_string(), eq("placeholder {1} needs 2 argument(s), got 0"));
    }
}
