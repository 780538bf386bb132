//! Minimal query-pattern matcher.
//!
//! Selector profiles use a narrow slice of CSS: tag names, class shorthands,
//! attribute presence/equality/substring tests (with an optional
//! case-insensitivity flag) and the `:disabled` pseudo-class, joined in
//! comma-separated lists. That slice is parsed here into a [`Matcher`] and
//! evaluated against element records. Everything outside the slice —
//! `:has(...)`, combinators, other pseudo-classes — parses to
//! [`SelectorError::Unsupported`], which callers treat as a non-match.

use crate::errors::SelectorError;
use crate::probe::ElementRecord;

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Present,
    Equals,
    Contains,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrCheck {
    name: String,
    op: AttrOp,
    value: String,
    case_insensitive: bool,
}

impl AttrCheck {
    fn matches(&self, element: &ElementRecord) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };
        match self.op {
            AttrOp::Present => true,
            AttrOp::Equals => {
                if self.case_insensitive {
                    actual.eq_ignore_ascii_case(&self.value)
                } else {
                    actual == self.value
                }
            }
            AttrOp::Contains => {
                if self.case_insensitive {
                    actual
                        .to_ascii_lowercase()
                        .contains(&self.value.to_ascii_lowercase())
                } else {
                    actual.contains(&self.value)
                }
            }
        }
    }
}

/// One comma-separated alternative: `tag.class[attr*="v" i]:disabled`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCheck>,
    disabled: bool,
}

impl Compound {
    fn matches(&self, element: &ElementRecord) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if self
            .classes
            .iter()
            .any(|class| !element.has_class(class))
        {
            return false;
        }
        if self.attrs.iter().any(|check| !check.matches(element)) {
            return false;
        }
        if self.disabled && !element.disabled {
            return false;
        }
        true
    }
}

/// Parsed query pattern, ready to evaluate against element records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    alternatives: Vec<Compound>,
}

impl Matcher {
    pub fn parse(pattern: &str) -> Result<Self, SelectorError> {
        if pattern.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let alternatives = pattern
            .split(',')
            .map(|part| parse_compound(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    pub fn matches(&self, element: &ElementRecord) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(element))
    }
}

fn parse_compound(input: &str) -> Result<Compound, SelectorError> {
    if input.is_empty() {
        return Err(SelectorError::Empty);
    }
    // Whitespace between simple selectors is a descendant combinator;
    // inside `[...]` it belongs to quoted values and the ` i` flag.
    if whitespace_outside_brackets(input) {
        return Err(SelectorError::Unsupported(format!(
            "combinators are not supported: {input:?}"
        )));
    }

    let mut compound = Compound::default();
    let mut chars = input.char_indices().peekable();

    // Optional leading tag name.
    if matches!(chars.peek(), Some((_, c)) if c.is_ascii_alphabetic()) {
        let mut tag = String::new();
        while let Some((_, c)) = chars.peek() {
            if c.is_ascii_alphanumeric() || *c == '-' {
                tag.push(*c);
                chars.next();
            } else {
                break;
            }
        }
        compound.tag = Some(tag);
    }

    while let Some((idx, c)) = chars.next() {
        match c {
            '.' => {
                let mut class = String::new();
                while let Some((_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || *c == '-' || *c == '_' {
                        class.push(*c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if class.is_empty() {
                    return Err(SelectorError::Malformed(format!(
                        "empty class name in {input:?}"
                    )));
                }
                compound.classes.push(class);
            }
            '[' => {
                let rest = &input[idx + 1..];
                let end = rest.find(']').ok_or_else(|| {
                    SelectorError::Malformed(format!("unterminated attribute in {input:?}"))
                })?;
                compound.attrs.push(parse_attr(&rest[..end])?);
                // Skip past the closing bracket.
                while let Some((i, _)) = chars.peek() {
                    if *i <= idx + end + 1 {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            ':' => {
                let rest = &input[idx + 1..];
                if let Some(stripped) = rest.strip_prefix("disabled") {
                    if !stripped.is_empty()
                        && !stripped.starts_with(['.', '[', ':'])
                    {
                        return Err(SelectorError::Malformed(format!(
                            "unexpected trailing input in {input:?}"
                        )));
                    }
                    compound.disabled = true;
                    for _ in 0.."disabled".len() {
                        chars.next();
                    }
                } else {
                    return Err(SelectorError::Unsupported(format!(
                        "pseudo-class in {input:?}"
                    )));
                }
            }
            _ => {
                return Err(SelectorError::Unsupported(format!(
                    "unexpected {c:?} in {input:?}"
                )));
            }
        }
    }

    if compound == Compound::default() {
        return Err(SelectorError::Malformed(format!(
            "no recognizable parts in {input:?}"
        )));
    }
    Ok(compound)
}

fn whitespace_outside_brackets(input: &str) -> bool {
    let mut in_brackets = false;
    for c in input.chars() {
        match c {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            c if c.is_whitespace() && !in_brackets => return true,
            _ => {}
        }
    }
    false
}

/// Parse the inside of an attribute selector: `name`, `name="v"`,
/// `name*="v"`, each with an optional trailing ` i` flag.
fn parse_attr(body: &str) -> Result<AttrCheck, SelectorError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(SelectorError::Malformed("empty attribute selector".into()));
    }

    let (name_part, op, value_part) = if let Some(pos) = body.find("*=") {
        (&body[..pos], AttrOp::Contains, Some(&body[pos + 2..]))
    } else if let Some(pos) = body.find('=') {
        (&body[..pos], AttrOp::Equals, Some(&body[pos + 1..]))
    } else {
        (body, AttrOp::Present, None)
    };

    let name = name_part.trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SelectorError::Malformed(format!(
            "bad attribute name {name:?}"
        )));
    }

    let (value, case_insensitive) = match value_part {
        None => (String::new(), false),
        Some(raw) => {
            let raw = raw.trim();
            let (raw, flag) = match raw.strip_suffix(" i").or_else(|| raw.strip_suffix(" I")) {
                Some(stripped) => (stripped.trim(), true),
                None => (raw, false),
            };
            let value = if (raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2)
                || (raw.starts_with('\'') && raw.ends_with('\'') && raw.len() >= 2)
            {
                raw[1..raw.len() - 1].to_string()
            } else if raw.contains(['"', '\'']) {
                return Err(SelectorError::Malformed(format!(
                    "unbalanced quotes in attribute value {raw:?}"
                )));
            } else {
                raw.to_string()
            };
            (value, flag)
        }
    };

    Ok(AttrCheck {
        name: name.to_string(),
        op,
        value,
        case_insensitive,
    })
}
