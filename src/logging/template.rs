//! Brace templates for log lines and log messages.
//!
//! Supported syntax:
//! - `{name}` - named field
//! - `{}` / `{0}` - automatic / explicit positional argument (not mixed)
//! - `{field:<8}`, `{field:>8}`, `{field:^8}`, `{field:8}` - alignment and width
//! - `{{` / `}}` - literal braces

use std::collections::BTreeMap;

use serde_json::Value;

use crate::logging::error::{FormatError, FormatResult};

/// What a placeholder refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spec {
    align: Align,
    width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { key: FieldKey, spec: Option<Spec> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Auto,
    Manual,
}

/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> FormatResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();
        let mut numbering = None;
        let mut next_auto = 0;

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(FormatError::mismatch(source, "single '}' encountered")),
                '{' => {
                    let mut field = String::new();
                    let mut found_closing = false;
                    for next_c in chars.by_ref() {
                        match next_c {
                            '}' => {
                                found_closing = true;
                                break;
                            }
                            '{' => {
                                return Err(FormatError::mismatch(
                                    source,
                                    "nested replacement fields are not supported",
                                ))
                            }
                            other => field.push(other),
                        }
                    }
                    if !found_closing {
                        return Err(FormatError::mismatch(source, "unmatched '{'"));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    let (name, spec) = match field.split_once(':') {
                        Some((name, spec)) => (name, parse_spec(source, spec)?),
                        None => (field.as_str(), None),
                    };
                    if name.contains(['!', '.', '[']) {
                        return Err(FormatError::mismatch(
                            source,
                            format!("unsupported field expression '{name}'"),
                        ));
                    }

                    let key = if name.is_empty() {
                        switch_numbering(&mut numbering, Numbering::Auto, source)?;
                        next_auto += 1;
                        FieldKey::Index(next_auto - 1)
                    } else if let Ok(index) = name.parse::<usize>() {
                        switch_numbering(&mut numbering, Numbering::Manual, source)?;
                        FieldKey::Index(index)
                    } else {
                        FieldKey::Name(name.to_string())
                    };
                    segments.push(Segment::Field { key, spec });
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every placeholder, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &FieldKey> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field { key, .. } => Some(key),
            Segment::Literal(_) => None,
        })
    }

    /// Whether a `{name}` placeholder appears.
    pub fn references(&self, name: &str) -> bool {
        self.fields()
            .any(|key| matches!(key, FieldKey::Name(n) if n == name))
    }

    /// Substitute every placeholder; a key `lookup` cannot resolve is a mismatch.
    pub fn render<F>(&self, mut lookup: F) -> FormatResult<String>
    where
        F: FnMut(&FieldKey) -> Option<String>,
    {
        let mut out = String::with_capacity(self.source.len() * 2);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { key, spec } => {
                    let value = lookup(key).ok_or_else(|| {
                        let reason = match key {
                            FieldKey::Index(i) => format!("missing positional argument {i}"),
                            FieldKey::Name(name) => format!("missing field '{name}'"),
                        };
                        FormatError::mismatch(&self.source, reason)
                    })?;
                    match spec {
                        Some(spec) => pad_into(&mut out, &value, *spec),
                        None => out.push_str(&value),
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Interpolate a message with its arguments. Without arguments the message
/// is taken verbatim, braces included.
pub fn render_message(
    msg: &str,
    args: &[Value],
    kwargs: &BTreeMap<String, Value>,
) -> FormatResult<String> {
    if args.is_empty() && kwargs.is_empty() {
        return Ok(msg.to_string());
    }
    Template::parse(msg)?.render(|key| match key {
        FieldKey::Index(i) => args.get(*i).map(value_text),
        FieldKey::Name(name) => kwargs.get(name).map(value_text),
    })
}

/// Strings render bare, everything else as JSON text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn switch_numbering(
    current: &mut Option<Numbering>,
    wanted: Numbering,
    source: &str,
) -> FormatResult<()> {
    match current {
        Some(numbering) if *numbering != wanted => Err(FormatError::mismatch(
            source,
            "cannot switch between automatic and manual field numbering",
        )),
        _ => {
            *current = Some(wanted);
            Ok(())
        }
    }
}

fn parse_spec(source: &str, spec: &str) -> FormatResult<Option<Spec>> {
    if spec.is_empty() {
        return Ok(None);
    }
    let (align, width) = match spec.chars().next() {
        Some('<') => (Align::Left, &spec[1..]),
        Some('>') => (Align::Right, &spec[1..]),
        Some('^') => (Align::Center, &spec[1..]),
        _ => (Align::Left, spec),
    };
    let width = width
        .parse::<usize>()
        .map_err(|_| FormatError::mismatch(source, format!("unsupported format spec '{spec}'")))?;
    Ok(Some(Spec { align, width }))
}

fn pad_into(out: &mut String, value: &str, spec: Spec) {
    let fill = spec.width.saturating_sub(value.chars().count());
    let (left, right) = match spec.align {
        Align::Left => (0, fill),
        Align::Right => (fill, 0),
        Align::Center => (fill / 2, fill - fill / 2),
    };
    out.extend(std::iter::repeat(' ').take(left));
    out.push_str(value);
    out.extend(std::iter::repeat(' ').take(right));
}
