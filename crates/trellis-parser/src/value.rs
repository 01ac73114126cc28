//! Value parsers shared by both syntaxes.
//!
//! Longform block bodies are `key: value` properties separated by newlines or
//! commas. Values are quoted strings, bracketed lists, nested brace maps, or
//! bare words. Shortform continuation lines reuse the string and list
//! parsers for their payloads.

use trellis_core::Span;
use winnow::{
    Parser as _,
    ascii::{multispace0, multispace1, space0},
    combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, none_of, take_till, take_while},
};

type Input<'a> = LocatingSlice<&'a str>;
type PResult<O> = ModalResult<O, ContextError<&'static str>>;

/// A longform property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A quoted string with escapes resolved.
    String(String),
    /// A bare word: identifier, dotted name, path, version or boolean.
    Word(String),
    List(Vec<Value>),
    Map(Vec<Property>),
}

impl Value {
    /// The text of a string or word.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(text) | Value::Word(text) => Some(text),
            Value::List(_) | Value::Map(_) => None,
        }
    }

    /// `true`/`false` as a word or string.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_text()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// The items of a list of texts. A single text is a one-item list.
    pub fn to_list(&self) -> Option<Vec<String>> {
        match self {
            Value::List(items) => items
                .iter()
                .map(|item| item.as_text().map(str::to_string))
                .collect(),
            Value::String(text) | Value::Word(text) => Some(vec![text.clone()]),
            Value::Map(_) => None,
        }
    }

    /// The properties of a map.
    pub fn as_map(&self) -> Option<&[Property]> {
        match self {
            Value::Map(properties) => Some(properties),
            _ => None,
        }
    }

    /// A short name of the value's shape, for messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Word(_) => "word",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

/// One `key: value` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: Value,
    /// Byte span from the key to the end of the value, relative to the
    /// parsed body.
    pub span: Span,
}

/// A property that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyError {
    pub message: &'static str,
    /// The skipped text, relative to the parsed body.
    pub span: Span,
}

/// Parse a string escape after the backslash.
///
/// `\n`, `\t` and `\r` are control characters; any other character stands
/// for itself, so `\"` and `\\` produce a quote and a backslash.
fn string_escape(input: &mut Input<'_>) -> PResult<char> {
    preceded(
        '\\',
        any.map(|c| match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            other => other,
        }),
    )
    .parse_next(input)
}

/// Parse a double-quoted string literal.
fn string_literal(input: &mut Input<'_>) -> PResult<String> {
    let content = repeat(0.., alt((string_escape, none_of(['"', '\\'])))).fold(
        String::new,
        |mut acc, ch| {
            acc.push(ch);
            acc
        },
    );

    preceded(
        '"',
        cut_err(terminated(content, '"')).context("unterminated string"),
    )
    .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|s: &str| s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_'))
        .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, ',' | '[' | ']' | '{' | '}' | '"' | '#')
    })
    .parse_next(input)
}

fn comment(input: &mut Input<'_>) -> PResult<()> {
    ('#', take_till(0.., ['\n'])).void().parse_next(input)
}

/// Skip whitespace, commas and comments between properties and items.
fn separators(input: &mut Input<'_>) -> PResult<()> {
    repeat(0.., alt((multispace1.void(), ','.void(), comment))).parse_next(input)
}

fn list(input: &mut Input<'_>) -> PResult<Vec<Value>> {
    delimited(
        ('[', separators),
        repeat(0.., terminated(value, separators)),
        cut_err(']').context("expected `]` to close the list"),
    )
    .parse_next(input)
}

fn map(input: &mut Input<'_>) -> PResult<Vec<Property>> {
    delimited(
        ('{', separators),
        repeat(0.., terminated(property, separators)),
        cut_err('}').context("expected `}` to close the map"),
    )
    .parse_next(input)
}

fn value(input: &mut Input<'_>) -> PResult<Value> {
    alt((
        string_literal.map(Value::String),
        list.map(Value::List),
        map.map(Value::Map),
        word.map(|w: &str| Value::Word(w.to_string())),
    ))
    .parse_next(input)
}

fn property(input: &mut Input<'_>) -> PResult<Property> {
    let start = input.current_token_start();
    let key = identifier
        .context("expected a property key")
        .parse_next(input)?;
    (space0, ':')
        .context("expected `:` after the property key")
        .parse_next(input)?;
    multispace0.parse_next(input)?;
    let value = value.context("expected a value").parse_next(input)?;
    let end = input.current_token_start();

    Ok(Property {
        key: key.to_string(),
        value,
        span: Span::new(start..end),
    })
}

fn skip_to_separator(input: &mut Input<'_>) -> PResult<()> {
    take_till(0.., ['\n', ',']).void().parse_next(input)?;
    opt(any).void().parse_next(input)
}

fn error_message(err: &ErrMode<ContextError<&'static str>>) -> &'static str {
    let context = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next().copied(),
        ErrMode::Incomplete(_) => None,
    };
    context.unwrap_or("malformed property")
}

/// Parse the properties of a longform block body.
///
/// Parsing never fails as a whole: a malformed property is skipped up to the
/// next newline or comma and reported as a [`PropertyError`].
pub fn parse_properties(body: &str) -> (Vec<Property>, Vec<PropertyError>) {
    let mut input = LocatingSlice::new(body);
    let mut properties = Vec::new();
    let mut errors = Vec::new();

    loop {
        let _ = separators(&mut input);
        if input.is_empty() {
            break;
        }

        let start = input.current_token_start();
        let checkpoint = input.checkpoint();
        match property(&mut input) {
            Ok(property) => properties.push(property),
            Err(err) => {
                input.reset(&checkpoint);
                let _ = skip_to_separator(&mut input);
                let end = input.current_token_start().max(start + 1);
                errors.push(PropertyError {
                    message: error_message(&err),
                    span: Span::new(start..end.min(body.len())),
                });
            }
        }
    }

    (properties, errors)
}

/// Resolve the escapes of a complete `"..."` literal.
///
/// Text that is not a well-formed literal is returned with surrounding quotes
/// stripped.
pub fn unquote(literal: &str) -> String {
    string_literal
        .parse(LocatingSlice::new(literal))
        .unwrap_or_else(|_| {
            let inner = literal.strip_prefix('"').unwrap_or(literal);
            inner.strip_suffix('"').unwrap_or(inner).to_string()
        })
}

/// Quote `text` so that [`unquote`] restores it.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn list_item(input: &mut Input<'_>) -> PResult<String> {
    alt((
        string_literal,
        take_while(1.., |c: char| !c.is_whitespace() && !matches!(c, ',' | '[' | ']'))
            .map(str::to_string),
    ))
    .parse_next(input)
}

fn list_items(input: &mut Input<'_>) -> PResult<Vec<String>> {
    terminated(
        separated(0.., list_item, (space0, ',', space0)),
        (space0, opt(',')),
    )
    .parse_next(input)
}

fn inline_list(input: &mut Input<'_>) -> PResult<Vec<String>> {
    delimited(
        space0,
        alt((
            delimited(('[', space0), list_items, (space0, ']')),
            list_items,
        )),
        space0,
    )
    .parse_next(input)
}

/// Parse a shortform list payload: `A, B` or `[A, B]`.
///
/// Returns `None` when the text is not a list, e.g. on unbalanced brackets.
pub fn parse_list(text: &str) -> Option<Vec<String>> {
    inline_list.parse(LocatingSlice::new(text)).ok()
}

/// Strip a leading `v` from a version token.
pub fn normalize_version(version: &str) -> String {
    version
        .strip_prefix('v')
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version)
        .to_string()
}
