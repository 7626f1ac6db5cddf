//! Splitting template source into text and actions, and action bodies into
//! tokens.

use super::{TemplateError, LEFT_DELIM, RIGHT_DELIM};
use serde_json::{Number, Value};

const TRIM_MARKER: char = '-';
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

/// Whitespace removed by trim markers and required next to them.
const TRIM_SPACE: [char; 4] = [' ', '\t', '\r', '\n'];

#[derive(Debug)]
pub(super) enum Item<'a> {
    Text(String),
    Action { offset: usize, body: &'a str },
}

enum ActionBody<'a> {
    Comment,
    Code(&'a str),
}

/// Split `source` into text runs and action bodies, applying trim markers
/// and dropping comments.
pub(super) fn split(source: &str) -> Result<Vec<Item<'_>>, TemplateError> {
    let mut items = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    while pos < source.len() {
        let rest = &source[pos..];
        let Some(open) = rest.find(LEFT_DELIM) else {
            push_text(&mut items, rest, trim_next, false);
            break;
        };

        let offset = pos + open;
        let mut inner_start = offset + LEFT_DELIM.len();
        let trim_left = has_left_trim(&source[inner_start..]);
        if trim_left {
            inner_start += TRIM_MARKER.len_utf8();
        }
        push_text(&mut items, &rest[..open], trim_next, trim_left);

        let (body, end, trim_right) = scan_action(source, offset, inner_start)?;
        if let ActionBody::Code(body) = body {
            items.push(Item::Action { offset, body });
        }

        trim_next = trim_right;
        pos = end;
    }

    Ok(items)
}

fn push_text(items: &mut Vec<Item<'_>>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start_matches(TRIM_SPACE);
    }
    if trim_end {
        text = text.trim_end_matches(TRIM_SPACE);
    }
    if !text.is_empty() {
        items.push(Item::Text(text.to_string()));
    }
}

fn is_trim_space(c: char) -> bool {
    TRIM_SPACE.contains(&c)
}

fn has_left_trim(after_open: &str) -> bool {
    let mut chars = after_open.chars();
    chars.next() == Some(TRIM_MARKER) && chars.next().is_some_and(is_trim_space)
}

/// Locate the end of the action opened at `offset`, whose body starts at
/// `start`. Returns the body, the byte index after `}}`, and whether the
/// action ends with a right trim marker.
fn scan_action(
    source: &str,
    offset: usize,
    start: usize,
) -> Result<(ActionBody<'_>, usize, bool), TemplateError> {
    let inner = &source[start..];
    let leading = inner.len() - inner.trim_start_matches(TRIM_SPACE).len();

    if inner[leading..].starts_with(COMMENT_OPEN) {
        let comment_body = start + leading + COMMENT_OPEN.len();
        let close = source[comment_body..]
            .find(COMMENT_CLOSE)
            .ok_or(TemplateError::UnterminatedComment { offset })?;
        let after = comment_body + close + COMMENT_CLOSE.len();
        let tail = source[after..].trim_start_matches(TRIM_SPACE);
        let (trim_right, tail) = match tail.strip_prefix(TRIM_MARKER) {
            Some(stripped) => (true, stripped),
            None => (false, tail),
        };
        if !tail.starts_with(RIGHT_DELIM) {
            return Err(TemplateError::UnclosedAction { offset });
        }
        let end = source.len() - tail.len() + RIGHT_DELIM.len();
        return Ok((ActionBody::Comment, end, trim_right));
    }

    let mut quote = None;
    let mut escaped = false;
    let mut string_start = 0;

    for (i, c) in inner.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' && open == '"' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }
        if c == '"' || c == '`' {
            quote = Some(c);
            string_start = start + i;
            continue;
        }
        if inner[i..].starts_with(RIGHT_DELIM) {
            let mut body = &inner[..i];
            let mut trim_right = false;
            if let Some(stripped) = body.strip_suffix(TRIM_MARKER) {
                if stripped.ends_with(is_trim_space) {
                    body = stripped;
                    trim_right = true;
                }
            }
            return Ok((ActionBody::Code(body), start + i + RIGHT_DELIM.len(), trim_right));
        }
    }

    if quote.is_some() {
        Err(TemplateError::UnterminatedString {
            offset: string_start,
        })
    } else {
        Err(TemplateError::UnclosedAction { offset })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    /// `.`
    Dot,
    /// `.A.B`
    Field(Vec<String>),
    /// `$`, `$x`, `$x.A`, `$.A`
    Variable { name: String, path: Vec<String> },
    /// strings, numbers, `true`, `false`, `nil`
    Literal(Value),
    /// keywords and function names
    Ident(String),
    Pipe,
    LeftParen,
    RightParen,
    Declare,
    Assign,
    Comma,
}

/// A token and the source text it was read from.
#[derive(Debug)]
pub(super) struct Lexeme<'a> {
    pub(super) token: Token,
    pub(super) text: &'a str,
}

/// Tokenize one action body. `offset` locates the action for error reports.
pub(super) fn tokenize(body: &str, offset: usize) -> Result<Vec<Lexeme<'_>>, TemplateError> {
    let mut lexemes = Vec::new();
    let mut pos = 0;

    while let Some(c) = body[pos..].chars().next() {
        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        let start = pos;
        let token = match c {
            '|' | '(' | ')' | ',' | '=' => {
                pos += 1;
                match c {
                    '|' => Token::Pipe,
                    '(' => Token::LeftParen,
                    ')' => Token::RightParen,
                    ',' => Token::Comma,
                    _ => Token::Assign,
                }
            }
            ':' if body[pos..].starts_with(":=") => {
                pos += 2;
                Token::Declare
            }
            '"' => {
                pos = quoted_end(body, pos).ok_or(TemplateError::UnterminatedString { offset })?;
                let text = &body[start..pos];
                let value = unquote(text).ok_or_else(|| TemplateError::UnexpectedToken {
                    offset,
                    token: text.to_string(),
                })?;
                Token::Literal(Value::String(value))
            }
            '`' => {
                let close = body[pos + 1..]
                    .find('`')
                    .ok_or(TemplateError::UnterminatedString { offset })?;
                pos += close + 2;
                Token::Literal(Value::String(body[start + 1..pos - 1].to_string()))
            }
            '.' | '$' => {
                pos = word_end(body, pos);
                path_token(&body[start..pos], offset)?
            }
            _ if starts_number(&body[pos..]) => {
                pos = number_end(body, pos);
                number_token(&body[start..pos], offset)?
            }
            c if c == '_' || c.is_alphabetic() => {
                pos = word_end(body, pos);
                match &body[start..pos] {
                    "true" => Token::Literal(Value::Bool(true)),
                    "false" => Token::Literal(Value::Bool(false)),
                    "nil" => Token::Literal(Value::Null),
                    word => Token::Ident(word.to_string()),
                }
            }
            other => {
                return Err(TemplateError::UnexpectedToken {
                    offset,
                    token: other.to_string(),
                })
            }
        };

        lexemes.push(Lexeme {
            token,
            text: &body[start..pos],
        });
    }

    Ok(lexemes)
}

fn is_word_char(c: char) -> bool {
    c == '_' || c == '.' || c.is_alphanumeric()
}

fn word_end(body: &str, start: usize) -> usize {
    body[start..]
        .char_indices()
        .skip(1)
        .find(|&(_, c)| !is_word_char(c))
        .map_or(body.len(), |(i, _)| start + i)
}

fn starts_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('-' | '+') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

fn number_end(body: &str, start: usize) -> usize {
    let mut prev = '\0';
    for (i, c) in body[start..].char_indices().skip(1) {
        let exponent_sign = (c == '-' || c == '+') && (prev == 'e' || prev == 'E');
        if !is_word_char(c) && !exponent_sign {
            return start + i;
        }
        prev = c;
    }
    body.len()
}

fn number_token(word: &str, offset: usize) -> Result<Token, TemplateError> {
    let invalid = || TemplateError::UnexpectedToken {
        offset,
        token: word.to_string(),
    };

    let (negative, digits) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word.strip_prefix('+').unwrap_or(word)),
    };
    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"));

    let number = if let Some(hex) = hex {
        let value = i64::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Number::from(if negative { -value } else { value })
    } else if let Ok(value) = word.trim_start_matches('+').parse::<i64>() {
        Number::from(value)
    } else if let Ok(value) = word.trim_start_matches('+').parse::<u64>() {
        Number::from(value)
    } else {
        let value = word
            .trim_start_matches('+')
            .parse::<f64>()
            .map_err(|_| invalid())?;
        Number::from_f64(value).ok_or_else(invalid)?
    };

    Ok(Token::Literal(Value::Number(number)))
}

fn path_token(word: &str, offset: usize) -> Result<Token, TemplateError> {
    let invalid = || TemplateError::InvalidField {
        offset,
        field: word.to_string(),
    };

    if word == "." {
        return Ok(Token::Dot);
    }

    if let Some(path) = word.strip_prefix('.') {
        return split_path(path).map(Token::Field).ok_or_else(invalid);
    }

    let (name, path) = match word.find('.') {
        Some(dot) => (&word[..dot], split_path(&word[dot + 1..]).ok_or_else(invalid)?),
        None => (word, Vec::new()),
    };
    if name != "$" && !is_identifier(&name[1..]) {
        return Err(invalid());
    }
    Ok(Token::Variable {
        name: name.to_string(),
        path,
    })
}

fn split_path(path: &str) -> Option<Vec<String>> {
    path.split('.')
        .map(|segment| is_identifier(segment).then(|| segment.to_string()))
        .collect()
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn quoted_end(body: &str, start: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in body[start..].char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Some(start + i + 1);
        }
    }
    None
}

fn unquote(word: &str) -> Option<String> {
    let inner = word.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            _ => return None,
        }
    }

    Some(out)
}
