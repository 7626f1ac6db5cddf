//! `print`, `println` and `printf` formatting of JSON values.
//!
//! Verbs follow Go's `fmt` where JSON has a matching type: `%v %s %q %d %x
//! %X %o %b %c %f %F %e %E %g %G %t %%`, with the `- + 0 space` flags,
//! width and precision. `%g` always uses the shortest form. A mismatched
//! verb renders as `%!d(string=abc)`, a missing argument as `%!d(MISSING)`,
//! and leftovers as `%!(EXTRA ...)`.

use super::exec::value_kind;
use serde_json::Value;
use std::iter::Peekable;
use std::str::Chars;

/// Text form of a value: strings verbatim, `null` empty, the rest as JSON.
fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Operands joined with a space where neither side is a string.
pub(super) fn sprint(args: &[Value]) -> String {
    let mut out = String::new();
    let mut prev_is_string = true;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !prev_is_string && !arg.is_string() {
            out.push(' ');
        }
        out.push_str(&display(arg));
        prev_is_string = arg.is_string();
    }
    out
}

/// Operands joined with spaces, followed by a newline.
pub(super) fn sprintln(args: &[Value]) -> String {
    let mut out = args.iter().map(display).collect::<Vec<_>>().join(" ");
    out.push('\n');
    out
}

#[derive(Debug, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

pub(super) fn sprintf(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = digits(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(digits(&mut chars).unwrap_or(0));
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.next() {
            Some(arg) => spec.write(&mut out, verb, arg),
            None => out.push_str(&format!("%!{verb}(MISSING)")),
        }
    }

    let extra: Vec<String> = args
        .map(|arg| format!("{}={}", value_kind(arg), display(arg)))
        .collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }

    out
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    value
}

impl Spec {
    fn write(&self, out: &mut String, verb: char, arg: &Value) {
        match self.format(verb, arg) {
            Some((text, numeric)) => self.pad(out, &text, numeric),
            None => out.push_str(&format!("%!{verb}({}={})", value_kind(arg), display(arg))),
        }
    }

    /// The formatted text and whether it is numeric, or `None` for a
    /// verb that does not apply to `arg`.
    fn format(&self, verb: char, arg: &Value) -> Option<(String, bool)> {
        let text = match (verb, arg) {
            ('v', Value::Number(_)) => return Some((self.signed(arg.to_string()), true)),
            ('v', _) => display(arg),
            ('s', Value::String(s)) => match self.precision {
                Some(limit) => s.chars().take(limit).collect(),
                None => s.clone(),
            },
            ('s', Value::Null | Value::Array(_) | Value::Object(_)) => display(arg),
            ('q', Value::String(_)) => arg.to_string(),
            ('t', Value::Bool(b)) => b.to_string(),
            ('d' | 'x' | 'X' | 'o' | 'b' | 'c', Value::Number(n)) => {
                let value = n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))?;
                return self.integer(verb, value);
            }
            ('x' | 'X', Value::String(s)) => {
                let hex: String = s.bytes().map(|b| format!("{b:02x}")).collect();
                if verb == 'X' {
                    hex.to_uppercase()
                } else {
                    hex
                }
            }
            ('f' | 'F' | 'e' | 'E' | 'g' | 'G', Value::Number(n)) => {
                let value = n.as_f64()?;
                let precision = self.precision.unwrap_or(6);
                let text = match verb {
                    'f' | 'F' => format!("{value:.precision$}"),
                    'e' | 'E' => exponent(value, precision, verb == 'E'),
                    _ => value.to_string(),
                };
                return Some((self.signed(text), true));
            }
            _ => return None,
        };
        Some((text, false))
    }

    fn integer(&self, verb: char, value: i128) -> Option<(String, bool)> {
        let magnitude = value.unsigned_abs();
        let digits = match verb {
            'd' => magnitude.to_string(),
            'x' => format!("{magnitude:x}"),
            'X' => format!("{magnitude:X}"),
            'o' => format!("{magnitude:o}"),
            'b' => format!("{magnitude:b}"),
            _ => {
                let c = u32::try_from(value).ok().and_then(char::from_u32)?;
                return Some((c.to_string(), false));
            }
        };
        let text = if value < 0 {
            format!("-{digits}")
        } else {
            self.signed(digits)
        };
        Some((text, true))
    }

    /// Apply the `+` and space flags to non-negative numbers.
    fn signed(&self, text: String) -> String {
        if text.starts_with('-') {
            text
        } else if self.plus {
            format!("+{text}")
        } else if self.space {
            format!(" {text}")
        } else {
            text
        }
    }

    fn pad(&self, out: &mut String, text: &str, numeric: bool) {
        let len = text.chars().count();
        let fill = self.width.map_or(0, |width| width.saturating_sub(len));

        if fill == 0 {
            out.push_str(text);
        } else if self.minus {
            out.push_str(text);
            out.extend(std::iter::repeat(' ').take(fill));
        } else if self.zero && numeric {
            let (sign, digits) = match text.strip_prefix(['-', '+', ' ']) {
                Some(rest) => text.split_at(text.len() - rest.len()),
                None => ("", text),
            };
            out.push_str(sign);
            out.extend(std::iter::repeat('0').take(fill));
            out.push_str(digits);
        } else {
            out.extend(std::iter::repeat(' ').take(fill));
            out.push_str(text);
        }
    }
}

/// `1.500000e+02` style, with at least two exponent digits.
fn exponent(value: f64, precision: usize, upper: bool) -> String {
    let text = format!("{value:.precision$e}");
    let (mantissa, exp) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:02}", exp.unsigned_abs())
}
