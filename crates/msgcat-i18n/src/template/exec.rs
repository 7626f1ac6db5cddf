//! Executing a parsed template against JSON data.

use super::format;
use super::parse::{Command, Function, Node, Operand, Pipeline};
use super::TemplateError;
use serde_json::{Number, Value};
use std::cmp::Ordering;

static NULL: Value = Value::Null;

enum Flow {
    Next,
    Break,
    Continue,
}

/// Render `nodes` with `root` as both `.` and `$`.
pub(super) fn execute(nodes: &[Node], root: &Value, out: &mut String) -> Result<(), TemplateError> {
    let mut state = State {
        vars: vec![("$".to_string(), root.clone())],
    };
    state.walk(nodes, root, out).map(|_| ())
}

struct State {
    /// Variables in scope, innermost last
    vars: Vec<(String, Value)>,
}

impl State {
    fn walk(
        &mut self,
        nodes: &[Node],
        dot: &Value,
        out: &mut String,
    ) -> Result<Flow, TemplateError> {
        for node in nodes {
            let flow = match node {
                Node::Text(text) => {
                    out.push_str(text);
                    Flow::Next
                }
                Node::Action(pipe) => {
                    let value = self.pipeline(pipe, dot)?;
                    if pipe.decls.is_empty() {
                        write_value(out, &value);
                    } else {
                        self.bind(pipe, value);
                    }
                    Flow::Next
                }
                Node::If {
                    pipe,
                    then_branch,
                    else_branch,
                } => {
                    let mark = self.vars.len();
                    let value = self.pipeline(pipe, dot)?;
                    let branch = if is_truthy(&value) {
                        then_branch
                    } else {
                        else_branch
                    };
                    self.bind(pipe, value);
                    let flow = self.walk(branch, dot, out)?;
                    self.vars.truncate(mark);
                    flow
                }
                Node::With {
                    pipe,
                    then_branch,
                    else_branch,
                } => {
                    let mark = self.vars.len();
                    let value = self.pipeline(pipe, dot)?;
                    self.bind(pipe, value.clone());
                    let flow = if is_truthy(&value) {
                        self.walk(then_branch, &value, out)?
                    } else {
                        self.walk(else_branch, dot, out)?
                    };
                    self.vars.truncate(mark);
                    flow
                }
                Node::Range {
                    pipe,
                    body,
                    else_branch,
                } => self.range(pipe, body, else_branch, dot, out)?,
                Node::Break => Flow::Break,
                Node::Continue => Flow::Continue,
            };

            if !matches!(flow, Flow::Next) {
                return Ok(flow);
            }
        }

        Ok(Flow::Next)
    }

    fn range(
        &mut self,
        pipe: &Pipeline,
        body: &[Node],
        else_branch: &[Node],
        dot: &Value,
        out: &mut String,
    ) -> Result<Flow, TemplateError> {
        let value = self.pipeline(pipe, dot)?;
        let entries = entries(&value)?;
        if entries.is_empty() {
            return self.walk(else_branch, dot, out);
        }

        for (key, element) in entries {
            let mark = self.vars.len();
            match pipe.decls.as_slice() {
                [element_var] => self.set(element_var, element.clone(), pipe.assign),
                [key_var, element_var] => {
                    self.set(key_var, key, pipe.assign);
                    self.set(element_var, element.clone(), pipe.assign);
                }
                _ => {}
            }
            let flow = self.walk(body, &element, out)?;
            self.vars.truncate(mark);

            if matches!(flow, Flow::Break) {
                break;
            }
        }

        Ok(Flow::Next)
    }

    fn bind(&mut self, pipe: &Pipeline, value: Value) {
        if let Some(name) = pipe.decls.first() {
            self.set(name, value, pipe.assign);
        }
    }

    fn set(&mut self, name: &str, value: Value, assign: bool) {
        if assign {
            if let Some((_, slot)) = self.vars.iter_mut().rev().find(|(var, _)| var == name) {
                *slot = value;
            }
        } else {
            self.vars.push((name.to_string(), value));
        }
    }

    fn variable(&self, name: &str) -> &Value {
        self.vars
            .iter()
            .rev()
            .find(|(var, _)| var == name)
            .map_or(&NULL, |(_, value)| value)
    }

    fn pipeline(&mut self, pipe: &Pipeline, dot: &Value) -> Result<Value, TemplateError> {
        let mut value = None;
        for command in &pipe.commands {
            value = Some(self.command(command, dot, value)?);
        }
        Ok(value.unwrap_or(Value::Null))
    }

    fn command(
        &mut self,
        command: &Command,
        dot: &Value,
        piped: Option<Value>,
    ) -> Result<Value, TemplateError> {
        match command {
            Command::Operand(operand) => self.operand(operand, dot),
            Command::Call { function, args } => {
                let mut values = args
                    .iter()
                    .map(|operand| self.operand(operand, dot))
                    .collect::<Result<Vec<_>, _>>()?;
                values.extend(piped);
                call(*function, &values)
            }
        }
    }

    fn operand(&mut self, operand: &Operand, dot: &Value) -> Result<Value, TemplateError> {
        match operand {
            Operand::Dot => Ok(dot.clone()),
            Operand::Field(path) => resolve(dot, path),
            Operand::Variable { name, path } => resolve(self.variable(name), path),
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Pipeline(pipe) => self.pipeline(pipe, dot),
        }
    }
}

/// Walk `path` from `base`. Missing keys and `null` stop the walk with `null`.
fn resolve(base: &Value, path: &[String]) -> Result<Value, TemplateError> {
    let mut current = base;
    for segment in path {
        current = match current {
            Value::Object(object) => match object.get(segment) {
                Some(value) => value,
                None => return Ok(Value::Null),
            },
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(TemplateError::FieldOnNonObject {
                    field: segment.clone(),
                    kind: value_kind(other),
                })
            }
        };
    }
    Ok(current.clone())
}

/// Key and element pairs visited by `range`; objects in key order.
fn entries(value: &Value) -> Result<Vec<(Value, Value)>, TemplateError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(i, item)| (Value::from(i), item.clone()))
            .collect()),
        Value::Object(object) => {
            let mut pairs: Vec<(&String, &Value)> = object.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            Ok(pairs
                .into_iter()
                .map(|(key, item)| (Value::from(key.as_str()), item.clone()))
                .collect())
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            let count = n.as_u64().unwrap_or(0);
            Ok((0..count).map(|i| (Value::from(i), Value::from(i))).collect())
        }
        other => Err(TemplateError::NotIterable {
            kind: value_kind(other),
        }),
    }
}

fn call(function: Function, args: &[Value]) -> Result<Value, TemplateError> {
    match function {
        Function::And => Ok(select(args, false)),
        Function::Or => Ok(select(args, true)),
        Function::Not => Ok(Value::Bool(!args.first().is_some_and(is_truthy))),
        Function::Len => length(args.first().unwrap_or(&NULL)).map(Value::from),
        Function::Index => index(args),
        Function::Print => Ok(Value::String(format::sprint(args))),
        Function::Println => Ok(Value::String(format::sprintln(args))),
        Function::Printf => match args.split_first() {
            Some((Value::String(template), rest)) => {
                Ok(Value::String(format::sprintf(template, rest)))
            }
            Some((other, _)) => Err(TemplateError::InvalidArgument {
                function: function.name(),
                reason: format!("format must be a string, got {}", value_kind(other)),
            }),
            None => Ok(Value::String(String::new())),
        },
        Function::Eq => {
            let Some((first, rest)) = args.split_first() else {
                return Ok(Value::Bool(false));
            };
            for other in rest {
                if equal(function, first, other)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Function::Ne => {
            let (left, right) = pair(function, args)?;
            Ok(Value::Bool(!equal(function, left, right)?))
        }
        Function::Lt | Function::Le | Function::Gt | Function::Ge => {
            let (left, right) = pair(function, args)?;
            let ordering = order(function, left, right)?;
            Ok(Value::Bool(match function {
                Function::Lt => ordering == Ordering::Less,
                Function::Le => ordering != Ordering::Greater,
                Function::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
    }
}

/// `and` returns the first falsy argument, `or` the first truthy one;
/// otherwise the last argument.
fn select(args: &[Value], truthy: bool) -> Value {
    args.iter()
        .find(|value| is_truthy(value) == truthy)
        .or_else(|| args.last())
        .cloned()
        .unwrap_or(Value::Null)
}

fn pair(function: Function, args: &[Value]) -> Result<(&Value, &Value), TemplateError> {
    match args {
        [left, right] => Ok((left, right)),
        _ => Err(TemplateError::InvalidArgument {
            function: function.name(),
            reason: format!("expected 2 arguments, got {}", args.len()),
        }),
    }
}

fn length(value: &Value) -> Result<usize, TemplateError> {
    match value {
        Value::Null => Ok(0),
        Value::String(s) => Ok(s.len()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(object) => Ok(object.len()),
        other => Err(TemplateError::InvalidArgument {
            function: Function::Len.name(),
            reason: format!("len of {}", value_kind(other)),
        }),
    }
}

fn index(args: &[Value]) -> Result<Value, TemplateError> {
    let Some((base, keys)) = args.split_first() else {
        return Ok(Value::Null);
    };

    let mut current = base;
    for key in keys {
        current = match (current, key) {
            (Value::Null, _) => return Ok(Value::Null),
            (Value::Array(items), Value::Number(n)) if n.is_i64() || n.is_u64() => {
                let position = n.as_i64().unwrap_or(i64::MAX);
                usize::try_from(position)
                    .ok()
                    .and_then(|i| items.get(i))
                    .ok_or(TemplateError::IndexOutOfRange {
                        index: position,
                        len: items.len(),
                    })?
            }
            (Value::Object(object), Value::String(name)) => match object.get(name) {
                Some(value) => value,
                None => return Ok(Value::Null),
            },
            _ => {
                return Err(TemplateError::InvalidArgument {
                    function: Function::Index.name(),
                    reason: format!(
                        "cannot index {} with {}",
                        value_kind(current),
                        value_kind(key)
                    ),
                })
            }
        };
    }

    Ok(current.clone())
}

/// `null` equals only `null`; other kinds must match.
fn equal(function: Function, left: &Value, right: &Value) -> Result<bool, TemplateError> {
    match (left, right) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Number(a), Value::Number(b)) => Ok(compare_numbers(a, b) == Some(Ordering::Equal)),
        _ => Err(incomparable(function, left, right)),
    }
}

fn order(function: Function, left: &Value, right: &Value) -> Result<Ordering, TemplateError> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => {
            compare_numbers(a, b).ok_or_else(|| incomparable(function, left, right))
        }
        _ => Err(incomparable(function, left, right)),
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

const fn incomparable(function: Function, left: &Value, right: &Value) -> TemplateError {
    TemplateError::Incomparable {
        function: function.name(),
        left: value_kind(left),
        right: value_kind(right),
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

/// False, zero, `null`, and empty strings, arrays or objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}

pub(super) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
