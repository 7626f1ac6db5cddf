//! Template compilation and rendering for message bodies.
//!
//! Message bodies that contain `{{` are templates written in Go's
//! `text/template` action language:
//!
//! | Action | Meaning |
//! |---|---|
//! | `{{.Name}}`, `{{.User.Name}}` | field of the data, walking nested objects |
//! | `{{.}}` | the current value (the whole data map at top level) |
//! | `{{"text"}}`, `` {{`raw`}} ``, `{{3}}`, `{{true}}` | literals |
//! | `{{/* note */}}` | comment, renders nothing |
//! | `{{- .X -}}` | trim spaces, tabs and newlines of the neighbouring text |
//! | `{{if .X}}a{{else if .Y}}b{{else}}c{{end}}` | conditional on truthiness |
//! | `{{with .User}}{{.Name}}{{else}}-{{end}}` | set `.` when truthy |
//! | `{{range .Items}}{{.}}{{else}}none{{end}}` | iterate arrays, objects, counts |
//! | `{{range $i, $e := .Items}}`, `{{$x := .A}}`, `{{$x = .B}}` | variables; `$` is the data |
//! | `{{break}}`, `{{continue}}` | inside `range` |
//! | `{{.X \| printf "%05d"}}`, `{{len (index .Items 0)}}` | pipelines and sub-pipelines |
//!
//! Built-in functions: `and`, `or`, `not`, `len`, `index`, `print`,
//! `printf`, `println`, `eq`, `ne`, `lt`, `le`, `gt`, `ge`. `define`,
//! `template` and `block` are rejected at compile time, as are the escaping
//! functions `html`, `js` and `urlquery`.
//!
//! Missing keys and `null` values render as nothing. Strings render verbatim,
//! numbers and booleans as their JSON text, arrays and objects as compact
//! JSON. False, zero, `null`, missing values, and empty strings, arrays or
//! objects are falsy. Objects are ranged over in key order.
//!
//! A [`Template`] is immutable once compiled and can be rendered from any
//! number of threads at once.

mod exec;
mod format;
mod lex;
mod parse;

use parse::Node;
use serde_json::{Map, Value};
use thiserror::Error;

/// Opening delimiter of a template action.
pub const LEFT_DELIM: &str = "{{";
/// Closing delimiter of a template action.
pub const RIGHT_DELIM: &str = "}}";

/// Caller-supplied values a template is rendered against.
pub type TemplateData = Map<String, Value>;

/// Errors raised while compiling or rendering a template.
///
/// Offsets are byte positions in the template source of the action at fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `{{` without a matching `}}`
    #[error("unclosed action starting at byte {offset}")]
    UnclosedAction {
        /// Start of the action
        offset: usize,
    },

    /// `/*` without a matching `*/`
    #[error("unterminated comment in action starting at byte {offset}")]
    UnterminatedComment {
        /// Start of the action
        offset: usize,
    },

    /// A quoted string without its closing quote
    #[error("unterminated quoted string at byte {offset}")]
    UnterminatedString {
        /// Start of the string, or of its action
        offset: usize,
    },

    /// `{{}}` or an action holding only whitespace
    #[error("empty action at byte {offset}")]
    EmptyAction {
        /// Start of the action
        offset: usize,
    },

    /// A field reference that is not a dot-separated identifier chain
    #[error("malformed field reference '{field}' at byte {offset}")]
    InvalidField {
        /// Start of the action
        offset: usize,
        /// The reference as written
        field: String,
    },

    /// A token that does not fit the action grammar
    #[error("unexpected '{token}' in action at byte {offset}")]
    UnexpectedToken {
        /// Start of the action
        offset: usize,
        /// The offending token
        token: String,
    },

    /// A name that is neither a keyword nor a built-in function
    #[error("function '{name}' is not defined (action at byte {offset})")]
    UnknownFunction {
        /// Start of the action
        offset: usize,
        /// The unknown name
        name: String,
    },

    /// `define`, `template` or `block`
    #[error("{{{{{keyword}}}}} is not supported (action at byte {offset})")]
    UnsupportedAction {
        /// Start of the action
        offset: usize,
        /// The rejected keyword
        keyword: String,
    },

    /// `{{if}}`, `{{with}}` or `{{range}}` without a pipeline
    #[error("missing value for {{{{{keyword}}}}} at byte {offset}")]
    MissingPipeline {
        /// Start of the action
        offset: usize,
        /// The block keyword
        keyword: &'static str,
    },

    /// An empty stage in a pipeline, such as `{{.A |}}`
    #[error("missing command in pipeline at byte {offset}")]
    MissingCommand {
        /// Start of the action
        offset: usize,
    },

    /// `(` without a matching `)`
    #[error("unclosed left paren in action at byte {offset}")]
    UnclosedParen {
        /// Start of the action
        offset: usize,
    },

    /// A variable used outside the scope that declares it
    #[error("undefined variable {name} at byte {offset}")]
    UndefinedVariable {
        /// Start of the action
        offset: usize,
        /// Variable name including `$`
        name: String,
    },

    /// A built-in called with the wrong number of arguments
    #[error("wrong number of args for {function}: want {expected} got {got} (byte {offset})")]
    WrongArgCount {
        /// Start of the action
        offset: usize,
        /// Function name
        function: &'static str,
        /// Accepted argument count
        expected: &'static str,
        /// Supplied argument count, including a piped value
        got: usize,
    },

    /// `else`, `end`, `break` or `continue` where no block allows it
    #[error("unexpected {{{{{keyword}}}}} at byte {offset}")]
    UnexpectedKeyword {
        /// Start of the action
        offset: usize,
        /// The keyword as written
        keyword: String,
    },

    /// A block never closed by `{{end}}`
    #[error("unclosed {{{{{keyword}}}}} starting at byte {offset}")]
    UnclosedBlock {
        /// Start of the opening action
        offset: usize,
        /// The block keyword
        keyword: &'static str,
    },

    /// A field was looked up on a value that is not an object
    #[error("can't evaluate field {field} in {kind} value")]
    FieldOnNonObject {
        /// The field name
        field: String,
        /// Kind of the value it was looked up on
        kind: &'static str,
    },

    /// `range` over a string, boolean or fractional number
    #[error("range can't iterate over {kind} value")]
    NotIterable {
        /// Kind of the ranged value
        kind: &'static str,
    },

    /// `index` past the end of an array
    #[error("index out of range: {index} (length {len})")]
    IndexOutOfRange {
        /// Requested position
        index: i64,
        /// Array length
        len: usize,
    },

    /// A built-in received an argument it cannot use
    #[error("error calling {function}: {reason}")]
    InvalidArgument {
        /// Function name
        function: &'static str,
        /// What was wrong
        reason: String,
    },

    /// A comparison between values of different or unordered kinds
    #[error("error calling {function}: incompatible types for comparison: {left} and {right}")]
    Incomparable {
        /// Function name
        function: &'static str,
        /// Kind of the left operand
        left: &'static str,
        /// Kind of the right operand
        right: &'static str,
    },
}

/// A compiled message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compile `source` into an executable template.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let items = lex::split(source)?;
        let nodes = parse::parse(items)?;
        Ok(Self { nodes })
    }

    /// Render against `data`; `None` behaves like an empty map.
    pub fn render(&self, data: Option<&TemplateData>) -> Result<String, TemplateError> {
        let root = data.map_or(Value::Null, |map| Value::Object(map.clone()));
        let mut out = String::new();
        exec::execute(&self.nodes, &root, &mut out)?;
        Ok(out)
    }
}

/// Build a [`TemplateData`] map from `key => value` pairs.
///
/// Values go through `serde_json::Value::from`, so strings, numbers,
/// booleans and nested `Value`s are all accepted.
///
/// ```
/// use msgcat_i18n::template_data;
///
/// let data = template_data! { "Name" => "Ana", "Count" => 3 };
/// assert_eq!(data["Count"], 3);
/// ```
#[macro_export]
macro_rules! template_data {
    () => {
        $crate::TemplateData::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::TemplateData::new();
        $(
            data.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        data
    }};
}
