//! Building the node tree from lexed items.

use super::lex::{self, Item, Lexeme, Token};
use super::TemplateError;
use serde_json::Value;

/// Built-in functions callable from actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Function {
    And,
    Or,
    Not,
    Len,
    Index,
    Print,
    Printf,
    Println,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        let function = match name {
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "len" => Self::Len,
            "index" => Self::Index,
            "print" => Self::Print,
            "printf" => Self::Printf,
            "println" => Self::Println,
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "le" => Self::Le,
            "gt" => Self::Gt,
            "ge" => Self::Ge,
            _ => return None,
        };
        Some(function)
    }

    pub(super) const fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Len => "len",
            Self::Index => "index",
            Self::Print => "print",
            Self::Printf => "printf",
            Self::Println => "println",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        }
    }

    /// `Err` carries the accepted argument count for the error message.
    const fn check_arity(self, got: usize) -> Result<(), &'static str> {
        let (ok, expected) = match self {
            Self::Not | Self::Len => (got == 1, "1"),
            Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => (got == 2, "2"),
            Self::Eq => (got >= 2, "at least 2"),
            Self::And | Self::Or | Self::Index | Self::Printf => (got >= 1, "at least 1"),
            Self::Print | Self::Println => (true, "any"),
        };
        if ok {
            Ok(())
        } else {
            Err(expected)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Operand {
    Dot,
    Field(Vec<String>),
    Variable { name: String, path: Vec<String> },
    Literal(Value),
    Pipeline(Box<Pipeline>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Command {
    Operand(Operand),
    Call { function: Function, args: Vec<Operand> },
}

/// Commands joined by `|`, optionally bound to variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Pipeline {
    pub(super) decls: Vec<String>,
    /// `=` rather than `:=`
    pub(super) assign: bool,
    pub(super) commands: Vec<Command>,
}

impl Pipeline {
    /// Variables this pipeline introduces into scope.
    fn declared(&self) -> impl Iterator<Item = String> + '_ {
        self.decls.iter().filter(|_| !self.assign).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Node {
    Text(String),
    Action(Pipeline),
    If {
        pipe: Pipeline,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
    With {
        pipe: Pipeline,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
    Range {
        pipe: Pipeline,
        body: Vec<Node>,
        else_branch: Vec<Node>,
    },
    Break,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    If,
    With,
    Range,
}

impl Block {
    const fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::With => "with",
            Self::Range => "range",
        }
    }

    const fn max_decls(self) -> usize {
        match self {
            Self::Range => 2,
            Self::If | Self::With => 1,
        }
    }
}

enum Action {
    Pipeline(Pipeline),
    Open(Block, Pipeline),
    Else,
    ElseIf(Pipeline),
    ElseWith(Pipeline),
    End,
    Break,
    Continue,
}

enum Terminator {
    Else(usize),
    ElseIf(usize, Pipeline),
    ElseWith(usize, Pipeline),
    End(usize),
}

impl Terminator {
    fn unexpected(self) -> TemplateError {
        let (offset, keyword) = match self {
            Self::Else(offset) => (offset, "else"),
            Self::ElseIf(offset, _) => (offset, "else if"),
            Self::ElseWith(offset, _) => (offset, "else with"),
            Self::End(offset) => (offset, "end"),
        };
        TemplateError::UnexpectedKeyword {
            offset,
            keyword: keyword.to_string(),
        }
    }
}

/// Parse lexed items into the template's node tree.
pub(super) fn parse(items: Vec<Item<'_>>) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        items: items.into_iter(),
        vars: vec!["$".to_string()],
        range_depth: 0,
    };

    match parser.parse_list()? {
        (nodes, None) => Ok(nodes),
        (_, Some(terminator)) => Err(terminator.unexpected()),
    }
}

struct Parser<'a> {
    items: std::vec::IntoIter<Item<'a>>,
    /// Variables in scope, innermost last
    vars: Vec<String>,
    range_depth: usize,
}

impl Parser<'_> {
    fn parse_list(&mut self) -> Result<(Vec<Node>, Option<Terminator>), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(item) = self.items.next() {
            let (offset, body) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { offset, body } => (offset, body),
            };

            match self.parse_action(body, offset)? {
                Action::Pipeline(pipe) => {
                    let declared: Vec<String> = pipe.declared().collect();
                    self.vars.extend(declared);
                    nodes.push(Node::Action(pipe));
                }
                Action::Open(block, pipe) => nodes.push(self.parse_block(block, pipe, offset)?),
                Action::Break | Action::Continue if self.range_depth == 0 => {
                    return Err(TemplateError::UnexpectedKeyword {
                        offset,
                        keyword: body.trim().to_string(),
                    })
                }
                Action::Break => nodes.push(Node::Break),
                Action::Continue => nodes.push(Node::Continue),
                Action::Else => return Ok((nodes, Some(Terminator::Else(offset)))),
                Action::ElseIf(pipe) => {
                    return Ok((nodes, Some(Terminator::ElseIf(offset, pipe))))
                }
                Action::ElseWith(pipe) => {
                    return Ok((nodes, Some(Terminator::ElseWith(offset, pipe))))
                }
                Action::End => return Ok((nodes, Some(Terminator::End(offset)))),
            }
        }

        Ok((nodes, None))
    }

    /// Parse the body and else branch of a block opened at `offset`.
    ///
    /// `{{else if}}` and `{{else with}}` become a nested block in the else
    /// branch that shares the outer `{{end}}`.
    fn parse_block(
        &mut self,
        block: Block,
        pipe: Pipeline,
        offset: usize,
    ) -> Result<Node, TemplateError> {
        let unclosed = || TemplateError::UnclosedBlock {
            offset,
            keyword: block.keyword(),
        };

        let mark = self.vars.len();
        let declared: Vec<String> = pipe.declared().collect();
        self.vars.extend(declared);
        let scoped = self.vars.len();

        if block == Block::Range {
            self.range_depth += 1;
        }
        let (body, terminator) = self.parse_list()?;
        if block == Block::Range {
            self.range_depth -= 1;
        }
        self.vars.truncate(scoped);

        let else_branch = match terminator {
            None => return Err(unclosed()),
            Some(Terminator::End(_)) => Vec::new(),
            Some(Terminator::Else(_)) => match self.parse_list()? {
                (branch, Some(Terminator::End(_))) => branch,
                (_, Some(other)) => return Err(other.unexpected()),
                (_, None) => return Err(unclosed()),
            },
            Some(Terminator::ElseIf(else_offset, else_pipe)) if block != Block::Range => {
                vec![self.parse_block(Block::If, else_pipe, else_offset)?]
            }
            Some(Terminator::ElseWith(else_offset, else_pipe)) if block == Block::With => {
                vec![self.parse_block(Block::With, else_pipe, else_offset)?]
            }
            Some(other) => return Err(other.unexpected()),
        };
        self.vars.truncate(mark);

        Ok(match block {
            Block::If => Node::If {
                pipe,
                then_branch: body,
                else_branch,
            },
            Block::With => Node::With {
                pipe,
                then_branch: body,
                else_branch,
            },
            Block::Range => Node::Range {
                pipe,
                body,
                else_branch,
            },
        })
    }

    fn parse_action(&self, body: &str, offset: usize) -> Result<Action, TemplateError> {
        let lexemes = lex::tokenize(body, offset)?;
        let Some((first, rest)) = lexemes.split_first() else {
            return Err(TemplateError::EmptyAction { offset });
        };
        let keyword = match &first.token {
            Token::Ident(name) => name.as_str(),
            _ => "",
        };

        match keyword {
            "if" => self.open(Block::If, rest, offset),
            "with" => self.open(Block::With, rest, offset),
            "range" => self.open(Block::Range, rest, offset),
            "else" => match rest.split_first() {
                None => Ok(Action::Else),
                Some((next, tail)) => match &next.token {
                    Token::Ident(name) if name == "if" => {
                        self.block_pipeline(Block::If, tail, offset).map(Action::ElseIf)
                    }
                    Token::Ident(name) if name == "with" => {
                        self.block_pipeline(Block::With, tail, offset).map(Action::ElseWith)
                    }
                    _ => Err(unexpected(offset, next)),
                },
            },
            "end" | "break" | "continue" => {
                if let Some(extra) = rest.first() {
                    return Err(unexpected(offset, extra));
                }
                Ok(match keyword {
                    "end" => Action::End,
                    "break" => Action::Break,
                    _ => Action::Continue,
                })
            }
            "define" | "template" | "block" => Err(TemplateError::UnsupportedAction {
                offset,
                keyword: keyword.to_string(),
            }),
            _ => self.parse_pipeline(&lexemes, offset, 1).map(Action::Pipeline),
        }
    }

    fn open(
        &self,
        block: Block,
        rest: &[Lexeme<'_>],
        offset: usize,
    ) -> Result<Action, TemplateError> {
        self.block_pipeline(block, rest, offset)
            .map(|pipe| Action::Open(block, pipe))
    }

    fn block_pipeline(
        &self,
        block: Block,
        lexemes: &[Lexeme<'_>],
        offset: usize,
    ) -> Result<Pipeline, TemplateError> {
        if lexemes.is_empty() {
            return Err(TemplateError::MissingPipeline {
                offset,
                keyword: block.keyword(),
            });
        }
        self.parse_pipeline(lexemes, offset, block.max_decls())
    }

    fn parse_pipeline(
        &self,
        lexemes: &[Lexeme<'_>],
        offset: usize,
        max_decls: usize,
    ) -> Result<Pipeline, TemplateError> {
        let (decls, assign, rest) = split_declarations(lexemes);
        if decls.len() > max_decls {
            return Err(TemplateError::UnexpectedToken {
                offset,
                token: ",".to_string(),
            });
        }
        if assign {
            for name in &decls {
                self.check_variable(name, offset)?;
            }
        }

        let mut cursor = Cursor {
            lexemes: rest,
            pos: 0,
        };
        let commands = self.parse_commands(&mut cursor, offset, false)?;

        Ok(Pipeline {
            decls,
            assign,
            commands,
        })
    }

    fn parse_commands(
        &self,
        cursor: &mut Cursor<'_, '_>,
        offset: usize,
        nested: bool,
    ) -> Result<Vec<Command>, TemplateError> {
        let mut commands = Vec::new();

        loop {
            let command = self.parse_command(cursor, offset, !commands.is_empty())?;
            commands.push(command);

            match cursor.next_lexeme() {
                None if nested => return Err(TemplateError::UnclosedParen { offset }),
                None => return Ok(commands),
                Some(lexeme) => match lexeme.token {
                    Token::Pipe => {}
                    Token::RightParen if nested => return Ok(commands),
                    _ => return Err(unexpected(offset, lexeme)),
                },
            }
        }
    }

    fn parse_command(
        &self,
        cursor: &mut Cursor<'_, '_>,
        offset: usize,
        piped: bool,
    ) -> Result<Command, TemplateError> {
        let mut function = None;
        let mut operands = Vec::new();

        while let Some(lexeme) = cursor.peek() {
            if matches!(lexeme.token, Token::Pipe | Token::RightParen) {
                break;
            }
            cursor.advance();

            let operand = match &lexeme.token {
                Token::Ident(name) => {
                    let found = Function::lookup(name).ok_or_else(|| {
                        TemplateError::UnknownFunction {
                            offset,
                            name: name.clone(),
                        }
                    })?;
                    if function.is_some() || !operands.is_empty() {
                        return Err(unexpected(offset, lexeme));
                    }
                    function = Some(found);
                    continue;
                }
                Token::LeftParen => Operand::Pipeline(Box::new(Pipeline {
                    decls: Vec::new(),
                    assign: false,
                    commands: self.parse_commands(cursor, offset, true)?,
                })),
                Token::Dot => Operand::Dot,
                Token::Field(path) => Operand::Field(path.clone()),
                Token::Variable { name, path } => {
                    self.check_variable(name, offset)?;
                    Operand::Variable {
                        name: name.clone(),
                        path: path.clone(),
                    }
                }
                Token::Literal(value) => Operand::Literal(value.clone()),
                Token::Pipe
                | Token::RightParen
                | Token::Declare
                | Token::Assign
                | Token::Comma => return Err(unexpected(offset, lexeme)),
            };
            operands.push((operand, lexeme));
        }

        if let Some(function) = function {
            let got = operands.len() + usize::from(piped);
            function
                .check_arity(got)
                .map_err(|expected| TemplateError::WrongArgCount {
                    offset,
                    function: function.name(),
                    expected,
                    got,
                })?;
            return Ok(Command::Call {
                function,
                args: operands.into_iter().map(|(operand, _)| operand).collect(),
            });
        }

        let mut operands = operands.into_iter();
        match (operands.next(), operands.next()) {
            (None, _) => Err(TemplateError::MissingCommand { offset }),
            (Some(_), Some((_, extra))) => Err(unexpected(offset, extra)),
            (Some((_, lexeme)), None) if piped => Err(unexpected(offset, lexeme)),
            (Some((operand, _)), None) => Ok(Command::Operand(operand)),
        }
    }

    fn check_variable(&self, name: &str, offset: usize) -> Result<(), TemplateError> {
        if self.vars.iter().any(|var| var == name) {
            Ok(())
        } else {
            Err(TemplateError::UndefinedVariable {
                offset,
                name: name.to_string(),
            })
        }
    }
}

fn unexpected(offset: usize, lexeme: &Lexeme<'_>) -> TemplateError {
    TemplateError::UnexpectedToken {
        offset,
        token: lexeme.text.to_string(),
    }
}

/// Split a leading `$x :=`, `$x =`, or `$i, $e :=` off a pipeline.
fn split_declarations<'l, 's>(
    lexemes: &'l [Lexeme<'s>],
) -> (Vec<String>, bool, &'l [Lexeme<'s>]) {
    let bare = |lexeme: &Lexeme<'_>| match &lexeme.token {
        Token::Variable { name, path } if path.is_empty() => Some(name.clone()),
        _ => None,
    };
    let binding = |lexeme: &Lexeme<'_>| match lexeme.token {
        Token::Declare => Some(false),
        Token::Assign => Some(true),
        _ => None,
    };

    if let [first, op, rest @ ..] = lexemes {
        if let (Some(name), Some(assign)) = (bare(first), binding(op)) {
            return (vec![name], assign, rest);
        }
    }
    if let [first, comma, second, op, rest @ ..] = lexemes {
        if let (Some(key), Token::Comma, Some(value), Some(assign)) =
            (bare(first), &comma.token, bare(second), binding(op))
        {
            return (vec![key, value], assign, rest);
        }
    }

    (Vec::new(), false, lexemes)
}

struct Cursor<'l, 's> {
    lexemes: &'l [Lexeme<'s>],
    pos: usize,
}

impl<'l, 's> Cursor<'l, 's> {
    fn peek(&self) -> Option<&'l Lexeme<'s>> {
        self.lexemes.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn next_lexeme(&mut self) -> Option<&'l Lexeme<'s>> {
        let lexeme = self.peek();
        if lexeme.is_some() {
            self.advance();
        }
        lexeme
    }
}
