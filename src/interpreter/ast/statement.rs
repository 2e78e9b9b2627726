use std::fmt::{Display, Formatter};
use crate::interpreter::ast::{Expr, Identifier};
use crate::interpreter::token::{Token, TokenType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingMode {
    Immutable,
    Mutable,
}

impl Display for BindingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingMode::Immutable => f.write_str("imm"),
            BindingMode::Mutable => f.write_str("mut"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub mode: BindingMode,
    pub name: Identifier,
    pub value: Option<Expr>,
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} = {}", self.mode, self.name, value),
            None => write!(f, "{} {}", self.mode, self.name),
        }
    }
}

/// Either a braced statement list or a single unbraced statement.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{}");
        }

        write!(f, "{{ {} }}", self.statements.iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<String>>().join(" "))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentStatement {
    pub token: Token,
    pub style: CommentStyle,
    pub lines: Vec<String>,
}

impl CommentStatement {
    /// Splits the raw comment text into lines and removes the common decoration:
    /// a leading `* `, `# `, `= ` or `- ` marker for block comments, the leading
    /// indentation of the first line for line comments.
    pub fn from_token(token: Token) -> CommentStatement {
        let style = if token.token_type() == TokenType::BlockComment { CommentStyle::Block } else { CommentStyle::Line };

        let (lines, prefix): (Vec<&str>, usize) = match style {
            CommentStyle::Block => {
                let lines: Vec<&str> = token.source().trim().split('\n').map(str::trim).collect();
                let prefix = lines.first().map(|first| Self::marker_len(first)).unwrap_or(0);
                (lines, prefix)
            },
            CommentStyle::Line => {
                let pieces: Vec<&str> = token.source().split('\n').collect();
                let last = pieces.len() - 1;
                let lines: Vec<&str> = pieces.into_iter().enumerate()
                    .map(|(i, line)| if i < last { line.trim_end() } else { line })
                    .collect();
                let prefix = lines.first().map(|first| first.len() - first.trim_start().len()).unwrap_or(0);
                (lines, prefix)
            },
        };

        let lines = lines.into_iter()
            .map(|line| line.get(prefix..).unwrap_or_else(|| line.trim_start()).to_owned())
            .collect();

        CommentStatement { token, style, lines }
    }

    fn marker_len(line: &str) -> usize {
        let mut chars = line.chars();

        match chars.next() {
            Some('#' | '*' | '=' | '-') => {},
            _ => return 0,
        }

        let rest = chars.as_str();
        let whitespace = rest.len() - rest.trim_start().len();

        if whitespace == 0 { 0 } else { 1 + whitespace }
    }
}

impl Display for CommentStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.style {
            CommentStyle::Block => {
                writeln!(f, "/*")?;

                for line in &self.lines {
                    writeln!(f, " * {}", line)?;
                }

                f.write_str(" */")
            },
            CommentStyle::Line => f.write_str(&self.lines.iter()
                .map(|line| format!("// {}", line))
                .collect::<Vec<String>>().join("\n")),
        }
    }
}

/// `loop (mut i = iterable) body`
#[derive(Clone, Debug, PartialEq)]
pub struct LoopStatement {
    pub token: Token,
    pub binding: LetStatement,
    pub body: BlockStatement,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let(LetStatement),
    Return {
        token: Token,
        value: Option<Expr>,
    },
    Expression {
        token: Token,
        expr: Expr,
    },
    Block(BlockStatement),
    Assign {
        token: Token,
        target: Expr,
        value: Expr,
    },
    /// `...expr`
    Derive {
        token: Token,
        expr: Expr,
    },
    Comment(CommentStatement),
    Loop(LoopStatement),
    Break(Token),
    Continue(Token),
}

impl Stmt {
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Let(statement) => &statement.token,
            Stmt::Block(block) => &block.token,
            Stmt::Comment(comment) => &comment.token,
            Stmt::Loop(statement) => &statement.token,
            Stmt::Break(token) | Stmt::Continue(token) => token,
            Stmt::Return { token, .. }
            | Stmt::Expression { token, .. }
            | Stmt::Assign { token, .. }
            | Stmt::Derive { token, .. } => token,
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Let(statement) => write!(f, "{};", statement),
            Stmt::Return { value: Some(value), .. } => write!(f, "return {};", value),
            Stmt::Return { value: None, .. } => f.write_str("return;"),
            Stmt::Expression { expr, .. } => write!(f, "{}", expr),
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::Assign { target, value, .. } => write!(f, "{} = {};", target, value),
            Stmt::Derive { expr, .. } => write!(f, "...{};", expr),
            Stmt::Comment(comment) => write!(f, "{}", comment),
            Stmt::Loop(LoopStatement { binding, body, .. }) => write!(f, "loop ({}) {}", binding, body),
            Stmt::Break(_) => f.write_str("break;"),
            Stmt::Continue(_) => f.write_str("continue;"),
        }
    }
}
