use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    NonTerminal,
    Terminal,
    Assign,
    /// Implicit concatenation. Never produced by the lexer, only pushed by
    /// the expander when two values are adjacent.
    Concat,
    Alternation,
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    GroupBegin,
    GroupEnd,
}

impl TokenKind {
    /// Binding strength of an operator. Grouping markers never bind.
    pub fn precedence(self) -> u8 {
        match self {
            TokenKind::ZeroOrMore | TokenKind::OneOrMore | TokenKind::ZeroOrOne => 3,
            TokenKind::Concat => 2,
            TokenKind::Alternation => 1,
            _ => 0,
        }
    }
}

/// A lexeme of the grammar notation along with the byte offset of its first
/// character in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Terminal text, non-terminal name, or the operator spelling.
    pub value: String,
    pub offset: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, value: S, offset: usize) -> Self {
        Token {
            kind,
            value: value.into(),
            offset,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind, self.value, self.offset)
    }
}
