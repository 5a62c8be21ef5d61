//! Normalization of extended BNF grammars into plain context-free rules.
//!
//! The notation accepted here has quoted terminals (`"ab"`, `'c'`), numeric
//! character escapes (`%x41`, `%d65`, `%b1000001`, `%65`), angle-bracket
//! non-terminals (`<expr>`), alternation `|`, grouping `( )`, optional
//! brackets `[ ]` and the postfix quantifiers `?`, `*` and `+`. Rules are
//! written `<name> ::= ...` (`:=` and `=` are accepted as well) and need no
//! terminator.
//!
//! Every grouped or quantified sub-expression is replaced by a freshly
//! synthesized non-terminal so that the resulting [`Production`]s only
//! contain terminals and non-terminal references.
//!
//! ```
//! let grammar = ebnf::parse("<list> ::= <item> (',' <item>)*", false).unwrap();
//! assert_eq!(grammar.rules.len(), 3);
//! ```
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{self, Display};
use std::str::FromStr;

mod error;
mod expander;
mod lexer;
mod names;
mod position;
mod token;

pub use error::SyntaxError;
pub use expander::Expander;
pub use lexer::lex;
pub use names::NameTable;
pub use position::Location;
pub use token::{Token, TokenKind};

/// Identifier of a non-terminal. Always negative, allocated from -1 downwards
/// in the order non-terminals are first seen or synthesized.
pub type NonTerminalId = i64;

/// One element of a production's right-hand side.
#[derive(PartialEq, Eq, Debug, Clone, Hash, Serialize)]
#[serde(untagged)]
pub enum Symbol {
    NonTerminal(NonTerminalId),
    /// A literal. The empty string is epsilon.
    Terminal(String),
}

impl Symbol {
    pub fn epsilon() -> Self {
        Symbol::Terminal(String::new())
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Terminal(t) if t.is_empty())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::NonTerminal(id) => write!(f, "{}", id),
            Symbol::Terminal(text) => write!(f, "{}", quote_terminal(text)),
        }
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::Terminal(s.to_owned())
    }
}

impl From<NonTerminalId> for Symbol {
    fn from(id: NonTerminalId) -> Self {
        Symbol::NonTerminal(id)
    }
}

/// A single `lhs -> rhs` rule. Alternatives of the same non-terminal are
/// separate productions.
#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
pub struct Production {
    pub lhs: NonTerminalId,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: NonTerminalId, rhs: Vec<Symbol>) -> Self {
        Production { lhs, rhs }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ::=", self.lhs)?;
        for sym in &self.rhs {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// Quote terminal text so that it lexes back to the same terminal.
///
/// Single quotes are preferred. Text containing both quote characters is
/// split around its single quotes, which are written as `%x27`.
pub fn quote_terminal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        text.split('\'')
            .map(|part| {
                if part.is_empty() {
                    String::new()
                } else {
                    format!("'{}'", part)
                }
            })
            .collect::<Vec<_>>()
            .join(" %x27 ")
            .trim()
            .to_owned()
    }
}

/// The normalized rules of one grammar document along with the names of its
/// non-terminals.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Grammar {
    /// Ordered by non-terminal id, descending.
    pub rules: Vec<Production>,
    pub names: NameTable,
}

impl Grammar {
    pub fn resolve_name(&self, id: NonTerminalId) -> Option<&str> {
        self.names.name(id)
    }

    /// Non-terminals referenced on some right-hand side that have no rule of
    /// their own.
    pub fn unreachable_non_terminals(&self) -> Vec<(String, NonTerminalId)> {
        unreachable_non_terminals(&self.rules, &self.names)
    }

    /// Render a symbol with non-terminals written by name, e.g. `<expr>`.
    pub fn symbol_name(&self, sym: &Symbol) -> String {
        match sym {
            Symbol::NonTerminal(id) => match self.resolve_name(*id) {
                Some(name) => format!("<{}>", name),
                None => id.to_string(),
            },
            Symbol::Terminal(text) => quote_terminal(text),
        }
    }
}

/// Renders the grammar as BNF with named non-terminals. The output can be
/// parsed again.
impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            write!(f, "{} ::=", self.symbol_name(&Symbol::NonTerminal(rule.lhs)))?;
            for sym in &rule.rhs {
                write!(f, " {}", self.symbol_name(sym))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, false)
    }
}

/// Lex and expand a complete grammar document.
pub fn parse(src: &str, long: bool) -> Result<Grammar, SyntaxError> {
    let tokens = lex(src, long)?;
    let mut expander = Expander::new();
    expander.parse(&tokens)?;
    Ok(expander.into_grammar())
}

pub(crate) fn unreachable_non_terminals(
    rules: &[Production],
    names: &NameTable,
) -> Vec<(String, NonTerminalId)> {
    let defined: HashSet<NonTerminalId> = rules.iter().map(|rule| rule.lhs).collect();
    let mut missing: Vec<NonTerminalId> = rules
        .iter()
        .flat_map(|rule| rule.rhs.iter())
        .filter_map(|sym| match sym {
            Symbol::NonTerminal(id) if !defined.contains(id) => Some(*id),
            _ => None,
        })
        .collect();
    missing.sort_unstable_by(|a, b| b.cmp(a));
    missing.dedup();

    missing
        .into_iter()
        .map(|id| (names.name(id).unwrap_or_default().to_owned(), id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_terminals() {
        let tests = vec![
            ("a", "'a'"),
            ("", "''"),
            ("it's", "\"it's\""),
            ("'\"", "%x27 '\"'"),
            ("a'\"b", "'a' %x27 '\"b'"),
        ];
        for test in tests {
            assert_eq!(quote_terminal(test.0), test.1, "test case: {:?}", test);
        }
    }

    #[test]
    fn quoted_terminals_lex_back() {
        for text in &["a", "it's", "\"", "a'\"b"] {
            let toks = lex(&quote_terminal(text), true).unwrap();
            let joined: String = toks.iter().map(|t| t.value.as_str()).collect();
            assert_eq!(joined, *text);
        }
    }

    #[test]
    fn display_production() {
        let p = Production::new(-1, vec!["a".into(), Symbol::NonTerminal(-2), Symbol::epsilon()]);
        assert_eq!(p.to_string(), "-1 ::= 'a' -2 ''");
    }

    #[test]
    fn lossless_grammar() {
        let g: Grammar = "<s> ::= 'a' <s> | <t>\n<t> ::= 'b'".parse().unwrap();
        let reparsed: Grammar = g.to_string().parse().unwrap();
        assert_eq!(g, reparsed, "To string:\n{}\n", g);
    }

    #[test]
    fn unreachable_reports_undefined_once() {
        let g: Grammar = "<a> ::= 'x' <b> <b> | <c>\n<c> ::= <b>".parse().unwrap();
        assert_eq!(g.unreachable_non_terminals(), vec![("b".to_owned(), -2)]);
    }
}
