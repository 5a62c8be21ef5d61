use crate::error::SyntaxError;
use crate::names::NameTable;
use crate::token::{Token, TokenKind};
use crate::{Grammar, NonTerminalId, Production, Symbol};

/// Turns a token stream into plain productions.
///
/// Each rule's right-hand side is evaluated with a value stack and an
/// operator stack. Quantifiers bind tightest, then the implicit
/// concatenation of adjacent values, then alternation. Grouped alternatives
/// and quantified sub-expressions are replaced by synthesized non-terminals.
///
/// One expander handles one grammar document; ids and rules accumulate across
/// the rules of that document.
#[derive(Debug, Default)]
pub struct Expander {
    names: NameTable,
    rules: Vec<Production>,
    values: Vec<Vec<Symbol>>,
    operators: Vec<Token>,
}

impl Expander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand every rule in `tokens`, returning all productions emitted so
    /// far ordered by non-terminal id, descending.
    pub fn parse(&mut self, tokens: &[Token]) -> Result<Vec<Production>, SyntaxError> {
        let mut rest = tokens;
        while !rest.is_empty() {
            let (lhs, rhs, next) = split_rule(rest)?;
            let id = self.names.intern(&lhs.value);
            self.expand(id, rhs)?;
            log::debug!("expanded rule for <{}> ({})", lhs.value, id);
            rest = next;
        }

        // Stable, so alternatives keep their emission order.
        self.rules.sort_by(|a, b| b.lhs.cmp(&a.lhs));
        Ok(self.rules.clone())
    }

    pub fn resolve_name(&self, id: NonTerminalId) -> Option<&str> {
        self.names.name(id)
    }

    pub fn find_unreachable_non_terminals(&self) -> Vec<(String, NonTerminalId)> {
        crate::unreachable_non_terminals(&self.rules, &self.names)
    }

    pub fn into_grammar(self) -> Grammar {
        Grammar {
            rules: self.rules,
            names: self.names,
        }
    }

    fn expand(&mut self, lhs: NonTerminalId, rhs: &[Token]) -> Result<(), SyntaxError> {
        let res = self.evaluate(lhs, rhs);
        self.values.clear();
        self.operators.clear();
        res
    }

    fn evaluate(&mut self, lhs: NonTerminalId, rhs: &[Token]) -> Result<(), SyntaxError> {
        // Whether the previous token completed a value, in which case a
        // following value or group is concatenated to it.
        let mut after_value = false;

        for tok in rhs {
            match tok.kind {
                TokenKind::GroupBegin => {
                    if after_value {
                        self.push_concat(tok.offset)?;
                    }
                    self.operators.push(tok.clone());
                    after_value = false;
                }
                TokenKind::GroupEnd => {
                    self.close_group(tok)?;
                    after_value = true;
                }
                TokenKind::ZeroOrMore | TokenKind::OneOrMore | TokenKind::ZeroOrOne => {
                    if !after_value {
                        return Err(SyntaxError::new(
                            format!("missing operand for {}", tok.value),
                            tok.offset,
                        ));
                    }
                    self.operators.push(tok.clone());
                }
                TokenKind::Alternation => {
                    if self.in_group() {
                        let alt = TokenKind::Alternation.precedence();
                        self.reduce_while(|kind| kind.precedence() > alt)?;
                        self.operators.push(tok.clone());
                    } else {
                        // Top-level alternatives become rules of `lhs` itself.
                        self.emit_alternative(lhs, tok.offset)?;
                    }
                    after_value = false;
                }
                TokenKind::NonTerminal | TokenKind::Terminal => {
                    if after_value {
                        self.push_concat(tok.offset)?;
                    }
                    let sym = if tok.kind == TokenKind::NonTerminal {
                        Symbol::NonTerminal(self.names.intern(&tok.value))
                    } else {
                        Symbol::Terminal(tok.value.clone())
                    };
                    self.values.push(vec![sym]);
                    after_value = true;
                }
                TokenKind::Assign | TokenKind::Concat => {
                    return Err(SyntaxError::new(
                        format!("unexpected {:?} in right-hand side", tok.kind),
                        tok.offset,
                    ))
                }
            }
        }

        let end = rhs.last().map(|tok| tok.offset).unwrap_or_default();
        self.emit_alternative(lhs, end)
    }

    fn in_group(&self) -> bool {
        self.operators
            .iter()
            .any(|op| op.kind == TokenKind::GroupBegin)
    }

    /// Evaluate pending operators of at least concatenation strength, then
    /// push an implicit concatenation.
    fn push_concat(&mut self, offset: usize) -> Result<(), SyntaxError> {
        let concat = TokenKind::Concat.precedence();
        self.reduce_while(|kind| kind.precedence() >= concat)?;
        self.operators.push(Token::new(TokenKind::Concat, "", offset));
        Ok(())
    }

    /// Pop and apply operators from the top of the stack while `pred` holds.
    fn reduce_while<F>(&mut self, pred: F) -> Result<(), SyntaxError>
    where
        F: Fn(TokenKind) -> bool,
    {
        while let Some(top) = self.operators.last() {
            if !pred(top.kind) {
                break;
            }
            if let Some(op) = self.operators.pop() {
                self.apply(&op)?;
            }
        }
        Ok(())
    }

    fn close_group(&mut self, end: &Token) -> Result<(), SyntaxError> {
        loop {
            match self.operators.pop() {
                Some(op) if op.kind == TokenKind::GroupBegin => return Ok(()),
                Some(op) => self.apply(&op)?,
                None => return Err(SyntaxError::new("missing ( before )", end.offset)),
            }
        }
    }

    /// Drain the operator stack and emit the single remaining value as one
    /// alternative of `lhs`.
    fn emit_alternative(&mut self, lhs: NonTerminalId, offset: usize) -> Result<(), SyntaxError> {
        while let Some(op) = self.operators.pop() {
            if op.kind == TokenKind::GroupBegin {
                return Err(SyntaxError::new("missing )", op.offset));
            }
            self.apply(&op)?;
        }

        let rhs = match self.values.pop() {
            Some(rhs) => rhs,
            None => return Err(SyntaxError::new("missing operand", offset)),
        };
        if !self.values.is_empty() {
            return Err(SyntaxError::new("missing operator", offset));
        }
        self.emit(lhs, rhs);
        Ok(())
    }

    fn apply(&mut self, op: &Token) -> Result<(), SyntaxError> {
        let rhs = self.pop_value(op)?;
        let value = match op.kind {
            TokenKind::Concat => {
                let mut lhs = self.pop_value(op)?;
                lhs.extend(rhs);
                lhs
            }
            TokenKind::Alternation => {
                let lhs = self.pop_value(op)?;
                let res = self.synthesize(op);
                self.emit(res, rhs);
                self.emit(res, lhs);
                vec![Symbol::NonTerminal(res)]
            }
            TokenKind::ZeroOrMore => {
                let res = self.synthesize(op);
                let mut repeat = rhs;
                repeat.push(Symbol::NonTerminal(res));
                self.emit(res, repeat);
                self.emit(res, vec![Symbol::epsilon()]);
                vec![Symbol::NonTerminal(res)]
            }
            TokenKind::OneOrMore => {
                let res = self.synthesize(op);
                let mut repeat = rhs.clone();
                repeat.push(Symbol::NonTerminal(res));
                self.emit(res, repeat);
                self.emit(res, rhs);
                vec![Symbol::NonTerminal(res)]
            }
            TokenKind::ZeroOrOne => {
                let res = self.synthesize(op);
                self.emit(res, rhs);
                self.emit(res, vec![Symbol::epsilon()]);
                vec![Symbol::NonTerminal(res)]
            }
            _ => {
                return Err(SyntaxError::new(
                    format!("unexpected operator {:?}", op.kind),
                    op.offset,
                ))
            }
        };
        self.values.push(value);
        Ok(())
    }

    fn pop_value(&mut self, op: &Token) -> Result<Vec<Symbol>, SyntaxError> {
        self.values
            .pop()
            .ok_or_else(|| SyntaxError::new("missing operand", op.offset))
    }

    fn synthesize(&mut self, op: &Token) -> NonTerminalId {
        let id = self.names.fresh();
        log::debug!("synthesized non-terminal {} for {:?}", id, op.kind);
        id
    }

    fn emit(&mut self, lhs: NonTerminalId, rhs: Vec<Symbol>) {
        let rule = Production::new(lhs, rhs);
        log::trace!("emit {}", rule);
        self.rules.push(rule);
    }
}

/// Split off the leading rule of `tokens`, returning its left-hand side, its
/// right-hand side and the tokens of the following rules.
///
/// A rule runs until the end of input or until the non-terminal that
/// introduces the next assignment.
fn split_rule(tokens: &[Token]) -> Result<(&Token, &[Token], &[Token]), SyntaxError> {
    let lhs = &tokens[0];
    if lhs.kind != TokenKind::NonTerminal {
        return Err(SyntaxError::new(
            "a rule must begin with a non-terminal",
            lhs.offset,
        ));
    }
    let assign = match tokens.get(1) {
        Some(tok) if tok.kind == TokenKind::Assign => tok,
        Some(tok) => {
            return Err(SyntaxError::new(
                format!("missing assignment operator after <{}>", lhs.value),
                tok.offset,
            ))
        }
        None => {
            return Err(SyntaxError::new(
                "too few tokens to form a rule",
                lhs.offset,
            ))
        }
    };
    if tokens.len() < 3 {
        return Err(SyntaxError::new(
            "too few tokens to form a rule",
            assign.offset,
        ));
    }

    let next_assign = tokens[2..]
        .iter()
        .position(|tok| tok.kind == TokenKind::Assign)
        .map(|idx| idx + 2);

    match next_assign {
        None => Ok((lhs, &tokens[2..], &tokens[tokens.len()..])),
        Some(idx) => {
            let cut = idx - 1;
            if cut <= 2 {
                return Err(SyntaxError::new(
                    format!("empty right-hand side for <{}>", lhs.value),
                    assign.offset,
                ));
            }
            if tokens[cut].kind != TokenKind::NonTerminal {
                return Err(SyntaxError::new(
                    "expected a non-terminal before assignment operator",
                    tokens[cut].offset,
                ));
            }
            Ok((lhs, &tokens[2..cut], &tokens[cut..]))
        }
    }
}
