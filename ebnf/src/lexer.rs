use nom::{
    bytes::complete::{take_till, take_while},
    character::complete::{alphanumeric0, char},
    combinator::recognize,
    multi::many0_count,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

type Scan<'a, T> = IResult<&'a str, T>;

/// Split grammar text into tokens.
///
/// With `long` unset, a quoted literal of several characters becomes one
/// terminal per character. With `long` set (or for the empty literal `""`),
/// the literal is kept whole.
pub fn lex(src: &str, long: bool) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        src,
        long,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    src: &'a str,
    long: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Byte offset of `rest` within the full source.
    fn offset(&self, rest: &str) -> usize {
        self.src.len() - rest.len()
    }

    fn push<S: Into<String>>(&mut self, kind: TokenKind, value: S, offset: usize) {
        let token = Token::new(kind, value, offset);
        log::trace!("lexed {}", token);
        self.tokens.push(token);
    }

    fn run(&mut self) -> Result<(), SyntaxError> {
        let mut rest = self.src;
        loop {
            rest = skip_whitespace(rest);
            let c = match rest.chars().next() {
                Some(c) => c,
                None => return Ok(()),
            };
            let offset = self.offset(rest);

            rest = match c {
                '"' | '\'' => self.quoted(rest, c)?,
                '<' => self.non_terminal(rest)?,
                '%' => self.numeric(rest)?,
                ':' | '=' => self.assign(rest)?,
                ']' => {
                    // `[x]` is shorthand for `(x)?`.
                    self.push(TokenKind::GroupEnd, "]", offset);
                    self.push(TokenKind::ZeroOrOne, "]", offset);
                    &rest[1..]
                }
                _ => {
                    let kind = operator(c).ok_or_else(|| {
                        SyntaxError::new(format!("unexpected character {:?}", c), offset)
                    })?;
                    self.push(kind, c.to_string(), offset);
                    &rest[c.len_utf8()..]
                }
            };
        }
    }

    fn quoted(&mut self, input: &'a str, quote: char) -> Result<&'a str, SyntaxError> {
        let start = self.offset(input);
        let body: Scan<&str> = preceded(char(quote), take_till(|c: char| c == quote))(input);
        let (rest, text) =
            body.map_err(|_| SyntaxError::new("expected a quoted literal", start))?;

        let closing: Scan<char> = char(quote)(rest);
        let rest = match closing {
            Ok((rest, _)) => rest,
            Err(_) => {
                return Err(SyntaxError::new(
                    format!("unterminated literal, missing closing {}", quote),
                    start,
                ))
            }
        };

        if text.is_empty() || self.long {
            self.push(TokenKind::Terminal, text, start);
        } else {
            let body_start = start + quote.len_utf8();
            for (idx, c) in text.char_indices() {
                self.push(TokenKind::Terminal, c.to_string(), body_start + idx);
            }
        }
        Ok(rest)
    }

    fn non_terminal(&mut self, input: &'a str) -> Result<&'a str, SyntaxError> {
        let start = self.offset(input);
        let name: Scan<&str> = preceded(char('<'), take_while(is_name_char))(input);
        let (rest, name) =
            name.map_err(|_| SyntaxError::new("expected a non-terminal", start))?;

        let offset = self.offset(rest);
        match rest.chars().next() {
            Some('>') if name.is_empty() => Err(SyntaxError::new(
                "non-terminal name cannot be empty",
                offset,
            )),
            Some('>') => {
                self.push(TokenKind::NonTerminal, name, start);
                Ok(&rest[1..])
            }
            Some(c) => Err(SyntaxError::new(
                format!("invalid character {:?} in non-terminal name", c),
                offset,
            )),
            None => Err(SyntaxError::new(
                "unterminated non-terminal, missing >",
                start,
            )),
        }
    }

    fn numeric(&mut self, input: &'a str) -> Result<&'a str, SyntaxError> {
        let start = self.offset(input);
        let escape: Scan<&str> = preceded(char('%'), alphanumeric0)(input);
        let (rest, text) =
            escape.map_err(|_| SyntaxError::new("expected a numeric escape", start))?;

        let code = numeral(text).map_err(|msg| SyntaxError::new(msg, start))?;
        let c = std::char::from_u32(code).ok_or_else(|| {
            SyntaxError::new(format!("%{} is not a valid character code", text), start)
        })?;
        self.push(TokenKind::Terminal, c.to_string(), start);
        Ok(rest)
    }

    fn assign(&mut self, input: &'a str) -> Result<&'a str, SyntaxError> {
        let start = self.offset(input);
        let op: Scan<&str> = recognize(pair(many0_count(char(':')), char('=')))(input);
        let (rest, op) = op.map_err(|_| {
            SyntaxError::new("expected = to complete the assignment operator", start)
        })?;
        self.push(TokenKind::Assign, op, start);
        Ok(rest)
    }
}

fn skip_whitespace(input: &str) -> &str {
    let ws: Scan<&str> = take_while(char::is_whitespace)(input);
    match ws {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == ' '
}

fn operator(c: char) -> Option<TokenKind> {
    match c {
        '|' => Some(TokenKind::Alternation),
        '*' => Some(TokenKind::ZeroOrMore),
        '+' => Some(TokenKind::OneOrMore),
        '?' => Some(TokenKind::ZeroOrOne),
        '(' | '[' => Some(TokenKind::GroupBegin),
        ')' => Some(TokenKind::GroupEnd),
        _ => None,
    }
}

/// Parse the body of a `%` escape: an optional base prefix (`x`, `d`, `b`)
/// followed by digits in that base. A leading digit means decimal.
fn numeral(text: &str) -> Result<u32, String> {
    let (radix, digits) = match text.chars().next() {
        None => return Err("missing numeral after %".to_owned()),
        Some('x') => (16, &text[1..]),
        Some('d') => (10, &text[1..]),
        Some('b') => (2, &text[1..]),
        Some(c) if c.is_ascii_digit() => (10, text),
        Some(c) => {
            return Err(format!(
                "unknown base specifier {:?} for numeric escape",
                c
            ))
        }
    };
    u32::from_str_radix(digits, radix)
        .map_err(|_| format!("invalid base-{} numeral {:?}", radix, digits))
}
