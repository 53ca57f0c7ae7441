use jl_core::{JlError, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    Number(f64),
    String(String),
    Symbol(String),
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// A streaming tokenizer over a source buffer.
///
/// Tokens are produced on demand and the lexer tracks its byte offset, so
/// the reader can hand back the unconsumed remainder of the input after a
/// single expression. Whitespace and `;` line comments are skipped
/// silently.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Byte offset of the unconsumed input.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Current source position.
    pub fn span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                ';' => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>, JlError> {
        self.skip_trivia();
        let span = self.span();
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };
        let token = match c {
            '(' => {
                self.bump();
                Token::LParen
            }
            ')' => {
                self.bump();
                Token::RParen
            }
            '"' => {
                self.bump();
                Token::String(self.lex_string(span)?)
            }
            _ => self.lex_atom(span)?,
        };
        Ok(Some(SpannedToken { token, span }))
    }

    fn lex_string(&mut self, open: Span) -> Result<String, JlError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(JlError::parse("unterminated string", open)),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(JlError::parse("unterminated string", open)),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    // Other escaped characters pass through literally.
                    Some(other) => out.push(other),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn lex_atom(&mut self, span: Span) -> Result<Token, JlError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if is_delimiter(c) {
                break;
            }
            self.bump();
        }
        let text = &self.src[start..self.pos];
        if is_number_token(text) {
            let n: f64 = text.parse().map_err(|_| {
                JlError::parse(format!("malformed number: {text}"), span)
            })?;
            Ok(Token::Number(n))
        } else {
            Ok(Token::Symbol(text.to_string()))
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';')
}

/// Classify a scanned token against the number grammar:
/// `['-'|'+'] (digit+ ('.' digit*)? | '.' digit+)`. Everything else is a
/// variable, including bare signs and exponent forms like `1e5`.
fn is_number_token(token: &str) -> bool {
    let rest = token
        .strip_prefix(['-', '+'])
        .unwrap_or(token);
    if rest.is_empty() {
        return false;
    }
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(frac) => {
            (!int_part.is_empty() || !frac.is_empty())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => !int_part.is_empty(),
    }
}
