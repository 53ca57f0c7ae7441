use jl_core::{JlError, Span, Value};

use crate::lexer::{Lexer, SpannedToken, Token};

/// List nesting bound; parsing is recursive, so pathological inputs must
/// fail instead of exhausting the native stack.
const MAX_NESTING: usize = 512;

/// Recursive-descent reader over a streaming lexer.
struct Reader<'a> {
    lexer: Lexer<'a>,
    peeked: Option<SpannedToken>,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Reader {
            lexer: Lexer::new(src),
            peeked: None,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, JlError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|t| &t.token))
    }

    fn next(&mut self) -> Result<Option<SpannedToken>, JlError> {
        if let Some(t) = self.peeked.take() {
            return Ok(Some(t));
        }
        self.lexer.next_token()
    }

    /// Byte offset just past the last consumed token. Only meaningful when
    /// no token is buffered, which holds after a complete expression.
    fn offset(&self) -> usize {
        self.lexer.offset()
    }

    fn parse_expr(&mut self) -> Result<Value, JlError> {
        let at = self.lexer.span();
        let Some(tok) = self.next()? else {
            return Err(JlError::parse("unexpected end of input", at));
        };
        match tok.token {
            Token::LParen => self.parse_list(tok.span),
            Token::RParen => Err(JlError::parse("unexpected `)`", tok.span)),
            Token::Number(n) => Ok(Value::Number(n)),
            Token::String(s) => Ok(Value::string(s)),
            Token::Symbol(s) => Ok(Value::symbol(s)),
        }
    }

    fn parse_list(&mut self, open: Span) -> Result<Value, JlError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(JlError::parse("list nesting too deep", open));
        }
        let mut items = Vec::new();
        loop {
            match self.peek()? {
                None => return Err(JlError::parse("unterminated list", open)),
                Some(Token::RParen) => {
                    self.next()?;
                    self.depth -= 1;
                    return Ok(Value::list(items));
                }
                Some(_) => items.push(self.parse_expr()?),
            }
        }
    }
}

/// Read a single expression from `src`.
///
/// Returns the expression and the unconsumed remainder of the input, or
/// `None` when only whitespace and comments remain. The remainder starts
/// immediately after the expression, so a caller can drain a buffer by
/// looping until `None`.
pub fn read_expr(src: &str) -> Result<Option<(Value, &str)>, JlError> {
    let mut reader = Reader::new(src);
    if reader.peek()?.is_none() {
        return Ok(None);
    }
    let value = reader.parse_expr()?;
    Ok(Some((value, &src[reader.offset()..])))
}

/// Read exactly one expression; trailing input is ignored.
pub fn read(src: &str) -> Result<Value, JlError> {
    match read_expr(src)? {
        Some((value, _)) => Ok(value),
        None => Err(JlError::parse(
            "unexpected end of input",
            Span::point(1, 1),
        )),
    }
}

/// Read every expression in `src`.
pub fn read_many(src: &str) -> Result<Vec<Value>, JlError> {
    let mut reader = Reader::new(src);
    let mut values = Vec::new();
    while reader.peek()?.is_some() {
        values.push(reader.parse_expr()?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_atoms() {
        assert_eq!(read("42").unwrap(), Value::number(42.0));
        assert_eq!(read("-1.5").unwrap(), Value::number(-1.5));
        assert_eq!(read("\"hi\"").unwrap(), Value::string("hi"));
        assert_eq!(read("foo").unwrap(), Value::symbol("foo"));
        assert_eq!(read("+").unwrap(), Value::symbol("+"));
    }

    #[test]
    fn test_read_list() {
        let v = read("(+ 1 2)").unwrap();
        assert_eq!(
            v,
            Value::list(vec![
                Value::symbol("+"),
                Value::number(1.0),
                Value::number(2.0),
            ])
        );
    }

    #[test]
    fn test_read_nested_list() {
        let v = read("(a (b (c)) d)").unwrap();
        assert_eq!(
            v,
            Value::list(vec![
                Value::symbol("a"),
                Value::list(vec![
                    Value::symbol("b"),
                    Value::list(vec![Value::symbol("c")]),
                ]),
                Value::symbol("d"),
            ])
        );
    }

    #[test]
    fn test_read_empty_list() {
        assert_eq!(read("()").unwrap(), Value::list(vec![]));
        assert_eq!(read("( )").unwrap(), Value::list(vec![]));
    }

    #[test]
    fn test_read_expr_advances_cursor() {
        let (v, rest) = read_expr("(+ 1 2) (* 3 4)").unwrap().unwrap();
        assert_eq!(format!("{v}"), "(+ 1 2)");
        assert_eq!(rest, " (* 3 4)");

        let (v, rest) = read_expr(rest).unwrap().unwrap();
        assert_eq!(format!("{v}"), "(* 3 4)");
        assert_eq!(read_expr(rest).unwrap(), None);
    }

    #[test]
    fn test_read_expr_empty_input() {
        assert_eq!(read_expr("").unwrap(), None);
        assert_eq!(read_expr("   ; just a comment").unwrap(), None);
    }

    #[test]
    fn test_read_many() {
        let values = read_many("1 2 (3 4)").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], read("(3 4)").unwrap());
    }

    #[test]
    fn test_comments_between_expressions() {
        let values = read_many("1 ; one\n(list ; a list\n 2)").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(format!("{}", values[1]), "(list 2)");
    }

    #[test]
    fn test_unterminated_list() {
        let err = read("(1 2").unwrap_err();
        assert!(matches!(err, JlError::Parse { .. }));
        assert!(format!("{err}").contains("unterminated list"));
    }

    #[test]
    fn test_stray_close_paren() {
        let err = read(")").unwrap_err();
        assert!(format!("{err}").contains("unexpected `)`"));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = read("\n  \"oops").unwrap_err();
        match err {
            JlError::Parse { span, .. } => assert_eq!(span, Span::point(2, 3)),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(600), ")".repeat(600));
        let err = read(&deep).unwrap_err();
        assert!(format!("{err}").contains("nesting too deep"));
        // Within the limit, deep nesting parses fine.
        let ok = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(read(&ok).is_ok());
    }

    #[test]
    fn test_round_trip_display() {
        for src in ["42", "-1.5", "\"a\\nb\"", "foo", "(+ 1 (* 2 3))", "()"] {
            let v = read(src).unwrap();
            let printed = format!("{v}");
            assert_eq!(read(&printed).unwrap(), v, "round-trip of {src}");
        }
    }
}
