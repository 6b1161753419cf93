use super::expr::Precedence;
use super::*;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    pub(super) fn error(&self, msg: impl Into<String>) -> ParseError {
        let tok = self.current();
        ParseError::Error {
            msg: msg.into(),
            line: tok.line,
            col: tok.col,
        }
    }

    pub(super) fn current(&self) -> &Token {
        if self.pos < self.tokens.len() {
            &self.tokens[self.pos]
        } else {
            self.tokens.last().unwrap()
        }
    }

    pub(super) fn peek(&self, offset: usize) -> &Token {
        let idx = self.pos + offset;
        if idx < self.tokens.len() {
            &self.tokens[idx]
        } else {
            self.tokens.last().unwrap()
        }
    }

    pub(super) fn advance(&mut self) -> &Token {
        let tok = if self.pos < self.tokens.len() {
            &self.tokens[self.pos]
        } else {
            self.tokens.last().unwrap()
        };
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    /// Whether the current token sits on the same source line as the
    /// previously consumed token. Postfix forms (call, index, trailing
    /// lambda) only bind on the same line.
    pub(super) fn same_line(&self) -> bool {
        if self.pos == 0 {
            return true;
        }
        self.current().line == self.tokens[self.pos - 1].line
    }

    pub(super) fn expect_exact(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if &self.current().kind == kind {
            Ok(self.advance().clone())
        } else {
            Err(self.error(format!(
                "Expected {:?}, found {:?}",
                kind,
                self.current().kind
            )))
        }
    }

    pub(super) fn expect_ident(&mut self, msg: &str) -> Result<String, ParseError> {
        match self.current().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("{}: found {:?}", msg, other))),
        }
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut program = Vec::new();

        while !self.is_eof() {
            if self.check(&TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            program.push(self.parse_statement()?);
        }

        Ok(program)
    }

    pub(super) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let preceded_by_blank_line = self.current().preceded_by_blank_line;
        let kind = self.parse_statement_kind()?;

        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        let trailing_comment = self.take_trailing_comment();

        Ok(Statement {
            kind,
            preceded_by_blank_line,
            trailing_comment,
        })
    }

    fn parse_statement_kind(&mut self) -> Result<StatementKind, ParseError> {
        match self.current().kind.clone() {
            TokenKind::Comment(text) => {
                self.advance();
                Ok(StatementKind::Comment(text))
            }
            TokenKind::Return => {
                self.advance();
                Ok(StatementKind::Return(
                    self.parse_expression(Precedence::Lowest)?,
                ))
            }
            TokenKind::Break => {
                self.advance();
                Ok(StatementKind::Break(
                    self.parse_expression(Precedence::Lowest)?,
                ))
            }
            TokenKind::At => self.parse_section(),
            TokenKind::Ident(_) if matches!(self.peek(1).kind, TokenKind::Colon) => {
                self.parse_section()
            }
            _ => {
                let expr = self.parse_expression(Precedence::Lowest)?;
                let expr = if self.check(&TokenKind::Assign) {
                    self.advance();
                    let value = self.parse_expression(Precedence::Lowest)?;
                    Expression::Assign {
                        target: Box::new(expr),
                        value: Box::new(value),
                    }
                } else {
                    expr
                };
                Ok(StatementKind::Expression(expr))
            }
        }
    }

    /// A section: optional `@attribute` lines, then `name:` followed by a
    /// braced block or a single expression.
    fn parse_section(&mut self) -> Result<StatementKind, ParseError> {
        let mut attributes = Vec::new();
        while self.check(&TokenKind::At) {
            self.advance();
            attributes.push(self.expect_ident("Expected attribute name after '@'")?);
        }

        let name = self.expect_ident("Expected section name")?;
        self.expect_exact(&TokenKind::Colon)?;

        let body = if self.check(&TokenKind::LBrace) {
            self.parse_block()?
        } else {
            let expr = self.parse_expression(Precedence::Lowest)?;
            vec![Statement::new(StatementKind::Expression(expr))]
        };

        Ok(StatementKind::Section {
            name,
            attributes,
            body,
        })
    }

    /// `{ ... }` as a list of statements.
    pub(super) fn parse_block(&mut self) -> Result<Program, ParseError> {
        self.expect_exact(&TokenKind::LBrace)?;
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        self.expect_exact(&TokenKind::RBrace)?;
        Ok(statements)
    }

    pub(super) fn parse_braced_block(&mut self) -> Result<Statement, ParseError> {
        Ok(Statement::new(StatementKind::Block(self.parse_block()?)))
    }

    pub(super) fn take_trailing_comment(&mut self) -> Option<String> {
        if let TokenKind::Comment(text) = self.current().kind.clone() {
            if self.same_line() {
                self.advance();
                return Some(text);
            }
        }
        None
    }
}
