use super::*;

/// Binding powers, weakest to strongest. Mirrors the printed precedence
/// ladder so re-formatted parentheses round-trip.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub(super) enum Precedence {
    Lowest,
    AndOr,
    Equals,
    LessGreater,
    Composition,
    Sum,
    Product,
    Prefix,
}

fn token_precedence(kind: &TokenKind) -> Option<Precedence> {
    match kind {
        TokenKind::AmpAmp | TokenKind::PipePipe => Some(Precedence::AndOr),
        TokenKind::Eq | TokenKind::NotEq => Some(Precedence::Equals),
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
            Some(Precedence::LessGreater)
        }
        TokenKind::PipeGt | TokenKind::GtGt | TokenKind::DotDot | TokenKind::DotDotEq => {
            Some(Precedence::Composition)
        }
        TokenKind::Plus | TokenKind::Minus => Some(Precedence::Sum),
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent | TokenKind::Backtick => {
            Some(Precedence::Product)
        }
        _ => None,
    }
}

fn infix_op(kind: &TokenKind) -> Option<InfixOp> {
    match kind {
        TokenKind::Plus => Some(InfixOp::Add),
        TokenKind::Minus => Some(InfixOp::Sub),
        TokenKind::Asterisk => Some(InfixOp::Mul),
        TokenKind::Slash => Some(InfixOp::Div),
        TokenKind::Percent => Some(InfixOp::Mod),
        TokenKind::Eq => Some(InfixOp::Eq),
        TokenKind::NotEq => Some(InfixOp::NotEq),
        TokenKind::Lt => Some(InfixOp::Lt),
        TokenKind::LtEq => Some(InfixOp::LtEq),
        TokenKind::Gt => Some(InfixOp::Gt),
        TokenKind::GtEq => Some(InfixOp::GtEq),
        TokenKind::AmpAmp => Some(InfixOp::And),
        TokenKind::PipePipe => Some(InfixOp::Or),
        _ => None,
    }
}

/// Operator tokens that can stand alone as a value: `reduce(+)`.
fn operator_ref_symbol(kind: &TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Plus => Some("+"),
        TokenKind::Minus => Some("-"),
        TokenKind::Asterisk => Some("*"),
        TokenKind::Slash => Some("/"),
        TokenKind::Percent => Some("%"),
        TokenKind::Eq => Some("=="),
        TokenKind::NotEq => Some("!="),
        TokenKind::Lt => Some("<"),
        TokenKind::LtEq => Some("<="),
        TokenKind::Gt => Some(">"),
        TokenKind::GtEq => Some(">="),
        _ => None,
    }
}

impl Parser {
    pub(super) fn parse_expression(
        &mut self,
        precedence: Precedence,
    ) -> Result<Expression, ParseError> {
        let mut left = self.parse_prefix()?;

        loop {
            // Postfix forms bind tightest and only attach on the same line,
            // so a statement starting with `(`, `[` or `|` on the next line
            // is not absorbed into the previous expression.
            if self.check(&TokenKind::LParen) && self.same_line() {
                left = self.parse_call(left)?;
                continue;
            }
            if self.check(&TokenKind::LBracket) && self.same_line() {
                left = self.parse_index(left)?;
                continue;
            }
            if self.check(&TokenKind::Bar) && self.same_line() {
                left = self.parse_trailing_lambda(left)?;
                continue;
            }

            match token_precedence(&self.current().kind) {
                Some(p) if precedence < p => {
                    left = self.parse_infix(left, p)?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        // Operator refs are operators in value position: `reduce(+)`.
        if let Some(symbol) = operator_ref_symbol(&self.current().kind) {
            if matches!(self.peek(1).kind, TokenKind::Comma | TokenKind::RParen) {
                self.advance();
                return Ok(Expression::OperatorRef(symbol.to_string()));
            }
        }

        match self.current().kind.clone() {
            TokenKind::Integer(raw) => {
                self.advance();
                Ok(Expression::Integer(raw))
            }
            TokenKind::Decimal(raw) => {
                self.advance();
                Ok(Expression::Decimal(raw))
            }
            TokenKind::Str(content) => {
                self.advance();
                Ok(Expression::Str(content))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(Expression::Boolean(b))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expression::Nil)
            }
            TokenKind::Underscore => {
                self.advance();
                Ok(Expression::Placeholder)
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expression::Identifier(name))
            }
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Bang => {
                self.advance();
                let right = self.parse_expression(Precedence::Prefix)?;
                Ok(Expression::Prefix {
                    operator: PrefixOp::Not,
                    right: Box::new(right),
                })
            }
            TokenKind::Minus => {
                self.advance();
                let right = self.parse_expression(Precedence::Prefix)?;
                Ok(Expression::Prefix {
                    operator: PrefixOp::Neg,
                    right: Box::new(right),
                })
            }
            TokenKind::DotDot => {
                self.advance();
                let right = self.parse_expression(Precedence::Prefix)?;
                Ok(Expression::Spread(Box::new(right)))
            }
            TokenKind::Bar | TokenKind::PipePipe => self.parse_function(),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression(Precedence::Lowest)?;
                self.expect_exact(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_set(),
            TokenKind::HashBrace => self.parse_dictionary(),
            other => Err(self.error(format!("Unexpected token in expression: {:?}", other))),
        }
    }

    fn parse_infix(
        &mut self,
        left: Expression,
        precedence: Precedence,
    ) -> Result<Expression, ParseError> {
        match self.current().kind.clone() {
            TokenKind::PipeGt => {
                let mut functions = Vec::new();
                while self.check(&TokenKind::PipeGt) {
                    self.advance();
                    functions.push(self.parse_expression(Precedence::Composition)?);
                }
                Ok(Expression::FunctionThread {
                    initial: Box::new(left),
                    functions,
                })
            }
            TokenKind::GtGt => {
                let mut functions = vec![left];
                while self.check(&TokenKind::GtGt) {
                    self.advance();
                    functions.push(self.parse_expression(Precedence::Composition)?);
                }
                Ok(Expression::FunctionComposition(functions))
            }
            TokenKind::DotDot => {
                self.advance();
                if self.can_start_expression() && self.same_line() {
                    let to = self.parse_expression(Precedence::Composition)?;
                    Ok(Expression::ExclusiveRange {
                        from: Box::new(left),
                        to: Box::new(to),
                    })
                } else {
                    Ok(Expression::UnboundedRange {
                        from: Box::new(left),
                    })
                }
            }
            TokenKind::DotDotEq => {
                self.advance();
                let to = self.parse_expression(Precedence::Composition)?;
                Ok(Expression::InclusiveRange {
                    from: Box::new(left),
                    to: Box::new(to),
                })
            }
            TokenKind::Backtick => {
                self.advance();
                let name = self.expect_ident("Expected function name between backticks")?;
                self.expect_exact(&TokenKind::Backtick)?;
                let right = self.parse_expression(Precedence::Product)?;
                Ok(Expression::Infix {
                    left: Box::new(left),
                    operator: InfixOp::Call(name),
                    right: Box::new(right),
                })
            }
            kind => {
                let operator = infix_op(&kind)
                    .ok_or_else(|| self.error(format!("Unknown infix operator: {:?}", kind)))?;
                self.advance();
                let right = self.parse_expression(precedence)?;
                Ok(Expression::Infix {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                })
            }
        }
    }

    fn can_start_expression(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Integer(_)
                | TokenKind::Decimal(_)
                | TokenKind::Str(_)
                | TokenKind::Bool(_)
                | TokenKind::Nil
                | TokenKind::Ident(_)
                | TokenKind::Underscore
                | TokenKind::Let
                | TokenKind::If
                | TokenKind::Match
                | TokenKind::Bang
                | TokenKind::Minus
                | TokenKind::Bar
                | TokenKind::PipePipe
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::HashBrace
        )
    }

    fn parse_let(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::Let)?;
        let mutable = if self.check(&TokenKind::Mut) {
            self.advance();
            true
        } else {
            false
        };
        let pattern = self.parse_pattern()?;
        self.expect_exact(&TokenKind::Assign)?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Expression::Let {
            pattern: Box::new(pattern),
            value: Box::new(value),
            mutable,
        })
    }

    fn parse_if(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::If)?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        let consequence = self.parse_braced_block()?;
        let alternative = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_braced_block()?))
        } else {
            None
        };
        Ok(Expression::If {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative,
        })
    }

    fn parse_match(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::Match)?;
        let subject = self.parse_expression(Precedence::Lowest)?;
        self.expect_exact(&TokenKind::LBrace)?;

        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if matches!(self.current().kind, TokenKind::Comment(_)) {
                return Err(self.error(
                    "Comments inside a match must trail a case on the same line",
                ));
            }
            let pattern = self.parse_pattern()?;
            let guard = if self.check(&TokenKind::If) {
                self.advance();
                Some(self.parse_expression(Precedence::Lowest)?)
            } else {
                None
            };
            let body = self.parse_braced_block()?;
            let trailing_comment = self.take_trailing_comment();
            cases.push(MatchCase {
                pattern,
                guard,
                body: Box::new(body),
                trailing_comment,
            });
        }

        self.expect_exact(&TokenKind::RBrace)?;
        Ok(Expression::Match {
            subject: Box::new(subject),
            cases,
        })
    }

    /// A lambda: `|a, b| body` or `|| body`. A single-expression body is
    /// wrapped in a one-statement block so every function body is a `Block`.
    pub(super) fn parse_function(&mut self) -> Result<Expression, ParseError> {
        let mut parameters = Vec::new();

        if self.check(&TokenKind::PipePipe) {
            self.advance();
        } else {
            self.expect_exact(&TokenKind::Bar)?;
            while !self.check(&TokenKind::Bar) && !self.is_eof() {
                if self.check(&TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                parameters.push(self.parse_pattern()?);
            }
            self.expect_exact(&TokenKind::Bar)?;
        }

        let body = if self.check(&TokenKind::LBrace) {
            self.parse_braced_block()?
        } else {
            let expr = self.parse_expression(Precedence::Lowest)?;
            Statement::new(StatementKind::Block(vec![Statement::new(
                StatementKind::Expression(expr),
            )]))
        };

        Ok(Expression::Function {
            parameters,
            body: Box::new(body),
        })
    }

    fn parse_call(&mut self, function: Expression) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::LParen)?;
        let mut arguments = Vec::new();

        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_exact(&TokenKind::RParen)?;
        Ok(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index(&mut self, left: Expression) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::LBracket)?;
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_exact(&TokenKind::RBracket)?;
        Ok(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    /// `f(a) |x| body` and bare `f |x| body` both normalize to a call with
    /// the lambda appended as last argument.
    fn parse_trailing_lambda(&mut self, left: Expression) -> Result<Expression, ParseError> {
        let lambda = self.parse_function()?;
        Ok(match left {
            Expression::Call {
                function,
                mut arguments,
            } => {
                arguments.push(lambda);
                Expression::Call {
                    function,
                    arguments,
                }
            }
            other => Expression::Call {
                function: Box::new(other),
                arguments: vec![lambda],
            },
        })
    }

    fn parse_list(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::LBracket)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBracket) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            elements.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_exact(&TokenKind::RBracket)?;
        Ok(Expression::List(elements))
    }

    fn parse_set(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::LBrace)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            elements.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_exact(&TokenKind::RBrace)?;
        Ok(Expression::Set(elements))
    }

    fn parse_dictionary(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::HashBrace)?;
        let mut entries = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }

            // Shorthand `#{ident}` becomes `#{"ident": ident}` here, so the
            // builder always sees the canonical entry form.
            if let TokenKind::Ident(name) = self.current().kind.clone() {
                if matches!(self.peek(1).kind, TokenKind::Comma | TokenKind::RBrace) {
                    self.advance();
                    entries.push((
                        Expression::Str(name.clone()),
                        Expression::Identifier(name),
                    ));
                    continue;
                }
            }

            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_exact(&TokenKind::Colon)?;
            let value = self.parse_expression(Precedence::Lowest)?;
            entries.push((key, value));
        }

        self.expect_exact(&TokenKind::RBrace)?;
        Ok(Expression::Dictionary(entries))
    }
}
