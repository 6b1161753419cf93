use super::*;
use super::expr::Precedence;

impl Parser {
    /// A pattern, as found in `let` bindings, lambda parameters, and match
    /// cases. Identifiers are taken bare (no postfix forms bind), so a
    /// parameter list like `|f|` never mistakes its closing bar for a
    /// trailing lambda.
    pub(super) fn parse_pattern(&mut self) -> Result<Expression, ParseError> {
        match self.current().kind.clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expression::Identifier(name))
            }
            TokenKind::Underscore => {
                self.advance();
                Ok(Expression::Placeholder)
            }
            TokenKind::DotDot => {
                self.advance();
                let name = self.expect_ident("Expected identifier after '..' in pattern")?;
                Ok(Expression::RestIdentifier(name))
            }
            TokenKind::LBracket => self.parse_list_pattern(),
            TokenKind::HashBrace => self.parse_dictionary_pattern(),
            // Literals, ranges and other value patterns.
            _ => self.parse_expression(Precedence::Lowest),
        }
    }

    fn parse_list_pattern(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::LBracket)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBracket) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            elements.push(self.parse_pattern()?);
        }

        self.expect_exact(&TokenKind::RBracket)?;
        Ok(Expression::ListPattern(elements))
    }

    fn parse_dictionary_pattern(&mut self) -> Result<Expression, ParseError> {
        self.expect_exact(&TokenKind::HashBrace)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }

            match self.current().kind.clone() {
                TokenKind::DotDot => {
                    self.advance();
                    let name = self.expect_ident("Expected identifier after '..' in pattern")?;
                    elements.push(Expression::RestIdentifier(name));
                }
                // Bare identifier: the shorthand form `#{name}`.
                TokenKind::Ident(name)
                    if !matches!(self.peek(1).kind, TokenKind::Colon) =>
                {
                    self.advance();
                    elements.push(Expression::Identifier(name));
                }
                TokenKind::Ident(name) => {
                    self.advance();
                    self.expect_exact(&TokenKind::Colon)?;
                    let value = self.parse_pattern()?;
                    elements.push(Expression::DictionaryEntryPattern {
                        key: Box::new(Expression::Identifier(name)),
                        value: Box::new(value),
                    });
                }
                TokenKind::Str(key) => {
                    self.advance();
                    self.expect_exact(&TokenKind::Colon)?;
                    let value = self.parse_pattern()?;
                    elements.push(Expression::DictionaryEntryPattern {
                        key: Box::new(Expression::Str(key)),
                        value: Box::new(value),
                    });
                }
                other => {
                    return Err(self.error(format!(
                        "Unexpected token in dictionary pattern: {:?}",
                        other
                    )))
                }
            }
        }

        self.expect_exact(&TokenKind::RBrace)?;
        Ok(Expression::DictionaryPattern(elements))
    }
}
