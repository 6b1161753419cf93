use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Integer(String),
    Decimal(String),
    Str(String),
    Bool(bool),
    Nil,
    // Identifiers
    Ident(String),
    // Comments are tokens: the formatter has to carry them through
    Comment(String),
    // Keywords
    Let,
    Mut,
    If,
    Else,
    Match,
    Return,
    Break,
    // Operators
    Assign,    // =
    Eq,        // ==
    NotEq,     // !=
    Lt,        // <
    LtEq,      // <=
    Gt,        // >
    GtEq,      // >=
    Plus,      // +
    Minus,     // -
    Asterisk,  // *
    Slash,     // /
    Percent,   // %
    Bang,      // !
    AmpAmp,    // &&
    PipePipe,  // ||
    PipeGt,    // |>
    GtGt,      // >>
    DotDot,    // ..
    DotDotEq,  // ..=
    Bar,       // |
    Backtick,  // `
    At,        // @
    Underscore,
    // Punctuation
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    HashBrace, // #{
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte span in the source.
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
    /// Set when two or more newlines were skipped immediately before this token.
    pub preceded_by_blank_line: bool,
}

#[derive(Debug, Error)]
pub enum LexerError {
    #[error("error[{line}:{col}]: {msg}")]
    Error {
        msg: String,
        line: usize,
        col: usize,
    },
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "let" => Some(TokenKind::Let),
        "mut" => Some(TokenKind::Mut),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "match" => Some(TokenKind::Match),
        "return" => Some(TokenKind::Return),
        "break" => Some(TokenKind::Break),
        "true" => Some(TokenKind::Bool(true)),
        "false" => Some(TokenKind::Bool(false)),
        "nil" => Some(TokenKind::Nil),
        _ => None,
    }
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    byte_pos: usize,
    line: usize,
    col: usize,
    newlines_skipped: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            byte_pos: 0,
            line: 1,
            col: 1,
            newlines_skipped: 0,
        }
    }

    fn error(&self, msg: impl Into<String>) -> LexerError {
        LexerError::Error {
            msg: msg.into(),
            line: self.line,
            col: self.col,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        self.byte_pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.pos >= self.chars.len() {
                break;
            }
            let tok = self.scan_token()?;
            tokens.push(tok);
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            start: self.byte_pos,
            end: self.byte_pos,
            line: self.line,
            col: self.col,
            preceded_by_blank_line: false,
        });

        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.newlines_skipped += 1;
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexerError> {
        let start = self.byte_pos;
        let line = self.line;
        let col = self.col;
        let preceded_by_blank_line = self.newlines_skipped >= 2;
        self.newlines_skipped = 0;

        let ch = match self.current() {
            Some(c) => c,
            None => unreachable!("scan_token called at end of input"),
        };

        let kind = if ch == '/' && self.peek(1) == Some('/') {
            self.scan_comment()
        } else if ch == '"' {
            self.scan_string()?
        } else if ch.is_ascii_digit() {
            self.scan_number()
        } else if ch.is_alphabetic() || ch == '_' {
            self.scan_identifier()
        } else {
            self.scan_operator()?
        };

        Ok(Token {
            kind,
            start,
            end: self.byte_pos,
            line,
            col,
            preceded_by_blank_line,
        })
    }

    fn scan_comment(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Comment(text.trim_end().to_string())
    }

    fn scan_string(&mut self) -> Result<TokenKind, LexerError> {
        self.advance(); // consume opening "
        let mut content = String::new();

        loop {
            match self.current() {
                None => return Err(self.error("Unterminated string literal")),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => content.push('\n'),
                        Some('t') => content.push('\t'),
                        Some('r') => content.push('\r'),
                        Some('b') => content.push('\u{0008}'),
                        Some('f') => content.push('\u{000C}'),
                        Some('"') => content.push('"'),
                        Some('\\') => content.push('\\'),
                        Some(c) => content.push(c),
                        None => return Err(self.error("Unterminated string literal")),
                    }
                }
                // Literal newlines are legal inside strings; multi-line string
                // literals are emitted verbatim by the formatter.
                Some(c) => {
                    content.push(c);
                    self.advance();
                }
            }
        }

        Ok(TokenKind::Str(content))
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut text = String::new();

        while let Some(c) = self.current() {
            if c.is_ascii_digit() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // A '.' continues the number only when followed by a digit, so that
        // `1..5` splits into INTEGER DOT_DOT INTEGER.
        if self.current() == Some('.') && self.peek(1).map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            text.push('.');
            self.advance();
            while let Some(c) = self.current() {
                if c.is_ascii_digit() || c == '_' {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            return TokenKind::Decimal(text);
        }

        TokenKind::Integer(text)
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let mut ident = String::new();

        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Predicate and mutation suffixes: `is_nice?`, `push!`. A `!` is left
        // alone when it starts `!=`.
        match self.current() {
            Some('?') => {
                ident.push('?');
                self.advance();
            }
            Some('!') if self.peek(1) != Some('=') => {
                ident.push('!');
                self.advance();
            }
            _ => {}
        }

        if ident == "_" {
            return TokenKind::Underscore;
        }

        keyword(&ident).unwrap_or(TokenKind::Ident(ident))
    }

    fn scan_operator(&mut self) -> Result<TokenKind, LexerError> {
        let ch = self.advance().unwrap();

        let kind = match ch {
            '=' if self.current() == Some('=') => {
                self.advance();
                TokenKind::Eq
            }
            '=' => TokenKind::Assign,
            '!' if self.current() == Some('=') => {
                self.advance();
                TokenKind::NotEq
            }
            '!' => TokenKind::Bang,
            '<' if self.current() == Some('=') => {
                self.advance();
                TokenKind::LtEq
            }
            '<' => TokenKind::Lt,
            '>' if self.current() == Some('=') => {
                self.advance();
                TokenKind::GtEq
            }
            '>' if self.current() == Some('>') => {
                self.advance();
                TokenKind::GtGt
            }
            '>' => TokenKind::Gt,
            '&' if self.current() == Some('&') => {
                self.advance();
                TokenKind::AmpAmp
            }
            '|' if self.current() == Some('>') => {
                self.advance();
                TokenKind::PipeGt
            }
            '|' if self.current() == Some('|') => {
                self.advance();
                TokenKind::PipePipe
            }
            '|' => TokenKind::Bar,
            '.' if self.current() == Some('.') => {
                self.advance();
                if self.current() == Some('=') {
                    self.advance();
                    TokenKind::DotDotEq
                } else {
                    TokenKind::DotDot
                }
            }
            '#' if self.current() == Some('{') => {
                self.advance();
                TokenKind::HashBrace
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '`' => TokenKind::Backtick,
            '@' => TokenKind::At,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            other => return Err(self.error(format!("Unknown character: {:?}", other))),
        };

        Ok(kind)
    }
}
