//! Lexer for the vex syntax language.
//!
//! Converts source text into a stream of [`Token`]s.

use super::error::CompileError;
use super::token::{Token, TokenKind};

/// Longest run of characters a single token may span.
const TOKEN_MAX: usize = 8191;

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_blank();

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                    col: self.col,
                });
                break;
            }

            let token = match self.peek() {
                '"' => self.lex_string()?,
                '+' | '&' => self.lex_field_marker()?,
                '{' => self.single_char(TokenKind::Open),
                '}' => self.single_char(TokenKind::Close),
                ';' => self.single_char(TokenKind::Semi),
                _ => self.lex_octet_or_color()?,
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip whitespace and `#`-to-end-of-line comments.
    fn skip_blank(&mut self) {
        loop {
            while !self.is_at_end() && self.peek().is_whitespace() {
                self.advance();
            }
            if !self.is_at_end() && self.peek() == '#' {
                while !self.is_at_end() && self.peek() != '\n' {
                    self.advance();
                }
                continue;
            }
            break;
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        Token { kind, line, col }
    }

    /// Quoted literal. No escape sequences; the closing quote is required.
    fn lex_string(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume opening '"'

        let mut s = String::new();
        while !self.is_at_end() && self.peek() != '"' {
            if s.len() >= TOKEN_MAX {
                return Err(CompileError::lex("string literal too long", line, col));
            }
            s.push(self.advance());
        }
        if self.is_at_end() {
            return Err(CompileError::lex("unterminated string literal", line, col));
        }
        self.advance(); // consume closing '"'

        Ok(Token {
            kind: TokenKind::Str(s),
            line,
            col,
        })
    }

    /// `+digits` (field width) or `&digits` (field reference).
    fn lex_field_marker(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let marker = self.advance();

        let mut digits = String::new();
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            if digits.len() >= TOKEN_MAX {
                return Err(CompileError::lex("numeric literal too long", line, col));
            }
            digits.push(self.advance());
        }
        if digits.is_empty() {
            return Err(CompileError::lex(
                format!("expected digits after '{marker}'"),
                line,
                col,
            ));
        }

        let kind = if marker == '+' {
            TokenKind::Offset(digits)
        } else {
            TokenKind::OffRef(digits)
        };
        Ok(Token { kind, line, col })
    }

    /// Greedy scan of a bare word. A run of pure hex digits is an OCTET;
    /// any other alphanumeric or `/` in the run reclassifies it as a COLOR.
    fn lex_octet_or_color(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;

        let mut s = String::new();
        let mut is_color = false;
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_ascii_hexdigit() {
                // still a plausible octet run
            } else if ch.is_ascii_alphanumeric() || ch == '/' {
                is_color = true;
            } else {
                break;
            }
            if s.len() >= TOKEN_MAX {
                return Err(CompileError::lex("token too long", line, col));
            }
            s.push(self.advance());
        }

        if s.is_empty() {
            return Err(CompileError::lex(
                format!("unexpected character: '{}'", self.peek()),
                line,
                col,
            ));
        }

        let kind = if is_color {
            TokenKind::Color(s)
        } else {
            TokenKind::Octet(s)
        };
        Ok(Token { kind, line, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lex_octet_run() {
        assert_eq!(
            kinds("ff00"),
            vec![TokenKind::Octet("ff00".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lex_string_literal() {
        assert_eq!(
            kinds("\"ELF\""),
            vec![TokenKind::Str("ELF".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lex_empty_string_literal() {
        assert_eq!(
            kinds("\"\""),
            vec![TokenKind::Str(String::new()), TokenKind::Eof]
        );
    }

    #[test]
    fn lex_offset_and_offref() {
        assert_eq!(
            kinds("+8 &1"),
            vec![
                TokenKind::Offset("8".to_string()),
                TokenKind::OffRef("1".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_punctuation() {
        assert_eq!(
            kinds("{ ; }"),
            vec![
                TokenKind::Open,
                TokenKind::Semi,
                TokenKind::Close,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_color_name() {
        assert_eq!(
            kinds("red"),
            vec![TokenKind::Color("red".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lex_color_pair() {
        assert_eq!(
            kinds("red/black"),
            vec![TokenKind::Color("red/black".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn hex_run_with_non_hex_letter_becomes_color() {
        // 'g' is alphanumeric but not a hex digit, so the whole run
        // reclassifies.
        assert_eq!(
            kinds("beefg"),
            vec![TokenKind::Color("beefg".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn lex_comment_to_end_of_line() {
        assert_eq!(
            kinds("ff # trailing comment\n00"),
            vec![
                TokenKind::Octet("ff".to_string()),
                TokenKind::Octet("00".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lex_comment_only_source() {
        assert_eq!(kinds("# nothing here\n# or here"), vec![TokenKind::Eof]);
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn lex_line_and_column_tracking() {
        let tokens = Lexer::new("ff00\n  \"AB\" red").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1)); // ff00
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3)); // "AB"
        assert_eq!((tokens[2].line, tokens[2].col), (2, 8)); // red
    }

    #[test]
    fn lex_unterminated_string_is_an_error() {
        let result = Lexer::new("\"no closing quote").tokenize();
        let err = result.unwrap_err();
        assert_eq!(err.kind, super::super::error::ErrorKind::Lex);
        assert_eq!((err.line, err.col), (1, 1));
    }

    #[test]
    fn lex_bare_ampersand_is_an_error() {
        assert!(Lexer::new("&").tokenize().is_err());
        assert!(Lexer::new("& 1").tokenize().is_err());
    }

    #[test]
    fn lex_bare_plus_is_an_error() {
        assert!(Lexer::new("+;").tokenize().is_err());
    }

    #[test]
    fn lex_unexpected_character_is_an_error() {
        let err = Lexer::new("ff =").tokenize().unwrap_err();
        assert_eq!(err.kind, super::super::error::ErrorKind::Lex);
        assert_eq!((err.line, err.col), (1, 4));
    }

    #[test]
    fn lex_full_rule() {
        assert_eq!(
            kinds("7f \"ELF\" green/black { +4 red; &1; }"),
            vec![
                TokenKind::Octet("7f".to_string()),
                TokenKind::Str("ELF".to_string()),
                TokenKind::Color("green/black".to_string()),
                TokenKind::Open,
                TokenKind::Offset("4".to_string()),
                TokenKind::Color("red".to_string()),
                TokenKind::Semi,
                TokenKind::OffRef("1".to_string()),
                TokenKind::Semi,
                TokenKind::Close,
                TokenKind::Eof
            ]
        );
    }
}
