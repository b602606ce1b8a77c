//! Parser for the vex syntax language.
//!
//! Recursive descent over the token stream, one function per grammar
//! production. Builds the rule forest in a [`Ruleset`] arena; top-level
//! rules chain through `sibling` like any other alternatives.

use super::ast::{Field, Rule, RuleId, Ruleset};
use super::color;
use super::error::CompileError;
use super::token::{Token, TokenKind};

/// Largest declarable field width.
const WIDTH_MAX: u32 = 65536;
/// Largest declarable reference index.
const REF_MAX: u32 = 256;
/// Widths must leave bit 15 clear for the reference marker.
const WIDTH_BITS: u32 = 0x7fff;
/// Longest serializable pattern; its length is written as a u16.
const PATTERN_MAX: usize = 65535;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    rules: Ruleset,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            rules: Ruleset::new(),
        }
    }

    /// Parse the whole token stream into a rule forest.
    pub fn parse(mut self) -> Result<Ruleset, CompileError> {
        let mut tail: Option<RuleId> = None;

        while !self.check_eof() {
            let id = self.parse_rule()?;
            match tail {
                None => self.rules.root = Some(id),
                Some(prev) => self.rules.rule_mut(prev).sibling = Some(id),
            }
            tail = Some(id);
        }

        Ok(self.rules)
    }

    /// rule := patternToken+ COLOR? '{' body '}'
    fn parse_rule(&mut self) -> Result<RuleId, CompileError> {
        let pattern = self.parse_pattern()?;
        let id = self.rules.alloc(Rule::new(pattern));

        let mut saw_color = false;
        if let TokenKind::Color(_) = &self.peek().kind {
            self.rules.rule_mut(id).color = self.parse_color()?;
            saw_color = true;
        }

        let t = self.peek();
        if t.kind != TokenKind::Open {
            let expected = if saw_color {
                "an opening curly brace, '{'"
            } else {
                "an opening curly brace, '{', or a color specification"
            };
            return Err(CompileError::syntax(
                format!("unexpected {} token (expecting {expected})", t.kind.name()),
                t.line,
                t.col,
            ));
        }
        self.advance();

        self.parse_body(id)?;
        Ok(id)
    }

    /// patternToken+ — consecutive OCTET/STRING tokens concatenated into
    /// the rule's literal byte pattern.
    fn parse_pattern(&mut self) -> Result<Vec<u8>, CompileError> {
        let first = self.peek();
        let (first_line, first_col) = (first.line, first.col);
        if !matches!(first.kind, TokenKind::Octet(_) | TokenKind::Str(_)) {
            return Err(CompileError::syntax(
                format!(
                    "unexpected {} token (expecting either a hex string or a character string)",
                    first.kind.name()
                ),
                first_line,
                first_col,
            ));
        }

        let mut pattern = Vec::new();
        loop {
            let t = self.peek();
            match &t.kind {
                TokenKind::Octet(text) => {
                    let (text, line, col) = (text.clone(), t.line, t.col);
                    self.advance();
                    decode_octets(&text, line, col, &mut pattern)?;
                }
                TokenKind::Str(text) => {
                    pattern.extend_from_slice(text.as_bytes());
                    self.advance();
                }
                _ => break,
            }
        }

        if pattern.is_empty() {
            return Err(CompileError::semantic(
                "pattern matches no bytes",
                first_line,
                first_col,
            ));
        }
        if pattern.len() > PATTERN_MAX {
            return Err(CompileError::semantic(
                format!("pattern longer than {PATTERN_MAX} bytes"),
                first_line,
                first_col,
            ));
        }
        Ok(pattern)
    }

    /// body := (fieldStmt | rule)* '}' — dispatch on the lookahead token.
    fn parse_body(&mut self, rule: RuleId) -> Result<(), CompileError> {
        loop {
            let t = self.peek();
            match &t.kind {
                TokenKind::Close => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Offset(_) | TokenKind::OffRef(_) => {
                    let field = self.parse_field_stmt(rule)?;
                    self.rules.rule_mut(rule).fields.push(field);
                }
                TokenKind::Octet(_) | TokenKind::Str(_) => {
                    self.parse_subrule(rule)?;
                }
                TokenKind::Eof => {
                    return Err(CompileError::syntax("unexpected EOF", t.line, t.col));
                }
                _ => {
                    return Err(CompileError::syntax(
                        format!(
                            "unexpected {} token (expecting a field declaration, a nested rule, or '}}')",
                            t.kind.name()
                        ),
                        t.line,
                        t.col,
                    ));
                }
            }
        }
    }

    /// fieldStmt := (OFFSET | OFFREF) COLOR? ';'
    fn parse_field_stmt(&mut self, rule: RuleId) -> Result<Field, CompileError> {
        let t = self.peek();
        let (line, col) = (t.line, t.col);

        let mut field = match &t.kind {
            TokenKind::Offset(digits) => {
                let digits = digits.clone();
                self.advance();
                let v = numeric_value(&digits, WIDTH_MAX, line, col)?;
                if v > WIDTH_BITS {
                    return Err(CompileError::semantic(
                        format!("field width {v} does not fit in 15 bits"),
                        line,
                        col,
                    ));
                }
                Field::data(v as u16, color::DEFAULT)
            }
            TokenKind::OffRef(digits) => {
                let digits = digits.clone();
                self.advance();
                let v = numeric_value(&digits, REF_MAX, line, col)?;
                self.check_reference(rule, v, &digits, line, col)?;
                Field::reference(v as u16, color::DEFAULT)
            }
            _ => {
                return Err(CompileError::syntax(
                    format!("unexpected {} token (expecting a field declaration)", t.kind.name()),
                    line,
                    col,
                ));
            }
        };

        if let TokenKind::Color(_) = &self.peek().kind {
            field.color = self.parse_color()?;
        }

        let t = self.peek();
        if t.kind != TokenKind::Semi {
            return Err(CompileError::syntax(
                format!(
                    "unexpected {} token (expecting either a color specification, or a statement terminator, ';')",
                    t.kind.name()
                ),
                t.line,
                t.col,
            ));
        }
        self.advance();
        Ok(field)
    }

    /// Validate a `&N` reference against the fields parsed so far:
    /// in range, strictly backward, and targeting a concrete data field.
    fn check_reference(
        &self,
        rule: RuleId,
        v: u32,
        digits: &str,
        line: usize,
        col: usize,
    ) -> Result<(), CompileError> {
        let own = self.rules.rule(rule).fields.len() + 1; // own 1-based index
        if v < 1 {
            return Err(CompileError::semantic(
                format!("invalid reference ('&{digits}'); indexing starts at 1"),
                line,
                col,
            ));
        }
        if v as usize == own {
            return Err(CompileError::semantic(
                format!("invalid reference ('&{digits}'); refers to itself"),
                line,
                col,
            ));
        }
        if v as usize > own {
            return Err(CompileError::semantic(
                format!("invalid reference ('&{digits}'); refers to a later field"),
                line,
                col,
            ));
        }
        if self.rules.rule(rule).fields[v as usize - 1].is_reference() {
            return Err(CompileError::semantic(
                format!("invalid reference ('&{digits}'); refers to another reference"),
                line,
                col,
            ));
        }
        Ok(())
    }

    /// A nested rule, linked as `subs` or appended to the end of the
    /// existing subs chain.
    fn parse_subrule(&mut self, parent: RuleId) -> Result<(), CompileError> {
        let child = self.parse_rule()?;
        match self.rules.rule(parent).subs {
            None => self.rules.rule_mut(parent).subs = Some(child),
            Some(head) => {
                let mut tail = head;
                while let Some(next) = self.rules.rule(tail).sibling {
                    tail = next;
                }
                self.rules.rule_mut(tail).sibling = Some(child);
            }
        }
        Ok(())
    }

    /// Consume a COLOR token and resolve it to its packed byte.
    fn parse_color(&mut self) -> Result<u8, CompileError> {
        let t = self.peek();
        let (line, col) = (t.line, t.col);
        match &t.kind {
            TokenKind::Color(name) => {
                let name = name.clone();
                self.advance();
                color::resolve(&name).ok_or_else(|| {
                    CompileError::semantic(
                        format!("invalid color specification '{name}'"),
                        line,
                        col,
                    )
                })
            }
            _ => Err(CompileError::syntax(
                format!("unexpected {} token (expecting a color specification)", t.kind.name()),
                line,
                col,
            )),
        }
    }

    // --- Utility methods ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}

/// Accumulate a decimal digit string, erroring past `max`.
fn numeric_value(digits: &str, max: u32, line: usize, col: usize) -> Result<u32, CompileError> {
    let mut v: u32 = 0;
    for ch in digits.chars() {
        v = v * 10 + (ch as u32 - '0' as u32);
        if v > max {
            return Err(CompileError::semantic(
                format!("maximum value of {max} exceeded"),
                line,
                col,
            ));
        }
    }
    Ok(v)
}

/// Decode a run of hex digits into bytes, two digits per byte.
fn decode_octets(
    text: &str,
    line: usize,
    col: usize,
    out: &mut Vec<u8>,
) -> Result<(), CompileError> {
    if text.len() % 2 != 0 {
        return Err(CompileError::semantic(
            format!("odd number of hex digits in '{text}'"),
            line,
            col,
        ));
    }
    for i in (0..text.len()).step_by(2) {
        let byte = u8::from_str_radix(&text[i..i + 2], 16).map_err(|_| {
            CompileError::semantic(format!("invalid hex digits in '{text}'"), line, col)
        })?;
        out.push(byte);
    }
    Ok(())
}
