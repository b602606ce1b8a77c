//! Syntax compiler — rule DSL source → token stream → rule forest →
//! binary artifact.

pub mod ast;
pub mod color;
pub mod encode;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod summary;
pub mod token;

pub use ast::{Field, Rule, RuleId, Ruleset};
pub use error::{CompileError, ErrorKind};
pub use summary::Totals;

use std::io::Write;

use lexer::Lexer;
use parser::Parser;

/// The syntax compiler.
///
/// Runs source text through lexer → parser, then summarizes the rule
/// forest once and serializes it into the artifact format.
pub struct Compiler;

impl Compiler {
    /// Parse source into a rule forest.
    pub fn parse(source: &str) -> Result<Ruleset, CompileError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Parser::new(tokens).parse()
    }

    /// Compile source and write the artifact to `out`.
    pub fn compile_to<W: Write>(source: &str, out: &mut W) -> Result<Totals, CompileError> {
        let mut rules = Self::parse(source)?;
        let totals = summary::summarize(&mut rules);
        encode::write_artifact(out, &rules, totals)?;
        Ok(totals)
    }

    /// Compile source into artifact bytes.
    pub fn compile(source: &str) -> Result<Vec<u8>, CompileError> {
        let mut buf = Vec::new();
        Self::compile_to(source, &mut buf)?;
        Ok(buf)
    }
}
