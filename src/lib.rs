//! vexc — offline syntax compiler for the vex terminal hex viewer.
//!
//! Compiles the highlighting-rule DSL into the binary artifact the
//! viewer's matching runtime loads at startup.

pub mod syntax;
