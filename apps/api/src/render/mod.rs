// Compiler adapter: drives the external Typst engine.
// Engine bindings live behind the `Engine` trait; `Compiler` is the single owner.

pub mod compiler;
pub mod download;
pub mod engine;
pub mod handlers;
pub mod remote;
pub mod typst_cli;

#[cfg(test)]
pub mod fake;

pub use compiler::{CompileError, Compiler};
