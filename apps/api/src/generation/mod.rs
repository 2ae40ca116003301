// Document generation: resume record → Typst source.
// Pure and synchronous; nothing here touches the engine or the filesystem.

pub mod dates;
pub mod escape;
pub mod generator;
pub mod handlers;
pub mod markup;
pub mod preamble;
pub mod sections;

pub use generator::generate;
