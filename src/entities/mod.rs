//! Entity extraction for lingoscan
//!
//! Uses tree-sitter to pull identifiers, literals, variables, comments,
//! docstrings, functions and classes out of Python, JavaScript, TypeScript,
//! Java and C# sources.

mod builtins;
mod extractor;
mod parser;
mod types;

pub use extractor::{extract_file, parse_file, ExtractError};
pub use parser::ParserRegistry;
pub use types::{Category, ExtractionResult, Language};
