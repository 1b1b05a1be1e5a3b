//! Tree-sitter grammar registry and per-task parser instances

use super::types::Language;
use std::collections::HashMap;
use thiserror::Error;
use tree_sitter::{Language as Grammar, Parser as TsParser, Tree};

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to initialize parser: {0}")]
    InitError(String),
    #[error("Failed to parse source code")]
    ParseError,
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

fn grammar_for(language: Language) -> Grammar {
    match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
    }
}

/// Grammars for every supported language, loaded once per process.
///
/// The registry is shared read-only between worker threads. Parsers carry
/// mutable state, so each task asks for its own via [`ParserRegistry::parser`].
pub struct ParserRegistry {
    grammars: HashMap<Language, Grammar>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        let grammars = Language::ALL
            .iter()
            .map(|&lang| (lang, grammar_for(lang)))
            .collect();
        ParserRegistry { grammars }
    }

    /// Build a fresh parser bound to `language`
    pub fn parser(&self, language: Language) -> Result<Parser, ParserError> {
        let grammar = self
            .grammars
            .get(&language)
            .ok_or_else(|| ParserError::UnsupportedLanguage(language.to_string()))?;

        let mut ts_parser = TsParser::new();
        ts_parser
            .set_language(grammar)
            .map_err(|e| ParserError::InitError(e.to_string()))?;

        Ok(Parser { ts_parser, language })
    }

    /// Build a parser from a file extension such as `"py"` or `"cs"`
    pub fn parser_for_extension(&self, ext: &str) -> Result<Parser, ParserError> {
        let language = Language::from_extension(ext)
            .ok_or_else(|| ParserError::UnsupportedLanguage(ext.to_string()))?;
        self.parser(language)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-language tree-sitter parser, owned by one task at a time
pub struct Parser {
    ts_parser: TsParser,
    language: Language,
}

impl Parser {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, ParserError> {
        self.ts_parser
            .parse(source, None)
            .ok_or(ParserError::ParseError)
    }
}
