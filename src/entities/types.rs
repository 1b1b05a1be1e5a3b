//! Types for the entity extractor

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported source languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    CSharp,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::CSharp,
    ];

    /// Detect language from file extension (without the leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "cs" => Some(Language::CSharp),
            _ => None,
        }
    }

    /// Detect language from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::CSharp => "csharp",
        }
    }

    /// JavaScript and TypeScript share template strings and arrow functions
    pub fn is_ecmascript(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The seven buckets an extracted entity can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Identifiers,
    Literals,
    Variables,
    Comments,
    Docstrings,
    Functions,
    Classes,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Identifiers,
        Category::Literals,
        Category::Variables,
        Category::Comments,
        Category::Docstrings,
        Category::Functions,
        Category::Classes,
    ];
}

/// Categorized entities extracted from one source file.
///
/// Field order matches the on-disk JSON layout. Missing fields read back
/// as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionResult {
    pub identifiers: Vec<String>,
    pub literals: Vec<String>,
    pub variables: Vec<String>,
    pub comments: Vec<String>,
    pub docstrings: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
}

impl ExtractionResult {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Identifiers => &self.identifiers,
            Category::Literals => &self.literals,
            Category::Variables => &self.variables,
            Category::Comments => &self.comments,
            Category::Docstrings => &self.docstrings,
            Category::Functions => &self.functions,
            Category::Classes => &self.classes,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Identifiers => &mut self.identifiers,
            Category::Literals => &mut self.literals,
            Category::Variables => &mut self.variables,
            Category::Comments => &mut self.comments,
            Category::Docstrings => &mut self.docstrings,
            Category::Functions => &mut self.functions,
            Category::Classes => &mut self.classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("JAVA"), Some(Language::Java));
        assert_eq!(Language::from_extension("cs"), Some(Language::CSharp));
        assert_eq!(Language::from_extension("tsx"), None);
        assert_eq!(Language::from_extension("rb"), None);
        assert_eq!(
            Language::from_path(Path::new("logs/2020-01/abc.Ts")),
            Some(Language::TypeScript)
        );
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_json_round_trip_keeps_field_order() {
        let result = ExtractionResult {
            identifiers: vec!["b".into(), "a".into()],
            literals: vec!["héllo".into()],
            variables: vec!["x".into(), "x".into()],
            comments: vec!["set x".into()],
            docstrings: vec!["doc".into()],
            functions: vec!["f".into()],
            classes: vec!["Greeter".into()],
        };

        let json = serde_json::to_string(&result).unwrap();
        let keys: Vec<usize> = Category::ALL
            .iter()
            .map(|c| json.find(&serde_json::to_string(c).unwrap()).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));

        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
