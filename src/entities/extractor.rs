//! Entity extraction from AST nodes
//!
//! A pre-pass records user-defined class and function names; the main walk
//! then visits every node in pre-order and sorts identifiers, strings and
//! comments into the seven [`Category`] buckets.

use super::builtins::is_builtin;
use super::parser::{ParserError, ParserRegistry};
use super::types::{Category, ExtractionResult, Language};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Never reported as an identifier or variable
const MAIN_GUARD: &str = "__main__";
/// Python constructor, never reported as a function
const CONSTRUCTOR_MARKER: &str = "__init__";

const CLASS_DECLARATIONS: &[&str] = &[
    "class_definition",
    "class_declaration",
    "abstract_class_declaration",
];

const FUNCTION_DECLARATIONS: &[&str] = &[
    "function_definition",
    "function_declaration",
    "method_definition",
    "method_declaration",
    "constructor_declaration",
];

const CLASS_NAME_KINDS: &[&str] = &["identifier", "type_identifier"];
const FUNCTION_NAME_KINDS: &[&str] = &["identifier", "type_identifier", "property_identifier"];

const DECLARATION_HEADERS: &[&str] = &[
    "class_definition",
    "class_declaration",
    "function_definition",
    "method_definition",
    "function_declaration",
    "method_declaration",
    "constructor_declaration",
];

const CALLS: &[&str] = &["call", "call_expression", "invocation_expression"];
const IMPORTS: &[&str] = &["import_statement", "import_from_statement"];
const ASSIGNMENTS: &[&str] = &["assignment", "assignment_expression"];
const DECLARATORS: &[&str] = &["variable_declarator", "lexical_declarator"];
const PATTERNS: &[&str] = &["object_pattern", "array_pattern", "pair_pattern"];
const DECLARATIONS: &[&str] = &["variable_declaration", "field_declaration", "property_declaration"];

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file extension: {0:?}")]
    Unsupported(String),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Node kinds the main walk reacts to. Anything else, including every
/// anonymous token, is `Other` and only recursed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Identifier,
    StringLiteral,
    TemplateString,
    VariableDeclarator,
    Comment,
    ArrowFunction,
    Other,
}

impl NodeKind {
    fn of(node: &Node) -> Self {
        if !node.is_named() {
            return NodeKind::Other;
        }
        match node.kind() {
            "identifier" => NodeKind::Identifier,
            "string" | "string_literal" => NodeKind::StringLiteral,
            "template_string" | "template_literal" => NodeKind::TemplateString,
            "variable_declarator" => NodeKind::VariableDeclarator,
            "comment" | "line_comment" | "block_comment" => NodeKind::Comment,
            "arrow_function" => NodeKind::ArrowFunction,
            _ => NodeKind::Other,
        }
    }
}

/// Insertion-ordered `(text, node id)` entries, each pair stored once
#[derive(Debug, Default)]
struct EntityList {
    entries: Vec<(String, usize)>,
    seen: HashSet<(String, usize)>,
}

impl EntityList {
    fn insert(&mut self, text: &str, node_id: usize) {
        let key = (text.to_string(), node_id);
        if self.seen.insert(key.clone()) {
            self.entries.push(key);
        }
    }

    fn contains(&self, text: &str, node_id: usize) -> bool {
        self.seen.contains(&(text.to_string(), node_id))
    }

    fn texts(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|(text, _)| text.clone())
    }
}

/// Extract categorized entities from a parsed tree
pub fn extract(tree: &Tree, source: &str, language: Language) -> ExtractionResult {
    let root = tree.root_node();

    let mut classes = EntityList::default();
    collect_declarations(root, source, CLASS_DECLARATIONS, CLASS_NAME_KINDS, &mut classes);

    let mut functions = EntityList::default();
    collect_declarations(root, source, FUNCTION_DECLARATIONS, FUNCTION_NAME_KINDS, &mut functions);

    let mut walk = Walk {
        source,
        language,
        classes: &classes,
        functions: &functions,
        buckets: Default::default(),
    };
    walk.visit(root);
    walk.finish()
}

/// Read, parse and extract one file.
///
/// The extension is checked before the file is touched, so unsupported files
/// cost nothing.
pub fn parse_file(registry: &ParserRegistry, path: &Path) -> Result<ExtractionResult, ExtractError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let mut parser = registry.parser_for_extension(ext).map_err(|e| match e {
        ParserError::UnsupportedLanguage(ext) => ExtractError::Unsupported(ext),
        other => ExtractError::Parser(other),
    })?;

    let source = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let tree = parser.parse(&source)?;
    Ok(extract(&tree, &source, parser.language()))
}

/// Like [`parse_file`], but any failure yields an empty result
pub fn extract_file(registry: &ParserRegistry, path: &Path) -> ExtractionResult {
    match parse_file(registry, path) {
        Ok(result) => result,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no entities extracted");
            ExtractionResult::default()
        }
    }
}

// ============================================================================
// Pre-pass
// ============================================================================

/// Visit `root` and all of its descendants in pre-order.
///
/// Driven by a single cursor, so stack use does not grow with nesting depth.
fn for_each_preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Record the name of every declaration of the given kinds
fn collect_declarations(
    root: Node,
    source: &str,
    declaration_kinds: &[&str],
    name_kinds: &[&str],
    table: &mut EntityList,
) {
    for_each_preorder(root, |node| {
        if !declaration_kinds.contains(&node.kind()) {
            return;
        }
        if let Some(name_node) = declaration_name(&node, name_kinds) {
            let name = node_text(&name_node, source);
            if !is_builtin(name) && name != CONSTRUCTOR_MARKER {
                table.insert(name, name_node.id());
            }
        }
    });
}

/// The declaration's `name` field, or failing that its first name-like child
fn declaration_name<'t>(node: &Node<'t>, name_kinds: &[&str]) -> Option<Node<'t>> {
    if let Some(name) = node.child_by_field_name("name") {
        if name_kinds.contains(&name.kind()) {
            return Some(name);
        }
    }

    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| name_kinds.contains(&child.kind()));
    found
}

// ============================================================================
// Main walk
// ============================================================================

struct Walk<'a> {
    source: &'a str,
    language: Language,
    classes: &'a EntityList,
    functions: &'a EntityList,
    buckets: [EntityList; 7],
}

impl Walk<'_> {
    fn bucket(&mut self, category: Category) -> &mut EntityList {
        &mut self.buckets[category as usize]
    }

    fn visit(&mut self, root: Node) {
        for_each_preorder(root, |node| self.classify(&node));
    }

    fn classify(&mut self, node: &Node) {
        match NodeKind::of(node) {
            NodeKind::Identifier => self.on_identifier(node),
            NodeKind::StringLiteral => self.on_string(node),
            NodeKind::TemplateString if self.language.is_ecmascript() => self.on_template(node),
            NodeKind::VariableDeclarator if self.language == Language::Java => {
                self.on_java_declarator(node)
            }
            NodeKind::Comment => self.on_comment(node),
            NodeKind::ArrowFunction if self.language.is_ecmascript() => {
                self.on_arrow_function(node)
            }
            _ => {}
        }
    }

    fn on_identifier(&mut self, node: &Node) {
        let name = node_text(node, self.source);
        let id = node.id();

        if is_builtin(name)
            || name == MAIN_GUARD
            || self.classes.contains(name, id)
            || self.functions.contains(name, id)
        {
            return;
        }

        // Reported once, as the whole declarator
        if self.language == Language::Java && is_bare_declarator_name(node) {
            return;
        }

        let category = if is_variable(node, self.source, self.language) {
            Category::Variables
        } else {
            Category::Identifiers
        };
        self.bucket(category).insert(name, id);
    }

    fn on_string(&mut self, node: &Node) {
        let raw = node_text(node, self.source);

        if self.language == Language::Python && is_triple_quoted(raw) {
            let text = strip_quotes(raw).trim();
            self.bucket(Category::Docstrings).insert(text, node.id());
        } else {
            let text = strip_quotes(raw);
            self.bucket(Category::Literals).insert(text, node.id());
        }
    }

    fn on_template(&mut self, node: &Node) {
        let text = node_text(node, self.source).trim_matches('`').trim();
        self.bucket(Category::Literals).insert(text, node.id());
    }

    /// Java `int x;`: the declarator itself is the variable
    fn on_java_declarator(&mut self, node: &Node) {
        let named = node
            .child_by_field_name("name")
            .is_some_and(|n| n.kind() == "identifier");
        if named && node.child_by_field_name("value").is_none() {
            let text = node_text(node, self.source);
            self.bucket(Category::Variables).insert(text, node.id());
        }
    }

    fn on_comment(&mut self, node: &Node) {
        let text = comment_body(node_text(node, self.source));
        let category = if is_doc_comment(text) {
            Category::Docstrings
        } else {
            Category::Comments
        };
        self.bucket(category).insert(text, node.id());
    }

    /// `const greet = () => ...` names a function through its declarator
    fn on_arrow_function(&mut self, node: &Node) {
        let Some(parent) = node.parent() else {
            return;
        };
        if !DECLARATORS.contains(&parent.kind()) {
            return;
        }

        let source = self.source;
        let mut cursor = parent.walk();
        for child in parent.children(&mut cursor) {
            if child.kind() != "identifier" {
                continue;
            }
            let name = node_text(&child, source);
            if !is_builtin(name) {
                self.bucket(Category::Identifiers).insert(name, node.id());
                self.bucket(Category::Functions).insert(name, node.id());
            }
        }
    }

    fn finish(self) -> ExtractionResult {
        let mut result = ExtractionResult::default();
        for category in [
            Category::Identifiers,
            Category::Literals,
            Category::Variables,
            Category::Comments,
            Category::Docstrings,
        ] {
            *result.get_mut(category) = self.buckets[category as usize].texts().collect();
        }

        result.functions = self
            .functions
            .texts()
            .chain(self.buckets[Category::Functions as usize].texts())
            .collect();
        result.classes = self.classes.texts().collect();
        result
    }
}

// ============================================================================
// Classification helpers
// ============================================================================

/// Whether an identifier names a variable rather than some other use
fn is_variable(node: &Node, source: &str, language: Language) -> bool {
    if language == Language::Java || node.kind() != "identifier" {
        return false;
    }

    let name = node_text(node, source);
    if is_builtin(name) || name == MAIN_GUARD {
        return false;
    }

    let Some(parent) = node.parent() else {
        return false;
    };
    let parent_kind = parent.kind();

    if DECLARATION_HEADERS.contains(&parent_kind)
        || CALLS.contains(&parent_kind)
        || IMPORTS.contains(&parent_kind)
    {
        return false;
    }

    if ASSIGNMENTS.contains(&parent_kind) {
        return is_first_child(&parent, node);
    }

    if DECLARATORS.contains(&parent_kind) || PATTERNS.contains(&parent_kind) {
        return true;
    }

    // `obj.attr = ...`, `x: int = ...`
    if let Some(grandparent) = parent.parent() {
        if ASSIGNMENTS.contains(&grandparent.kind()) {
            return is_first_child(&grandparent, &parent);
        }
    }

    DECLARATIONS.contains(&parent_kind)
}

fn is_first_child(parent: &Node, node: &Node) -> bool {
    parent.child(0).is_some_and(|first| first.id() == node.id())
}

/// Name of a Java declarator without an initializer
fn is_bare_declarator_name(node: &Node) -> bool {
    node.parent().is_some_and(|parent| {
        parent.kind() == "variable_declarator"
            && parent.child_by_field_name("value").is_none()
            && parent
                .child_by_field_name("name")
                .is_some_and(|name| name.id() == node.id())
    })
}

fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Split a string literal into its prefix (`r`, `f`, `@`, `$`...) and the quoted body
fn split_string_prefix(raw: &str) -> (&str, &str) {
    let Some(start) = raw.find(['"', '\'', '`']) else {
        return ("", raw);
    };
    let prefix = &raw[..start];
    if prefix.chars().all(|c| c.is_ascii_alphabetic() || c == '@' || c == '$') {
        (prefix, &raw[start..])
    } else {
        ("", raw)
    }
}

fn is_triple_quoted(raw: &str) -> bool {
    let (_, body) = split_string_prefix(raw);
    body.starts_with("\"\"\"") || body.starts_with("'''")
}

fn strip_quotes(raw: &str) -> &str {
    let (_, body) = split_string_prefix(raw);
    for delimiter in ["\"\"\"", "'''", "\"", "'", "`"] {
        if body.len() < 2 * delimiter.len() {
            continue;
        }
        if let Some(inner) = body
            .strip_prefix(delimiter)
            .and_then(|rest| rest.strip_suffix(delimiter))
        {
            return inner;
        }
    }
    body
}

/// Comment text without its `#`, `//`, `///`, `/* */` or `/** */` delimiters
fn comment_body(raw: &str) -> &str {
    let text = raw.trim();

    let body = if text.starts_with('#') {
        text.trim_start_matches('#')
    } else if text.starts_with("//") {
        text.trim_start_matches('/')
    } else if let Some(inner) = text
        .strip_prefix("/**")
        .and_then(|rest| rest.strip_suffix("*/"))
    {
        inner
    } else if let Some(inner) = text
        .strip_prefix("/*")
        .and_then(|rest| rest.strip_suffix("*/"))
    {
        inner
    } else {
        text
    };

    body.trim()
}

/// JSDoc/Javadoc continuation lines and C# XML docs
fn is_doc_comment(text: &str) -> bool {
    text.starts_with('*') || text.starts_with("<summary")
}
