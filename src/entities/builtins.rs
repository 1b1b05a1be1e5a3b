//! Keywords and standard-library names excluded from identifier reporting

use once_cell::sync::Lazy;
use std::collections::HashSet;

const PYTHON: &[&str] = &[
    "int", "float", "str", "bool", "list", "dict", "set", "tuple", "object",
    "Exception", "BaseException", "type", "complex", "bytes", "bytearray",
    "memoryview", "range", "enumerate", "zip", "map", "filter", "slice",
    "frozenset", "super", "NotImplemented", "Ellipsis", "__name__", "__file__",
    "self", "__init__", "print",
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "False", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass",
    "raise", "return", "True", "try", "while", "with", "yield",
];

const JAVA: &[&str] = &[
    "String", "Object", "Integer", "Double", "Float", "Boolean", "Long", "Short",
    "Byte", "Character", "List", "Map", "Set", "ArrayList", "HashMap", "HashSet",
    "LinkedList", "Queue", "Deque", "Vector", "Exception", "RuntimeException",
    "IOException", "Thread", "System", "Throwable", "Cloneable", "Iterable",
    "Comparable", "AutoCloseable", "println", "out",
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "final", "finally", "float", "for", "goto", "if", "implements",
    "import", "instanceof", "int", "interface", "long", "native", "new",
    "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

const ECMASCRIPT: &[&str] = &[
    "String", "Number", "Boolean", "Object", "Array", "Map", "Set", "WeakMap",
    "WeakSet", "Promise", "Function", "Symbol", "BigInt", "Error", "TypeError",
    "Date", "RegExp", "console", "window", "document", "Intl", "Math", "Reflect",
    "JSON", "constructor", "string",
    "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally",
    "for", "function", "if", "import", "in", "instanceof", "new", "null", "return",
    "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
    "while", "with", "yield",
    // TypeScript
    "any", "void", "never", "unknown", "undefined", "null", "ReadonlyArray",
    "Record", "Partial", "Pick", "Omit", "keyof", "infer", "readonly", "declare",
    "namespace", "module", "type", "interface", "implements", "abstract",
];

const CSHARP: &[&str] = &[
    "string", "int", "float", "double", "decimal", "bool", "char", "object",
    "List", "Dictionary", "HashSet", "Array", "Queue", "Stack", "Exception",
    "System", "DateTime", "Task", "Console", "Enumerable", "IEnumerable",
    "IDisposable", "Nullable", "Span", "ReadOnlySpan",
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char",
    "checked", "class", "const", "continue", "decimal", "default", "delegate",
    "do", "double", "else", "enum", "event", "explicit", "extern", "false",
    "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit",
    "in", "int", "interface", "internal", "is", "lock", "long", "namespace",
    "new", "null", "object", "operator", "out", "override", "params", "private",
    "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
    "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe",
    "ushort", "using", "virtual", "void", "volatile", "while",
];

/// Union of all per-language lists. The set is deliberately language-agnostic:
/// `String` is excluded from Python output just as `self` is from C#.
static BUILTINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    PYTHON
        .iter()
        .chain(JAVA)
        .chain(ECMASCRIPT)
        .chain(CSHARP)
        .copied()
        .collect()
});

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_cover_every_language() {
        for name in ["self", "print", "System", "console", "keyof", "foreach", "__init__"] {
            assert!(is_builtin(name), "{name} should be builtin");
        }
    }

    #[test]
    fn test_user_names_are_not_builtin() {
        for name in ["greet", "Greeter", "__main__", "x", "Self", "Print"] {
            assert!(!is_builtin(name), "{name} should not be builtin");
        }
    }
}
