//! Java and C#.

use super::LanguageSpec;
use super::clike::{self, CLikeOptions, HashMode};
use crate::highlight::painter::PaintRule;
use crate::highlight::state_machine::StateTable;

#[rustfmt::skip]
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "var", "void", "volatile", "while",
    "false", "null", "true",
    "default:",
    // java.lang
    "Boolean", "Byte", "Character", "Class", "Double", "Exception", "Float", "Integer",
    "Iterable", "Long", "Math", "Number", "Object", "Override", "Runnable",
    "RuntimeException", "Short", "String", "StringBuilder", "System", "Thread", "Throwable",
    "Void",
    "System.err", "System.in", "System.out",
    ".equals", ".hashCode", ".length", ".toString",
];

#[rustfmt::skip]
pub const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
    "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
    "virtual", "void", "volatile", "while",
    // Contextual
    "add", "async", "await", "dynamic", "get", "global", "partial", "remove", "set", "value",
    "var", "where", "yield",
    "default:",
    // Preprocessor
    "#define", "#elif", "#else", "#endif", "#endregion", "#error", "#if", "#line", "#pragma",
    "#region", "#undef", "#warning",
    "Console", "Console.WriteLine", "Exception", "Math", "Object", "String", "System",
    ".Length", ".ToString",
];

fn java_table() -> StateTable {
    clike::table("java", CLikeOptions::default().with_dollar().with_dotted_words())
}

fn csharp_table() -> StateTable {
    clike::table(
        "csharp",
        CLikeOptions::default()
            .with_hash(HashMode::Preprocessor)
            .with_dotted_words(),
    )
}

#[must_use]
pub fn java() -> LanguageSpec {
    LanguageSpec {
        id: "java",
        extensions: &["java"],
        build_table: java_table,
        keywords: JAVA_KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: Some('.'),
            fold_case: false,
        },
    }
}

#[must_use]
pub fn csharp() -> LanguageSpec {
    LanguageSpec {
        id: "csharp",
        extensions: &["cs"],
        build_table: csharp_table,
        keywords: CSHARP_KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: Some('.'),
            fold_case: false,
        },
    }
}
