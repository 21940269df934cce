use super::LanguageSpec;
use super::clike::{self, CLikeOptions};
use crate::highlight::painter::PaintRule;
use crate::highlight::state_machine::StateTable;

#[rustfmt::skip]
pub const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "of", "return", "super", "switch", "this", "throw", "try",
    "typeof", "var", "void", "while", "with", "yield", "async", "await", "static", "get",
    "set",
    "default:",
    // Literals
    "false", "null", "true",
    // Reserved
    "enum", "implements", "interface", "package", "private", "protected", "public",
    // Global values and functions
    "Infinity", "NaN", "undefined", "eval", "isFinite", "isNaN", "parseFloat", "parseInt",
    "decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent",
    // Fundamental objects
    "Object", "Object.assign", "Object.create", "Object.defineProperty",
    "Object.entries", "Object.freeze", "Object.getPrototypeOf", "Object.keys",
    "Object.seal", "Object.setPrototypeOf", "Object.values",
    "Function", "Boolean", "Symbol", "Error", "RangeError", "ReferenceError",
    "SyntaxError", "TypeError",
    // Numbers and dates
    "Number", "Number.EPSILON", "Number.MAX_SAFE_INTEGER", "Number.MAX_VALUE",
    "Number.MIN_VALUE", "Number.isFinite", "Number.isInteger", "Number.isNaN",
    "Number.parseFloat", "Number.parseInt",
    "Math", "Math.E", "Math.PI", "Math.abs", "Math.ceil", "Math.floor", "Math.log",
    "Math.max", "Math.min", "Math.pow", "Math.random", "Math.round", "Math.sign",
    "Math.sqrt", "Math.trunc",
    "Date", "Date.now", "Date.parse",
    // Text and collections
    "String", "String.fromCharCode", "String.fromCodePoint", "RegExp",
    "Array", "Array.from", "Array.isArray", "Array.of", "Float32Array", "Float64Array",
    "Int8Array", "Int16Array", "Int32Array", "Uint8Array", "Uint16Array", "Uint32Array",
    "Uint8ClampedArray", "Map", "Set", "WeakMap", "WeakSet", "ArrayBuffer", "DataView",
    "JSON", "JSON.parse", "JSON.stringify",
    "Promise", "Promise.all", "Promise.race", "Promise.reject", "Promise.resolve",
    "Reflect", "Proxy", "Intl", "arguments",
    "console.assert", "console.error", "console.log",
    // Object.prototype properties, matched after any receiver
    ".hasOwnProperty", ".isPrototypeOf", ".length", ".propertyIsEnumerable", ".prototype",
    ".toLocaleString", ".toString", ".valueOf",
];

fn table() -> StateTable {
    clike::table(
        "javascript",
        CLikeOptions::default()
            .with_quotes(b"\"'`")
            .with_multiline_quotes(b"`")
            .with_dollar()
            .with_dotted_words(),
    )
}

#[must_use]
pub fn spec() -> LanguageSpec {
    LanguageSpec {
        id: "javascript",
        extensions: &["js", "mjs", "cjs", "jsx"],
        build_table: table,
        keywords: KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: Some('.'),
            fold_case: false,
        },
    }
}
