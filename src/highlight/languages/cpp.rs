//! C++ and IDL.

use super::LanguageSpec;
use super::clike::{self, CLikeOptions, HashMode};
use crate::highlight::painter::PaintRule;
use crate::highlight::state_machine::StateTable;

#[rustfmt::skip]
pub const CPP_KEYWORDS: &[&str] = &[
    // C++
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "class", "const", "constexpr",
    "const_cast", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "final",
    "finally", "float", "for", "friend", "goto", "if", "inline", "int", "long", "mutable",
    "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or", "or_eq",
    "override", "private", "protected", "public", "register", "reinterpret_cast", "return",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct",
    "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
    "wchar_t", "while", "xor", "xor_eq",
    // Labels
    "default:", "protected:", "private:", "public:",
    // Preprocessor
    "#define", "#else", "#elif", "#endif", "#error", "#if", "#ifdef", "#ifndef", "#include",
    "#line", "#pragma", "#undef", "#import", "#using",
    // Predefined macros
    "__DATE__", "__FILE__", "__LINE__", "__STDC__", "__TIME__", "__TIMESTAMP__",
    "__COUNTER__", "__cplusplus", "__FUNCTION__", "_MSC_VER", "_WIN32", "_WIN64",
    // <stdint.h> and the C library
    "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t",
    "NULL", "div_t", "ldiv_t", "ptrdiff_t", "size_t", "va_arg", "va_end", "va_list",
    "va_start",
    // C++ library
    "std::find", "std::iterator", "std::list", "std::make_unique", "std::map", "std::max",
    "std::min", "std::move", "std::numeric_limits", "std::set", "std::string", "std::swap",
    "std::unique_ptr", "std::unordered_map", "std::unordered_set", "std::vector",
    // Microsoft extensions
    "__asm", "__cdecl", "__declspec", "__fastcall", "__forceinline", "__inline", "__int8",
    "__int16", "__int32", "__int64", "__stdcall", "__super", "__uuidof", "dllexport",
    "dllimport",
    // Win32
    "BOOL", "DWORD", "HANDLE", "HIWORD", "HKEY", "INVALID_HANDLE_VALUE", "LOWORD", "WORD",
    "interface",
];

#[rustfmt::skip]
pub const IDL_KEYWORDS: &[&str] = &[
    "any", "attribute", "boolean", "byte", "ByteString", "callback", "const", "deleter",
    "dictionary", "DOMString", "double", "enum", "false", "float", "getter", "implements",
    "includes", "Infinity", "inherit", "interface", "iterable", "legacycaller", "long",
    "maplike", "mixin", "namespace", "NaN", "null", "object", "octet", "optional", "or",
    "partial", "Promise", "readonly", "record", "required", "sequence", "setlike", "setter",
    "short", "static", "stringifier", "true", "typedef", "unrestricted", "unsigned",
    "USVString", "void",
    "#define", "#else", "#endif", "#if", "#ifdef", "#ifndef", "#include",
];

fn cpp_table() -> StateTable {
    clike::table("cpp", CLikeOptions::default().with_hash(HashMode::Preprocessor))
}

fn idl_table() -> StateTable {
    clike::table("idl", CLikeOptions::default().with_hash(HashMode::Preprocessor))
}

#[must_use]
pub fn cpp() -> LanguageSpec {
    LanguageSpec {
        id: "cpp",
        extensions: &["cc", "cpp", "cxx", "c", "h", "hh", "hpp", "hxx", "inl"],
        build_table: cpp_table,
        keywords: CPP_KEYWORDS,
        paint: PaintRule::Scoped,
    }
}

#[must_use]
pub fn idl() -> LanguageSpec {
    LanguageSpec {
        id: "idl",
        extensions: &["idl", "webidl"],
        build_table: idl_table,
        keywords: IDL_KEYWORDS,
        paint: PaintRule::Scoped,
    }
}
