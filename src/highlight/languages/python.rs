//! Python and GN build files.

use super::LanguageSpec;
use super::clike::{self, CLikeOptions, HashMode};
use crate::highlight::painter::PaintRule;
use crate::highlight::state_machine::StateTable;

#[rustfmt::skip]
pub const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
    "yield",
    "False", "None", "True",
    // Builtins
    "abs", "all", "any", "bool", "bytes", "dict", "enumerate", "filter", "float", "format",
    "getattr", "hasattr", "int", "isinstance", "iter", "len", "list", "map", "max", "min",
    "next", "object", "open", "print", "range", "repr", "reversed", "self", "set",
    "setattr", "sorted", "str", "sum", "super", "tuple", "type", "zip",
    "Exception", "KeyError", "IndexError", "TypeError", "ValueError",
    "os.path", "sys.argv", "sys.exit", "sys.stderr", "sys.stdout",
    ".append", ".items", ".join", ".keys", ".split", ".values",
];

#[rustfmt::skip]
pub const GN_KEYWORDS: &[&str] = &[
    "else", "false", "foreach", "if", "import", "template", "true",
    // Functions
    "action", "action_foreach", "assert", "config", "copy", "declare_args", "defined",
    "executable", "exec_script", "forward_variables_from", "get_label_info",
    "get_path_info", "get_target_outputs", "getenv", "group", "loadable_module", "print",
    "process_file_template", "read_file", "rebase_path", "set_default_toolchain",
    "set_defaults", "shared_library", "source_set", "static_library", "write_file",
    // Variables
    "all_dependent_configs", "args", "cflags", "configs", "current_cpu", "current_os",
    "data", "data_deps", "defines", "deps", "include_dirs", "inputs", "ldflags", "libs",
    "outputs", "public", "public_configs", "public_deps", "script", "sources", "target_cpu",
    "target_os", "testonly", "visibility",
];

fn python_table() -> StateTable {
    clike::table(
        "python",
        CLikeOptions::default()
            .with_hash(HashMode::LineComment)
            .without_slash_comments()
            .with_triple_quotes()
            .with_dotted_words(),
    )
}

fn gn_table() -> StateTable {
    clike::table(
        "gn",
        CLikeOptions::default()
            .with_hash(HashMode::LineComment)
            .without_slash_comments()
            .with_quotes(b"\""),
    )
}

#[must_use]
pub fn python() -> LanguageSpec {
    LanguageSpec {
        id: "python",
        extensions: &["py", "pyw"],
        build_table: python_table,
        keywords: PYTHON_KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: Some('.'),
            fold_case: false,
        },
    }
}

#[must_use]
pub fn gn() -> LanguageSpec {
    LanguageSpec {
        id: "gn",
        extensions: &["gn", "gni"],
        build_table: gn_table,
        keywords: GN_KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: None,
            fold_case: false,
        },
    }
}
