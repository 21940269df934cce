//! Built-in languages: a state table, a keyword list and a paint rule each.

pub mod clike;
pub mod cmd;
pub mod cpp;
pub mod css;
pub mod java;
pub mod javascript;
pub mod markup;
pub mod python;

use std::fmt;

use super::painter::PaintRule;
use super::state_machine::StateTable;

/// Everything needed to highlight one language.
#[derive(Clone)]
pub struct LanguageSpec {
    pub id: &'static str,
    /// File extensions without the dot.
    pub extensions: &'static [&'static str],
    pub build_table: fn() -> StateTable,
    pub keywords: &'static [&'static str],
    pub paint: PaintRule,
}

impl fmt::Debug for LanguageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageSpec")
            .field("id", &self.id)
            .field("extensions", &self.extensions)
            .field("keywords", &self.keywords.len())
            .field("paint", &self.paint)
            .finish_non_exhaustive()
    }
}

/// Every built-in language, embedded languages before their hosts.
#[must_use]
pub fn builtins() -> Vec<LanguageSpec> {
    vec![
        cmd::spec(),
        cpp::cpp(),
        java::csharp(),
        css::spec(),
        python::gn(),
        cpp::idl(),
        java::java(),
        javascript::spec(),
        python::python(),
        markup::xml(),
        markup::html(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_tables_build() {
        for spec in builtins() {
            let table = (spec.build_table)();
            assert_eq!(table.name(), spec.id);
            assert!(table.max_state() > 0);
        }
        assert_eq!(markup::tag_table().name(), "xmltag");
    }

    #[test]
    fn ids_and_extensions_are_unique() {
        let specs = builtins();
        let ids: HashSet<_> = specs.iter().map(|spec| spec.id).collect();
        assert_eq!(ids.len(), specs.len());
        let mut extensions = HashSet::new();
        for spec in &specs {
            for ext in spec.extensions {
                assert!(extensions.insert(*ext), "duplicate extension {ext}");
            }
        }
    }
}
