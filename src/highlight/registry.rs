//! Language lookup by id and file extension.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::engine::{HighlightEngine, HighlightOptions};
use super::keywords::KeywordSet;
use super::languages::{self, LanguageSpec};
use super::markup_painter::MarkupPainter;
use super::painter::{CompositePainter, KeywordPainter, PaintRule, Painter, ScopedPainter};
use super::state_machine::{StateTable, TokenStateMachine};
use super::tokenizer::Tokenizer;
use crate::error::{Error, Result};

#[derive(Debug)]
struct Language {
    spec: LanguageSpec,
    table: Arc<StateTable>,
    keywords: KeywordSet,
}

/// Languages known to an application, built once at startup.
///
/// Tables are built on registration and shared by every tokenizer created
/// afterwards. Each language has one keyword set; painters hold handles to
/// it, so words added at runtime show up in every existing engine on its
/// next paint.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    by_id: HashMap<String, usize>,
    by_extension: HashMap<String, usize>,
    tag_table: Arc<StateTable>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
            by_id: HashMap::new(),
            by_extension: HashMap::new(),
            tag_table: Arc::new(languages::markup::tag_table()),
        }
    }

    /// Create registry with all built-in languages.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for spec in languages::builtins() {
            registry.register(spec);
        }
        registry
    }

    /// Register a language. Later registrations override existing lookups.
    pub fn register(&mut self, spec: LanguageSpec) {
        let table = Arc::new((spec.build_table)());
        debug!(
            language = spec.id,
            states = usize::from(table.max_state()) + 1,
            alphabets = usize::from(table.max_alphabet()) + 1,
            "register"
        );
        let index = self.languages.len();
        self.by_id.insert(spec.id.to_ascii_lowercase(), index);
        for ext in spec.extensions {
            let key = ext.trim_start_matches('.').to_ascii_lowercase();
            if !key.is_empty() {
                self.by_extension.insert(key, index);
            }
        }
        let keywords = KeywordSet::from_words(spec.keywords.iter().copied());
        self.languages.push(Language {
            spec,
            table,
            keywords,
        });
    }

    fn get(&self, id: &str) -> Result<&Language> {
        self.by_id
            .get(&id.to_ascii_lowercase())
            .map(|&index| &self.languages[index])
            .ok_or_else(|| Error::UnknownLanguage(id.to_string()))
    }

    pub fn language(&self, id: &str) -> Result<&LanguageSpec> {
        self.get(id).map(|language| &language.spec)
    }

    /// Registered ids, in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self
            .by_id
            .values()
            .map(|&index| (index, self.languages[index].spec.id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Language id for a file extension (case-insensitive, with or without
    /// the dot).
    pub fn for_extension(&self, ext: &str) -> Result<&'static str> {
        let key = ext.trim_start_matches('.').to_ascii_lowercase();
        self.by_extension
            .get(&key)
            .map(|&index| self.languages[index].spec.id)
            .ok_or_else(|| Error::UnknownExtension(ext.to_string()))
    }

    pub fn table(&self, id: &str) -> Result<Arc<StateTable>> {
        self.get(id).map(|language| Arc::clone(&language.table))
    }

    /// The language's shared keyword set.
    pub fn keywords_for(&self, id: &str) -> Result<KeywordSet> {
        self.get(id).map(|language| language.keywords.clone())
    }

    /// Add a keyword at runtime. Returns `false` if it was already there.
    pub fn add_keyword(&self, id: &str, word: &str) -> Result<bool> {
        Ok(self.get(id)?.keywords.insert(word))
    }

    pub fn create_tokenizer(&self, id: &str) -> Result<Tokenizer> {
        self.create_nested(id, &mut Vec::new())
    }

    pub fn create_engine(&self, id: &str, options: HighlightOptions) -> Result<HighlightEngine> {
        let tokenizer = self.create_tokenizer(id)?;
        let language = self.get(id)?.spec.id;
        Ok(HighlightEngine::new(language, tokenizer, options))
    }

    fn create_nested(&self, id: &str, stack: &mut Vec<&'static str>) -> Result<Tokenizer> {
        let language = self.get(id)?;
        if stack.contains(&language.spec.id) {
            return Err(Error::EmbeddingCycle(language.spec.id.to_string()));
        }
        let keywords = language.keywords.clone();
        let painter = match &language.spec.paint {
            PaintRule::Plain => Painter::Plain,
            PaintRule::Keyword {
                delimiter,
                fold_case,
            } => Painter::Keyword(KeywordPainter::new(keywords, *delimiter, *fold_case)),
            PaintRule::Scoped => Painter::Scoped(ScopedPainter::new(keywords)),
            PaintRule::Markup => {
                Painter::Markup(MarkupPainter::new(keywords, Arc::clone(&self.tag_table)))
            }
            PaintRule::Composite { embedded } => {
                let host = MarkupPainter::new(keywords, Arc::clone(&self.tag_table));
                let mut composite = CompositePainter::new(host);
                stack.push(language.spec.id);
                for rule in embedded {
                    let tokenizer = self.create_nested(rule.language, stack)?;
                    composite.embed(rule.clone(), tokenizer);
                }
                stack.pop();
                Painter::Composite(Box::new(composite))
            }
        };
        let machine = TokenStateMachine::new(Arc::clone(&language.table));
        Ok(Tokenizer::new(machine, painter))
    }
}
