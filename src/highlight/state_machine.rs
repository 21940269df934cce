//! Table-driven token state machines.
//!
//! A [`StateTable`] is a dense `(state, alphabet) -> state` transition table
//! plus per-state metadata. Characters are first reduced to an alphabet
//! class: bytes that behave identically in every state share a class, and
//! class 0 is "any other character", which also covers every code point at
//! or above 128.
//!
//! Tables are declared with [`StateTableBuilder`] as named states and
//! ordered transition rules over ASCII character classes.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::token::Syntax;

/// Index of a state in a [`StateTable`]. State 0 is the ground state.
pub type StateId = u16;

/// The ground state every token starts from.
pub const GROUND: StateId = 0;

/// Set of ASCII bytes a transition rule applies to.
#[derive(Clone, Copy, Debug)]
pub enum CharClass {
    Char(u8),
    Chars(&'static [u8]),
    Range(u8, u8),
    /// `A-Z` and `a-z`.
    Alpha,
    Digit,
    /// `A-Z`, `a-z`, `0-9` and `_`.
    Word,
    /// Space, tab, carriage return, form feed and vertical tab.
    Blank,
    /// Any printable or control ASCII byte.
    Any,
}

impl CharClass {
    #[must_use]
    pub fn matches(self, byte: u8) -> bool {
        match self {
            Self::Char(c) => byte == c,
            Self::Chars(set) => set.contains(&byte),
            Self::Range(lo, hi) => (lo..=hi).contains(&byte),
            Self::Alpha => byte.is_ascii_alphabetic(),
            Self::Digit => byte.is_ascii_digit(),
            Self::Word => byte.is_ascii_alphanumeric() || byte == b'_',
            Self::Blank => matches!(byte, b' ' | b'\t' | b'\r' | 0x0b | 0x0c),
            Self::Any => byte.is_ascii(),
        }
    }
}

#[derive(Debug)]
struct StateSpec {
    name: &'static str,
    syntax: Syntax,
    acceptable: bool,
    provisional: bool,
    rules: Vec<(CharClass, StateId)>,
    otherwise: StateId,
}

/// Declarative builder for a [`StateTable`].
///
/// For each state the first matching rule wins; bytes no rule matches, and
/// all non-ASCII characters, go to the state's `otherwise` target, which
/// defaults to the ground state.
#[derive(Debug)]
pub struct StateTableBuilder {
    name: &'static str,
    states: Vec<StateSpec>,
    initial: StateId,
}

impl StateTableBuilder {
    /// Start a table holding only the ground state.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            states: vec![StateSpec {
                name: "ground",
                syntax: Syntax::Normal,
                acceptable: false,
                provisional: false,
                rules: Vec::new(),
                otherwise: GROUND,
            }],
            initial: GROUND,
        }
    }

    /// Declare a new state.
    ///
    /// # Panics
    ///
    /// Panics if the table outgrows [`StateId`].
    pub fn state(&mut self, name: &'static str, syntax: Syntax) -> StateId {
        let id = StateId::try_from(self.states.len()).expect("too many states");
        self.states.push(StateSpec {
            name,
            syntax,
            acceptable: false,
            provisional: false,
            rules: Vec::new(),
            otherwise: GROUND,
        });
        id
    }

    /// Start scanning text from `state` instead of the ground state.
    ///
    /// The initial state stands for "nothing before this": a restart from it
    /// opens no token, so it is usually a state no rule targets.
    pub fn initial(&mut self, state: StateId) -> &mut Self {
        self.initial = state;
        self
    }

    /// Reaching `state` completes the token.
    pub fn acceptable(&mut self, state: StateId) -> &mut Self {
        self.spec(state).acceptable = true;
        self
    }

    /// A token in `state` adopts the category of the state that follows.
    pub fn provisional(&mut self, state: StateId) -> &mut Self {
        self.spec(state).provisional = true;
        self
    }

    pub fn on(&mut self, from: StateId, class: CharClass, to: StateId) -> &mut Self {
        self.spec(from).rules.push((class, to));
        self
    }

    pub fn otherwise(&mut self, from: StateId, to: StateId) -> &mut Self {
        self.spec(from).otherwise = to;
        self
    }

    /// Chain states spelling `word` from `from`, ending in `last`.
    ///
    /// Intermediate states share `syntax`; letters match in either case when
    /// `fold_case` is set. Returns the intermediate states.
    pub fn spell(
        &mut self,
        from: StateId,
        word: &'static [u8],
        syntax: Syntax,
        fold_case: bool,
        last: StateId,
    ) -> Vec<StateId> {
        let mut chain = Vec::new();
        let mut current = from;
        for (index, &byte) in word.iter().enumerate() {
            let next = if index + 1 == word.len() {
                last
            } else {
                let id = self.state("spell", syntax);
                chain.push(id);
                id
            };
            if fold_case && byte.is_ascii_alphabetic() {
                self.on(current, CharClass::Char(byte.to_ascii_lowercase()), next);
                self.on(current, CharClass::Char(byte.to_ascii_uppercase()), next);
            } else {
                self.on(current, CharClass::Char(byte), next);
            }
            current = next;
        }
        chain
    }

    fn spec(&mut self, state: StateId) -> &mut StateSpec {
        &mut self.states[usize::from(state)]
    }

    fn target(spec: &StateSpec, byte: u8) -> StateId {
        spec.rules
            .iter()
            .find(|(class, _)| class.matches(byte))
            .map_or(spec.otherwise, |&(_, to)| to)
    }

    /// Compute alphabet classes and the dense transition table.
    ///
    /// # Panics
    ///
    /// Panics if the ground state sends any alphabet class back to 0, or if
    /// a rule targets an undeclared state.
    #[must_use]
    pub fn build(self) -> StateTable {
        let state_count = self.states.len();
        assert!(
            usize::from(self.initial) < state_count,
            "{}: undeclared initial state {}",
            self.name,
            self.initial
        );
        for spec in &self.states {
            for &(_, to) in &spec.rules {
                assert!(usize::from(to) < state_count, "{}: undeclared state {to}", self.name);
            }
        }

        let other: Vec<StateId> = self.states.iter().map(|spec| spec.otherwise).collect();
        let mut classes: HashMap<Vec<StateId>, u8> = HashMap::new();
        let mut columns = vec![other.clone()];
        classes.insert(other, 0);

        let mut alphabet = [0u8; 128];
        for byte in 0u8..128 {
            let column: Vec<StateId> = self
                .states
                .iter()
                .map(|spec| Self::target(spec, byte))
                .collect();
            let next_class = u8::try_from(columns.len()).expect("too many alphabet classes");
            let class = *classes.entry(column.clone()).or_insert_with(|| {
                columns.push(column);
                next_class
            });
            alphabet[usize::from(byte)] = class;
        }

        let alphabet_count = columns.len();
        let mut transitions = vec![GROUND; state_count * alphabet_count];
        for (class, column) in columns.iter().enumerate() {
            for (state, &to) in column.iter().enumerate() {
                transitions[state * alphabet_count + class] = to;
            }
        }

        for (class, column) in columns.iter().enumerate() {
            assert_ne!(
                column[0], GROUND,
                "{}: ground state maps alphabet {class} to 0",
                self.name
            );
        }

        StateTable {
            name: self.name,
            initial: self.initial,
            alphabet,
            alphabet_count,
            transitions,
            acceptable: self.states.iter().map(|s| s.acceptable).collect(),
            provisional: self.states.iter().map(|s| s.provisional).collect(),
            syntax: self.states.iter().map(|s| s.syntax).collect(),
            state_names: self.states.iter().map(|s| s.name).collect(),
        }
    }
}

/// Immutable transition table and per-state metadata for one language.
pub struct StateTable {
    name: &'static str,
    initial: StateId,
    alphabet: [u8; 128],
    alphabet_count: usize,
    transitions: Vec<StateId>,
    acceptable: Vec<bool>,
    provisional: Vec<bool>,
    syntax: Vec<Syntax>,
    state_names: Vec<&'static str>,
}

impl StateTable {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// State the machine is in before the first character of a text.
    #[must_use]
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Alphabet class of a character code.
    #[must_use]
    pub fn alphabet_of(&self, code: u32) -> u8 {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.alphabet.get(index))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn transition(&self, state: StateId, alphabet: u8) -> StateId {
        self.transitions[usize::from(state) * self.alphabet_count + usize::from(alphabet)]
    }

    #[must_use]
    pub fn max_state(&self) -> StateId {
        StateId::try_from(self.syntax.len() - 1).unwrap_or(StateId::MAX)
    }

    /// Largest alphabet class in use.
    #[must_use]
    pub fn max_alphabet(&self) -> u8 {
        u8::try_from(self.alphabet_count - 1).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    #[must_use]
    pub fn is_acceptable(&self, state: StateId) -> bool {
        self.acceptable[usize::from(state)]
    }

    #[must_use]
    pub fn is_provisional(&self, state: StateId) -> bool {
        self.provisional[usize::from(state)]
    }

    #[must_use]
    pub fn syntax_of(&self, state: StateId) -> Syntax {
        self.syntax[usize::from(state)]
    }

    #[must_use]
    pub fn state_name(&self, state: StateId) -> &'static str {
        self.state_names[usize::from(state)]
    }
}

impl fmt::Debug for StateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTable")
            .field("name", &self.name)
            .field("states", &self.syntax.len())
            .field("alphabets", &self.alphabet_count)
            .finish_non_exhaustive()
    }
}

/// Outcome of feeding one character with [`TokenStateMachine::feed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// The raw transition returned 0, so the character starts a new token.
    pub restarted: bool,
    pub state: StateId,
}

/// A run of characters produced by [`TokenStateMachine::scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub range: Range<usize>,
    pub syntax: Syntax,
    /// Machine state after the last character, 0 if the run completed.
    pub end_state: StateId,
}

/// Cursor over a shared [`StateTable`].
#[derive(Clone, Debug)]
pub struct TokenStateMachine {
    table: Arc<StateTable>,
    state: StateId,
}

impl TokenStateMachine {
    #[must_use]
    pub fn new(table: Arc<StateTable>) -> Self {
        Self {
            table,
            state: GROUND,
        }
    }

    #[must_use]
    pub fn table(&self) -> &Arc<StateTable> {
        &self.table
    }

    #[must_use]
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Advance by one character with the raw transition.
    ///
    /// A result of 0 means the character does not extend the current token;
    /// the caller feeds it again from the ground state.
    pub fn update_state(&mut self, code: u32) -> StateId {
        let alphabet = self.table.alphabet_of(code);
        self.state = self.table.transition(self.state, alphabet);
        self.state
    }

    /// Advance by one character, re-feeding it from the ground state when
    /// the raw transition returns 0.
    pub fn feed(&mut self, code: u32) -> Step {
        let state = self.update_state(code);
        if state != GROUND {
            return Step {
                restarted: false,
                state,
            };
        }
        Step {
            restarted: true,
            state: self.update_state(code),
        }
    }

    /// Force the machine into `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not a state of the table.
    pub fn reset_to(&mut self, state: StateId) {
        assert!(
            state <= self.table.max_state(),
            "{}: state {state} out of range",
            self.table.name()
        );
        self.state = state;
    }

    #[must_use]
    pub fn is_acceptable(&self, state: StateId) -> bool {
        self.table.is_acceptable(state)
    }

    #[must_use]
    pub fn is_provisional(&self, state: StateId) -> bool {
        self.table.is_provisional(state)
    }

    #[must_use]
    pub fn syntax_of(&self, state: StateId) -> Syntax {
        self.table.syntax_of(state)
    }

    /// Split `text` into runs from the table's initial state.
    ///
    /// Offsets are in chars. Uses the same boundary rules as the document
    /// tokenizer: a restart, a category change outside a provisional run, or
    /// an acceptable state ends a run.
    pub fn scan(&mut self, text: &str) -> Vec<Lexeme> {
        struct Open {
            start: usize,
            syntax: Syntax,
            provisional: bool,
        }

        self.reset_to(self.table.initial());
        let mut lexemes = Vec::new();
        let mut open: Option<Open> = None;
        let mut offset = 0;
        for ch in text.chars() {
            let last_state = self.state;
            let step = self.feed(u32::from(ch));
            if step.restarted {
                if let Some(run) = open.take() {
                    lexemes.push(Lexeme {
                        range: run.start..offset,
                        syntax: run.syntax,
                        end_state: last_state,
                    });
                }
            }

            let syntax = self.syntax_of(step.state);
            let provisional = self.is_provisional(step.state);
            match open.as_mut() {
                Some(run) if run.provisional || run.syntax == syntax => {
                    run.syntax = syntax;
                    run.provisional = provisional;
                }
                Some(run) => {
                    lexemes.push(Lexeme {
                        range: run.start..offset,
                        syntax: run.syntax,
                        end_state: last_state,
                    });
                    open = Some(Open {
                        start: offset,
                        syntax,
                        provisional,
                    });
                }
                None => {
                    open = Some(Open {
                        start: offset,
                        syntax,
                        provisional,
                    });
                }
            }

            offset += 1;
            if self.is_acceptable(step.state) {
                if let Some(run) = open.take() {
                    lexemes.push(Lexeme {
                        range: run.start..offset,
                        syntax: run.syntax,
                        end_state: GROUND,
                    });
                }
                self.state = GROUND;
            }
        }
        if let Some(run) = open {
            lexemes.push(Lexeme {
                range: run.start..offset,
                syntax: run.syntax,
                end_state: self.state,
            });
        }
        lexemes
    }
}
