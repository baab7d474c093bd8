//! Phonetic questions and the catalog that answers them.
//!
//! A question names a phone set and a context role. Phone-membership sets
//! ask "is the left/base/right phone in this set?"; word-boundary sets ask
//! "is the unit at one of these word positions?" and ignore the role.
//!
//! Tree nodes hold [`CompoundQuestion`]s: a disjunction of conjunctions of
//! simple questions. Most trees only use single-term compounds.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use senone_ir::{PhoneId, PhoneticContext, WordPosition};

/// Which phone of the context a question inspects.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ContextRole {
    Left,
    Base,
    Right,
}

impl ContextRole {
    /// Parse the offset notation used by tree files (`-1`, `0`, `1`).
    pub fn from_offset(offset: i64) -> Option<Self> {
        match offset {
            -1 => Some(ContextRole::Left),
            0 => Some(ContextRole::Base),
            1 => Some(ContextRole::Right),
            _ => None,
        }
    }

    pub fn offset(self) -> i8 {
        match self {
            ContextRole::Left => -1,
            ContextRole::Base => 0,
            ContextRole::Right => 1,
        }
    }

    /// The phone this role refers to; `None` is the no-context value.
    #[inline]
    pub fn select(self, context: &PhoneticContext) -> Option<PhoneId> {
        match self {
            ContextRole::Left => context.left,
            ContextRole::Base => Some(context.base),
            ContextRole::Right => context.right,
        }
    }
}

/// Index into a [`QuestionCatalog`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct PhoneSetId(u32);

impl PhoneSetId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        PhoneSetId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PhoneSetKind {
    /// Membership over CI phones, indexed by `PhoneId`.
    Phones {
        members: Vec<bool>,
        /// Whether the no-context value counts as a member.
        no_context: bool,
    },
    /// Membership over word positions, indexed by `WordPosition::index`.
    WordBoundary { positions: [bool; 5] },
}

/// A named set a question can refer to.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PhoneSet {
    pub name: String,
    pub kind: PhoneSetKind,
}

impl PhoneSet {
    pub fn phones(
        name: impl Into<String>,
        members: impl IntoIterator<Item = PhoneId>,
        no_context: bool,
    ) -> Self {
        let mut table = Vec::new();
        for phone in members {
            if table.len() <= phone.index() {
                table.resize(phone.index() + 1, false);
            }
            table[phone.index()] = true;
        }
        PhoneSet {
            name: name.into(),
            kind: PhoneSetKind::Phones {
                members: table,
                no_context,
            },
        }
    }

    pub fn word_boundary(
        name: impl Into<String>,
        positions: impl IntoIterator<Item = WordPosition>,
    ) -> Self {
        let mut table = [false; 5];
        for posn in positions {
            table[posn.index()] = true;
        }
        PhoneSet {
            name: name.into(),
            kind: PhoneSetKind::WordBoundary { positions: table },
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.kind {
            PhoneSetKind::Phones {
                members,
                no_context,
            } => !no_context && !members.iter().any(|&m| m),
            PhoneSetKind::WordBoundary { positions } => !positions.iter().any(|&p| p),
        }
    }

    /// Answer this set's question for `role` of `context`.
    pub fn contains(&self, role: ContextRole, context: &PhoneticContext) -> bool {
        match &self.kind {
            PhoneSetKind::Phones {
                members,
                no_context,
            } => match role.select(context) {
                Some(phone) => members.get(phone.index()).copied().unwrap_or(false),
                None => *no_context,
            },
            PhoneSetKind::WordBoundary { positions } => positions[context.position.index()],
        }
    }
}

/// `[!]SET ROLE`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SimpleQuestion {
    pub set: PhoneSetId,
    pub role: ContextRole,
    pub negated: bool,
}

impl SimpleQuestion {
    pub fn new(set: PhoneSetId, role: ContextRole) -> Self {
        SimpleQuestion {
            set,
            role,
            negated: false,
        }
    }

    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

/// Terms of one conjunction; nearly always short.
pub type Conjunction = SmallVec<[SimpleQuestion; 4]>;

/// A disjunction of conjunctions of simple questions.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CompoundQuestion {
    conjunctions: Vec<Conjunction>,
}

impl CompoundQuestion {
    pub fn new(conjunctions: Vec<Conjunction>) -> Self {
        CompoundQuestion { conjunctions }
    }

    /// A compound consisting of a single simple question.
    pub fn simple(question: SimpleQuestion) -> Self {
        let mut conj = Conjunction::new();
        conj.push(question);
        CompoundQuestion::new(vec![conj])
    }
}

/// Error when building a [`QuestionCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionError {
    #[error("phone set '{0}' is defined twice")]
    DuplicateSet(String),
    #[error("phone set '{0}' has no members")]
    EmptySet(String),
    #[error("too many phone sets")]
    TooManySets,
}

/// All phone sets usable by trees, by name and by id.
#[derive(Clone, Debug, Default)]
pub struct QuestionCatalog {
    sets: Vec<PhoneSet>,
    by_name: FxHashMap<String, PhoneSetId>,
}

impl QuestionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, set: PhoneSet) -> Result<PhoneSetId, QuestionError> {
        if self.by_name.contains_key(&set.name) {
            return Err(QuestionError::DuplicateSet(set.name));
        }
        if set.is_empty() {
            return Err(QuestionError::EmptySet(set.name));
        }
        let index = u32::try_from(self.sets.len()).map_err(|_| QuestionError::TooManySets)?;
        let id = PhoneSetId::new(index);
        self.by_name.insert(set.name.clone(), id);
        self.sets.push(set);
        Ok(id)
    }

    /// Number of phone sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, id: PhoneSetId) -> Option<&PhoneSet> {
        self.sets.get(id.index())
    }

    pub fn id(&self, name: &str) -> Option<PhoneSetId> {
        self.by_name.get(name).copied()
    }

    /// Evaluate a simple question. Unknown set ids answer `false`.
    pub fn eval(&self, question: &SimpleQuestion, context: &PhoneticContext) -> bool {
        let answer = self
            .get(question.set)
            .is_some_and(|set| set.contains(question.role, context));
        answer != question.negated
    }

    /// Evaluate a compound question: true if any conjunction has all terms true.
    pub fn eval_compound(&self, question: &CompoundQuestion, context: &PhoneticContext) -> bool {
        question
            .conjunctions
            .iter()
            .any(|conj| conj.iter().all(|q| self.eval(q, context)))
    }

    /// Render a compound question in tree-file notation, e.g. `((VOWEL -1)(!NASAL 1))`.
    pub fn describe(&self, question: &CompoundQuestion) -> String {
        let mut out = String::from("(");
        for conj in &question.conjunctions {
            out.push('(');
            for (i, q) in conj.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                if q.negated {
                    out.push('!');
                }
                let name = self.get(q.set).map_or("?", |s| s.name.as_str());
                let _ = write!(out, "{name} {}", q.role.offset());
            }
            out.push(')');
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests;
