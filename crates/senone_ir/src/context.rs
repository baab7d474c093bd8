use crate::{PhoneId, WordPosition};

/// The phonetic context a decision-tree question is asked about.
///
/// `left`/`right` are `None` when the unit has no neighbour on that side
/// (the "no context" value). Questions decide what `None` means; the resolver
/// passes it through untouched.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PhoneticContext {
    pub base: PhoneId,
    pub left: Option<PhoneId>,
    pub right: Option<PhoneId>,
    pub position: WordPosition,
}

impl PhoneticContext {
    pub fn new(
        base: PhoneId,
        left: Option<PhoneId>,
        right: Option<PhoneId>,
        position: WordPosition,
    ) -> Self {
        PhoneticContext {
            base,
            left,
            right,
            position,
        }
    }

    /// Context of a bare CI phone: no neighbours, undefined position.
    pub fn context_free(base: PhoneId) -> Self {
        PhoneticContext::new(base, None, None, WordPosition::Undefined)
    }
}
