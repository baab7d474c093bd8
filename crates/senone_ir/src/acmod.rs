//! Acoustic-model catalog.
//!
//! Holds the CI phones (with their attributes, e.g. `filler`) and the CD
//! units built on top of them. CI phones must all be declared before the
//! first CD unit so that `AcmodId` and `PhoneId` agree on the CI range.

use rustc_hash::FxHashMap;

use crate::{AcmodId, PhoneId, PhoneticContext};

/// Attribute marking a non-linguistic unit (silence, noise).
const FILLER_ATTRIBUTE: &str = "filler";

/// A context-independent phone.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CiPhone {
    pub name: String,
    pub attributes: Vec<String>,
}

impl CiPhone {
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn is_filler(&self) -> bool {
        self.has_attribute(FILLER_ATTRIBUTE)
    }
}

/// A context-dependent unit: a base phone in a particular context.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CdUnit {
    pub context: PhoneticContext,
    pub attributes: Vec<String>,
}

/// Error when building an [`AcmodSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcmodError {
    /// A CI phone name was declared twice.
    DuplicatePhone(String),
    /// A CD unit with the same context was declared twice.
    DuplicateUnit(String),
    /// A CI phone was declared after CD units.
    PhoneAfterUnits(String),
    /// A CD unit refers to a phone id outside the CI table.
    UnknownPhone(u32),
    /// More units than fit in a `u32` id.
    Overflow,
}

impl std::fmt::Display for AcmodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcmodError::DuplicatePhone(name) => write!(f, "phone '{name}' is declared twice"),
            AcmodError::DuplicateUnit(name) => write!(f, "unit '{name}' is declared twice"),
            AcmodError::PhoneAfterUnits(name) => write!(
                f,
                "phone '{name}' is declared after context-dependent units"
            ),
            AcmodError::UnknownPhone(raw) => write!(f, "phone id {raw} is not a declared phone"),
            AcmodError::Overflow => write!(f, "too many acoustic-model units"),
        }
    }
}

impl std::error::Error for AcmodError {}

/// The acoustic-model catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcmodSet {
    ci: Vec<CiPhone>,
    cd: Vec<CdUnit>,
    ci_by_name: FxHashMap<String, PhoneId>,
    cd_by_context: FxHashMap<PhoneticContext, AcmodId>,
}

impl AcmodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a CI phone.
    pub fn add_phone(
        &mut self,
        name: impl Into<String>,
        attributes: Vec<String>,
    ) -> Result<PhoneId, AcmodError> {
        let name = name.into();
        if !self.cd.is_empty() {
            return Err(AcmodError::PhoneAfterUnits(name));
        }
        if self.ci_by_name.contains_key(&name) {
            return Err(AcmodError::DuplicatePhone(name));
        }
        let id = PhoneId::new(u32::try_from(self.ci.len()).map_err(|_| AcmodError::Overflow)?);
        self.ci_by_name.insert(name.clone(), id);
        self.ci.push(CiPhone { name, attributes });
        Ok(id)
    }

    /// Declare a CD unit.
    pub fn add_unit(
        &mut self,
        context: PhoneticContext,
        attributes: Vec<String>,
    ) -> Result<AcmodId, AcmodError> {
        for phone in [Some(context.base), context.left, context.right]
            .into_iter()
            .flatten()
        {
            if phone.index() >= self.ci.len() {
                return Err(AcmodError::UnknownPhone(phone.raw()));
            }
        }
        if self.cd_by_context.contains_key(&context) {
            return Err(AcmodError::DuplicateUnit(self.context_name(&context)));
        }
        let index = self.ci.len() + self.cd.len();
        let id = AcmodId::new(u32::try_from(index).map_err(|_| AcmodError::Overflow)?);
        self.cd_by_context.insert(context, id);
        self.cd.push(CdUnit {
            context,
            attributes,
        });
        Ok(id)
    }

    /// Number of CI phones.
    #[inline]
    pub fn n_ci(&self) -> usize {
        self.ci.len()
    }

    /// Number of CD units.
    #[inline]
    pub fn n_cd(&self) -> usize {
        self.cd.len()
    }

    /// Total number of units.
    #[inline]
    pub fn n_acmod(&self) -> usize {
        self.ci.len() + self.cd.len()
    }

    /// Iterate CI phones in id order.
    pub fn phones(&self) -> impl Iterator<Item = (PhoneId, &CiPhone)> {
        (0u32..).zip(&self.ci).map(|(i, p)| (PhoneId::new(i), p))
    }

    pub fn phone(&self, phone: PhoneId) -> Option<&CiPhone> {
        self.ci.get(phone.index())
    }

    pub fn phone_id(&self, name: &str) -> Option<PhoneId> {
        self.ci_by_name.get(name).copied()
    }

    /// Name of a CI phone, or `?` for an id outside the table.
    pub fn phone_name(&self, phone: PhoneId) -> &str {
        self.phone(phone).map_or("?", |p| p.name.as_str())
    }

    pub fn is_filler(&self, phone: PhoneId) -> bool {
        self.phone(phone).is_some_and(CiPhone::is_filler)
    }

    #[inline]
    pub fn is_ci(&self, acmod: AcmodId) -> bool {
        acmod.index() < self.ci.len()
    }

    pub fn unit(&self, acmod: AcmodId) -> Option<&CdUnit> {
        acmod
            .index()
            .checked_sub(self.ci.len())
            .and_then(|i| self.cd.get(i))
    }

    /// The `(base, left, right, position)` tuple of any unit.
    ///
    /// CI units yield a context-free tuple.
    pub fn context(&self, acmod: AcmodId) -> Option<PhoneticContext> {
        if self.is_ci(acmod) {
            Some(PhoneticContext::context_free(PhoneId::new(acmod.raw())))
        } else {
            self.unit(acmod).map(|u| u.context)
        }
    }

    /// Attributes of any unit.
    pub fn attributes(&self, acmod: AcmodId) -> &[String] {
        if let Some(phone) = self.ci.get(acmod.index()) {
            &phone.attributes
        } else {
            self.unit(acmod).map_or(&[][..], |u| u.attributes.as_slice())
        }
    }

    /// Human-readable unit name: `AA` for CI phones, `AA(SIL,B)b` for CD units.
    pub fn unit_name(&self, acmod: AcmodId) -> String {
        match self.context(acmod) {
            Some(ctx) if self.is_ci(acmod) => self.phone_name(ctx.base).to_string(),
            Some(ctx) => self.context_name(&ctx),
            None => format!("<unit {}>", acmod.raw()),
        }
    }

    fn context_name(&self, ctx: &PhoneticContext) -> String {
        let side = |p: Option<PhoneId>| p.map_or("-", |p| self.phone_name(p));
        format!(
            "{}({},{}){}",
            self.phone_name(ctx.base),
            side(ctx.left),
            side(ctx.right),
            ctx.position
        )
    }
}
