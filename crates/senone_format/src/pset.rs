//! Phone-set files.
//!
//! One set per line: a name followed by its members.
//!
//! ```text
//! VOWEL      AA AE AH
//! SILENCE    SIL -
//! WDBNDRY_B
//! WDBNDRY_ES
//! ```
//!
//! Members are CI phone names; `-` adds the no-context value. A name of the
//! form `WDBNDRY_<codes>` defines a word-boundary set over the positions
//! whose codes (`b e i s`) follow the prefix, and takes no members.

use std::path::Path;

use senone_ir::{AcmodSet, WordPosition};
use senone_tree::{PhoneSet, QuestionCatalog};
use tracing::debug;

use crate::dtree::is_phone_set_name;
use crate::{read_text, significant_lines, FormatError};

const WORD_BOUNDARY_PREFIX: &str = "WDBNDRY_";
const NO_CONTEXT: &str = "-";

pub fn read_question_catalog(
    path: &Path,
    acmod_set: &AcmodSet,
) -> Result<QuestionCatalog, FormatError> {
    let text = read_text(path)?;
    let catalog = parse_question_catalog(&text, &path.display().to_string(), acmod_set)?;
    debug!(path = %path.display(), n_set = catalog.len(), "read phone sets");
    Ok(catalog)
}

/// Parse phone-set text. Member names are resolved against `acmod_set`.
pub fn parse_question_catalog(
    text: &str,
    origin: &str,
    acmod_set: &AcmodSet,
) -> Result<QuestionCatalog, FormatError> {
    let mut catalog = QuestionCatalog::new();
    for (line, text) in significant_lines(text) {
        let set = parse_set(text, acmod_set).map_err(|m| FormatError::malformed(origin, line, m))?;
        catalog
            .insert(set)
            .map_err(|e| FormatError::malformed(origin, line, e.to_string()))?;
    }
    Ok(catalog)
}

fn parse_set(text: &str, acmod_set: &AcmodSet) -> Result<PhoneSet, String> {
    let mut fields = text.split_whitespace();
    let Some(name) = fields.next() else {
        return Err("expected a phone set name".to_string());
    };
    if !is_phone_set_name(name) {
        return Err(format!(
            "'{name}' cannot name a phone set: names start with a letter or '_' \
             and continue with letters, digits or _ + . '"
        ));
    }

    if let Some(codes) = name.strip_prefix(WORD_BOUNDARY_PREFIX) {
        if let Some(extra) = fields.next() {
            return Err(format!(
                "word-boundary set '{name}' takes no members, found '{extra}'"
            ));
        }
        let positions = codes
            .chars()
            .map(|c| {
                WordPosition::from_code(c.encode_utf8(&mut [0; 4]))
                    .filter(|p| *p != WordPosition::Undefined)
                    .ok_or_else(|| format!("invalid word-boundary code '{c}' in '{name}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(PhoneSet::word_boundary(name, positions));
    }

    let mut members = Vec::new();
    let mut no_context = false;
    for member in fields {
        if member == NO_CONTEXT {
            no_context = true;
        } else {
            let phone = acmod_set
                .phone_id(member)
                .ok_or_else(|| format!("unknown phone '{member}' in set '{name}'"))?;
            members.push(phone);
        }
    }
    Ok(PhoneSet::phones(name, members, no_context))
}
