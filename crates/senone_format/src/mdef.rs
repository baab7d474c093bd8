//! Model definition files, format version 0.3.
//!
//! ```text
//! 0.3
//! 2 n_base
//! 1 n_tri
//! 10 n_state_map
//! 7 n_tied_state
//! 4 n_tied_ci_state
//! 2 n_tied_tmat
//! #
//! # Columns definitions
//! #base lft  rt p attrib tmat      ... state id's ...
//!   SIL   -   - - filler    0    0    N
//!    AA   -   - -    n/a    1    1    2    3    N
//!    AA SIL SIL s    n/a    1    4    5    6    N
//! ```
//!
//! Rows for the base (CI) phones come first, then the triphone (CD) rows.
//! `-` in a context column means "no context"; `N` marks a non-emitting
//! state.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use senone_ir::{
    AcmodId, AcmodSet, ModelDef, ModelDefEntry, PhoneId, PhoneticContext, TiedStateId,
    WordPosition,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{read_text, significant_lines, FormatError};

pub const VERSION: &str = "0.3";

/// Written (and read) for units without attributes.
const NO_ATTRIBUTE: &str = "n/a";
const NO_CONTEXT: &str = "-";
const NON_EMITTING: &str = "N";

/// Header lines in file order.
const HEADER: [&str; 6] = [
    "n_base",
    "n_tri",
    "n_state_map",
    "n_tied_state",
    "n_tied_ci_state",
    "n_tied_tmat",
];

pub fn read_model_def(path: &Path) -> Result<ModelDef, FormatError> {
    let text = read_text(path)?;
    let mdef = parse_model_def(&text, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        n_base = mdef.acmod_set.n_ci(),
        n_tri = mdef.acmod_set.n_cd(),
        "read model definition"
    );
    Ok(mdef)
}

/// Write `mdef` to `path`, replacing it only once the whole file is written.
///
/// The text goes to a temporary file in the same directory, which is then
/// renamed over `path`. An existing file keeps its permissions; a new one
/// gets the usual umask default.
pub fn write_model_def(mdef: &ModelDef, path: &Path) -> Result<(), FormatError> {
    let write_error = |source| FormatError::write(path, source);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = sibling_temp_file(dir).map_err(write_error)?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?;
    }
    file.write_all(format_model_def(mdef).as_bytes())
        .map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!(
        path = %path.display(),
        n_tied_state = mdef.n_tied_state,
        "wrote model definition"
    );
    Ok(())
}

fn sibling_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    // 0o666 is masked by the umask, like any newly created file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Parse model-definition text. `origin` names the source in errors.
pub fn parse_model_def(text: &str, origin: &str) -> Result<ModelDef, FormatError> {
    let mut lines = significant_lines(text);
    let mut last_line = 0;
    let mut next_line = |what: &str| {
        let next = lines.next();
        if let Some((line, _)) = next {
            last_line = line;
        }
        next.ok_or_else(|| {
            FormatError::malformed(
                origin,
                last_line,
                format!("unexpected end of file; expected {what}"),
            )
        })
    };

    let (line, version) = next_line("the format version")?;
    if version != VERSION {
        return Err(FormatError::malformed(
            origin,
            line,
            format!("unsupported model definition version '{version}' (expected {VERSION})"),
        ));
    }

    let mut header = [0u32; 6];
    for (i, label) in HEADER.into_iter().enumerate() {
        let (line, text) = next_line(label)?;
        header[i] =
            parse_header_line(text, label).map_err(|m| FormatError::malformed(origin, line, m))?;
        // n_tied_ci_state
        if i == 4 && header[4] > header[3] {
            return Err(FormatError::malformed(
                origin,
                line,
                format!(
                    "n_tied_ci_state {} exceeds n_tied_state {}",
                    header[4], header[3]
                ),
            ));
        }
    }
    let [n_base, n_tri, n_state_map, n_tied_state, n_tied_ci_state, n_tied_tmat] = header;

    let mut rows = RowParser {
        mdef: ModelDef {
            n_tied_state,
            n_tied_ci_state,
            n_tied_tmat,
            ..ModelDef::default()
        },
        n_base: n_base as usize,
    };
    let n_row = n_base as usize + n_tri as usize;
    for _ in 0..n_row {
        let (line, text) = next_line("a unit row")?;
        rows.parse_row(text)
            .map_err(|m| FormatError::malformed(origin, line, m))?;
    }
    if let Some((line, text)) = lines.next() {
        return Err(FormatError::malformed(
            origin,
            line,
            format!("unexpected line after {n_row} unit rows: '{text}'"),
        ));
    }

    let mdef = rows.mdef;
    let total = mdef.n_total_state();
    if total != n_state_map as usize {
        return Err(FormatError::malformed(
            origin,
            last_line,
            format!("n_state_map is {n_state_map} but the rows define {total} states"),
        ));
    }
    Ok(mdef)
}

fn parse_header_line(text: &str, label: &str) -> Result<u32, String> {
    let mut fields = text.split_whitespace();
    let (Some(count), Some(found), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(format!("expected '<count> {label}'"));
    };
    if found != label {
        return Err(format!("expected '{label}', found '{found}'"));
    }
    count
        .parse()
        .map_err(|_| format!("invalid {label} count '{count}'"))
}

struct RowParser {
    mdef: ModelDef,
    n_base: usize,
}

impl RowParser {
    fn parse_row(&mut self, text: &str) -> Result<(), String> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        let [base, left, right, posn, attrib, tmat, states @ ..] = fields.as_slice() else {
            return Err("expected 'base lft rt p attrib tmat state...'".to_string());
        };
        if states.is_empty() {
            return Err(format!("unit '{base}' has no states"));
        }

        let attributes = parse_attributes(attrib);
        let is_ci_row = [*left, *right, *posn].iter().all(|f| *f == NO_CONTEXT);
        let declared = self.mdef.entries.len();
        let acmod_set = &mut self.mdef.acmod_set;

        let acmod = if declared < self.n_base {
            if !is_ci_row {
                return Err(format!(
                    "expected {} base phone rows before triphones; '{base}' has a context",
                    self.n_base
                ));
            }
            AcmodId::from(
                acmod_set
                    .add_phone(*base, attributes)
                    .map_err(|e| e.to_string())?,
            )
        } else {
            if is_ci_row {
                return Err(format!("base phone row '{base}' after triphone rows"));
            }
            let context = PhoneticContext::new(
                lookup(acmod_set, base)?,
                context_phone(acmod_set, left)?,
                context_phone(acmod_set, right)?,
                WordPosition::from_code(posn)
                    .ok_or_else(|| format!("invalid word position '{posn}'"))?,
            );
            acmod_set
                .add_unit(context, attributes)
                .map_err(|e| e.to_string())?
        };

        let tmat: u32 = tmat
            .parse()
            .map_err(|_| format!("invalid transition matrix id '{tmat}'"))?;
        if tmat >= self.mdef.n_tied_tmat {
            return Err(format!(
                "transition matrix {tmat} is out of range (n_tied_tmat {})",
                self.mdef.n_tied_tmat
            ));
        }

        // CI states share no ids with the senones numbered after them
        let (limit, limit_name) = if declared < self.n_base {
            (self.mdef.n_tied_ci_state, "n_tied_ci_state")
        } else {
            (self.mdef.n_tied_state, "n_tied_state")
        };
        let states = states
            .iter()
            .map(|s| parse_state(s, limit, limit_name))
            .collect::<Result<Vec<_>, _>>()?;
        self.mdef.entries.push(ModelDefEntry {
            acmod,
            tmat,
            states,
        });
        Ok(())
    }

}

fn parse_state(text: &str, limit: u32, limit_name: &str) -> Result<TiedStateId, String> {
    if text == NON_EMITTING {
        return Ok(TiedStateId::NO_ID);
    }
    let id: u32 = text
        .parse()
        .map_err(|_| format!("invalid state id '{text}'"))?;
    if id >= limit {
        return Err(format!("state id {id} is out of range ({limit_name} {limit})"));
    }
    Ok(TiedStateId::new(id))
}

fn parse_attributes(text: &str) -> Vec<String> {
    if text == NO_ATTRIBUTE {
        return Vec::new();
    }
    text.split(',')
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

fn lookup(acmod_set: &AcmodSet, name: &str) -> Result<PhoneId, String> {
    acmod_set
        .phone_id(name)
        .ok_or_else(|| format!("unknown phone '{name}'"))
}

fn context_phone(acmod_set: &AcmodSet, name: &str) -> Result<Option<PhoneId>, String> {
    if name == NO_CONTEXT {
        Ok(None)
    } else {
        lookup(acmod_set, name).map(Some)
    }
}

/// Render a model definition in the layout [`parse_model_def`] reads.
pub fn format_model_def(mdef: &ModelDef) -> String {
    let acmod_set = &mdef.acmod_set;
    let mut out = String::new();
    let header = [
        acmod_set.n_ci(),
        acmod_set.n_cd(),
        mdef.n_total_state(),
        mdef.n_tied_state as usize,
        mdef.n_tied_ci_state as usize,
        mdef.n_tied_tmat as usize,
    ];

    out.push_str(VERSION);
    out.push('\n');
    for (count, label) in header.iter().zip(HEADER) {
        let _ = writeln!(out, "{count} {label}");
    }
    out.push_str("#\n# Columns definitions\n");
    out.push_str("#base lft  rt p attrib tmat      ... state id's ...\n");

    for entry in &mdef.entries {
        let context = acmod_set
            .context(entry.acmod)
            .unwrap_or_else(|| PhoneticContext::context_free(PhoneId::new(entry.acmod.raw())));
        let side = |p: Option<PhoneId>| p.map_or(NO_CONTEXT, |p| acmod_set.phone_name(p));
        let attributes = acmod_set.attributes(entry.acmod);
        let attrib = if attributes.is_empty() {
            NO_ATTRIBUTE.to_string()
        } else {
            attributes.join(",")
        };

        let _ = write!(
            out,
            "{:>5} {:>3} {:>3} {} {:>6} {:>4}   ",
            acmod_set.phone_name(context.base),
            side(context.left),
            side(context.right),
            context.position.code(),
            attrib,
            entry.tmat
        );
        for state in &entry.states {
            let _ = write!(out, " {:>4}", state.to_string());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests;
