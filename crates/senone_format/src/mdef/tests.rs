#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

const SMALL: &str = "\
0.3
2 n_base
2 n_tri
14 n_state_map
10 n_tied_state
4 n_tied_ci_state
2 n_tied_tmat
#
# Columns definitions
#base lft  rt p attrib tmat      ... state id's ...
  SIL   -   - - filler    0    0    N
   AA   -   - -    n/a    1    1    2    3    N
   AA SIL SIL s    n/a    1    4    5    6    N
   AA   -  AA b    n/a    1    7    8    9    N
";

fn malformed_message(text: &str) -> (usize, String) {
    match parse_model_def(text, "test.mdef") {
        Err(FormatError::Malformed { line, message, .. }) => (line, message),
        other => panic!("expected a malformed-input error, got {other:?}"),
    }
}

#[test]
fn test_parse_small_model() {
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();
    let acmod_set = &mdef.acmod_set;
    assert_eq!(acmod_set.n_ci(), 2);
    assert_eq!(acmod_set.n_cd(), 2);
    assert_eq!(mdef.n_tied_state, 10);
    assert_eq!(mdef.n_tied_ci_state, 4);
    assert_eq!(mdef.n_tied_tmat, 2);
    assert_eq!(mdef.n_total_state(), 14);

    let sil = acmod_set.phone_id("SIL").unwrap();
    let aa = acmod_set.phone_id("AA").unwrap();
    assert!(acmod_set.is_filler(sil));
    assert!(!acmod_set.is_filler(aa));

    let cd = &mdef.entries[2];
    assert_eq!(acmod_set.unit_name(cd.acmod), "AA(SIL,SIL)s");
    assert_eq!(
        cd.states,
        vec![
            TiedStateId::new(4),
            TiedStateId::new(5),
            TiedStateId::new(6),
            TiedStateId::NO_ID
        ]
    );

    let edge = acmod_set.context(mdef.entries[3].acmod).unwrap();
    assert_eq!(edge.left, None);
    assert_eq!(edge.right, Some(aa));
    assert_eq!(edge.position, WordPosition::Begin);
}

#[test]
fn test_format_then_parse_preserves_model() {
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();
    let text = format_model_def(&mdef);
    assert_eq!(parse_model_def(&text, "formatted").unwrap(), mdef);
}

#[test]
fn test_format_layout() {
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();
    let text = format_model_def(&mdef);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "0.3");
    assert_eq!(lines[1], "2 n_base");
    assert_eq!(lines[3], "14 n_state_map");
    assert_eq!(lines[10], "  SIL   -   - - filler    0       0    N");
    assert_eq!(lines[12], "   AA SIL SIL s    n/a    1       4    5    6    N");
}

#[test]
fn test_rejects_wrong_version() {
    let text = SMALL.replacen("0.3", "0.2", 1);
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 1);
    assert!(message.contains("version '0.2'"), "{message}");
}

#[test]
fn test_rejects_header_out_of_order() {
    let text = SMALL.replace("2 n_tri", "2 n_triphones");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 3);
    assert_eq!(message, "expected 'n_tri', found 'n_triphones'");
}

#[test]
fn test_rejects_unknown_phone() {
    let text = SMALL.replace("AA   -  AA b", "AA   -  ZH b");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 14);
    assert_eq!(message, "unknown phone 'ZH'");
}

#[test]
fn test_rejects_state_out_of_range() {
    let text = SMALL.replace("7    8    9", "7    8   10");
    let (_, message) = malformed_message(&text);
    assert_eq!(message, "state id 10 is out of range (n_tied_state 10)");
}

#[test]
fn test_rejects_ci_state_beyond_ci_range() {
    // id 4 is in range for the model but belongs to the senone block
    let text = SMALL.replace("1    2    3    N", "1    2    4    N");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 12);
    assert_eq!(message, "state id 4 is out of range (n_tied_ci_state 4)");
}

#[test]
fn test_cd_rows_may_use_any_tied_state() {
    let text = SMALL.replace("4    5    6", "0    5    9");
    let mdef = parse_model_def(&text, "test.mdef").unwrap();
    assert_eq!(mdef.entries[2].states[0], TiedStateId::new(0));
}

#[test]
fn test_rejects_tmat_out_of_range() {
    let text = SMALL.replace("filler    0", "filler    2");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 11);
    assert!(message.starts_with("transition matrix 2"), "{message}");
}

#[test]
fn test_rejects_state_map_mismatch() {
    let text = SMALL.replace("14 n_state_map", "13 n_state_map");
    let (_, message) = malformed_message(&text);
    assert_eq!(message, "n_state_map is 13 but the rows define 14 states");
}

#[test]
fn test_rejects_missing_rows() {
    let text = SMALL.replace("2 n_tri", "3 n_tri");
    let (_, message) = malformed_message(&text);
    assert_eq!(message, "unexpected end of file; expected a unit row");
}

#[test]
fn test_rejects_extra_rows() {
    let text = SMALL.replace("2 n_tri", "1 n_tri");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 14);
    assert!(message.starts_with("unexpected line after 3 unit rows"), "{message}");
}

#[test]
fn test_rejects_base_row_after_triphones() {
    let text = SMALL.replace("2 n_base", "1 n_base").replace("2 n_tri", "3 n_tri");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 12);
    assert_eq!(message, "base phone row 'AA' after triphone rows");
}

#[test]
fn test_rejects_duplicate_unit() {
    let text = SMALL.replace("AA   -  AA b", "AA SIL SIL s");
    let (line, message) = malformed_message(&text);
    assert_eq!(line, 14);
    assert!(message.contains("declared twice"), "{message}");
}

#[test]
fn test_read_and_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.mdef");
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();

    write_model_def(&mdef, &path).unwrap();
    assert_eq!(read_model_def(&path).unwrap(), mdef);

    let missing = dir.path().join("missing.mdef");
    let err = read_model_def(&missing).unwrap_err();
    assert!(err.is_io());
    assert_eq!(err.origin(), missing.display().to_string());
}

#[test]
fn test_write_replaces_existing_file_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.mdef");
    fs::write(&path, "stale contents that are longer than nothing").unwrap();
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();

    write_model_def(&mdef, &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), format_model_def(&mdef));
    // only the output itself is left in the directory
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("model.mdef");
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();

    let err = write_model_def(&mdef, &path).unwrap_err();
    assert!(matches!(err, FormatError::Write { .. }), "{err:?}");
    assert_eq!(err.origin(), path.display().to_string());
}

#[cfg(unix)]
#[test]
fn test_new_output_gets_ordinary_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let ordinary = dir.path().join("ordinary");
    fs::write(&ordinary, "").unwrap();
    let path = dir.path().join("model.mdef");
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();

    write_model_def(&mdef, &path).unwrap();
    let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&path), mode(&ordinary));
}

#[cfg(unix)]
#[test]
fn test_overwrite_keeps_existing_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.mdef");
    fs::write(&path, "old").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
    let mdef = parse_model_def(SMALL, "test.mdef").unwrap();

    write_model_def(&mdef, &path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
}
