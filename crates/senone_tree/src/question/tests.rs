#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

const SIL: PhoneId = PhoneId::new(0);
const AA: PhoneId = PhoneId::new(1);
const B: PhoneId = PhoneId::new(2);
const M: PhoneId = PhoneId::new(3);

fn catalog() -> (QuestionCatalog, PhoneSetId, PhoneSetId, PhoneSetId) {
    let mut catalog = QuestionCatalog::new();
    let vowel = catalog.insert(PhoneSet::phones("VOWEL", [AA], false)).unwrap();
    let edge = catalog
        .insert(PhoneSet::phones("EDGE", [SIL], true))
        .unwrap();
    let begin = catalog
        .insert(PhoneSet::word_boundary("WDBNDRY_B", [WordPosition::Begin]))
        .unwrap();
    (catalog, vowel, edge, begin)
}

#[test]
fn test_role_selects_phone() {
    let ctx = PhoneticContext::new(AA, Some(B), None, WordPosition::End);
    assert_eq!(ContextRole::Left.select(&ctx), Some(B));
    assert_eq!(ContextRole::Base.select(&ctx), Some(AA));
    assert_eq!(ContextRole::Right.select(&ctx), None);
}

#[test]
fn test_role_offsets() {
    for role in [ContextRole::Left, ContextRole::Base, ContextRole::Right] {
        assert_eq!(ContextRole::from_offset(i64::from(role.offset())), Some(role));
    }
    assert_eq!(ContextRole::from_offset(2), None);
}

#[test]
fn test_membership_question() {
    let (catalog, vowel, ..) = catalog();
    let ctx = PhoneticContext::new(B, Some(AA), Some(M), WordPosition::Internal);

    assert!(catalog.eval(&SimpleQuestion::new(vowel, ContextRole::Left), &ctx));
    assert!(!catalog.eval(&SimpleQuestion::new(vowel, ContextRole::Right), &ctx));
    assert!(!catalog.eval(&SimpleQuestion::new(vowel, ContextRole::Base), &ctx));
    assert!(catalog.eval(&SimpleQuestion::new(vowel, ContextRole::Right).negate(), &ctx));
}

#[test]
fn test_no_context_membership() {
    let (catalog, vowel, edge, _) = catalog();
    let ctx = PhoneticContext::new(AA, None, None, WordPosition::Single);

    // EDGE lists `-`, VOWEL does not
    assert!(catalog.eval(&SimpleQuestion::new(edge, ContextRole::Left), &ctx));
    assert!(!catalog.eval(&SimpleQuestion::new(vowel, ContextRole::Left), &ctx));
    assert!(catalog.eval(&SimpleQuestion::new(vowel, ContextRole::Left).negate(), &ctx));
}

#[test]
fn test_word_boundary_ignores_role() {
    let (catalog, _, _, begin) = catalog();
    let at_begin = PhoneticContext::new(AA, Some(B), Some(M), WordPosition::Begin);
    let at_end = PhoneticContext::new(AA, Some(B), Some(M), WordPosition::End);

    for role in [ContextRole::Left, ContextRole::Base, ContextRole::Right] {
        assert!(catalog.eval(&SimpleQuestion::new(begin, role), &at_begin));
        assert!(!catalog.eval(&SimpleQuestion::new(begin, role), &at_end));
    }
}

#[test]
fn test_compound_is_or_of_ands() {
    let (catalog, vowel, _, begin) = catalog();
    let left_vowel = SimpleQuestion::new(vowel, ContextRole::Left);
    let at_begin = SimpleQuestion::new(begin, ContextRole::Base);
    let right_vowel = SimpleQuestion::new(vowel, ContextRole::Right);

    // (left_vowel AND at_begin) OR right_vowel
    let q = CompoundQuestion::new(vec![
        Conjunction::from_slice(&[left_vowel, at_begin]),
        Conjunction::from_slice(&[right_vowel]),
    ]);

    let both = PhoneticContext::new(B, Some(AA), Some(M), WordPosition::Begin);
    let only_left = PhoneticContext::new(B, Some(AA), Some(M), WordPosition::End);
    let right = PhoneticContext::new(B, Some(M), Some(AA), WordPosition::End);

    assert!(catalog.eval_compound(&q, &both));
    assert!(!catalog.eval_compound(&q, &only_left));
    assert!(catalog.eval_compound(&q, &right));
}

#[test]
fn test_describe() {
    let (catalog, vowel, _, begin) = catalog();
    let q = CompoundQuestion::new(vec![
        Conjunction::from_slice(&[SimpleQuestion::new(vowel, ContextRole::Left)]),
        Conjunction::from_slice(&[
            SimpleQuestion::new(vowel, ContextRole::Right).negate(),
            SimpleQuestion::new(begin, ContextRole::Base),
        ]),
    ]);
    assert_eq!(catalog.describe(&q), "((VOWEL -1)(!VOWEL 1 WDBNDRY_B 0))");
}

#[test]
fn test_unknown_set_answers_false() {
    let (catalog, ..) = catalog();
    let ctx = PhoneticContext::new(AA, Some(AA), Some(AA), WordPosition::Begin);
    let bogus = SimpleQuestion::new(PhoneSetId::new(42), ContextRole::Base);
    assert!(!catalog.eval(&bogus, &ctx));
}

#[test]
fn test_catalog_rejects_duplicates_and_empty_sets() {
    let (mut catalog, ..) = catalog();
    assert_eq!(
        catalog.insert(PhoneSet::phones("VOWEL", [B], false)),
        Err(QuestionError::DuplicateSet("VOWEL".to_string()))
    );
    assert_eq!(
        catalog.insert(PhoneSet::phones("NOTHING", [], false)),
        Err(QuestionError::EmptySet("NOTHING".to_string()))
    );
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.id("EDGE"), Some(PhoneSetId::new(1)));
}
