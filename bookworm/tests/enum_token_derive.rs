//! Tests for #[derive(EnumToken)] macro

use bookworm::{decode_token, token_conflict, DecodeError, EnumToken};
use serde::{Deserialize, Serialize};

#[derive(EnumToken, Clone, Copy, Debug, PartialEq)]
enum ChapterType {
    Challenge,
    Read,
    Mixed,
}

#[derive(EnumToken, Clone, Copy, Debug, PartialEq)]
enum Difficulty {
    #[token(rename = "EASY_MODE")]
    Easy,
    Hard,
}

#[test]
fn test_token_table_in_declaration_order() {
    let tokens: Vec<_> = ChapterType::tokens().iter().map(|(t, _)| *t).collect();
    assert_eq!(tokens, vec!["challenge", "read", "mixed"]);
    assert_eq!(ChapterType::TYPE_NAME, "ChapterType");
    assert_eq!(token_conflict::<ChapterType>(), None);
}

#[test]
fn test_token_round_trip() {
    for (_, member) in ChapterType::tokens() {
        assert_eq!(ChapterType::from_token(member.token()), Some(*member));
    }
}

#[test]
fn test_case_insensitive_lookup() {
    assert_eq!(ChapterType::from_token("Read"), Some(ChapterType::Read));
    assert_eq!(ChapterType::from_token("CHALLENGE"), Some(ChapterType::Challenge));
    assert_eq!(ChapterType::from_token("mIxEd"), Some(ChapterType::Mixed));
    assert_eq!(ChapterType::from_token("quiz"), None);
}

#[test]
fn test_rename_is_lowercased() {
    assert_eq!(Difficulty::Easy.token(), "easy_mode");
    assert_eq!(Difficulty::from_token("Easy_Mode"), Some(Difficulty::Easy));
    assert_eq!(Difficulty::from_token("easy"), None);
}

#[test]
fn test_decode_token_errors_instead_of_defaulting() {
    assert_eq!(decode_token::<ChapterType>(None).unwrap(), None);
    assert_eq!(decode_token::<ChapterType>(Some("")).unwrap(), None);

    let err = decode_token::<ChapterType>(Some("unknown")).unwrap_err();
    assert_eq!(err.to_string(), "unknown ChapterType token `unknown`");
    assert!(matches!(err, DecodeError::UnknownToken { .. }));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Chapter {
    #[serde(
        rename = "chapterType",
        default,
        with = "bookworm::token::optional"
    )]
    chapter_type: Option<ChapterType>,
}

#[test]
fn test_serde_field_adapter() {
    let chapter: Chapter = serde_json::from_str(r#"{"chapterType":"Read"}"#).unwrap();
    assert_eq!(chapter.chapter_type, Some(ChapterType::Read));

    let chapter: Chapter = serde_json::from_str("{}").unwrap();
    assert_eq!(chapter.chapter_type, None);

    assert!(serde_json::from_str::<Chapter>(r#"{"chapterType":"unknown"}"#).is_err());

    let json = serde_json::to_string(&Chapter {
        chapter_type: Some(ChapterType::Mixed),
    })
    .unwrap();
    assert_eq!(json, r#"{"chapterType":"mixed"}"#);
}
