//! Domain model decoded from the content JSON
//!
//! All records are plain values. Changing one (completing a chapter,
//! losing a life) produces a modified copy; nothing is edited in place.

use bookworm::EnumToken;
use serde::{Deserialize, Serialize};

/// How a chapter is played
#[derive(EnumToken, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChapterType {
    Challenge,
    Read,
    Mixed,
}

/// One page of chapter content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "pageNumber", default)]
    pub number: u32,
    #[serde(rename = "pageContent", default)]
    pub content: String,
    #[serde(rename = "pageImage", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "chapterId")]
    pub id: String,
    #[serde(rename = "chapterTitle")]
    pub title: String,
    #[serde(
        rename = "chapterType",
        default,
        with = "bookworm::token::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub chapter_type: Option<ChapterType>,
    #[serde(rename = "chapterDescription", default)]
    pub description: String,
    #[serde(
        rename = "chapterCoverImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    /// Placement on the level-selection map. Layout only.
    #[serde(rename = "chapterPositionOffset", default)]
    pub position_offset: f32,
    #[serde(rename = "chapterCompleted", default)]
    pub is_completed: bool,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Chapter {
    /// A copy of this chapter marked as completed
    pub fn completed(&self) -> Chapter {
        Chapter {
            is_completed: true,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "bookId")]
    pub id: String,
    #[serde(rename = "bookTitle")]
    pub title: String,
    #[serde(rename = "bookAuthor", default)]
    pub author: String,
    #[serde(rename = "bookCoverImage", default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// A copy of this book with chapter `chapter_id` marked as completed.
    pub fn with_chapter_completed(&self, chapter_id: &str) -> Book {
        Book {
            chapters: self
                .chapters
                .iter()
                .map(|chapter| {
                    if chapter.id == chapter_id {
                        chapter.completed()
                    } else {
                        chapter.clone()
                    }
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Chapters in level-map order (ascending position offset).
    pub fn chapters_by_position(&self) -> Vec<&Chapter> {
        let mut chapters: Vec<&Chapter> = self.chapters.iter().collect();
        chapters.sort_by(|a, b| a.position_offset.total_cmp(&b.position_offset));
        chapters
    }

    /// Share of chapters completed, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.chapters.is_empty() {
            return 0.0;
        }
        let done = self.chapters.iter().filter(|c| c.is_completed).count();
        done as f32 / self.chapters.len() as f32
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId")]
    pub id: String,
    #[serde(rename = "userName", default)]
    pub name: String,
    #[serde(rename = "userLives", default = "User::full_lives")]
    pub lives: u32,
    #[serde(rename = "userInterests", default)]
    pub interests: Vec<String>,
}

impl User {
    pub const MIN_LIVES: u32 = 0;
    pub const MAX_LIVES: u32 = 5;

    fn full_lives() -> u32 {
        Self::MAX_LIVES
    }

    /// A copy with one more life, or `None` at the upper bound.
    pub fn gain_life(&self) -> Option<User> {
        (self.lives < Self::MAX_LIVES).then(|| User {
            lives: self.lives + 1,
            ..self.clone()
        })
    }

    /// A copy with one life fewer, or `None` at the lower bound.
    pub fn lose_life(&self) -> Option<User> {
        (self.lives > Self::MIN_LIVES).then(|| User {
            lives: self.lives - 1,
            ..self.clone()
        })
    }

    /// A copy with `interest` added, or `None` if already present
    /// (compared ignoring case) or blank.
    pub fn with_interest(&self, interest: &str) -> Option<User> {
        let interest = interest.trim();
        if interest.is_empty()
            || self
                .interests
                .iter()
                .any(|known| known.eq_ignore_ascii_case(interest))
        {
            return None;
        }
        let mut interests = self.interests.clone();
        interests.push(interest.to_string());
        Some(User {
            interests,
            ..self.clone()
        })
    }
}
