//! Domain types for the jutsu catalog.
//!
//! The three classification axes (element, category, rank) are closed sets.
//! Each tag has a stable wire representation (`as_tag`) used in the database
//! and query strings, plus a human-readable display label.

use serde::{Deserialize, Serialize};

/// Chakra nature of a jutsu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Wind,
    Earth,
    Lightning,
    Illusion,
    Yin,
    Yang,
    #[serde(rename = "yin-yang")]
    YinYang,
    #[default]
    Other,
}

impl Element {
    pub const ALL: [Self; 10] = [
        Self::Fire,
        Self::Water,
        Self::Wind,
        Self::Earth,
        Self::Lightning,
        Self::Illusion,
        Self::Yin,
        Self::Yang,
        Self::YinYang,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Wind => "wind",
            Self::Earth => "earth",
            Self::Lightning => "lightning",
            Self::Illusion => "illusion",
            Self::Yin => "yin",
            Self::Yang => "yang",
            Self::YinYang => "yin-yang",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Wind => "Wind",
            Self::Earth => "Earth",
            Self::Lightning => "Lightning",
            Self::Illusion => "Genjutsu",
            Self::Yin => "Yin",
            Self::Yang => "Yang",
            Self::YinYang => "Yin-Yang",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_tag() == tag)
    }
}

/// Functional classification of a jutsu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Offensive,
    Defensive,
    Support,
    #[default]
    Supplementary,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::Offensive,
        Self::Defensive,
        Self::Support,
        Self::Supplementary,
    ];

    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Offensive => "offensive",
            Self::Defensive => "defensive",
            Self::Support => "support",
            Self::Supplementary => "supplementary",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Offensive => "Offensive",
            Self::Defensive => "Defensive",
            Self::Support => "Support",
            Self::Supplementary => "Supplementary",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_tag() == tag)
    }
}

/// Difficulty rank, declared weakest to strongest.
///
/// Declaration order is load-bearing: rank-ordered listings and the dashboard
/// sort by this order, never by the tag string ("B" would sort before "A"
/// lexically otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rank {
    E,
    D,
    #[default]
    C,
    B,
    A,
    S,
    SS,
}

impl Rank {
    pub const ALL: [Self; 7] = [
        Self::E,
        Self::D,
        Self::C,
        Self::B,
        Self::A,
        Self::S,
        Self::SS,
    ];

    /// High ranks surfaced on the home page.
    pub const HIGH: [Self; 3] = [Self::A, Self::S, Self::SS];

    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
            Self::SS => "SS",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::E => "Rank E",
            Self::D => "Rank D",
            Self::C => "Rank C",
            Self::B => "Rank B",
            Self::A => "Rank A",
            Self::S => "Rank S",
            Self::SS => "Rank S+",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_tag() == tag)
    }

    /// Position in declaration order, for sorting.
    #[must_use]
    pub fn ordinal(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }
}

/// A catalog record as the domain sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Jutsu {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub element: Element,
    pub category: Category,
    pub rank: Rank,
    /// Relative filename of the stored image asset, if any.
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when creating a record.
#[derive(Debug, Clone)]
pub struct JutsuDraft {
    pub name: String,
    pub description: String,
    pub element: Element,
    pub category: Category,
    pub rank: Rank,
    /// Source URL to fetch an image asset from, if any.
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct JutsuPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub element: Option<Element>,
    pub category: Option<Category>,
    pub rank: Option<Rank>,
}

/// Result ordering for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    NameAsc,
    NameDesc,
    CreatedAsc,
    CreatedDesc,
    RankAsc,
    RankDesc,
}

impl Ordering {
    /// Parses the REST `ordering` parameter (`name`, `-created_at`, ...).
    #[must_use]
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "name" => Some(Self::NameAsc),
            "-name" => Some(Self::NameDesc),
            "created_at" => Some(Self::CreatedAsc),
            "-created_at" => Some(Self::CreatedDesc),
            "rank" => Some(Self::RankAsc),
            "-rank" => Some(Self::RankDesc),
            _ => None,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Immutable filter configuration for list queries.
///
/// Axes combine conjunctively; an absent option places no constraint.
/// `search` alone is disjunctive across name and description.
#[derive(Debug, Clone)]
pub struct JutsuFilter {
    pub search: Option<String>,
    pub element: Option<Element>,
    pub category: Option<Category>,
    pub rank: Option<Rank>,
    pub ordering: Ordering,
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
}

impl Default for JutsuFilter {
    fn default() -> Self {
        Self {
            search: None,
            element: None,
            category: None,
            rank: None,
            ordering: Ordering::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of list results.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Jutsu>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}
