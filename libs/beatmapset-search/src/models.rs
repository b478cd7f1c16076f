//! Domain types shared by the compiler, the stores and the engine client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = u32;
pub type BeatmapId = u32;
pub type BeatmapsetId = u32;

/// Game modes, numbered as in `difficulties.playmode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Osu,
    Taiko,
    Fruits,
    Mania,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Osu,
        GameMode::Taiko,
        GameMode::Fruits,
        GameMode::Mania,
    ];

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::Osu),
            1 => Some(Self::Taiko),
            2 => Some(Self::Fruits),
            3 => Some(Self::Mania),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Osu => 0,
            Self::Taiko => 1,
            Self::Fruits => 2,
            Self::Mania => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Osu => "osu",
            Self::Taiko => "taiko",
            Self::Fruits => "fruits",
            Self::Mania => "mania",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade of a completed play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    A,
    B,
    C,
    D,
    S,
    SH,
    X,
    XH,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::A,
        Rank::B,
        Rank::C,
        Rank::D,
        Rank::S,
        Rank::SH,
        Rank::X,
        Rank::XH,
    ];

    /// Exact, case-sensitive match against the stored grade codes.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "S" => Some(Self::S),
            "SH" => Some(Self::SH),
            "X" => Some(Self::X),
            "XH" => Some(Self::XH),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::S => "S",
            Self::SH => "SH",
            Self::X => "X",
            Self::XH => "XH",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional content a beatmapset can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraFlag {
    Video,
    Storyboard,
}

impl ExtraFlag {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "video" => Some(Self::Video),
            "storyboard" => Some(Self::Storyboard),
            _ => None,
        }
    }

    /// Indexed boolean field carrying this flag.
    pub fn field(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Storyboard => "storyboard",
        }
    }
}

/// Approval state stored in the `approved` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    Graveyard,
    Wip,
    Pending,
    Ranked,
    Approved,
    Qualified,
    Loved,
}

impl ApprovalState {
    pub fn value(self) -> i64 {
        match self {
            Self::Graveyard => -2,
            Self::Wip => -1,
            Self::Pending => 0,
            Self::Ranked => 1,
            Self::Approved => 2,
            Self::Qualified => 3,
            Self::Loved => 4,
        }
    }
}

/// Beatmapset record as hydrated from the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmapset {
    pub id: BeatmapsetId,
    pub user_id: UserId,
    pub artist: String,
    pub title: String,
    pub creator: String,
    pub approved: i8,
    pub last_update: Option<DateTime<Utc>>,
    pub approved_date: Option<DateTime<Utc>>,
    pub beatmaps: Vec<Beatmap>,
}

/// Single difficulty of a beatmapset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    pub id: BeatmapId,
    pub beatmapset_id: BeatmapsetId,
    pub version: String,
    pub mode: Option<GameMode>,
    pub difficulty_rating: f32,
}
