//! Built-in word themes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::candidates::{CandidateError, CandidateSet};

/// Word list a game starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Animals,
    Fruits,
    Countries,
    Colors,
    Objects,
}

const ANIMALS: &[&str] = &[
    "cat", "dog", "horse", "rabbit", "elephant", "giraffe", "lion", "tiger", "zebra", "monkey",
    "penguin", "dolphin", "owl", "fox", "bear", "kangaroo",
];

const FRUITS: &[&str] = &[
    "apple", "banana", "cherry", "grape", "lemon", "mango", "orange", "peach", "pear",
    "pineapple", "plum", "kiwi", "strawberry", "watermelon", "coconut", "apricot",
];

const COUNTRIES: &[&str] = &[
    "france", "japan", "brazil", "canada", "egypt", "india", "italy", "mexico", "norway",
    "peru", "spain", "kenya", "germany", "greece", "australia", "argentina",
];

const COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "brown", "black", "white",
    "gray", "gold", "silver", "turquoise", "violet", "crimson",
];

const OBJECTS: &[&str] = &[
    "chair", "lamp", "clock", "mirror", "pencil", "umbrella", "guitar", "camera", "bottle",
    "candle", "key", "book", "phone", "spoon", "wallet", "hammer",
];

impl Theme {
    pub const ALL: &'static [Theme] = &[
        Theme::Animals,
        Theme::Fruits,
        Theme::Countries,
        Theme::Colors,
        Theme::Objects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Animals => "animals",
            Theme::Fruits => "fruits",
            Theme::Countries => "countries",
            Theme::Colors => "colors",
            Theme::Objects => "objects",
        }
    }

    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Theme::Animals => ANIMALS,
            Theme::Fruits => FRUITS,
            Theme::Countries => COUNTRIES,
            Theme::Colors => COLORS,
            Theme::Objects => OBJECTS,
        }
    }

    /// The full word list as a fresh candidate pool.
    pub fn candidates(&self) -> Result<CandidateSet, CandidateError> {
        CandidateSet::new(self.words().iter().copied())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "animals" | "animal" => Ok(Theme::Animals),
            "fruits" | "fruit" => Ok(Theme::Fruits),
            "countries" | "country" => Ok(Theme::Countries),
            "colors" | "colours" | "color" => Ok(Theme::Colors),
            "objects" | "object" => Ok(Theme::Objects),
            _ => Err(ThemeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown theme: {0}")]
pub struct ThemeParseError(String);
