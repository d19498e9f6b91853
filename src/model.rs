use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::data::DataError;

/// Longest message body the chat accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Cat {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub bio: String,
    pub photo_url: String,
    pub tags: Vec<String>,
    /// Kilometres from the viewer.
    pub distance: f64,
}

/// A `cats` row as the backend returns it. Older rows spell the photo column
/// `photourl`, and tags/distance may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CatRow {
    pub id: String,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub photourl: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl From<CatRow> for Cat {
    fn from(row: CatRow) -> Self {
        let photo_url = [row.photo_url, row.photourl]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .unwrap_or_default();

        Self {
            id: row.id,
            name: row.name,
            age: row.age,
            bio: row.bio,
            photo_url,
            tags: row.tags.unwrap_or_default(),
            distance: row.distance.unwrap_or(0.0).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: String,
    pub cat_id: String,
    pub user_id: String,
    pub matched_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub cat: Cat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRow {
    pub id: String,
    pub cat_id: String,
    pub user_id: String,
    pub created_at: String,
    #[serde(default)]
    pub last_message: Option<String>,
    pub cat: CatRow,
}

impl TryFrom<MatchRow> for Match {
    type Error = DataError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let matched_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(DataError::parse)?
            .with_timezone(&Utc);

        Ok(Self {
            id: row.id,
            cat_id: row.cat_id,
            user_id: row.user_id,
            matched_at,
            last_message: row.last_message.filter(|text| !text.trim().is_empty()),
            cat: row.cat.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Viewer,
    Cat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

fn fallback_cat(
    id: &str,
    name: &str,
    age: u32,
    bio: &str,
    photo: &str,
    tags: [&str; 3],
    distance: f64,
) -> Cat {
    Cat {
        id: id.to_owned(),
        name: name.to_owned(),
        age,
        bio: bio.to_owned(),
        photo_url: format!("https://images.unsplash.com/photo-{photo}?w=800&q=80"),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        distance,
    }
}

/// The built-in deck used whenever the backend can't supply cats.
pub fn fallback_cats() -> Vec<Cat> {
    vec![
        fallback_cat(
            "1",
            "Mittens",
            2,
            "Professional napper and laser pointer enthusiast. Will judge you silently.",
            "1514888286974-6c03e2ca1dba",
            ["Napper", "Vocal", "Cuddly"],
            1.2,
        ),
        fallback_cat(
            "2",
            "Whiskers",
            4,
            "I love cardboard boxes more than I love you. Sorry, not sorry.",
            "1573865526739-10659fec78a5",
            ["Playful", "Independent", "Box-lover"],
            3.5,
        ),
        fallback_cat(
            "3",
            "Luna",
            1,
            "Full of energy! I zoomie at 3AM. Looking for a human trampoline.",
            "1495360019602-e001c276375f",
            ["Zoomies", "High Energy", "Kitten"],
            5.0,
        ),
        fallback_cat(
            "4",
            "Garfield",
            5,
            "Lasagna is life. Mondays are the worst. Do not disturb my slumber.",
            "1533738363-b7f9aef128ce",
            ["Foodie", "Chill", "Orange"],
            0.8,
        ),
        fallback_cat(
            "5",
            "Salem",
            3,
            "Not a witch, I promise. Just a very cool void staring into your soul.",
            "1529778873920-4da4926a7071",
            ["Void", "Mysterious", "Smart"],
            2.1,
        ),
    ]
}

pub const LOCAL_VIEWER_ID: &str = "local-viewer";

const FALLBACK_MATCH_COUNT: usize = 3;

/// Matches synthesized from the first fallback cats, newest first.
pub fn fallback_matches(now: DateTime<Utc>) -> Vec<Match> {
    fallback_cats()
        .into_iter()
        .take(FALLBACK_MATCH_COUNT)
        .enumerate()
        .map(|(index, cat)| Match {
            id: format!("local-match-{}", cat.id),
            cat_id: cat.id.clone(),
            user_id: LOCAL_VIEWER_ID.to_owned(),
            matched_at: now - Duration::minutes(index as i64),
            last_message: Some(if index == 0 { "Purr..." } else { "Meow! How are you?" }.to_owned()),
            cat,
        })
        .collect()
}
