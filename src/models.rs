use serde::{Deserialize, Deserializer};

/// A single article/task record as returned by the service. The server owns
/// the id; the client never generates or mutates one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: bool,
}

// Older deployments returned numeric ids, newer ones strings. The client
// only ever pastes the id back into request paths, so both collapse to text.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    Green,
    Yellow,
}

impl CardColor {
    /// Done articles render green, everything else (including articles the
    /// server sent without a status field) renders yellow.
    pub fn for_status(status: bool) -> Self {
        if status {
            CardColor::Green
        } else {
            CardColor::Yellow
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CardColor::Green => "green",
            CardColor::Yellow => "yellow",
        }
    }
}

/// Display record derived from an [`Article`]: what a list row needs and
/// nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub color: CardColor,
}

pub fn project_cards(articles: &[Article]) -> Vec<ArticleCard> {
    articles
        .iter()
        .map(|article| ArticleCard {
            id: article.id.clone(),
            title: article.title.clone(),
            color: CardColor::for_status(article.status),
        })
        .collect()
}
