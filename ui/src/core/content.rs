//! Static quiz content: the question bank and the result-category table.
//!
//! Both are embedded at compile time and parsed once per process. Loading
//! validates that every category a choice can produce has a result entry, so
//! the resolver can never land on a tag the result view cannot display.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const QUESTIONS_JSON: &str = include_str!("../../assets/content/questions.json");
const RESULTS_JSON: &str = include_str!("../../assets/content/results.json");

/// Symbolic personality-result identifier (e.g. `"host"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTag(String);

impl CategoryTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "text")]
    pub label: String,
    #[serde(rename = "type")]
    pub category: CategoryTag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "answers")]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCategory {
    pub name: String,
    pub keyword: String,
    pub description: String,
    pub recommend: Vec<String>,
    pub song: String,
    #[serde(rename = "songUrl", default, skip_serializing_if = "Option::is_none")]
    pub song_url: Option<String>,
    pub image: String,
}

impl ResultCategory {
    /// Video id for the recommended song when `song_url` points at YouTube.
    pub fn video_id(&self) -> Option<String> {
        let url = self.song_url.as_deref()?;
        let id = parse_video_id(url);
        if id.is_none() {
            tracing::debug!(url, "song url is not a recognised video link");
        }
        id
    }
}

fn parse_video_id(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));

    let id = match host {
        "www.youtube.com" | "youtube.com" | "m.youtube.com" => {
            let query = path.strip_prefix("watch?")?;
            query
                .split('&')
                .find_map(|pair| pair.strip_prefix("v="))?
                .to_string()
        }
        "youtu.be" => path.split(['?', '#']).next()?.to_string(),
        _ => return None,
    };

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed {source_name} content: {source}")]
    Parse {
        source_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("question bank is empty")]
    NoQuestions,
    #[error("question {index} offers {count} choice(s); at least two are required")]
    TooFewChoices { index: usize, count: usize },
    #[error("category tag `{0}` is malformed")]
    MalformedTag(String),
    #[error("question {index} can produce category `{tag}` which has no result entry")]
    MissingResult { index: usize, tag: CategoryTag },
}

/// Read-only question bank plus result lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBank {
    questions: Vec<Question>,
    results: BTreeMap<CategoryTag, ResultCategory>,
}

impl ContentBank {
    /// Build and validate a bank from already-parsed parts.
    pub fn new(
        questions: Vec<Question>,
        results: BTreeMap<CategoryTag, ResultCategory>,
    ) -> Result<Self, ContentError> {
        let bank = Self { questions, results };
        bank.validate()?;
        Ok(bank)
    }

    pub fn from_json(questions: &str, results: &str) -> Result<Self, ContentError> {
        let questions: Vec<Question> =
            serde_json::from_str(questions).map_err(|source| ContentError::Parse {
                source_name: "question",
                source,
            })?;
        let results: BTreeMap<CategoryTag, ResultCategory> = serde_json::from_str(results)
            .map_err(|source| ContentError::Parse {
                source_name: "result",
                source,
            })?;
        Self::new(questions, results)
    }

    /// Process-wide bank parsed from the embedded assets.
    pub fn embedded() -> Result<&'static ContentBank, ContentError> {
        static BANK: OnceCell<ContentBank> = OnceCell::new();
        BANK.get_or_try_init(|| {
            let bank = Self::from_json(QUESTIONS_JSON, RESULTS_JSON)?;
            tracing::info!(
                questions = bank.questions.len(),
                categories = bank.results.len(),
                "quiz content loaded"
            );
            Ok(bank)
        })
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.questions.is_empty() {
            return Err(ContentError::NoQuestions);
        }

        if let Some(tag) = self.results.keys().find(|tag| !tag.is_well_formed()) {
            return Err(ContentError::MalformedTag(tag.to_string()));
        }

        for (index, question) in self.questions.iter().enumerate() {
            if question.choices.len() < 2 {
                return Err(ContentError::TooFewChoices {
                    index,
                    count: question.choices.len(),
                });
            }
            for choice in &question.choices {
                if !choice.category.is_well_formed() {
                    return Err(ContentError::MalformedTag(choice.category.to_string()));
                }
                if !self.results.contains_key(&choice.category) {
                    return Err(ContentError::MissingResult {
                        index,
                        tag: choice.category.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn result(&self, tag: &str) -> Option<&ResultCategory> {
        self.results.get(&CategoryTag::new(tag))
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryTag> {
        self.results.keys()
    }
}
