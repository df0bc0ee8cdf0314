use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
pub struct PollOption {
    id: String,
    text: String,
    votes: u32,
}

#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Poll {
    id: String,
    question: String,
    options: Vec<PollOption>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    total_votes: u32,
    allow_multiple: bool,
    is_active: bool,
}

impl Poll {
    pub fn new(
        id: String,
        question: String,
        options: Vec<PollOption>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        allow_multiple: bool,
    ) -> Self {
        let total_votes = options.iter().map(|option| option.votes).sum();
        Self {
            id,
            question,
            options,
            created_at,
            expires_at,
            total_votes,
            allow_multiple,
            is_active: true,
        }
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|option| option.id == option_id)
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }

    pub fn record_vote(&mut self, option_id: &str) -> bool {
        match self.options.iter_mut().find(|option| option.id == option_id) {
            Some(option) => {
                option.votes += 1;
                self.total_votes += 1;
                true
            }
            None => false,
        }
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct PollVote {
    poll_id: String,
    option_id: String,
    user_id: String,
    timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Getters, PartialEq, new)]
pub struct PollOptionResult {
    id: String,
    text: String,
    votes: u32,
    percentage: f64,
}

#[derive(Clone, Debug, Getters, PartialEq, new)]
pub struct PollResults {
    question: String,
    results: Vec<PollOptionResult>,
}
