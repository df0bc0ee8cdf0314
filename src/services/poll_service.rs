use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::{
    error::PollError,
    models::{Poll, PollOption, PollOptionResult, PollResults, PollVote},
    storage::{KeyValueStore, POLL_VOTES_KEY},
};

/// Seeded polls keep fixed ids so the vote ledger matches them across restarts.
pub const SECTOR_POLL_ID: &str = "sector-outlook-2025";
pub const STRATEGY_POLL_ID: &str = "investment-strategy";

/// In-memory polls with a persisted vote ledger used to reject repeat votes.
pub struct PollService {
    polls: Vec<Poll>,
    store: Arc<dyn KeyValueStore>,
}

impl PollService {
    /// Creates the service seeded with the default polls.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_polls(store, default_polls(Utc::now()))
    }

    pub fn with_polls(store: Arc<dyn KeyValueStore>, polls: Vec<Poll>) -> Self {
        Self { polls, store }
    }

    pub fn get_all_polls(&self) -> Vec<&Poll> {
        self.polls.iter().filter(|poll| *poll.is_active()).collect()
    }

    pub fn get_poll_by_id(&self, poll_id: &str) -> Option<&Poll> {
        self.polls.iter().find(|poll| poll.id() == poll_id)
    }

    pub fn vote(&mut self, poll_id: &str, option_id: &str, user_id: &str) -> Result<(), PollError> {
        let poll = self
            .get_poll_by_id(poll_id)
            .ok_or_else(|| PollError::PollNotFound(poll_id.to_string()))?;

        if !poll.is_open(Utc::now()) {
            return Err(PollError::PollClosed(poll_id.to_string()));
        }

        if !*poll.allow_multiple() && self.has_user_voted(poll_id, user_id) {
            return Err(PollError::AlreadyVoted);
        }

        if !poll.has_option(option_id) {
            return Err(PollError::OptionNotFound(option_id.to_string()));
        }

        self.save_vote(PollVote::new(
            poll_id.to_string(),
            option_id.to_string(),
            user_id.to_string(),
            Utc::now(),
        ))
        .map_err(PollError::Storage)?;

        if let Some(poll) = self.polls.iter_mut().find(|poll| poll.id() == poll_id) {
            poll.record_vote(option_id);
        }

        info!("Recorded vote on poll {} for option {}", poll_id, option_id);
        Ok(())
    }

    pub fn has_user_voted(&self, poll_id: &str, user_id: &str) -> bool {
        self.user_votes(user_id)
            .iter()
            .any(|vote| vote.poll_id() == poll_id)
    }

    pub fn get_user_vote_for_poll(&self, poll_id: &str, user_id: &str) -> Option<String> {
        self.user_votes(user_id)
            .into_iter()
            .find(|vote| vote.poll_id() == poll_id)
            .map(|vote| vote.option_id().clone())
    }

    pub fn create_poll(
        &mut self,
        question: &str,
        options: &[&str],
        allow_multiple: bool,
        expires_in_days: Option<i64>,
    ) -> Poll {
        let now = Utc::now();
        let poll = Poll::new(
            Uuid::new_v4().to_string(),
            question.to_string(),
            numbered_options(options.iter().map(|text| (*text, 0))),
            now,
            expires_in_days.map(|days| now + Duration::days(days)),
            allow_multiple,
        );

        self.polls.push(poll.clone());
        poll
    }

    pub fn delete_poll(&mut self, poll_id: &str) -> bool {
        let before = self.polls.len();
        self.polls.retain(|poll| poll.id() != poll_id);
        self.polls.len() != before
    }

    pub fn deactivate_poll(&mut self, poll_id: &str) -> bool {
        match self.polls.iter_mut().find(|poll| poll.id() == poll_id) {
            Some(poll) => {
                poll.deactivate();
                true
            }
            None => false,
        }
    }

    pub fn get_poll_results(&self, poll_id: &str) -> Option<PollResults> {
        let poll = self.get_poll_by_id(poll_id)?;
        let total = *poll.total_votes();

        let results = poll
            .options()
            .iter()
            .map(|option| {
                let percentage = if total > 0 {
                    f64::from(*option.votes()) / f64::from(total) * 100.0
                } else {
                    0.0
                };
                PollOptionResult::new(
                    option.id().clone(),
                    option.text().clone(),
                    *option.votes(),
                    percentage,
                )
            })
            .collect();

        Some(PollResults::new(poll.question().clone(), results))
    }

    fn user_votes(&self, user_id: &str) -> Vec<PollVote> {
        self.load_votes()
            .into_iter()
            .filter(|vote| vote.user_id() == user_id)
            .collect()
    }

    /// Reads the ledger. A corrupt ledger is cleared and treated as empty.
    fn load_votes(&self) -> Vec<PollVote> {
        let votes_json = match self.store.get(POLL_VOTES_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read poll votes: {:#}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<PollVote>>(&votes_json) {
            Ok(votes) => votes,
            Err(e) => {
                warn!("Discarding corrupt poll ledger: {}", e);
                if let Err(e) = self.store.remove(POLL_VOTES_KEY) {
                    warn!("Failed to clear poll ledger: {:#}", e);
                }
                Vec::new()
            }
        }
    }

    fn save_vote(&self, vote: PollVote) -> Result<()> {
        let mut votes = self.load_votes();
        votes.push(vote);
        self.store
            .set(POLL_VOTES_KEY, &serde_json::to_string(&votes)?)
    }
}

fn numbered_options<'a>(options: impl Iterator<Item = (&'a str, u32)>) -> Vec<PollOption> {
    options
        .enumerate()
        .map(|(i, (text, votes))| PollOption::new((i + 1).to_string(), text.to_string(), votes))
        .collect()
}

fn default_polls(now: DateTime<Utc>) -> Vec<Poll> {
    vec![
        Poll::new(
            String::from(SECTOR_POLL_ID),
            String::from("Which sector do you think will perform best in 2025?"),
            numbered_options(
                [
                    ("Technology", 245),
                    ("Healthcare", 167),
                    ("Financial Services", 198),
                    ("Energy", 89),
                ]
                .into_iter(),
            ),
            now,
            Some(now + Duration::days(30)),
            false,
        ),
        Poll::new(
            String::from(STRATEGY_POLL_ID),
            String::from("What is your primary investment strategy?"),
            numbered_options(
                [
                    ("Long-term growth", 456),
                    ("Value investing", 234),
                    ("Day trading", 123),
                    ("Dividend income", 178),
                ]
                .into_iter(),
            ),
            now,
            None,
            false,
        ),
    ]
}
