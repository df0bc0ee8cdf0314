pub mod news;
pub mod poll;
pub mod quote;
pub mod sector;
pub mod snapshot;
pub mod user;

pub use news::{NewsItem, Sentiment};
pub use poll::{Poll, PollOption, PollOptionResult, PollResults, PollVote};
pub use quote::Quote;
pub use sector::SectorPerformance;
pub use snapshot::MarketSnapshot;
pub use user::{Credentials, User, ValidationErrors};
