//! Event routing and the store-backed service.

pub mod events;
pub mod router;
pub mod service;

pub use events::{
    ClaimOutcome, CompletedQuest, EventOutcome, GameEvent, Notification, TaskCompletion,
};
pub use router::{PlayerState, RewardEngine};
pub use service::{GameService, LoadedPlayer};
