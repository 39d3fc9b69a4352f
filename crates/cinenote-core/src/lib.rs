pub mod accounts;
pub mod error;
pub mod gamification;
pub mod milestones;
pub mod reviews;
pub mod storage;

pub use accounts::AccountStore;
pub use error::{AccountError, MilestoneError, ReviewError, StorageError};
pub use gamification::{GamificationEngine, GamificationState, LadderEntry, RankStatus, films_to_next, streak_at};
pub use milestones::{Milestone, MilestoneTable};
pub use reviews::{ReviewDraft, ReviewStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
