//! Tasks and the reward calculator.

pub mod rewards;
pub mod types;

pub use rewards::{
    apply_streak_bonus, calculate_task_rewards, streak_bonus, streak_bonus_percent, TaskRewards,
    XpGrant,
};
pub use types::{Difficulty, Priority, Subtask, Task, TaskStatus};
