mod analytics;
mod auth;
mod claim;
mod deal;
mod feed;
mod leaderboard;
mod user;

pub use analytics::*;
pub use auth::*;
pub use claim::*;
pub use deal::*;
pub use feed::*;
pub use leaderboard::*;
pub use user::*;
