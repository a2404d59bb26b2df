pub mod admin;
pub mod buy_ticket;
pub mod commit_randomness;
pub mod sort;
pub mod views;

pub use admin::*;
pub use buy_ticket::*;
pub use commit_randomness::*;
pub use sort::*;
pub use views::*;
