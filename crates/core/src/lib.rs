//! Meld detection and optimal grouping for a hand of playing cards. Keep this
//! crate free of IO and platform concerns.

pub mod cards;
pub mod combinations;
pub mod config;
pub mod deck;
pub mod detect;
pub mod error;
pub mod expand;
pub mod group;
pub mod hand;
pub mod optimizer;
pub mod report;

pub use cards::*;
pub use combinations::*;
pub use config::*;
pub use deck::*;
pub use detect::*;
pub use error::*;
pub use expand::*;
pub use group::*;
pub use hand::*;
pub use optimizer::*;
pub use report::*;
