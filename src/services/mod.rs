pub mod catalog;
pub mod providers;
pub mod recommendations;

pub use recommendations::{Recommendations, Recommender};
