pub mod checkin;
pub mod cli;
pub mod error;
pub mod export;
pub mod git;
pub mod heat;
pub mod model;
pub mod stats;
pub mod util;
