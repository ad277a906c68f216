pub mod cli;
pub mod providers;
pub mod report;
