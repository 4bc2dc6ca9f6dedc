pub mod config;
pub mod observability;
pub mod pack;
pub mod run;
