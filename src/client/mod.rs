pub mod cli;
pub mod remote;
