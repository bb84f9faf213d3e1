pub mod clear;
pub mod fetch;
pub mod status;
