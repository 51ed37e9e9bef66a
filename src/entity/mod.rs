pub mod action;
pub mod report;
pub mod stage;
