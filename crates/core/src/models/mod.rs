pub mod action;
pub mod chart;
pub mod message;
pub mod route;
pub mod transaction;
pub mod user;
