pub mod accounts;
pub mod cards;
pub mod users;
