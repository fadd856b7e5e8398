pub mod annotations;
pub mod available;
pub mod catalog;
pub mod dispatch;
pub mod expand;
pub mod export;
pub mod query;
pub mod schema;
