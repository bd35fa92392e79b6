pub mod criteria;
pub mod event;
pub mod listing;
