pub mod auth;
pub mod catalog;
pub mod checklists;
pub mod notifications;
pub mod pop;
pub mod quick_lists;
pub mod submissions;
pub mod tenancy;
