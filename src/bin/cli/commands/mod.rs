pub mod ai;
pub mod cards;
pub mod export;
pub mod import;
pub mod list;
pub mod new;
pub mod note;
pub mod show;
pub mod write;
