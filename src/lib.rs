pub mod ai;
pub mod config;
pub mod flashcards;
pub mod session;
pub mod storage;
pub mod transfer;
pub mod workspace;

pub use config::AppConfig;
pub use workspace::{Workspace, WorkspaceError};
