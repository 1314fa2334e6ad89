//! Core: 配置、状态、任务、服务器装配

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::AppState;
pub use tasks::{BackgroundTasks, TaskKind};
