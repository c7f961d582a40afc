//! xcompile Build Engine
//!
//! Drives native build systems (autotools, OpenSSL) once per target
//! architecture, each inside a private working copy of the source tree.

pub mod autotools;
pub mod context;
pub mod job;
pub mod openssl;
pub mod runner;
pub mod strategy;
pub mod workspace;

pub use context::BuildContext;
pub use job::{BuildJob, BuildOutcome, BuildReport};
pub use runner::{BuildOrchestrator, BuildRequest, JobExecutor, StrategyExecutor};
pub use strategy::{detect_strategy, select_strategy, BuildStrategy};
pub use workspace::{copy_tree, WorkingCopy};
