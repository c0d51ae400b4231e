//! Command entry points used by the CLI.
//!
//! - `run_load` / `run_retry`: list posts
//! - `run_sources`: survey every origin
//! - `run_show`: print one post body
//! - `run_info`: cache and preference status
//! - `run_validate`: check a configuration file

pub mod info;
pub mod load;
pub mod show;
pub mod sources;
pub mod validate;

pub use info::run_info;
pub use load::{ListOptions, render_outcome, run_load, run_retry};
pub use show::run_show;
pub use sources::run_sources;
pub use validate::run_validate;
