//! Command implementations.

pub mod preview;
pub mod run;
pub mod watch;

pub use self::preview::execute_preview;
pub use self::run::execute_run;
pub use self::watch::execute_watch;
