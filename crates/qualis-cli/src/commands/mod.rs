pub mod changes;
pub mod collect;
pub mod config;
pub mod dispatch;
pub mod projects;
pub mod schema;
pub mod shared;
pub mod snapshots;
pub mod watch;
