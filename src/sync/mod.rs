//! Sync Arbiter and remote transport (SPEC_FULL.md §4.4).

pub mod arbiter;
pub mod remote;

pub use arbiter::SyncArbiter;
pub use remote::{decode_remote_manifest, CloudLink, RemoteClient};
