//! Durable credential persistence for the SkinMorph client.
//!
//! One JSON document holds the identity, role, and access token together,
//! so the three are persisted atomically or not at all. No caller can ever
//! observe an identity without a token or vice versa.

mod store;

pub use store::{
    default_state_dir, CredentialStore, FileStore, MemoryStore, StoredCredentials,
};
