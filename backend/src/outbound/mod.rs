//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **appwrite**: the managed backend's REST API (accounts, documents,
//!   file storage, avatars) over a shared reqwest client.
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic.

pub mod appwrite;
