//! Inbound adapters that present the app's surfaces to a UI host.
//!
//! The tab bar description lives under [`navigation`].

pub mod navigation;
