//! Backend façade for the Aora video-sharing app.
//!
//! The [`domain`] module holds the typed records, the driven ports and the
//! [`domain::Backend`] façade. [`outbound::appwrite`] serves those ports
//! from the Appwrite REST API, [`wiring`] assembles the two from
//! [`settings`], and [`inbound::navigation`] describes the app's tab bar.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
pub mod telemetry;
#[cfg(feature = "test-support")]
pub mod test_support;
pub mod wiring;
