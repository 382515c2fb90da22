//! Persistence contracts: key-value preference stores and versioned state envelopes.

pub mod app_state;
pub mod prefs;
