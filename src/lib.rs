//! Terminal wizard that installs a dotfiles repository piece by piece.
//!
//! The catalog of installable items is read from TOML, filtered by profile,
//! and the chosen items' install scripts are run one at a time while their
//! output streams into the UI.

pub mod catalog;
pub mod error;
pub mod event;
pub mod ui;
pub mod wizard;
