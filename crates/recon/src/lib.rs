//! `rostermerge-recon`: group roster parser and member reconciliation engine.
//!
//! Pure engine crate: receives roster text and pre-loaded member records,
//! returns annotated records plus a structured result. No CLI or file IO.

pub mod cleanup;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod lookup;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod role;
pub mod store;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use matcher::{names_match, normalize_name, MatchScore};
pub use model::{GroupRecord, MemberRecord, ReconResult};
pub use parser::{parse_groups, ParseOutput};
