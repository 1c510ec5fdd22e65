//! TenderHub Engine — the tender and bid lifecycle: authorization,
//! versioned edits and rollbacks, status transitions, approval tally,
//! and the review ledger.
//!
//! Services are generic over the repository traits of `tenderhub-core`,
//! so the engine has no dependency on the database crate.

pub mod bid;
pub mod config;
pub mod decision;
mod error;
pub mod gate;
pub mod identity;
pub mod requests;
pub mod review;
pub mod tender;
mod versioning;
pub mod views;

pub use bid::BidService;
pub use config::EngineConfig;
pub use decision::DecisionService;
pub use gate::AuthorizationGate;
pub use identity::IdentityService;
pub use review::ReviewService;
pub use tender::TenderService;
