//! Claim settlement for delivered orders.
//!
//! After a run, every delivered order (accepted or outsourced) is exposed
//! to a quality claim drawn from its model's probability. Each occurred
//! claim charges a flat handling cost, and the model's probability drifts
//! up after a claim and down after a clean delivery. The claim text
//! generation and analysis that accompany a claim in production are
//! external services; this module only produces the occurred flag and the
//! cost.

mod book;

pub use book::{
    default_claim_probabilities, ClaimBook, ClaimConfig, ClaimDecision, ClaimOutcome,
};
