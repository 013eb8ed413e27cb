//! Admin gate domain types.
//!
//! The gate itself (permission check, confirmation, audit, handler
//! supervision) is the `AdminGate` use case in `sar-cli`.  This module holds
//! the values it computes:
//!
//! ```text
//! AuthorizationContext ──evaluate──► AccessDecision
//!                                        │
//!                     (+ optional confirmation answer)
//!                                        ▼
//!                                  AdminDecision ──run──► CommandOutcome ──► exit code
//! ```

pub mod audit;
pub mod authorization;
pub mod decision;

pub use audit::AuditRecord;
pub use authorization::{
    AccessDecision, AuthorizationContext, DenialReason, ADMIN_FLAG_VALUE, ADMIN_FLAG_VARS,
};
pub use decision::{AdminDecision, CommandOutcome};
