//! Workflow Validation and Routing Engine for Routeflow
//!
//! The engine checks the structure of a workflow definition once and
//! then answers routing questions against it. It holds no state across
//! calls and never mutates a definition.
//!
//! # Architecture
//!
//! - [`Validator`] - Enforces the structural invariants (single START,
//!   reachability, acyclicity, gateway discipline)
//! - [`TransitionEvaluator`] - Computes the legal next steps for a step,
//!   consulting an injected [`ConditionEvaluator`]
//! - [`can_transition`] / [`permission_matches`] - Role and wildcard
//!   permission checks for entering a step
//! - [`WorkflowStore`] - Read interface over stored definitions, with
//!   the [`InMemoryWorkflowStore`] arena for development and tests
//! - [`WorkflowService`] - Facade combining all of the above
//!
//! # Example
//!
//! ```rust
//! use routeflow_engine::{can_transition, validate, EvaluationContext, TransitionEvaluator};
//! use routeflow_types::*;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let wf = WorkflowDefinition::new("support", "Support Ticket")
//!     .with_step(Step::start("start"))
//!     .with_step(Step::task("answer", "Answer").with_roles(["agent"]))
//!     .with_step(Step::end("end"))
//!     .with_transition(Transition::new("start", "answer"))
//!     .with_transition(Transition::new("answer", "end"));
//!
//! validate(&wf).unwrap();
//!
//! let next = TransitionEvaluator::new()
//!     .next_steps(&wf, "start", &EvaluationContext::new())
//!     .await;
//! assert_eq!(next[0].id.as_str(), "answer");
//! assert!(can_transition(&next[0], ["Agent"], [""; 0]));
//! # });
//! ```

#![deny(unsafe_code)]

pub mod evaluator;
pub mod permissions;
pub mod service;
pub mod store;
pub mod validator;

// Re-export main types
pub use evaluator::{AlwaysTrue, ConditionEvaluator, EvaluationContext, TransitionEvaluator};
pub use permissions::{can_transition, permission_matches, GrantSet, SUPERUSER_GRANT};
pub use service::WorkflowService;
pub use store::{InMemoryWorkflowStore, WorkflowStore, WritableWorkflowStore};
pub use validator::{validate, Validator};
