//! Workflow Domain Types for Routeflow
//!
//! A workflow is a static directed graph that models a business process.
//! The engine never runs process instances over time; it validates a
//! definition once and answers routing questions against it.
//!
//! # Key Concepts
//!
//! - **WorkflowDefinition**: A versioned graph of steps and transitions.
//!   Keyed by `(id, version)`; edits produce a new version, never a mutation.
//! - **Step**: A node in the graph (start, task, gateway or end) with the
//!   roles and permissions that gate entry into it.
//! - **Transition**: A directed edge between two steps, optionally guarded
//!   by a [`Condition`] and optionally marked as a parallel fork or join.
//! - **Condition**: A deferred predicate. Its expression is carried verbatim
//!   and interpreted by a pluggable evaluator in `routeflow-engine`.
//!
//! # Design Principles
//!
//! 1. Constructors never check graph invariants. Validation is a separate,
//!    mandatory gate.
//! 2. Model values are read-only once validated.
//! 3. Serialization is deterministic (ordered maps, ordered step and
//!    transition lists).

#![deny(unsafe_code)]

mod definition;
mod errors;
mod transition;

pub use definition::*;
pub use errors::*;
pub use transition::*;
