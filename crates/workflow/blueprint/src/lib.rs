//! Routeflow Blueprint: designer graphs to workflow definitions
//!
//! The visual designer saves loosely typed node/edge maps. This crate
//! resolves their field aliases once ([`Parser`]), translates the result
//! into a [`WorkflowDefinition`](routeflow_types::WorkflowDefinition)
//! ([`compile_to_workflow`]) and keeps saved blueprints in memory
//! ([`BlueprintStore`]).
//!
//! ```
//! use routeflow_blueprint::{compile_and_validate, Blueprint};
//!
//! let bp: Blueprint = serde_json::from_str(r#"{
//!     "key": "hello",
//!     "title": "Hello",
//!     "nodes": [
//!         {"id": "start", "type": "start"},
//!         {"id": "end", "type": "end"}
//!     ],
//!     "edges": [{"from": "start", "to": "end"}]
//! }"#).unwrap();
//!
//! let wf = compile_and_validate(&bp).unwrap();
//! assert_eq!(wf.id.as_str(), "hello");
//! ```

#![deny(unsafe_code)]

mod blueprint;
mod compiler;
mod errors;
mod parser;
mod store;

pub use blueprint::*;
pub use compiler::*;
pub use errors::*;
pub use parser::*;
pub use store::*;
