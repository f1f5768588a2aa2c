#![doc = include_str!("../README.md")]

mod builder;
mod conditional;
mod error;
mod flatten;
mod node;
mod render;
mod simplify;
mod store;
mod value;

pub use builder::{Expr, Operand};
pub use conditional::{If, IncompleteConditional, PartialConditional};
pub use error::ExprError;
pub use flatten::{flatten, reconstruct, Record};
pub use node::{CaseLabels, Node, Op};
pub use render::reason;
pub use simplify::simplify;
pub use store::{load, persist, MemoryStore, RecordSink, RecordSource};
pub use value::Value;
