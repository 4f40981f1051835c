//! sc-timeline: timeline data model for clinical scenarios.
//!
//! Provides:
//! - Timeline nodes with their vital signs, branch successors and additional parameters
//! - An ordered, validated timeline graph
//! - An incremental builder
//! - The vital-sign validator shared by every write path
//!
//! # Example
//!
//! ```
//! use sc_core::NodeIndex;
//! use sc_timeline::{TimelineBuilder, TimelineNode};
//!
//! let mut builder = TimelineBuilder::new();
//! builder.add(TimelineNode::new(NodeIndex::ROOT).with_branches("Give oxygen", 1, 0));
//! builder.add(TimelineNode::new(NodeIndex::new(1)));
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! assert!(graph.root().is_some());
//! ```

pub mod builder;
pub mod graph;
pub mod node;
pub mod validate;

// Re-exports for ergonomics
pub use builder::TimelineBuilder;
pub use graph::TimelineGraph;
pub use node::{AdditionalParameter, ParameterValue, TimelineNode};
pub use validate::{Field, Rule, ValidationError};
