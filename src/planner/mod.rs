//! Query planner for relkv
//!
//! Select descriptor → logical plan → physical plan.
//!
//! # Design Principles
//!
//! - Validation happens before planning and before any store access
//! - Deterministic: same descriptor, same plan
//! - Structural only: no pushdown, no join reordering, no index selection

mod errors;
mod explain;
mod logical;
mod physical;
mod validate;

pub use errors::{PlannerError, PlannerErrorCode, PlannerResult};
pub use explain::ExplainPlan;
pub use logical::{plan_logical, LogicalOperator};
pub use physical::{plan_physical, PhysicalOperator};
pub use validate::validate;
