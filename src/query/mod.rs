//! Query descriptors
//!
//! ```ignore
//! use relkv::query::Select;
//! use relkv::filter::eq;
//!
//! let rows = Select::from(&users)
//!     .left_join(&posts, eq(posts.column("user_id")?, users.column("id")?))
//!     .filter(eq(users.column("name")?, "John Doe"))
//!     .execute(&tx)?;
//! ```

mod select;

pub use select::{JoinClause, JoinType, Select};
