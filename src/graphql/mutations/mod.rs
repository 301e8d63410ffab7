//! Per-domain mutation structs, merged into the root in [super::schema]

pub mod points;
pub mod threads;
pub mod users;

pub use points::PointMutations;
pub use threads::ThreadMutations;
pub use users::UserMutations;
