//! Per-domain query structs, merged into the root in [super::schema]

pub mod categories;
pub mod thread_items;
pub mod threads;
pub mod users;

pub use categories::CategoryQueries;
pub use thread_items::ThreadItemQueries;
pub use threads::ThreadQueries;
pub use users::UserQueries;
