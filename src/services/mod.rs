//! Business services
//!
//! One service per aggregate, each wrapping the corresponding repository
//! with validation and the message-bearing result shapes.

pub mod categories;
pub mod points;
pub mod result;
pub mod sessions;
pub mod thread_items;
pub mod threads;
pub mod users;
pub mod validators;

pub use categories::CategoryService;
pub use points::PointService;
pub use result::{QueryArrayResult, QueryOneResult};
pub use sessions::SessionService;
pub use thread_items::ThreadItemService;
pub use threads::ThreadService;
pub use users::{ThreadWithItems, UserProfile, UserService};
