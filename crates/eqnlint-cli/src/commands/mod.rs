//! Command implementations.

pub mod all;
pub mod audit;
pub mod list;

pub use self::all::execute_all;
pub use self::audit::execute_audit;
pub use self::list::execute_list;
