pub mod query;
pub mod root;

pub use query::query_handler;
pub use root::root_handler;
