mod loader;
mod query_result;

pub use loader::RowLoader;
pub use query_result::QueryResult;
