pub mod member_cache;
pub mod registry;

pub use member_cache::{CacheStats, MemberCache};
pub use registry::TypeRegistry;
