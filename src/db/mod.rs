pub mod articles;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod users;

pub use articles::{ArticleFilter, ArticleStore, OwnerFilter, PgArticleStore};
pub use memory::{MemoryArticleStore, MemoryUserStore};
pub use postgres::create_pool;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use users::{PgUserStore, UserStore};
