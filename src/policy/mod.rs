pub mod aging_lfu;
pub mod lfu;
pub mod lru;
pub mod lru_k;
pub mod sharded_lru;

pub use aging_lfu::{AgingLfuCache, AgingLfuCore, DEFAULT_MAX_AVERAGE};
pub use lfu::{LfuCache, LfuCore};
pub use lru::{LruCache, LruCore};
pub use lru_k::LrukCache;
pub use sharded_lru::ShardedLruCache;
