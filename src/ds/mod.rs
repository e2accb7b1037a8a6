pub mod sentinel_list;
pub mod shard;
pub mod slot_arena;

pub use sentinel_list::SentinelList;
pub use shard::ShardSelector;
pub use slot_arena::{SlotArena, SlotId};
