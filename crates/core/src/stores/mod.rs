pub mod redisearch;

pub use redisearch::RediSearchStore;
