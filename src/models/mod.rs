pub mod metadata;

pub use metadata::CacheMetadata;
