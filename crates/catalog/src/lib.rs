pub mod filter;
pub mod group;
pub mod loader;
pub mod normalize;
pub mod raw;
