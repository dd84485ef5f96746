pub mod curated_lists;
pub mod providers;
pub mod recommendations;

pub use curated_lists::{resolve_owner, CuratedListGenerator, CuratorSettings, OwnerResolution};
