pub mod postgres;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use postgres::{create_pool, run_migrations, PgListStore};
pub use store::ListStore;
