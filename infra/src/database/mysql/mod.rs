//! MySQL implementations of the core store traits

pub mod user_store_impl;

pub use user_store_impl::MySqlUserStore;
