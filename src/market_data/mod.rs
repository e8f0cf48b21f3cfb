pub mod api_client;
pub mod cache;
pub mod provider;
pub mod types;
