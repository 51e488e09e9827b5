//! Typed client for the Cakewalk blog API.
//!
//! Fetches articles, posts and taxonomy over authenticated HTTP GETs and keeps
//! successful responses in a short-lived per-client cache.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;

pub use api::{ArticlesClient, BlogClient, PageQuery, PostsClient, PostsQuery, Resource};
pub use cache::{CacheKey, Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, ClientOptions};
pub use error::{CakewalkError, Result};
