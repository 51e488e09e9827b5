// Cakewalk API module.
// Provides the caching client, transport, request resources and response types.

pub mod client;
pub mod endpoints;
pub mod resource;
pub mod transport;
pub mod types;

pub use client::{
    ApiFlavor, Articles, ArticlesClient, BlogClient, PROJECT_ID_HEADER, Posts, PostsClient,
};
pub use resource::{PageQuery, PostsQuery, Resource};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::*;
