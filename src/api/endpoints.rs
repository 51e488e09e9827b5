// Cakewalk API endpoint functions.
// Provides typed, cached methods for fetching articles, posts and taxonomy.

use crate::error::Result;

use super::client::{Articles, BlogClient, Posts};
use super::resource::{PageQuery, PostsQuery, Resource};
use super::transport::Transport;
use super::types::{Article, ArticlesResponse, Category, Post, PostResponse, PostsResponse, Tag};

impl<T: Transport> BlogClient<Articles, T> {
    /// Get a page of articles.
    pub async fn get_articles(&self, page: PageQuery) -> Result<ArticlesResponse> {
        self.fetch(Resource::Articles(page)).await
    }

    /// Get a single article by slug, `None` if it does not exist.
    pub async fn get_article(&self, slug: &str) -> Result<Option<Article>> {
        self.fetch_optional(Resource::Article(slug.to_string())).await
    }

    /// Get a page of articles in a category.
    pub async fn get_articles_by_category(
        &self,
        category_slug: &str,
        page: PageQuery,
    ) -> Result<ArticlesResponse> {
        self.fetch(Resource::CategoryArticles {
            slug: category_slug.to_string(),
            page,
        })
        .await
    }

    /// Get a page of articles with a tag.
    pub async fn get_articles_by_tag(
        &self,
        tag_slug: &str,
        page: PageQuery,
    ) -> Result<ArticlesResponse> {
        self.fetch(Resource::TagArticles {
            slug: tag_slug.to_string(),
            page,
        })
        .await
    }

    /// Get all categories.
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        self.fetch(Resource::Categories).await
    }

    /// Get all tags.
    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        self.fetch(Resource::Tags).await
    }
}

impl<T: Transport> BlogClient<Posts, T> {
    /// Get a page of the project's posts.
    pub async fn get_posts(&self, query: &PostsQuery) -> Result<PostsResponse> {
        self.fetch(Resource::Posts(query.clone())).await
    }

    /// Get a post by numeric id.
    pub async fn get_post(&self, id: u64) -> Result<Option<Post>> {
        let response: Option<PostResponse> = self.fetch_optional(Resource::PostById(id)).await?;
        Ok(response.map(|r| r.post))
    }

    /// Get a post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let response: Option<PostResponse> = self
            .fetch_optional(Resource::PostBySlug(slug.to_string()))
            .await?;
        Ok(response.map(|r| r.post))
    }
}
