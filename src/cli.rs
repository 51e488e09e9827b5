//! Command-line interface for the `cakewalk` binary.
//!
//! Parses arguments with clap, builds the matching client from the environment
//! and renders the response as pretty JSON.

use clap::{Parser, Subcommand};

use crate::api::resource::{DEFAULT_ARTICLES_LIMIT, DEFAULT_POST_STATUS, DEFAULT_POSTS_LIMIT};
use crate::api::{ArticlesClient, PageQuery, PostsClient, PostsQuery};
use crate::config::ClientConfig;
use crate::error::{CakewalkError, Result};

/// Cakewalk API client - browse articles and posts from the terminal
#[derive(Parser, Debug)]
#[command(name = "cakewalk")]
#[command(about = "Fetch articles, posts and taxonomy from the Cakewalk API")]
#[command(version)]
pub struct Cli {
    /// Override the API origin (defaults to the production API)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Cache TTL in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub cache_ttl: Option<u64>,

    /// Project to read posts from (overrides CAKEWALK_PROJECT_ID)
    #[arg(long, global = true, value_name = "ID")]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List articles
    Articles {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_ARTICLES_LIMIT)]
        limit: u32,
    },
    /// Show one article
    Article { slug: String },
    /// List articles in a category
    Category {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_ARTICLES_LIMIT)]
        limit: u32,
    },
    /// List articles with a tag
    Tag {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_ARTICLES_LIMIT)]
        limit: u32,
    },
    /// List all categories
    Categories,
    /// List all tags
    Tags,
    /// List project posts
    Posts {
        #[arg(long, default_value = DEFAULT_POST_STATUS)]
        status: String,
        #[arg(long, default_value_t = DEFAULT_POSTS_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one project post by id or slug
    Post {
        #[arg(long, required_unless_present = "slug", conflicts_with = "slug")]
        id: Option<u64>,
        #[arg(long)]
        slug: Option<String>,
    },
}

impl Command {
    /// Whether this command talks to the project-scoped posts API.
    pub fn is_posts(&self) -> bool {
        matches!(self, Command::Posts { .. } | Command::Post { .. })
    }
}

impl Cli {
    /// Apply command-line overrides on top of environment configuration.
    pub fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config.options.base_url = Some(base_url.clone());
        }
        if let Some(ttl) = self.cache_ttl {
            config.options = config.options.with_cache_ttl_secs(ttl);
        }
        if let Some(project) = &self.project {
            config.project_id = Some(project.clone());
        }
        if !self.command.is_posts() {
            config.project_id = None;
        }
        config
    }
}

/// Run a parsed command and return the pretty-printed JSON result.
pub async fn run(cli: &Cli) -> Result<String> {
    let config = cli.apply_overrides(ClientConfig::from_env()?);

    match &cli.command {
        Command::Posts {
            status,
            limit,
            offset,
        } => {
            let client = PostsClient::from_config(config)?;
            let query = PostsQuery::default()
                .with_status(status.clone())
                .with_limit(*limit)
                .with_offset(*offset);
            to_json(&client.get_posts(&query).await?)
        }
        Command::Post { id, slug } => {
            let client = PostsClient::from_config(config)?;
            // clap requires --slug whenever --id is absent.
            let post = match id {
                Some(id) => client.get_post(*id).await?,
                None => client.get_post_by_slug(slug.as_deref().unwrap_or_default()).await?,
            };
            to_json(&post)
        }
        Command::Articles { page, limit } => {
            let client = ArticlesClient::from_config(config)?;
            to_json(&client.get_articles(PageQuery::new(*page, *limit)).await?)
        }
        Command::Article { slug } => {
            let client = ArticlesClient::from_config(config)?;
            to_json(&client.get_article(slug).await?)
        }
        Command::Category { slug, page, limit } => {
            let client = ArticlesClient::from_config(config)?;
            let page = PageQuery::new(*page, *limit);
            to_json(&client.get_articles_by_category(slug, page).await?)
        }
        Command::Tag { slug, page, limit } => {
            let client = ArticlesClient::from_config(config)?;
            let page = PageQuery::new(*page, *limit);
            to_json(&client.get_articles_by_tag(slug, page).await?)
        }
        Command::Categories => {
            let client = ArticlesClient::from_config(config)?;
            to_json(&client.get_categories().await?)
        }
        Command::Tags => {
            let client = ArticlesClient::from_config(config)?;
            to_json(&client.get_tags().await?)
        }
    }
}

fn to_json<V: serde::Serialize>(value: &V) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| CakewalkError::Other(e.to_string()))
}
