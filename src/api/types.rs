// Cakewalk API response types.
// Pass-through shapes for articles, posts, taxonomy and structured post content.

use serde::{Deserialize, Serialize};

/// Article category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

/// Article tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub slug: String,
    pub name: String,
}

/// Full article as returned by `/articles/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub headline: String,
    pub meta_description: String,
    pub content: String,
    pub content_html: String,
    pub reading_time: u32,
    pub published_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_articles: Option<Vec<ArticleSummary>>,
}

/// Article listing entry without the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub slug: String,
    pub headline: String,
    pub meta_description: String,
    pub reading_time: u32,
    pub published_at: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// One page of article summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleSummary>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Post author byline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub title: Option<String>,
    pub photo_url: Option<String>,
    pub url: Option<String>,
    pub bio: Option<String>,
    pub byline: Option<String>,
}

/// One block of structured post content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSection {
    Intro {
        content: String,
    },
    Heading {
        heading: String,
        /// 2 or 3.
        level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Faq {
        question: String,
        answer: String,
    },
    HowToStep {
        step: u32,
        title: String,
        description: String,
    },
    KeyTakeaways {
        facts: Vec<String>,
    },
    /// Section kinds this client does not know about yet.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredContentMeta {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Post body broken into typed sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<StructuredContentMeta>,
    #[serde(default)]
    pub sections: Vec<ContentSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqQuestion {
    pub question: String,
    pub answer: String,
}

/// Project post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub post_type: String,
    pub post_format: String,
    pub primary_keyword: String,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    pub excerpt: Option<String>,
    pub body_markdown: Option<String>,
    pub body_html: Option<String>,
    pub structured_content: Option<StructuredContent>,
    /// Opaque JSON-LD objects.
    pub schema_json_ld: Option<Vec<serde_json::Value>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image_url: Option<String>,
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub faq_questions: Vec<FaqQuestion>,
    pub author: Option<Author>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Offset pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

/// One page of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

/// Response wrapper for single post lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: Post,
}
