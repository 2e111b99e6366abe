//! Domain entities - the core business objects.

mod post;
mod slug;

pub use post::{
    Author, CodeSnippet, DEFAULT_READ_TIME, KNOWN_CATEGORIES, NewPost, Post, PostChanges, PostId,
    PostStatus, SeoMetadata, is_known_category, normalize_tags,
};
pub use slug::slugify;
