//! The sea-orm entities of every table.
//!
//! Each module matches the descriptor of the same table in `crate::schema`.

pub mod address;
pub mod blog_post;
pub mod blog_post_tag;
pub mod character;
pub mod comment;
pub mod favorite;
pub mod favorite_blog_post;
pub mod person;
pub mod planet;
pub mod tag;
pub mod user;
