//! Data model and integrity layer of a fandom site.
//!
//! Users keep a profile with addresses, write blog posts and comments, tag
//! their posts, and favorite characters, planets and blog posts.
//! [`schema::Schema`] describes every table, [`migration::Migrations`]
//! installs it, and [`db::PersistenceHandle`] offers the operations on it.

pub mod config;
pub mod db;
pub mod diagram;
pub mod entity;
pub mod migration;
pub mod model;
pub mod schema;
pub mod test;
pub mod trace;
pub mod util;
