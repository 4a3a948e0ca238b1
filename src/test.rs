//! Helpers for setting up databases in tests.

use std::sync::Arc;

use log::*;
use tempfile::NamedTempFile;

use crate::{
	db::{Database, PersistenceHandle},
	entity::*,
	migration::Migrations,
	model::*,
	schema::Schema,
};


/// Creates a fresh database in a temporary file, with the schema installed.
pub async fn load_database(filename: &str) -> Database {
	let temp_file = NamedTempFile::with_prefix(filename).unwrap();
	let db = Database::load(temp_file.path().to_owned(), Arc::new(Schema::load()))
		.await
		.expect("unable to load database");
	let migrations = Migrations::load();
	migrations.run(&db).await.expect("migration issue");
	debug!("Loaded database at {}", temp_file.path().display());
	// Keep the file around until the end of all tests
	std::mem::forget(temp_file);
	db
}

pub async fn create_user(db: &Database, username: &str) -> user::Model {
	db.create_user(&NewUser::new(
		username,
		format!("{}@example.org", username),
		"secret",
	))
	.await
	.expect("unable to create user")
}

pub async fn create_blog_post(db: &Database, user_id: i64, title: &str) -> blog_post::Model {
	db.create_blog_post(&NewBlogPost::new(user_id, title, "Lorem ipsum."))
		.await
		.expect("unable to create blog post")
}
