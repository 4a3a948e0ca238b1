use std::collections::BTreeSet;

use fandomdb::{
	db::PersistenceHandle,
	entity::*,
	schema::{Schema, BLOG_POST_TAG, FAVORITE, USER},
	test::load_database,
};
use sea_orm::{
	prelude::*, DatabaseBackend, EntityName, IdenStatic, Iterable, Statement,
};


#[ctor::ctor]
fn initialize() { env_logger::init(); }

fn entity_columns<E>(entity: E) -> (String, Vec<String>)
where
	E: EntityTrait,
{
	let columns = E::Column::iter().map(|c| c.as_str().to_string()).collect();
	(entity.table_name().to_string(), columns)
}

fn descriptor_columns(schema: &Schema, table: &str) -> Vec<&'static str> {
	schema
		.entity(table)
		.expect("table missing from schema")
		.fields
		.iter()
		.map(|f| f.name)
		.collect()
}


/// The sea-orm entities and the descriptors must describe the same tables.
#[test]
fn test_descriptors_match_entities() {
	let schema = Schema::load();
	let entities = [
		entity_columns(user::Entity),
		entity_columns(person::Entity),
		entity_columns(address::Entity),
		entity_columns(character::Entity),
		entity_columns(planet::Entity),
		entity_columns(blog_post::Entity),
		entity_columns(comment::Entity),
		entity_columns(tag::Entity),
		entity_columns(blog_post_tag::Entity),
		entity_columns(favorite::Entity),
		entity_columns(favorite_blog_post::Entity),
	];
	assert_eq!(entities.len(), schema.entities().len());
	for (table, columns) in &entities {
		assert_eq!(columns, &descriptor_columns(&schema, table), "{}", table);
	}
}

#[test]
fn test_descriptor_constraints() {
	assert!(USER.field("username").unwrap().unique);
	assert!(USER.field("email").unwrap().unique);
	assert!(BLOG_POST_TAG.association);
	assert_eq!(BLOG_POST_TAG.primary_key().count(), 2);
	assert_eq!(FAVORITE.checks.len(), 1);
	assert!(FAVORITE.field("character_id").unwrap().nullable);
	assert!(FAVORITE.field("planet_id").unwrap().nullable);
}

#[tokio::test]
async fn test_installed_tables() {
	let db = load_database("installed-tables").await;
	let rows = db
		.inner()
		.query_all(Statement::from_string(
			DatabaseBackend::Sqlite,
			"SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name".to_owned(),
		))
		.await
		.unwrap();
	let installed: BTreeSet<String> = rows
		.iter()
		.map(|r| r.try_get::<String>("", "name").unwrap())
		.filter(|name| !name.starts_with("sqlite_") && name != "version")
		.collect();
	let expected: BTreeSet<String> = db
		.schema()
		.entities()
		.iter()
		.map(|e| e.table.to_string())
		.collect();
	assert_eq!(installed, expected);

	for entity in db.schema().entities() {
		let rows = db
			.inner()
			.query_all(Statement::from_string(
				DatabaseBackend::Sqlite,
				format!("PRAGMA table_info(\"{}\")", entity.table),
			))
			.await
			.unwrap();
		let columns: Vec<(String, bool)> = rows
			.iter()
			.map(|r| {
				let name: String = r.try_get("", "name").unwrap();
				let not_null: i32 = r.try_get("", "notnull").unwrap();
				(name, not_null != 0)
			})
			.collect();
		let expected: Vec<(String, bool)> = entity
			.fields
			.iter()
			.map(|f| (f.name.to_string(), !f.nullable))
			.collect();
		assert_eq!(columns, expected, "{}", entity.table);
	}
}
