//! The module for migrating the database.
use std::fmt::Display;

use async_trait::async_trait;
use log::*;
use sea_orm::{
	prelude::*, sea_query::*, DatabaseBackend, DatabaseTransaction, Statement, TransactionTrait,
};

use crate::{
	db::{self, Database, PersistenceHandle},
	schema::Schema,
	trace,
};

mod v0_1;


/// The latest database version.
pub const LATEST_VERSION: Version = Version { major: 0, minor: 1 };

const CREATE_VERSION_TABLE: &str = r#"
	CREATE TABLE IF NOT EXISTS "version" (
		"major" integer NOT NULL,
		"minor" integer NOT NULL
	)
"#;
const INITIALIZE_VERSION: &str = r#"
	INSERT INTO "version" ("major", "minor")
		SELECT 0, 0 WHERE NOT EXISTS (SELECT 1 FROM "version")
"#;


#[derive(Clone, Debug)]
pub struct Version {
	major: u32,
	minor: u32,
}

pub struct Migrations {
	/// A list of available migrations, ordered at version
	list: Vec<(Version, Box<dyn MigrationTrait + Send + Sync>)>,
}

#[async_trait]
trait MigrationTrait {
	async fn run(&self, tx: &DatabaseTransaction, schema: &Schema) -> db::Result<()>;
}


impl Migrations {
	pub fn load() -> Self {
		Self {
			list: vec![(Version::new(0, 1), Box::new(v0_1::Migration))],
		}
	}

	/// The version the database is currently at. A database that has never
	/// been migrated is at v0.0.
	pub async fn load_version(&self, db: &Database) -> db::Result<Version> {
		db.inner().execute_unprepared(CREATE_VERSION_TABLE).await?;
		db.inner().execute_unprepared(INITIALIZE_VERSION).await?;

		let q = Query::select()
			.from(Alias::new("version"))
			.column(Alias::new("major"))
			.column(Alias::new("minor"))
			.to_owned();
		let (sql, values) = q.build(SqliteQueryBuilder);
		let r = db
			.inner()
			.query_one(Statement::from_sql_and_values(
				DatabaseBackend::Sqlite,
				sql,
				values,
			))
			.await?;
		let result = match r {
			Some(row) => row,
			None =>
				return trace::err(db::Error::InvariantViolation {
					entity: "version",
					message: "no version in the database",
				}),
		};
		let major: u32 = result.try_get_by_index(0)?;
		let minor: u32 = result.try_get_by_index(1)?;
		Ok(Version::new(major, minor))
	}

	async fn store_version(&self, tx: &DatabaseTransaction, version: &Version) -> db::Result<()> {
		let q = Query::update()
			.table(Alias::new("version"))
			.values([
				(Alias::new("major"), version.major.into()),
				(Alias::new("minor"), version.minor.into()),
			])
			.to_owned();
		let (sql, values) = q.build(SqliteQueryBuilder);
		let _ = tx
			.execute(Statement::from_sql_and_values(
				DatabaseBackend::Sqlite,
				sql,
				values,
			))
			.await?;
		Ok(())
	}

	/// Brings the database up to the latest version. Running it on a database
	/// that is already up to date does nothing.
	pub async fn run(&self, db: &Database) -> db::Result<()> {
		let mut current_version = self.load_version(db).await?;

		for (new_version, migration) in &self.list {
			if new_version > &current_version {
				let tx = db.inner().begin().await?;
				info!(
					"Running database migration from {} to {}...",
					current_version, new_version
				);
				migration.run(&tx, db.schema()).await?;
				self.store_version(&tx, new_version).await?;
				tx.commit().await?;
				info!("Migrated database to {}.", new_version);
				current_version = new_version.clone();
			}
		}

		if current_version != LATEST_VERSION {
			warn!(
				"Database is at {}, which is newer than {}.",
				current_version, LATEST_VERSION
			);
		}
		Ok(())
	}
}

impl Version {
	pub fn new(major: u32, minor: u32) -> Self { Self { major, minor } }
}

impl Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "v{}.{}", self.major, self.minor)
	}
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool { self.major == other.major && self.minor == other.minor }
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		match self.major.partial_cmp(&other.major) {
			Some(core::cmp::Ordering::Equal) => {}
			ord => return ord,
		}
		self.minor.partial_cmp(&other.minor)
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::test;

	#[test]
	fn test_version_order() {
		assert!(Version::new(0, 1) > Version::new(0, 0));
		assert!(Version::new(1, 0) > Version::new(0, 9));
		assert_eq!(LATEST_VERSION.to_string(), "v0.1");
	}

	#[tokio::test]
	async fn test_migrations_are_idempotent() {
		let db = test::load_database("migration-idempotent").await;
		let migrations = Migrations::load();
		assert_eq!(migrations.load_version(&db).await.unwrap(), LATEST_VERSION);

		// Running again must neither fail nor recreate any table
		migrations.run(&db).await.unwrap();
		assert_eq!(migrations.load_version(&db).await.unwrap(), LATEST_VERSION);
	}
}
