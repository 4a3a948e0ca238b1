use async_trait::async_trait;
use log::*;
use sea_orm::{prelude::*, DatabaseTransaction};

use super::MigrationTrait;
use crate::{
	db,
	schema::{sql::SqliteCompiler, Schema},
};


/// Installs every table of the schema, with its indexes.
pub struct Migration;


#[async_trait]
impl MigrationTrait for Migration {
	async fn run(&self, tx: &DatabaseTransaction, schema: &Schema) -> db::Result<()> {
		for statement in SqliteCompiler::compile_all(schema) {
			trace!("Executing: {}", &statement);
			tx.execute_unprepared(&statement).await?;
		}
		Ok(())
	}
}
