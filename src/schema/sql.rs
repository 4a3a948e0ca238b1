//! SQLite DDL compiler.
//!
//! Turns entity descriptors into sea_query `CREATE TABLE` and `CREATE INDEX`
//! statements. Output is deterministic, so migrations built from it are
//! reproducible.

use sea_orm::sea_query::{
	Alias, ColumnDef, Expr, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement,
	SchemaStatementBuilder, SimpleExpr, SqliteQueryBuilder, Table, TableCreateStatement,
};

use super::{
	CheckConstraint, DataType, DeletePolicy, EntityDescriptor, FieldDefault, FieldDescriptor,
	Schema,
};


pub struct SqliteCompiler;


impl SqliteCompiler {
	/// Builds the `CREATE TABLE` statement of a single entity.
	///
	/// A single primary key column is declared inline as an auto-incremented
	/// integer. Composite keys, foreign keys and checks are declared as table
	/// constraints.
	pub fn compile_table(entity: &EntityDescriptor) -> TableCreateStatement {
		let composite_key = entity.primary_key().count() > 1;
		let mut stat = Table::create();
		stat.table(Alias::new(entity.table));

		for field in entity.fields {
			stat.col(&mut Self::compile_column(field, composite_key));
		}

		if composite_key {
			let mut key = Index::create();
			for field in entity.primary_key() {
				key.col(Alias::new(field.name));
			}
			stat.primary_key(&mut key);
		}

		for (field, fk) in entity.foreign_keys() {
			stat.foreign_key(
				ForeignKey::create()
					.from(Alias::new(entity.table), Alias::new(field.name))
					.to(Alias::new(fk.table), Alias::new("id"))
					.on_delete(foreign_key_action(fk.on_delete)),
			);
		}

		for check in entity.checks {
			stat.check(Self::compile_check(check));
		}
		stat.to_owned()
	}

	fn compile_column(field: &FieldDescriptor, composite_key: bool) -> ColumnDef {
		let mut def = ColumnDef::new(Alias::new(field.name));
		match field.data_type {
			DataType::Integer => def.integer(),
			DataType::String(max) => def.string_len(max as u32),
			DataType::Text => def.text(),
			DataType::Timestamp => def.timestamp(),
			DataType::Boolean => def.boolean(),
		};
		if !field.nullable {
			def.not_null();
		}
		if field.primary_key && !composite_key {
			def.primary_key().auto_increment();
		}
		if field.unique {
			def.unique_key();
		}
		match field.default {
			Some(FieldDefault::CurrentTimestamp) => {
				def.default(Expr::current_timestamp());
			}
			Some(FieldDefault::Boolean(b)) => {
				def.default(b);
			}
			None => {}
		}
		def
	}

	/// The condition of a check constraint.
	pub fn compile_check(check: &CheckConstraint) -> SimpleExpr {
		match check {
			CheckConstraint::ExactlyOneOf(columns) => {
				let terms = columns
					.iter()
					.map(|c| format!("({} IS NOT NULL)", Self::quote(c)))
					.collect::<Vec<_>>()
					.join(" + ");
				Expr::cust(format!("({}) = 1", terms))
			}
		}
	}

	/// Indexes on the foreign key columns, so that navigating from a row to
	/// the rows referencing it doesn't scan the whole table.
	///
	/// Columns that are unique or lead the primary key are already indexed.
	pub fn compile_indexes(entity: &EntityDescriptor) -> Vec<IndexCreateStatement> {
		let leading_key = entity.primary_key().next().map(|f| f.name);
		entity
			.foreign_keys()
			.filter(|(f, _)| !f.unique && Some(f.name) != leading_key)
			.map(|(f, _)| {
				Index::create()
					.name(format!("idx_{}_{}", entity.table, f.name))
					.table(Alias::new(entity.table))
					.col(Alias::new(f.name))
					.to_owned()
			})
			.collect()
	}

	/// Generates every statement needed to create the schema, in order.
	pub fn compile_all(schema: &Schema) -> Vec<String> {
		let mut statements = Vec::new();
		for entity in schema.entities() {
			statements.push(Self::compile_table(entity).to_string(SqliteQueryBuilder));
			statements.extend(
				Self::compile_indexes(entity)
					.iter()
					.map(|i| i.to_string(SqliteQueryBuilder)),
			);
		}
		statements
	}

	/// Quotes a column name for use inside a custom expression.
	fn quote(identifier: &str) -> String { format!("\"{}\"", identifier.replace('"', "\"\"")) }
}


fn foreign_key_action(policy: DeletePolicy) -> ForeignKeyAction {
	match policy {
		DeletePolicy::Cascade => ForeignKeyAction::Cascade,
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::*;

	fn table_sql(entity: &EntityDescriptor) -> String {
		SqliteCompiler::compile_table(entity).to_string(SqliteQueryBuilder)
	}

	#[test]
	fn test_compile_user_table() {
		let sql = table_sql(&USER);
		assert!(sql.starts_with("CREATE TABLE \"user\""));
		assert!(sql.contains("\"id\" integer NOT NULL PRIMARY KEY AUTOINCREMENT"));
		assert!(sql.contains("\"username\" text(50) NOT NULL UNIQUE"));
		assert!(sql.contains("\"password\" text(150) NOT NULL,"));
		assert!(sql.contains("\"date_joined\" text NOT NULL DEFAULT CURRENT_TIMESTAMP"));
		assert!(sql.contains("\"is_active\" boolean NOT NULL DEFAULT TRUE"));
		assert!(!sql.contains("FOREIGN KEY"));
	}

	#[test]
	fn test_compile_association_table() {
		let sql = table_sql(&BLOG_POST_TAG);
		assert!(sql.contains("PRIMARY KEY (\"blogpost_id\", \"tag_id\")"));
		assert!(!sql.contains("AUTOINCREMENT"));
		assert!(sql.contains("REFERENCES \"tag\" (\"id\")"));
		assert!(sql.contains("REFERENCES \"blogpost\" (\"id\")"));
		assert_eq!(sql.matches("ON DELETE CASCADE").count(), 2);
	}

	#[test]
	fn test_compile_favorite_check() {
		let sql = table_sql(&FAVORITE);
		assert!(sql.contains("CHECK (((\"character_id\" IS NOT NULL) + (\"planet_id\" IS NOT NULL)) = 1"));
	}

	#[test]
	fn test_compile_indexes() {
		assert!(SqliteCompiler::compile_indexes(&USER).is_empty());
		// `person.user_id` is unique and thereby already indexed
		assert!(SqliteCompiler::compile_indexes(&PERSON).is_empty());

		let indexes = SqliteCompiler::compile_indexes(&BLOG_POST_TAG);
		assert_eq!(indexes.len(), 1);
		let sql = indexes[0].to_string(SqliteQueryBuilder);
		assert!(sql.starts_with("CREATE INDEX \"idx_blogpost_tag_tag_id\""));
		assert!(sql.contains("ON \"blogpost_tag\" (\"tag_id\")"));

		assert_eq!(SqliteCompiler::compile_indexes(&COMMENT).len(), 2);
	}

	#[test]
	fn test_compile_all_creates_every_table() {
		let schema = Schema::load();
		let statements = SqliteCompiler::compile_all(&schema);
		let tables = statements
			.iter()
			.filter(|s| s.starts_with("CREATE TABLE"))
			.count();
		assert_eq!(tables, schema.entities().len());
	}
}
