//! Backend-agnostic description of every table in the data model.
//!
//! The descriptors are plain `static` data. [`Schema::load`] collects them
//! into an explicit, ordered list which is then handed by reference to the
//! persistence layer (for DDL and write validation) and to the diagram
//! renderer.

mod entities;
pub mod sql;

use std::fmt;

pub use entities::*;


/// The semantic type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
	Integer,
	/// Text with an upper bound on its length, in characters.
	String(usize),
	/// Unbounded text
	Text,
	Timestamp,
	Boolean,
}

/// What happens to a referencing row when the referenced row is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
	Cascade,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
	CurrentTimestamp,
	Boolean(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignKey {
	/// Table name of the referenced entity. Always points at its `id`.
	pub table: &'static str,
	pub on_delete: DeletePolicy,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
	pub name: &'static str,
	pub data_type: DataType,
	pub nullable: bool,
	pub unique: bool,
	pub primary_key: bool,
	pub default: Option<FieldDefault>,
	pub references: Option<ForeignKey>,
}

/// Table level constraints that can't be expressed on a single column.
#[derive(Clone, Copy, Debug)]
pub enum CheckConstraint {
	/// Exactly one of the listed nullable columns holds a value.
	ExactlyOneOf(&'static [&'static str]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationshipKind {
	BelongsTo,
	HasOne,
	HasMany,
	ManyToMany { via: &'static str },
}

/// A navigable relationship, as seen from the entity that declares it.
#[derive(Clone, Copy, Debug)]
pub struct RelationshipDescriptor {
	pub name: &'static str,
	/// Table name of the entity on the other side
	pub target: &'static str,
	pub kind: RelationshipKind,
}

#[derive(Clone, Copy, Debug)]
pub struct EntityDescriptor {
	/// Display name, e.g. `BlogPost`
	pub name: &'static str,
	pub table: &'static str,
	pub fields: &'static [FieldDescriptor],
	pub relationships: &'static [RelationshipDescriptor],
	pub checks: &'static [CheckConstraint],
	/// Join tables have no identity of their own.
	pub association: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
	ManyToOne,
	OneToOne,
}

/// A foreign key edge between two entities.
#[derive(Clone, Copy, Debug)]
pub struct Edge<'a> {
	pub from: &'a EntityDescriptor,
	pub field: &'a FieldDescriptor,
	pub to: &'a EntityDescriptor,
	pub cardinality: Cardinality,
	pub on_delete: DeletePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintReason {
	/// A required value was not given, or was blank.
	Missing,
	Unique,
	TooLong(usize),
	/// The field isn't declared on the entity at all.
	UnknownField,
}

/// A write that does not satisfy a column constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Violation {
	pub entity: &'static str,
	pub field: &'static str,
	pub reason: ConstraintReason,
}

/// The complete, ordered list of entities. Tables are ordered so that every
/// referenced table comes before the tables referencing it.
#[derive(Clone, Debug)]
pub struct Schema {
	entities: Vec<&'static EntityDescriptor>,
}


impl DataType {
	/// The name shown for the type in diagrams.
	pub fn type_name(&self) -> String {
		match self {
			Self::Integer => "integer".into(),
			Self::String(max) => format!("varchar({})", max),
			Self::Text => "text".into(),
			Self::Timestamp => "timestamp".into(),
			Self::Boolean => "boolean".into(),
		}
	}

	pub fn max_len(&self) -> Option<usize> {
		match self {
			Self::String(max) => Some(*max),
			_ => None,
		}
	}
}

impl FieldDescriptor {
	pub const fn new(name: &'static str, data_type: DataType) -> Self {
		Self {
			name,
			data_type,
			nullable: true,
			unique: false,
			primary_key: false,
			default: None,
			references: None,
		}
	}

	/// The auto-incremented `id` column every entity table starts with.
	pub const fn id() -> Self {
		Self {
			name: "id",
			data_type: DataType::Integer,
			nullable: false,
			unique: false,
			primary_key: true,
			default: None,
			references: None,
		}
	}

	pub const fn required(mut self) -> Self {
		self.nullable = false;
		self
	}

	pub const fn unique(mut self) -> Self {
		self.unique = true;
		self
	}

	pub const fn primary_key(mut self) -> Self {
		self.primary_key = true;
		self.nullable = false;
		self
	}

	pub const fn default(mut self, default: FieldDefault) -> Self {
		self.default = Some(default);
		self
	}

	pub const fn references(mut self, table: &'static str, on_delete: DeletePolicy) -> Self {
		self.references = Some(ForeignKey { table, on_delete });
		self
	}

	/// Checks a text value against the nullability and length of this field.
	pub fn check_text(&self, value: Option<&str>) -> Result<(), ConstraintReason> {
		match value {
			None =>
				if !self.nullable && self.default.is_none() {
					return Err(ConstraintReason::Missing);
				},
			Some(text) => {
				if !self.nullable && text.trim().is_empty() {
					return Err(ConstraintReason::Missing);
				}
				if let Some(max) = self.data_type.max_len() {
					if text.chars().count() > max {
						return Err(ConstraintReason::TooLong(max));
					}
				}
			}
		}
		Ok(())
	}
}

impl RelationshipDescriptor {
	pub const fn belongs_to(name: &'static str, target: &'static str) -> Self {
		Self {
			name,
			target,
			kind: RelationshipKind::BelongsTo,
		}
	}

	pub const fn has_one(name: &'static str, target: &'static str) -> Self {
		Self {
			name,
			target,
			kind: RelationshipKind::HasOne,
		}
	}

	pub const fn has_many(name: &'static str, target: &'static str) -> Self {
		Self {
			name,
			target,
			kind: RelationshipKind::HasMany,
		}
	}

	pub const fn many_to_many(
		name: &'static str, target: &'static str, via: &'static str,
	) -> Self {
		Self {
			name,
			target,
			kind: RelationshipKind::ManyToMany { via },
		}
	}
}

impl EntityDescriptor {
	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// The relationship that navigates from this entity to the one it
	/// references in `table`.
	pub fn belongs_to(&self, table: &str) -> Option<&RelationshipDescriptor> {
		self.relationships
			.iter()
			.find(|r| r.kind == RelationshipKind::BelongsTo && r.target == table)
	}

	pub fn primary_key(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.iter().filter(|f| f.primary_key)
	}

	pub fn foreign_keys(&self) -> impl Iterator<Item = (&FieldDescriptor, &ForeignKey)> {
		self.fields
			.iter()
			.filter_map(|f| f.references.as_ref().map(|r| (f, r)))
	}

	/// Validates a set of text values about to be written to this entity.
	pub fn validate(&self, values: &[(&str, Option<&str>)]) -> Result<(), Violation> {
		for (name, value) in values {
			let field = match self.field(name) {
				Some(f) => f,
				None =>
					return Err(Violation {
						entity: self.name,
						field: self.fields.first().map(|f| f.name).unwrap_or("id"),
						reason: ConstraintReason::UnknownField,
					}),
			};
			field.check_text(*value).map_err(|reason| Violation {
				entity: self.name,
				field: field.name,
				reason,
			})?;
		}
		Ok(())
	}

	/// Returns a violation of the given kind for one of this entity's fields.
	pub fn violation(&self, field: &str, reason: ConstraintReason) -> Violation {
		match self.field(field) {
			Some(f) => Violation {
				entity: self.name,
				field: f.name,
				reason,
			},
			None => Violation {
				entity: self.name,
				field: "id",
				reason: ConstraintReason::UnknownField,
			},
		}
	}
}

impl Schema {
	/// Builds the schema of the fandom site.
	pub fn load() -> Self {
		Self {
			entities: vec![
				&USER,
				&PERSON,
				&ADDRESS,
				&CHARACTER,
				&PLANET,
				&BLOG_POST,
				&COMMENT,
				&TAG,
				&BLOG_POST_TAG,
				&FAVORITE,
				&FAVORITE_BLOG_POST,
			],
		}
	}

	pub fn entities(&self) -> &[&'static EntityDescriptor] { &self.entities }

	/// Looks up an entity by its table name.
	pub fn entity(&self, table: &str) -> Option<&'static EntityDescriptor> {
		self.entities.iter().copied().find(|e| e.table == table)
	}

	/// All foreign key edges, in table order.
	pub fn edges(&self) -> Vec<Edge<'static>> {
		let mut edges = Vec::new();
		for from in self.entities.iter().copied() {
			for (field, fk) in from.foreign_keys() {
				if let Some(to) = self.entity(fk.table) {
					let cardinality = if field.unique {
						Cardinality::OneToOne
					} else {
						Cardinality::ManyToOne
					};
					edges.push(Edge {
						from,
						field,
						to,
						cardinality,
						on_delete: fk.on_delete,
					});
				}
			}
		}
		edges
	}
}

impl Default for Schema {
	fn default() -> Self { Self::load() }
}

impl fmt::Display for ConstraintReason {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Missing => write!(f, "a value is required"),
			Self::Unique => write!(f, "value is already taken"),
			Self::TooLong(max) => write!(f, "value is longer than {} characters", max),
			Self::UnknownField => write!(f, "field is not part of the schema"),
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tables_are_ordered_by_dependency() {
		let schema = Schema::load();
		for (i, entity) in schema.entities().iter().enumerate() {
			for (field, fk) in entity.foreign_keys() {
				let position = schema
					.entities()
					.iter()
					.position(|e| e.table == fk.table)
					.expect("foreign key to unknown table");
				assert!(
					position < i,
					"{}.{} references {} which is declared later",
					entity.table,
					field.name,
					fk.table
				);
			}
		}
	}

	#[test]
	fn test_every_relationship_target_exists() {
		let schema = Schema::load();
		for entity in schema.entities() {
			for relationship in entity.relationships {
				assert!(
					schema.entity(relationship.target).is_some(),
					"{} has a relationship to unknown table {}",
					entity.name,
					relationship.target
				);
				if let RelationshipKind::ManyToMany { via } = relationship.kind {
					assert!(schema.entity(via).map(|e| e.association).unwrap_or(false));
				}
			}
		}
	}

	#[test]
	fn test_every_edge_cascades() {
		let schema = Schema::load();
		let edges = schema.edges();
		assert_eq!(edges.len(), 12);
		assert!(edges.iter().all(|e| e.on_delete == DeletePolicy::Cascade));
	}

	#[test]
	fn test_person_user_is_one_to_one() {
		let schema = Schema::load();
		let edge = schema
			.edges()
			.into_iter()
			.find(|e| e.from.table == "person")
			.unwrap();
		assert_eq!(edge.to.table, "user");
		assert_eq!(edge.cardinality, Cardinality::OneToOne);
		assert!(edge.field.nullable);
	}

	#[test]
	fn test_edges_into_user() {
		let schema = Schema::load();
		let mut tables: Vec<_> = schema
			.edges()
			.iter()
			.filter(|e| e.to.table == "user")
			.map(|e| e.from.table)
			.collect();
		tables.sort();
		assert_eq!(
			tables,
			vec!["blogpost", "comment", "favorite", "favorite_blogpost", "person"]
		);
	}

	/// Every reference can be navigated from both of its ends.
	#[test]
	fn test_relationships_are_mutual() {
		let schema = Schema::load();
		for edge in schema.edges() {
			if edge.from.association {
				continue;
			}
			assert!(
				edge.from.belongs_to(edge.to.table).is_some(),
				"{} can't navigate to {}",
				edge.from.table,
				edge.to.table
			);
			let expected = match edge.cardinality {
				Cardinality::OneToOne => RelationshipKind::HasOne,
				Cardinality::ManyToOne => RelationshipKind::HasMany,
			};
			assert!(
				edge.to
					.relationships
					.iter()
					.any(|r| r.target == edge.from.table && r.kind == expected),
				"{} can't navigate back to {}",
				edge.to.table,
				edge.from.table
			);
		}
		assert_eq!(BLOG_POST.belongs_to("user").map(|r| r.name), Some("author"));
	}
	#[test]
	fn test_check_text() {
		let username = USER.field("username").unwrap();
		assert_eq!(username.check_text(Some("luke")), Ok(()));
		assert_eq!(username.check_text(None), Err(ConstraintReason::Missing));
		assert_eq!(username.check_text(Some("  ")), Err(ConstraintReason::Missing));
		let long = "x".repeat(51);
		assert_eq!(
			username.check_text(Some(&long)),
			Err(ConstraintReason::TooLong(50))
		);

		let bio = PERSON.field("bio").unwrap();
		assert_eq!(bio.check_text(None), Ok(()));
		assert_eq!(bio.check_text(Some("")), Ok(()));
	}

	#[test]
	fn test_validate_names_the_field() {
		let violation = USER
			.validate(&[("username", Some("han")), ("email", Some(""))])
			.unwrap_err();
		assert_eq!(violation.entity, "User");
		assert_eq!(violation.field, "email");
		assert_eq!(violation.reason, ConstraintReason::Missing);

		let violation = USER.validate(&[("nickname", Some("x"))]).unwrap_err();
		assert_eq!(violation.reason, ConstraintReason::UnknownField);
	}
}
