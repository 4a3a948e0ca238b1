//! Descriptors for every table of the fandom site.
//!
//! Each descriptor mirrors the sea-orm entity of the same table in
//! `crate::entity`.

use super::{
	CheckConstraint, DataType::*, DeletePolicy::Cascade, EntityDescriptor, FieldDefault,
	FieldDescriptor as Field, RelationshipDescriptor as Rel,
};


pub static USER: EntityDescriptor = EntityDescriptor {
	name: "User",
	table: "user",
	fields: &[
		Field::id(),
		Field::new("username", String(50)).required().unique(),
		Field::new("email", String(150)).required().unique(),
		Field::new("password", String(150)).required(),
		Field::new("date_joined", Timestamp)
			.required()
			.default(FieldDefault::CurrentTimestamp),
		Field::new("is_active", Boolean)
			.required()
			.default(FieldDefault::Boolean(true)),
	],
	relationships: &[
		Rel::has_one("person", "person"),
		Rel::has_many("blogposts", "blogpost"),
		Rel::has_many("comments", "comment"),
		Rel::has_many("favorites", "favorite"),
		Rel::has_many("favorite_blogposts", "favorite_blogpost"),
	],
	checks: &[],
	association: false,
};

/// The personal profile of a user.
pub static PERSON: EntityDescriptor = EntityDescriptor {
	name: "Person",
	table: "person",
	fields: &[
		Field::id(),
		Field::new("name", String(250)).required(),
		// A user has at most one profile
		Field::new("user_id", Integer)
			.unique()
			.references("user", Cascade),
		Field::new("profile_picture", String(250)),
		Field::new("bio", Text),
		Field::new("linkedin", String(250)),
		Field::new("facebook", String(250)),
	],
	relationships: &[
		Rel::belongs_to("user", "user"),
		Rel::has_many("addresses", "address"),
	],
	checks: &[],
	association: false,
};

pub static ADDRESS: EntityDescriptor = EntityDescriptor {
	name: "Address",
	table: "address",
	fields: &[
		Field::id(),
		Field::new("street_name", String(150)),
		Field::new("street_number", String(50)),
		Field::new("post_code", String(250)),
		Field::new("country", String(150)),
		Field::new("city", String(250)),
		Field::new("person_id", Integer)
			.required()
			.references("person", Cascade),
	],
	relationships: &[Rel::belongs_to("person", "person")],
	checks: &[],
	association: false,
};

pub static CHARACTER: EntityDescriptor = EntityDescriptor {
	name: "Character",
	table: "character",
	fields: &[
		Field::id(),
		Field::new("name", String(100)).required(),
		Field::new("description", String(250)),
		Field::new("birth_year", String(20)),
		Field::new("gender", String(20)),
		Field::new("height", String(20)),
		Field::new("movies", String(250)),
		Field::new("comics", String(250)),
		Field::new("books", String(250)),
	],
	relationships: &[Rel::has_many("favorites", "favorite")],
	checks: &[],
	association: false,
};

pub static PLANET: EntityDescriptor = EntityDescriptor {
	name: "Planet",
	table: "planet",
	fields: &[
		Field::id(),
		Field::new("name", String(100)).required(),
		Field::new("climate", String(100)),
		Field::new("terrain", String(100)),
		Field::new("population", String(100)),
		Field::new("diameter", String(100)),
		Field::new("movies", String(250)),
		Field::new("comics", String(250)),
		Field::new("books", String(250)),
	],
	relationships: &[Rel::has_many("favorites", "favorite")],
	checks: &[],
	association: false,
};

pub static BLOG_POST: EntityDescriptor = EntityDescriptor {
	name: "BlogPost",
	table: "blogpost",
	fields: &[
		Field::id(),
		Field::new("title", String(250)).required(),
		Field::new("content", Text).required(),
		Field::new("date_posted", Timestamp)
			.required()
			.default(FieldDefault::CurrentTimestamp),
		Field::new("user_id", Integer)
			.required()
			.references("user", Cascade),
	],
	relationships: &[
		Rel::belongs_to("author", "user"),
		Rel::has_many("comments", "comment"),
		Rel::many_to_many("tags", "tag", "blogpost_tag"),
		Rel::has_many("favorite_blogposts", "favorite_blogpost"),
	],
	checks: &[],
	association: false,
};

pub static COMMENT: EntityDescriptor = EntityDescriptor {
	name: "Comment",
	table: "comment",
	fields: &[
		Field::id(),
		Field::new("content", Text).required(),
		Field::new("date_posted", Timestamp)
			.required()
			.default(FieldDefault::CurrentTimestamp),
		Field::new("user_id", Integer)
			.required()
			.references("user", Cascade),
		Field::new("blog_post_id", Integer)
			.required()
			.references("blogpost", Cascade),
	],
	relationships: &[
		Rel::belongs_to("user", "user"),
		Rel::belongs_to("blogpost", "blogpost"),
	],
	checks: &[],
	association: false,
};

pub static TAG: EntityDescriptor = EntityDescriptor {
	name: "Tag",
	table: "tag",
	fields: &[Field::id(), Field::new("name", String(50)).required()],
	relationships: &[Rel::many_to_many("blogposts", "blogpost", "blogpost_tag")],
	checks: &[],
	association: false,
};

/// Links blog posts to tags. The pair of foreign keys is the whole identity of
/// a row.
pub static BLOG_POST_TAG: EntityDescriptor = EntityDescriptor {
	name: "blogpost_tag",
	table: "blogpost_tag",
	fields: &[
		Field::new("blogpost_id", Integer)
			.primary_key()
			.references("blogpost", Cascade),
		Field::new("tag_id", Integer)
			.primary_key()
			.references("tag", Cascade),
	],
	relationships: &[
		Rel::belongs_to("blogpost", "blogpost"),
		Rel::belongs_to("tag", "tag"),
	],
	checks: &[],
	association: true,
};

pub static FAVORITE: EntityDescriptor = EntityDescriptor {
	name: "Favorite",
	table: "favorite",
	fields: &[
		Field::id(),
		Field::new("user_id", Integer)
			.required()
			.references("user", Cascade),
		Field::new("character_id", Integer).references("character", Cascade),
		Field::new("planet_id", Integer).references("planet", Cascade),
		Field::new("date_added", Timestamp)
			.required()
			.default(FieldDefault::CurrentTimestamp),
	],
	relationships: &[
		Rel::belongs_to("user", "user"),
		Rel::belongs_to("character", "character"),
		Rel::belongs_to("planet", "planet"),
	],
	checks: &[CheckConstraint::ExactlyOneOf(&["character_id", "planet_id"])],
	association: false,
};

pub static FAVORITE_BLOG_POST: EntityDescriptor = EntityDescriptor {
	name: "FavoriteBlogPost",
	table: "favorite_blogpost",
	fields: &[
		Field::id(),
		Field::new("user_id", Integer)
			.required()
			.references("user", Cascade),
		Field::new("blog_post_id", Integer)
			.required()
			.references("blogpost", Cascade),
		Field::new("date_added", Timestamp)
			.required()
			.default(FieldDefault::CurrentTimestamp),
	],
	relationships: &[
		Rel::belongs_to("user", "user"),
		Rel::belongs_to("blogpost", "blogpost"),
	],
	checks: &[],
	association: false,
};
