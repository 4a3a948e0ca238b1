//! The many-to-many link between blog posts and tags. A row has no identity
//! apart from the pair of keys, so tagging a post twice is the same as tagging
//! it once.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "blogpost_tag")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = false)]
	pub blogpost_id: i64,
	#[sea_orm(primary_key, auto_increment = false)]
	pub tag_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::blog_post::Entity",
		from = "Column::BlogpostId",
		to = "super::blog_post::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	BlogPost,
	#[sea_orm(
		belongs_to = "super::tag::Entity",
		from = "Column::TagId",
		to = "super::tag::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	Tag,
}

impl Related<super::blog_post::Entity> for Entity {
	fn to() -> RelationDef { Relation::BlogPost.def() }
}

impl Related<super::tag::Entity> for Entity {
	fn to() -> RelationDef { Relation::Tag.def() }
}

impl ActiveModelBehavior for ActiveModel {}
