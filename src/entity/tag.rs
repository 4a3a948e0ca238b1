use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tag")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::blog_post_tag::Entity")]
	BlogPostTag,
}

impl Related<super::blog_post::Entity> for Entity {
	fn to() -> RelationDef { super::blog_post_tag::Relation::BlogPost.def() }

	fn via() -> Option<RelationDef> { Some(super::blog_post_tag::Relation::Tag.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
