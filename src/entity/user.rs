//! The root identity of the site. Everything a user writes or favorites is
//! owned by their `user` record.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	#[sea_orm(unique)]
	pub username: String,
	#[sea_orm(unique)]
	pub email: String,
	pub password: String,
	pub date_joined: DateTimeUtc,
	pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_one = "super::person::Entity")]
	Person,
	#[sea_orm(has_many = "super::blog_post::Entity")]
	BlogPost,
	#[sea_orm(has_many = "super::comment::Entity")]
	Comment,
	#[sea_orm(has_many = "super::favorite::Entity")]
	Favorite,
	#[sea_orm(has_many = "super::favorite_blog_post::Entity")]
	FavoriteBlogPost,
}

impl Related<super::person::Entity> for Entity {
	fn to() -> RelationDef { Relation::Person.def() }
}

impl Related<super::blog_post::Entity> for Entity {
	fn to() -> RelationDef { Relation::BlogPost.def() }
}

impl Related<super::comment::Entity> for Entity {
	fn to() -> RelationDef { Relation::Comment.def() }
}

impl Related<super::favorite::Entity> for Entity {
	fn to() -> RelationDef { Relation::Favorite.def() }
}

impl Related<super::favorite_blog_post::Entity> for Entity {
	fn to() -> RelationDef { Relation::FavoriteBlogPost.def() }
}

impl ActiveModelBehavior for ActiveModel {}
