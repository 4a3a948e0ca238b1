use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "blogpost")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	pub title: String,
	#[sea_orm(column_type = "Text")]
	pub content: String,
	pub date_posted: DateTimeUtc,
	/// The author
	pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::user::Entity",
		from = "Column::UserId",
		to = "super::user::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	Author,
	#[sea_orm(has_many = "super::comment::Entity")]
	Comment,
	#[sea_orm(has_many = "super::blog_post_tag::Entity")]
	BlogPostTag,
	#[sea_orm(has_many = "super::favorite_blog_post::Entity")]
	FavoriteBlogPost,
}

impl Related<super::user::Entity> for Entity {
	fn to() -> RelationDef { Relation::Author.def() }
}

impl Related<super::comment::Entity> for Entity {
	fn to() -> RelationDef { Relation::Comment.def() }
}

impl Related<super::favorite_blog_post::Entity> for Entity {
	fn to() -> RelationDef { Relation::FavoriteBlogPost.def() }
}

impl Related<super::tag::Entity> for Entity {
	fn to() -> RelationDef { super::blog_post_tag::Relation::Tag.def() }

	fn via() -> Option<RelationDef> { Some(super::blog_post_tag::Relation::BlogPost.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
