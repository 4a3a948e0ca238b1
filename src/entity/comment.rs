use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "comment")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	#[sea_orm(column_type = "Text")]
	pub content: String,
	pub date_posted: DateTimeUtc,
	pub user_id: i64,
	pub blog_post_id: i64,
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
	User,
	#[sea_orm(
		belongs_to = "super::blog_post::Entity",
		from = "Column::BlogPostId",
		to = "super::blog_post::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	BlogPost,
}

impl Related<super::user::Entity> for Entity {
	fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::blog_post::Entity> for Entity {
	fn to() -> RelationDef { Relation::BlogPost.def() }
}

impl ActiveModelBehavior for ActiveModel {}
