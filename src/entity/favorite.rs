//! A user's fondness for a character or a planet.
//!
//! Exactly one of `character_id` and `planet_id` is set. The table enforces it
//! with a check constraint; `crate::model::FavoriteTarget` is the form the rest
//! of the crate works with.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "favorite")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	pub user_id: i64,
	pub character_id: Option<i64>,
	pub planet_id: Option<i64>,
	pub date_added: DateTimeUtc,
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
		belongs_to = "super::character::Entity",
		from = "Column::CharacterId",
		to = "super::character::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	Character,
	#[sea_orm(
		belongs_to = "super::planet::Entity",
		from = "Column::PlanetId",
		to = "super::planet::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	Planet,
}

impl Related<super::user::Entity> for Entity {
	fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::character::Entity> for Entity {
	fn to() -> RelationDef { Relation::Character.def() }
}

impl Related<super::planet::Entity> for Entity {
	fn to() -> RelationDef { Relation::Planet.def() }
}

impl ActiveModelBehavior for ActiveModel {}
