use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "planet")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	pub name: String,
	pub climate: Option<String>,
	pub terrain: Option<String>,
	pub population: Option<String>,
	pub diameter: Option<String>,
	pub movies: Option<String>,
	pub comics: Option<String>,
	pub books: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::favorite::Entity")]
	Favorite,
}

impl Related<super::favorite::Entity> for Entity {
	fn to() -> RelationDef { Relation::Favorite.def() }
}

impl ActiveModelBehavior for ActiveModel {}
