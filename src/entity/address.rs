use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "address")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = true)]
	pub id: i64,
	pub street_name: Option<String>,
	pub street_number: Option<String>,
	pub post_code: Option<String>,
	pub country: Option<String>,
	pub city: Option<String>,
	pub person_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::person::Entity",
		from = "Column::PersonId",
		to = "super::person::Column::Id",
		on_update = "NoAction",
		on_delete = "Cascade"
	)]
	Person,
}

impl Related<super::person::Entity> for Entity {
	fn to() -> RelationDef { Relation::Person.def() }
}

impl ActiveModelBehavior for ActiveModel {}
