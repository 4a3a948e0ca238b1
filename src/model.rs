//! Input records for the create operations, and the domain form of a
//! favorite.

use sea_orm::prelude::DateTimeUtc;

use crate::{
	db::{self, Error},
	entity::favorite,
	trace,
};


/// The catalog entity a favorite points at. A favorite always points at
/// exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FavoriteTarget {
	Character(i64),
	Planet(i64),
}

/// A stored favorite, with its target resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Favorite {
	pub id: i64,
	pub user_id: i64,
	pub target: FavoriteTarget,
	pub date_added: DateTimeUtc,
}

#[derive(Clone, Debug)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub password: String,
	/// Defaults to the moment of insertion.
	pub date_joined: Option<DateTimeUtc>,
	pub is_active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct NewPerson {
	pub name: String,
	pub user_id: Option<i64>,
	pub profile_picture: Option<String>,
	pub bio: Option<String>,
	pub linkedin: Option<String>,
	pub facebook: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NewAddress {
	pub person_id: i64,
	pub street_name: Option<String>,
	pub street_number: Option<String>,
	pub post_code: Option<String>,
	pub country: Option<String>,
	pub city: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NewCharacter {
	pub name: String,
	pub description: Option<String>,
	pub birth_year: Option<String>,
	pub gender: Option<String>,
	pub height: Option<String>,
	pub movies: Option<String>,
	pub comics: Option<String>,
	pub books: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NewPlanet {
	pub name: String,
	pub climate: Option<String>,
	pub terrain: Option<String>,
	pub population: Option<String>,
	pub diameter: Option<String>,
	pub movies: Option<String>,
	pub comics: Option<String>,
	pub books: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewBlogPost {
	pub user_id: i64,
	pub title: String,
	pub content: String,
	pub date_posted: Option<DateTimeUtc>,
	/// Tags to attach to the post. Duplicates are ignored.
	pub tag_ids: Vec<i64>,
}

#[derive(Clone, Debug)]
pub struct NewComment {
	pub user_id: i64,
	pub blog_post_id: i64,
	pub content: String,
	pub date_posted: Option<DateTimeUtc>,
}

#[derive(Clone, Debug)]
pub struct NewFavorite {
	pub user_id: i64,
	pub target: FavoriteTarget,
	pub date_added: Option<DateTimeUtc>,
}


impl FavoriteTarget {
	/// Converts the two nullable storage columns into a target.
	pub fn from_columns(character_id: Option<i64>, planet_id: Option<i64>) -> db::Result<Self> {
		match (character_id, planet_id) {
			(Some(id), None) => Ok(Self::Character(id)),
			(None, Some(id)) => Ok(Self::Planet(id)),
			(Some(_), Some(_)) => trace::err(Error::InvariantViolation {
				entity: "Favorite",
				message: "references both a character and a planet",
			}),
			(None, None) => trace::err(Error::InvariantViolation {
				entity: "Favorite",
				message: "references neither a character nor a planet",
			}),
		}
	}

	/// The `(character_id, planet_id)` pair to store.
	pub fn to_columns(&self) -> (Option<i64>, Option<i64>) {
		match self {
			Self::Character(id) => (Some(*id), None),
			Self::Planet(id) => (None, Some(*id)),
		}
	}
}

impl TryFrom<favorite::Model> for Favorite {
	type Error = trace::Traced<Error>;

	fn try_from(model: favorite::Model) -> Result<Self, Self::Error> {
		let target = FavoriteTarget::from_columns(model.character_id, model.planet_id)?;
		Ok(Self {
			id: model.id,
			user_id: model.user_id,
			target,
			date_added: model.date_added,
		})
	}
}

impl NewUser {
	pub fn new(
		username: impl Into<String>, email: impl Into<String>, password: impl Into<String>,
	) -> Self {
		Self {
			username: username.into(),
			email: email.into(),
			password: password.into(),
			date_joined: None,
			is_active: true,
		}
	}
}

impl NewPerson {
	pub fn new(name: impl Into<String>, user_id: Option<i64>) -> Self {
		Self {
			name: name.into(),
			user_id,
			..Default::default()
		}
	}
}

impl NewAddress {
	pub fn new(person_id: i64) -> Self {
		Self {
			person_id,
			..Default::default()
		}
	}
}

impl NewCharacter {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

impl NewPlanet {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

impl NewBlogPost {
	pub fn new(user_id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			user_id,
			title: title.into(),
			content: content.into(),
			date_posted: None,
			tag_ids: Vec::new(),
		}
	}
}

impl NewComment {
	pub fn new(user_id: i64, blog_post_id: i64, content: impl Into<String>) -> Self {
		Self {
			user_id,
			blog_post_id,
			content: content.into(),
			date_posted: None,
		}
	}
}

impl NewFavorite {
	pub fn new(user_id: i64, target: FavoriteTarget) -> Self {
		Self {
			user_id,
			target,
			date_added: None,
		}
	}

	/// Builds a favorite from the storage form of its target. Fails with an
	/// invariant violation unless exactly one of the two is given.
	pub fn from_columns(
		user_id: i64, character_id: Option<i64>, planet_id: Option<i64>,
	) -> db::Result<Self> {
		let target = FavoriteTarget::from_columns(character_id, planet_id)?;
		Ok(Self::new(user_id, target))
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_target_from_columns() {
		assert_eq!(
			FavoriteTarget::from_columns(Some(3), None).unwrap(),
			FavoriteTarget::Character(3)
		);
		assert_eq!(
			FavoriteTarget::from_columns(None, Some(4)).unwrap(),
			FavoriteTarget::Planet(4)
		);
		for (c, p) in [(Some(1), Some(2)), (None, None)] {
			let error = FavoriteTarget::from_columns(c, p).unwrap_err();
			assert!(matches!(&*error, Error::InvariantViolation { .. }));
		}
	}

	#[test]
	fn test_target_to_columns() {
		assert_eq!(FavoriteTarget::Character(7).to_columns(), (Some(7), None));
		assert_eq!(FavoriteTarget::Planet(8).to_columns(), (None, Some(8)));
	}

	#[test]
	fn test_favorite_from_corrupt_row() {
		let model = favorite::Model {
			id: 1,
			user_id: 1,
			character_id: None,
			planet_id: None,
			date_added: chrono::Utc::now(),
		};
		let error = Favorite::try_from(model).unwrap_err();
		assert!(matches!(
			error.into_inner(),
			Error::InvariantViolation {
				entity: "Favorite",
				..
			}
		));
	}
}
