//! The persistence layer.
//!
//! Every operation lives on [`PersistenceHandle`], so it can run either
//! directly on the [`Database`] or inside a caller-controlled
//! [`Transaction`]. Writes validate against the schema descriptors first,
//! then check uniqueness and references, and only then touch the tables. A
//! failed check leaves nothing behind.
//!
//! Deleting a record cascades to everything that references it, on every
//! relationship. The cascade is carried out here explicitly, in the same
//! transaction, rather than relying on the engine to do it.

use std::{
	collections::BTreeSet,
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use sea_orm::{
	prelude::*, ActiveValue::*, DatabaseTransaction, QueryOrder, RuntimeErr, SqlErr,
	SqlxSqliteConnector, TransactionTrait,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::{
	entity::*,
	model::*,
	schema::{ConstraintReason, EntityDescriptor, Schema, Violation},
	trace::{self, Traceable, Traced},
};


pub type Result<T> = trace::Result<T, self::Error>;

#[derive(Clone)]
pub struct Database {
	path: PathBuf,
	orm: DatabaseConnection,
	schema: Arc<Schema>,
}

pub struct Transaction {
	inner: DatabaseTransaction,
	schema: Arc<Schema>,
}

#[derive(Debug, Error)]
pub enum Error {
	/// A required value is missing, too long, or a unique value is taken.
	#[error("constraint violation on {entity}.{field}: {reason}")]
	ConstraintViolation {
		entity: &'static str,
		field: &'static str,
		reason: ConstraintReason,
	},
	/// A record would break an invariant that spans more than one column.
	#[error("invariant violation on {entity}: {message}")]
	InvariantViolation {
		entity: &'static str,
		message: &'static str,
	},
	/// A foreign key points at a record that doesn't exist.
	#[error("{entity}.{field} references record {id}, which doesn't exist")]
	ReferenceError {
		entity: &'static str,
		field: &'static str,
		id: i64,
	},
	#[error("table {0} is not part of the schema")]
	UnknownEntity(String),
	#[error("database error: {0}")]
	Orm(DbErr),
}


#[async_trait]
pub trait PersistenceHandle {
	type Inner: ConnectionTrait + TransactionTrait + Send + Sync;

	fn inner(&self) -> &Self::Inner;

	fn schema(&self) -> &Schema;

	fn descriptor(&self, table: &str) -> Result<&'static EntityDescriptor> {
		match self.schema().entity(table) {
			Some(entity) => Ok(entity),
			None => trace::err(Error::UnknownEntity(table.to_string())),
		}
	}

	async fn create_user(&self, new: &NewUser) -> Result<user::Model> {
		let entity = self.descriptor("user")?;
		entity.validate(&[
			("username", Some(new.username.as_str())),
			("email", Some(new.email.as_str())),
			("password", Some(new.password.as_str())),
		])?;

		let tx = self.inner().begin().await?;
		if user::Entity::find()
			.filter(user::Column::Username.eq(new.username.as_str()))
			.one(&tx)
			.await?
			.is_some()
		{
			return Err(entity.violation("username", ConstraintReason::Unique).into());
		}
		if user::Entity::find()
			.filter(user::Column::Email.eq(new.email.as_str()))
			.one(&tx)
			.await?
			.is_some()
		{
			return Err(entity.violation("email", ConstraintReason::Unique).into());
		}

		let record = user::ActiveModel {
			id: NotSet,
			username: Set(new.username.clone()),
			email: Set(new.email.clone()),
			password: Set(new.password.clone()),
			date_joined: Set(new.date_joined.unwrap_or_else(Utc::now)),
			is_active: Set(new.is_active),
		};
		let user = record
			.insert(&tx)
			.await
			.map_err(|e| translate(self.schema(), e))?;
		tx.commit().await?;
		debug!("Created user {} ({}).", user.id, &user.username);
		Ok(user)
	}

	async fn load_user(&self, id: i64) -> Result<Option<user::Model>> {
		Ok(user::Entity::find_by_id(id).one(self.inner()).await?)
	}

	async fn load_user_by_username(&self, username: &str) -> Result<Option<user::Model>> {
		Ok(user::Entity::find()
			.filter(user::Column::Username.eq(username))
			.one(self.inner())
			.await?)
	}

	async fn load_users(&self) -> Result<Vec<user::Model>> {
		Ok(user::Entity::find()
			.order_by_asc(user::Column::Id)
			.all(self.inner())
			.await?)
	}

	/// Returns false if the user doesn't exist.
	async fn set_user_active(&self, id: i64, active: bool) -> Result<bool> {
		let mut updates = <user::ActiveModel as Default>::default();
		updates.is_active = Set(active);
		let result = user::Entity::update_many()
			.set(updates)
			.filter(user::Column::Id.eq(id))
			.exec(self.inner())
			.await?;
		Ok(result.rows_affected > 0)
	}

	/// Deletes a user together with their profile, addresses, blog posts,
	/// comments and favorites. Returns false if the user doesn't exist.
	async fn delete_user(&self, id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		if user::Entity::find_by_id(id).one(&tx).await?.is_none() {
			return Ok(false);
		}

		let post_ids: Vec<i64> = blog_post::Entity::find()
			.filter(blog_post::Column::UserId.eq(id))
			.all(&tx)
			.await?
			.into_iter()
			.map(|p| p.id)
			.collect();
		let posts = purge_blog_posts(&tx, &post_ids).await?;
		let comments = comment::Entity::delete_many()
			.filter(comment::Column::UserId.eq(id))
			.exec(&tx)
			.await?
			.rows_affected;
		favorite::Entity::delete_many()
			.filter(favorite::Column::UserId.eq(id))
			.exec(&tx)
			.await?;
		favorite_blog_post::Entity::delete_many()
			.filter(favorite_blog_post::Column::UserId.eq(id))
			.exec(&tx)
			.await?;
		let person_ids: Vec<i64> = person::Entity::find()
			.filter(person::Column::UserId.eq(id))
			.all(&tx)
			.await?
			.into_iter()
			.map(|p| p.id)
			.collect();
		purge_persons(&tx, &person_ids).await?;
		user::Entity::delete_by_id(id).exec(&tx).await?;
		tx.commit().await?;

		info!(
			"Deleted user {} along with {} blog posts and {} comments.",
			id, posts, comments
		);
		Ok(true)
	}

	async fn create_person(&self, new: &NewPerson) -> Result<person::Model> {
		let entity = self.descriptor("person")?;
		entity.validate(&[
			("name", Some(new.name.as_str())),
			("profile_picture", new.profile_picture.as_deref()),
			("bio", new.bio.as_deref()),
			("linkedin", new.linkedin.as_deref()),
			("facebook", new.facebook.as_deref()),
		])?;

		let tx = self.inner().begin().await?;
		if let Some(user_id) = new.user_id {
			if person::Entity::find()
				.filter(person::Column::UserId.eq(user_id))
				.one(&tx)
				.await?
				.is_some()
			{
				return Err(entity.violation("user_id", ConstraintReason::Unique).into());
			}
			ensure_exists::<user::Entity, _>(&tx, user_id, entity.name, "user_id").await?;
		}

		let record = person::ActiveModel {
			id: NotSet,
			name: Set(new.name.clone()),
			user_id: Set(new.user_id),
			profile_picture: Set(new.profile_picture.clone()),
			bio: Set(new.bio.clone()),
			linkedin: Set(new.linkedin.clone()),
			facebook: Set(new.facebook.clone()),
		};
		let person = record
			.insert(&tx)
			.await
			.map_err(|e| translate(self.schema(), e))?;
		tx.commit().await?;
		Ok(person)
	}

	async fn load_person(&self, id: i64) -> Result<Option<person::Model>> {
		Ok(person::Entity::find_by_id(id).one(self.inner()).await?)
	}

	/// The profile of the given user, if they have one.
	async fn load_user_person(&self, user_id: i64) -> Result<Option<person::Model>> {
		Ok(person::Entity::find()
			.filter(person::Column::UserId.eq(user_id))
			.one(self.inner())
			.await?)
	}

	/// Deletes a person and their addresses.
	async fn delete_person(&self, id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		let deleted = purge_persons(&tx, &[id]).await? > 0;
		tx.commit().await?;
		Ok(deleted)
	}

	async fn create_address(&self, new: &NewAddress) -> Result<address::Model> {
		let entity = self.descriptor("address")?;
		entity.validate(&[
			("street_name", new.street_name.as_deref()),
			("street_number", new.street_number.as_deref()),
			("post_code", new.post_code.as_deref()),
			("country", new.country.as_deref()),
			("city", new.city.as_deref()),
		])?;

		let tx = self.inner().begin().await?;
		ensure_exists::<person::Entity, _>(&tx, new.person_id, entity.name, "person_id").await?;
		let record = address::ActiveModel {
			id: NotSet,
			street_name: Set(new.street_name.clone()),
			street_number: Set(new.street_number.clone()),
			post_code: Set(new.post_code.clone()),
			country: Set(new.country.clone()),
			city: Set(new.city.clone()),
			person_id: Set(new.person_id),
		};
		let address = record.insert(&tx).await?;
		tx.commit().await?;
		Ok(address)
	}

	async fn load_address(&self, id: i64) -> Result<Option<address::Model>> {
		Ok(address::Entity::find_by_id(id).one(self.inner()).await?)
	}

	async fn load_person_addresses(&self, person_id: i64) -> Result<Vec<address::Model>> {
		Ok(address::Entity::find()
			.filter(address::Column::PersonId.eq(person_id))
			.order_by_asc(address::Column::Id)
			.all(self.inner())
			.await?)
	}

	async fn delete_address(&self, id: i64) -> Result<bool> {
		delete_by_id::<address::Entity, _>(self.inner(), id).await
	}

	async fn create_character(&self, new: &NewCharacter) -> Result<character::Model> {
		let entity = self.descriptor("character")?;
		entity.validate(&[
			("name", Some(new.name.as_str())),
			("description", new.description.as_deref()),
			("birth_year", new.birth_year.as_deref()),
			("gender", new.gender.as_deref()),
			("height", new.height.as_deref()),
			("movies", new.movies.as_deref()),
			("comics", new.comics.as_deref()),
			("books", new.books.as_deref()),
		])?;

		let record = character::ActiveModel {
			id: NotSet,
			name: Set(new.name.clone()),
			description: Set(new.description.clone()),
			birth_year: Set(new.birth_year.clone()),
			gender: Set(new.gender.clone()),
			height: Set(new.height.clone()),
			movies: Set(new.movies.clone()),
			comics: Set(new.comics.clone()),
			books: Set(new.books.clone()),
		};
		Ok(record.insert(self.inner()).await?)
	}

	async fn load_character(&self, id: i64) -> Result<Option<character::Model>> {
		Ok(character::Entity::find_by_id(id).one(self.inner()).await?)
	}

	/// Deletes a character and every favorite pointing at it.
	async fn delete_character(&self, id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		favorite::Entity::delete_many()
			.filter(favorite::Column::CharacterId.eq(id))
			.exec(&tx)
			.await?;
		let deleted = delete_by_id::<character::Entity, _>(&tx, id).await?;
		tx.commit().await?;
		Ok(deleted)
	}

	async fn create_planet(&self, new: &NewPlanet) -> Result<planet::Model> {
		let entity = self.descriptor("planet")?;
		entity.validate(&[
			("name", Some(new.name.as_str())),
			("climate", new.climate.as_deref()),
			("terrain", new.terrain.as_deref()),
			("population", new.population.as_deref()),
			("diameter", new.diameter.as_deref()),
			("movies", new.movies.as_deref()),
			("comics", new.comics.as_deref()),
			("books", new.books.as_deref()),
		])?;

		let record = planet::ActiveModel {
			id: NotSet,
			name: Set(new.name.clone()),
			climate: Set(new.climate.clone()),
			terrain: Set(new.terrain.clone()),
			population: Set(new.population.clone()),
			diameter: Set(new.diameter.clone()),
			movies: Set(new.movies.clone()),
			comics: Set(new.comics.clone()),
			books: Set(new.books.clone()),
		};
		Ok(record.insert(self.inner()).await?)
	}

	async fn load_planet(&self, id: i64) -> Result<Option<planet::Model>> {
		Ok(planet::Entity::find_by_id(id).one(self.inner()).await?)
	}

	/// Deletes a planet and every favorite pointing at it.
	async fn delete_planet(&self, id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		favorite::Entity::delete_many()
			.filter(favorite::Column::PlanetId.eq(id))
			.exec(&tx)
			.await?;
		let deleted = delete_by_id::<planet::Entity, _>(&tx, id).await?;
		tx.commit().await?;
		Ok(deleted)
	}

	/// Stores a blog post and links it to its tags, atomically.
	async fn create_blog_post(&self, new: &NewBlogPost) -> Result<blog_post::Model> {
		let entity = self.descriptor("blogpost")?;
		entity.validate(&[
			("title", Some(new.title.as_str())),
			("content", Some(new.content.as_str())),
		])?;
		let tag_ids: BTreeSet<i64> = new.tag_ids.iter().copied().collect();

		let tx = self.inner().begin().await?;
		ensure_exists::<user::Entity, _>(&tx, new.user_id, entity.name, "user_id").await?;
		for tag_id in &tag_ids {
			ensure_exists::<tag::Entity, _>(&tx, *tag_id, "blogpost_tag", "tag_id").await?;
		}

		let record = blog_post::ActiveModel {
			id: NotSet,
			title: Set(new.title.clone()),
			content: Set(new.content.clone()),
			date_posted: Set(new.date_posted.unwrap_or_else(Utc::now)),
			user_id: Set(new.user_id),
		};
		let post = record.insert(&tx).await?;
		for tag_id in tag_ids {
			let link = blog_post_tag::ActiveModel {
				blogpost_id: Set(post.id),
				tag_id: Set(tag_id),
			};
			blog_post_tag::Entity::insert(link)
				.exec_without_returning(&tx)
				.await?;
		}
		tx.commit().await?;
		debug!("User {} posted blog post {}.", post.user_id, post.id);
		Ok(post)
	}

	async fn load_blog_post(&self, id: i64) -> Result<Option<blog_post::Model>> {
		Ok(blog_post::Entity::find_by_id(id).one(self.inner()).await?)
	}

	/// The blog posts authored by the given user.
	async fn load_user_blog_posts(&self, user_id: i64) -> Result<Vec<blog_post::Model>> {
		Ok(blog_post::Entity::find()
			.filter(blog_post::Column::UserId.eq(user_id))
			.order_by_asc(blog_post::Column::Id)
			.all(self.inner())
			.await?)
	}

	/// Deletes a blog post with its comments, favorites and tag links. The
	/// tags themselves stay.
	async fn delete_blog_post(&self, id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		let deleted = purge_blog_posts(&tx, &[id]).await? > 0;
		tx.commit().await?;
		Ok(deleted)
	}

	async fn create_comment(&self, new: &NewComment) -> Result<comment::Model> {
		let entity = self.descriptor("comment")?;
		entity.validate(&[("content", Some(new.content.as_str()))])?;

		let tx = self.inner().begin().await?;
		ensure_exists::<user::Entity, _>(&tx, new.user_id, entity.name, "user_id").await?;
		ensure_exists::<blog_post::Entity, _>(&tx, new.blog_post_id, entity.name, "blog_post_id")
			.await?;
		let record = comment::ActiveModel {
			id: NotSet,
			content: Set(new.content.clone()),
			date_posted: Set(new.date_posted.unwrap_or_else(Utc::now)),
			user_id: Set(new.user_id),
			blog_post_id: Set(new.blog_post_id),
		};
		let comment = record.insert(&tx).await?;
		tx.commit().await?;
		Ok(comment)
	}

	async fn load_comment(&self, id: i64) -> Result<Option<comment::Model>> {
		Ok(comment::Entity::find_by_id(id).one(self.inner()).await?)
	}

	async fn load_blog_post_comments(&self, blog_post_id: i64) -> Result<Vec<comment::Model>> {
		Ok(comment::Entity::find()
			.filter(comment::Column::BlogPostId.eq(blog_post_id))
			.order_by_asc(comment::Column::Id)
			.all(self.inner())
			.await?)
	}

	async fn load_user_comments(&self, user_id: i64) -> Result<Vec<comment::Model>> {
		Ok(comment::Entity::find()
			.filter(comment::Column::UserId.eq(user_id))
			.order_by_asc(comment::Column::Id)
			.all(self.inner())
			.await?)
	}

	async fn delete_comment(&self, id: i64) -> Result<bool> {
		delete_by_id::<comment::Entity, _>(self.inner(), id).await
	}

	async fn create_tag(&self, name: &str) -> Result<tag::Model> {
		self.descriptor("tag")?.validate(&[("name", Some(name))])?;
		let record = tag::ActiveModel {
			id: NotSet,
			name: Set(name.to_string()),
		};
		Ok(record.insert(self.inner()).await?)
	}

	async fn load_tag(&self, id: i64) -> Result<Option<tag::Model>> {
		Ok(tag::Entity::find_by_id(id).one(self.inner()).await?)
	}

	/// Tag names aren't unique. This returns the oldest tag with the name.
	async fn load_tag_by_name(&self, name: &str) -> Result<Option<tag::Model>> {
		Ok(tag::Entity::find()
			.filter(tag::Column::Name.eq(name))
			.order_by_asc(tag::Column::Id)
			.one(self.inner())
			.await?)
	}

	/// Tags a blog post. Returns false if it already had the tag.
	async fn add_blog_post_tag(&self, blog_post_id: i64, tag_id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		ensure_exists::<blog_post::Entity, _>(&tx, blog_post_id, "blogpost_tag", "blogpost_id")
			.await?;
		ensure_exists::<tag::Entity, _>(&tx, tag_id, "blogpost_tag", "tag_id").await?;
		if blog_post_tag::Entity::find_by_id((blog_post_id, tag_id))
			.one(&tx)
			.await?
			.is_some()
		{
			return Ok(false);
		}

		let link = blog_post_tag::ActiveModel {
			blogpost_id: Set(blog_post_id),
			tag_id: Set(tag_id),
		};
		blog_post_tag::Entity::insert(link)
			.exec_without_returning(&tx)
			.await?;
		tx.commit().await?;
		Ok(true)
	}

	/// Removes a tag from a blog post. Returns false if it didn't have it.
	async fn remove_blog_post_tag(&self, blog_post_id: i64, tag_id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		ensure_exists::<blog_post::Entity, _>(&tx, blog_post_id, "blogpost_tag", "blogpost_id")
			.await?;
		ensure_exists::<tag::Entity, _>(&tx, tag_id, "blogpost_tag", "tag_id").await?;
		let removed = blog_post_tag::Entity::delete_many()
			.filter(blog_post_tag::Column::BlogpostId.eq(blog_post_id))
			.filter(blog_post_tag::Column::TagId.eq(tag_id))
			.exec(&tx)
			.await?
			.rows_affected;
		tx.commit().await?;
		Ok(removed > 0)
	}

	async fn load_blog_post_tags(&self, blog_post_id: i64) -> Result<Vec<tag::Model>> {
		let post = match blog_post::Entity::find_by_id(blog_post_id)
			.one(self.inner())
			.await?
		{
			Some(p) => p,
			None => return Ok(Vec::new()),
		};
		Ok(post
			.find_related(tag::Entity)
			.order_by_asc(tag::Column::Id)
			.all(self.inner())
			.await?)
	}

	async fn load_tag_blog_posts(&self, tag_id: i64) -> Result<Vec<blog_post::Model>> {
		let tag = match tag::Entity::find_by_id(tag_id).one(self.inner()).await? {
			Some(t) => t,
			None => return Ok(Vec::new()),
		};
		Ok(tag
			.find_related(blog_post::Entity)
			.order_by_asc(blog_post::Column::Id)
			.all(self.inner())
			.await?)
	}

	/// Deletes a tag and unlinks it from every blog post.
	async fn delete_tag(&self, id: i64) -> Result<bool> {
		let tx = self.inner().begin().await?;
		blog_post_tag::Entity::delete_many()
			.filter(blog_post_tag::Column::TagId.eq(id))
			.exec(&tx)
			.await?;
		let deleted = delete_by_id::<tag::Entity, _>(&tx, id).await?;
		tx.commit().await?;
		Ok(deleted)
	}

	async fn create_favorite(&self, new: &NewFavorite) -> Result<Favorite> {
		let entity = self.descriptor("favorite")?;

		let tx = self.inner().begin().await?;
		ensure_exists::<user::Entity, _>(&tx, new.user_id, entity.name, "user_id").await?;
		match new.target {
			FavoriteTarget::Character(id) =>
				ensure_exists::<character::Entity, _>(&tx, id, entity.name, "character_id").await?,
			FavoriteTarget::Planet(id) =>
				ensure_exists::<planet::Entity, _>(&tx, id, entity.name, "planet_id").await?,
		}

		let (character_id, planet_id) = new.target.to_columns();
		let record = favorite::ActiveModel {
			id: NotSet,
			user_id: Set(new.user_id),
			character_id: Set(character_id),
			planet_id: Set(planet_id),
			date_added: Set(new.date_added.unwrap_or_else(Utc::now)),
		};
		let favorite = record.insert(&tx).await?;
		tx.commit().await?;
		Favorite::try_from(favorite)
	}

	async fn load_favorite(&self, id: i64) -> Result<Option<Favorite>> {
		favorite::Entity::find_by_id(id)
			.one(self.inner())
			.await?
			.map(Favorite::try_from)
			.transpose()
	}

	async fn load_user_favorites(&self, user_id: i64) -> Result<Vec<Favorite>> {
		favorite::Entity::find()
			.filter(favorite::Column::UserId.eq(user_id))
			.order_by_asc(favorite::Column::Id)
			.all(self.inner())
			.await?
			.into_iter()
			.map(Favorite::try_from)
			.collect()
	}

	/// The favorites pointing at the given character or planet.
	async fn load_target_favorites(&self, target: FavoriteTarget) -> Result<Vec<Favorite>> {
		let condition = match target {
			FavoriteTarget::Character(id) => favorite::Column::CharacterId.eq(id),
			FavoriteTarget::Planet(id) => favorite::Column::PlanetId.eq(id),
		};
		favorite::Entity::find()
			.filter(condition)
			.order_by_asc(favorite::Column::Id)
			.all(self.inner())
			.await?
			.into_iter()
			.map(Favorite::try_from)
			.collect()
	}

	async fn delete_favorite(&self, id: i64) -> Result<bool> {
		delete_by_id::<favorite::Entity, _>(self.inner(), id).await
	}

	/// Favorites a blog post. Users may favorite their own posts, and the same
	/// post more than once.
	async fn create_favorite_blog_post(
		&self, user_id: i64, blog_post_id: i64,
	) -> Result<favorite_blog_post::Model> {
		let entity = self.descriptor("favorite_blogpost")?;

		let tx = self.inner().begin().await?;
		ensure_exists::<user::Entity, _>(&tx, user_id, entity.name, "user_id").await?;
		ensure_exists::<blog_post::Entity, _>(&tx, blog_post_id, entity.name, "blog_post_id")
			.await?;
		let record = favorite_blog_post::ActiveModel {
			id: NotSet,
			user_id: Set(user_id),
			blog_post_id: Set(blog_post_id),
			date_added: Set(Utc::now()),
		};
		let favorite = record.insert(&tx).await?;
		tx.commit().await?;
		Ok(favorite)
	}

	async fn load_favorite_blog_post(
		&self, id: i64,
	) -> Result<Option<favorite_blog_post::Model>> {
		Ok(favorite_blog_post::Entity::find_by_id(id)
			.one(self.inner())
			.await?)
	}

	async fn load_user_favorite_blog_posts(
		&self, user_id: i64,
	) -> Result<Vec<favorite_blog_post::Model>> {
		Ok(favorite_blog_post::Entity::find()
			.filter(favorite_blog_post::Column::UserId.eq(user_id))
			.order_by_asc(favorite_blog_post::Column::Id)
			.all(self.inner())
			.await?)
	}

	async fn load_blog_post_favorites(
		&self, blog_post_id: i64,
	) -> Result<Vec<favorite_blog_post::Model>> {
		Ok(favorite_blog_post::Entity::find()
			.filter(favorite_blog_post::Column::BlogPostId.eq(blog_post_id))
			.order_by_asc(favorite_blog_post::Column::Id)
			.all(self.inner())
			.await?)
	}

	async fn delete_favorite_blog_post(&self, id: i64) -> Result<bool> {
		delete_by_id::<favorite_blog_post::Entity, _>(self.inner(), id).await
	}
}


/// Fails with a reference error if there is no `E` record with the given id.
async fn ensure_exists<E, C>(
	conn: &C, id: i64, entity: &'static str, field: &'static str,
) -> Result<()>
where
	E: EntityTrait,
	<E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
	C: ConnectionTrait,
{
	if E::find_by_id(id).one(conn).await?.is_none() {
		return trace::err(Error::ReferenceError { entity, field, id });
	}
	Ok(())
}

async fn delete_by_id<E, C>(conn: &C, id: i64) -> Result<bool>
where
	E: EntityTrait,
	<E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
	C: ConnectionTrait,
{
	Ok(E::delete_by_id(id).exec(conn).await?.rows_affected > 0)
}

/// Deletes the given blog posts and everything attached to them. Returns the
/// number of posts that were removed.
async fn purge_blog_posts<C>(conn: &C, ids: &[i64]) -> Result<u64>
where
	C: ConnectionTrait,
{
	if ids.is_empty() {
		return Ok(0);
	}

	comment::Entity::delete_many()
		.filter(comment::Column::BlogPostId.is_in(ids.iter().copied()))
		.exec(conn)
		.await?;
	favorite_blog_post::Entity::delete_many()
		.filter(favorite_blog_post::Column::BlogPostId.is_in(ids.iter().copied()))
		.exec(conn)
		.await?;
	blog_post_tag::Entity::delete_many()
		.filter(blog_post_tag::Column::BlogpostId.is_in(ids.iter().copied()))
		.exec(conn)
		.await?;
	let result = blog_post::Entity::delete_many()
		.filter(blog_post::Column::Id.is_in(ids.iter().copied()))
		.exec(conn)
		.await?;
	Ok(result.rows_affected)
}

/// Deletes the given persons and their addresses.
async fn purge_persons<C>(conn: &C, ids: &[i64]) -> Result<u64>
where
	C: ConnectionTrait,
{
	if ids.is_empty() {
		return Ok(0);
	}

	address::Entity::delete_many()
		.filter(address::Column::PersonId.is_in(ids.iter().copied()))
		.exec(conn)
		.await?;
	let result = person::Entity::delete_many()
		.filter(person::Column::Id.is_in(ids.iter().copied()))
		.exec(conn)
		.await?;
	Ok(result.rows_affected)
}

/// Turns a unique index failure reported by the engine into a constraint
/// violation on the right field. SQLite reports these as
/// `UNIQUE constraint failed: table.column`.
fn translate(schema: &Schema, error: DbErr) -> Traced<Error> {
	if let Some(SqlErr::UniqueConstraintViolation(message)) = error.sql_err() {
		let violation = message
			.rsplit(": ")
			.next()
			.and_then(|columns| columns.split(", ").next())
			.and_then(|column| column.split_once('.'))
			.and_then(|(table, column)| {
				schema
					.entity(table)
					.map(|e| e.violation(column, ConstraintReason::Unique))
			});
		if let Some(v) = violation {
			warn!("Unique index rejected a write to {}.{}.", v.entity, v.field);
			return Error::from(v).trace();
		}
	}
	Error::Orm(error).trace()
}


impl Database {
	pub async fn load(path: PathBuf, schema: Arc<Schema>) -> Result<Self> {
		// The path is given to sqlx as is, so it never gets parsed as a URL
		let options = SqliteConnectOptions::new()
			.filename(&path)
			.create_if_missing(true);
		let pool = SqlitePoolOptions::new()
			.idle_timeout(Duration::from_secs(10))
			.acquire_timeout(Duration::from_secs(1))
			.connect_with(options)
			.await
			.map_err(|e| DbErr::Conn(RuntimeErr::SqlxError(e)))?;
		let orm = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
		debug!("Opened database at {}.", path.display());

		Ok(Self { path, orm, schema })
	}

	pub fn path(&self) -> &Path { &self.path }

	pub async fn transaction(&self) -> Result<Transaction> {
		let inner = self.orm.begin().await?;
		Ok(Transaction {
			inner,
			schema: self.schema.clone(),
		})
	}
}

impl PersistenceHandle for Database {
	type Inner = DatabaseConnection;

	fn inner(&self) -> &Self::Inner { &self.orm }

	fn schema(&self) -> &Schema { &self.schema }
}

impl PersistenceHandle for Transaction {
	type Inner = DatabaseTransaction;

	fn inner(&self) -> &Self::Inner { &self.inner }

	fn schema(&self) -> &Schema { &self.schema }
}

impl Transaction {
	pub async fn commit(self) -> Result<()> {
		self.inner.commit().await?;
		Ok(())
	}

	pub async fn rollback(self) -> Result<()> {
		self.inner.rollback().await?;
		Ok(())
	}
}

impl From<Violation> for Error {
	fn from(other: Violation) -> Self {
		Self::ConstraintViolation {
			entity: other.entity,
			field: other.field,
			reason: other.reason,
		}
	}
}

impl From<Violation> for Traced<Error> {
	fn from(other: Violation) -> Self { Error::from(other).trace() }
}

impl From<DbErr> for Traced<Error> {
	fn from(other: DbErr) -> Self { Error::Orm(other).trace() }
}
