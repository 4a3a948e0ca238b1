use std::{io, path::Path};

use tokio::{fs::File, io::AsyncReadExt};


/// Read all the content of a file into a string
pub async fn read_text_file(path: impl AsRef<Path>) -> io::Result<String> {
	let mut file = File::open(path).await?;
	let mut content = String::new();
	file.read_to_string(&mut content).await?;
	Ok(content)
}

/// Creates the folder a file is going to be written in, if it doesn't exist
/// yet.
pub async fn ensure_parent_dir(path: impl AsRef<Path>) -> io::Result<()> {
	match path.as_ref().parent() {
		Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
		_ => Ok(()),
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_ensure_parent_dir() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("a").join("b").join("db.sqlite");
		ensure_parent_dir(&path).await.unwrap();
		assert!(dir.path().join("a").join("b").is_dir());

		// A bare file name has no folder to create
		ensure_parent_dir("db.sqlite").await.unwrap();
	}

	#[tokio::test]
	async fn test_read_text_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		tokio::fs::write(&path, "database_path = \"x\"").await.unwrap();
		assert_eq!(read_text_file(&path).await.unwrap(), "database_path = \"x\"");
	}
}
