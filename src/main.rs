use std::{
	env, io,
	path::{Path, PathBuf},
	process,
	sync::Arc,
};

use fandomdb::{
	config::{self, Config, CONFIG},
	db::Database,
	diagram,
	migration::Migrations,
	schema::Schema,
	util,
};
use log::*;


fn initialize_logging() {
	let result = env::var_os("SYSTEM_LOG_FILE").map(PathBuf::from);

	if let Some(filename) = result {
		if let Err(e) = simple_logging::log_to_file(&filename, LevelFilter::Debug) {
			eprintln!("Unable to log to {}: {}", filename.display(), e);
			env_logger::init()
		}
	} else {
		env_logger::init()
	}
}

async fn load_config(path: &Path) -> Option<Config> {
	let content = match util::read_text_file(path).await {
		Err(e) => match e.kind() {
			io::ErrorKind::NotFound => {
				error!("Config file {:?} not found!", path);
				return None;
			}
			_ => {
				error!("Unable to read config file {:?}: {}", path, e);
				return None;
			}
		},
		Ok(c) => c,
	};

	match Config::parse(&content) {
		Err(e) => {
			error!("Unable to parse config file {:?}: {}", path, e);
			None
		}
		Ok(c) => Some(c),
	}
}

async fn load_database(config: &Config, schema: Arc<Schema>) -> io::Result<Database> {
	// If the path doesn't exist yet, create it
	let db_path = PathBuf::from(&config.database_path);
	util::ensure_parent_dir(&db_path).await?;

	let db = Database::load(db_path, schema)
		.await
		.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
	Ok(db)
}

#[tokio::main]
async fn main() {
	initialize_logging();

	// Load config
	let config_path = config::config_path();
	let config = match load_config(&config_path).await {
		Some(c) => c,
		None => process::exit(1),
	};
	if CONFIG.set(config.clone()).is_err() {
		error!("Unable to set config global.");
		process::exit(1);
	}

	let schema = Arc::new(Schema::load());

	// Load database
	let db = match load_database(&config, schema.clone()).await {
		Ok(db) => db,
		Err(e) => {
			error!("Unable to load database: {}", e);
			process::exit(1);
		}
	};

	// Run migrations (does nothing if there is nothing to migrate)
	if let Err(e) = Migrations::load().run(&db).await {
		error!("Unable to install the schema: {:?}", e);
		process::exit(1);
	}
	info!("Database at {} is up to date.", db.path().display());

	if config.render_diagram {
		if let Err(e) = diagram::write(&schema, &config.diagram_path).await {
			error!(
				"Unable to write diagram to {}: {}",
				&config.diagram_path, e
			);
			process::exit(1);
		}
	}
}
