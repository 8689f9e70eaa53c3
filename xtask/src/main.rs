use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

const BACKENDS: [&str; 2] = ["pumapal-store-sqlite", "pumapal-store-postgres"];

#[derive(Error, Debug)]
enum XtaskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Environment variable not set: {0}")]
    VarError(#[from] std::env::VarError),
    #[error("Unknown backend: {0}. Supported: sqlite")]
    UnknownBackend(String),
    #[error("Failed to read migrations directory {0}: {1}")]
    ReadMigrations(String, std::io::Error),
    #[error("No migration files found in {0}")]
    NoMigrations(String),
    #[error("Failed to read migration {0}: {1}")]
    ReadMigration(String, std::io::Error),
    #[error("Failed to run sqlite3. Is it installed?")]
    Sqlite3NotFound,
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    #[error("Failed to get parent directory")]
    NoParentDir,
    #[error("Migration sets differ between backends:\n{0}")]
    MigrationMismatch(String),
}

type Result<T> = std::result::Result<T, XtaskError>;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for the pumapal workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a local development database with every migration applied
    SetupDb {
        /// Storage backend to set up
        #[arg(default_value = "sqlite")]
        backend: String,
    },
    /// Verify every backend ships the same migration versions
    CheckMigrations,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::SetupDb { backend } => setup_db(&backend),
        Commands::CheckMigrations => check_migrations(&project_root()?),
    }
}

fn setup_db(backend: &str) -> Result<()> {
    match backend {
        "sqlite" => setup_sqlite(),
        _ => Err(XtaskError::UnknownBackend(backend.to_string())),
    }
}

/// `.sql` files in `dir`, sorted by name (which sorts by version).
fn migration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut migrations: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| XtaskError::ReadMigrations(dir.display().to_string(), e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();
    migrations.sort();

    if migrations.is_empty() {
        return Err(XtaskError::NoMigrations(dir.display().to_string()));
    }
    Ok(migrations)
}

fn setup_sqlite() -> Result<()> {
    println!("🔧 Setting up SQLite development database...");

    let project_root = project_root()?;
    let db_path = project_root.join("pumapal.db");
    let migration_dir = project_root.join("crates/pumapal-store-sqlite/migrations");

    if db_path.exists() {
        std::fs::remove_file(&db_path)?;
    }

    for path in migration_files(&migration_dir)? {
        println!("  Applying: {}", file_name(&path));

        let sql = std::fs::read_to_string(&path)
            .map_err(|e| XtaskError::ReadMigration(path.display().to_string(), e))?;

        let status = Command::new("sqlite3")
            .arg(&db_path)
            .arg(&sql)
            .status()
            .map_err(|_| XtaskError::Sqlite3NotFound)?;

        if !status.success() {
            return Err(XtaskError::MigrationFailed(path.display().to_string()));
        }
    }

    println!("✓ SQLite database created at: {}", db_path.display());
    println!();
    println!("Start the server against it with:");
    println!("  cargo run -p pumapal-server -- serve");

    Ok(())
}

fn check_migrations(root: &Path) -> Result<()> {
    println!("🔧 Comparing migrations across backends...");

    let mut sets = Vec::new();
    for backend in BACKENDS {
        let dir = root.join("crates").join(backend).join("migrations");
        let names: Vec<String> = migration_files(&dir)?.iter().map(|p| file_name(p)).collect();
        println!("  {}: {} migration(s)", backend, names.len());
        sets.push((backend, names));
    }

    let (first, expected) = &sets[0];
    let mut problems = String::new();
    for (backend, names) in &sets[1..] {
        for name in expected.iter().filter(|n| !names.contains(n)) {
            problems.push_str(&format!("  {} missing {} (present in {})\n", backend, name, first));
        }
        for name in names.iter().filter(|n| !expected.contains(n)) {
            problems.push_str(&format!("  {} missing {} (present in {})\n", first, name, backend));
        }
    }

    if !problems.is_empty() {
        return Err(XtaskError::MigrationMismatch(problems));
    }

    println!("✓ Migrations are in step");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let xtask_dir = PathBuf::from(manifest_dir);
    let parent = xtask_dir.parent().ok_or(XtaskError::NoParentDir)?;
    Ok(parent.to_path_buf())
}
