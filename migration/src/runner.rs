use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    println!("Running migrations on {url}");
    let schema_manager = SchemaManager::new(&db);

    for migration in <migration::Migrator as MigratorTrait>::migrations() {
        let label = format!("Applying {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
        print!("{label}{dots} ");
        io::stdout().flush().unwrap();

        let start = Instant::now();
        match std::panic::AssertUnwindSafe(migration.up(&schema_manager))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {
                let elapsed = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {}", "done".green(), elapsed);
            }
            Ok(Err(e)) => {
                println!("{} {e}", "failed".red());
                std::process::exit(1);
            }
            Err(_) => {
                println!("{}", "panicked".red());
                std::process::exit(1);
            }
        }
    }
}
