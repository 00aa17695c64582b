use quill_db::migrate;
use quill_server::{bootstrap, cli, runtime, settings};

#[tokio::main]
async fn main() {
    let run_mode = cli::parse_args();
    let settings = if matches!(run_mode, cli::RunMode::Server) {
        settings::Settings::from_env()
    } else {
        settings::Settings::from_env_with_options(false)
    };
    runtime::init_tracing();
    if matches!(run_mode, cli::RunMode::Server) {
        if let Err(missing) = settings::preflight(&settings) {
            tracing::error!(
                event = "preflight_failed",
                missing = ?missing,
                "Required configuration missing"
            );
            std::process::exit(1);
        }
    }
    bootstrap::log_startup(&settings);

    let db = match bootstrap::connect_db(&settings).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(event = "db_connect_failed", error = %err);
            return;
        }
    };
    if matches!(run_mode, cli::RunMode::Migrate) {
        if let Err(err) = migrate(&db).await {
            tracing::error!(error = %err, "migration failed");
            std::process::exit(1);
        }
        tracing::info!("migrations applied");
        return;
    }
    if let cli::RunMode::CreateSuperuser(args) = run_mode {
        if let Err(err) = migrate(&db).await {
            tracing::error!(error = %err, "migration failed");
            std::process::exit(1);
        }
        if let Err(err) = cli::create_superuser::run(&settings, &db, &args).await {
            eprintln!("{err}");
            std::process::exit(1);
        }
        return;
    }

    if let Err(err) = migrate(&db).await {
        tracing::error!(error = %err, "migration failed");
        std::process::exit(1);
    }
    let catalog = match bootstrap::load_permission_catalog(&db).await {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(event = "permission_catalog_failed", error = %err);
            std::process::exit(1);
        }
    };
    let state = bootstrap::build_state(&settings, db, catalog);
    let app = bootstrap::build_app(state);
    bootstrap::serve(&settings, app).await;
}
