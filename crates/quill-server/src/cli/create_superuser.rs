use clap::Args;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

use crate::bootstrap;
use crate::domains::users::manager::{self, CreateUserCommand, CreateUserOptions};
use crate::settings::Settings;
use quill_db::SqlitePool;

#[derive(Debug, Clone, Args)]
pub struct CreateSuperuserArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub user_name: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Generated when omitted; the generated value is printed once.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateSuperuserOutput {
    user_id: String,
    email: String,
    user_name: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_password: Option<String>,
}

fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

pub async fn run(
    settings: &Settings,
    db: &SqlitePool,
    args: &CreateSuperuserArgs,
) -> Result<(), String> {
    let catalog = bootstrap::load_permission_catalog(db)
        .await
        .map_err(|err| err.to_string())?;
    let state = bootstrap::build_state(settings, db.clone(), catalog);

    let generated = args.password.is_none();
    let password = match args.password.clone() {
        Some(value) => value,
        None => random_password(),
    };

    let command = CreateUserCommand {
        first_name: args.first_name.trim().to_string(),
        last_name: args.last_name.trim().to_string(),
        email: args.email.trim().to_string(),
        user_name: args.user_name.trim().to_string(),
        password: Some(password.clone()),
    };
    let user = manager::create_superuser(&state, command, CreateUserOptions::default())
        .await
        .map_err(|err| err.to_string())?;

    let output = CreateSuperuserOutput {
        user_id: user.id.to_string(),
        email: user.email,
        user_name: user.user_name,
        role: user.role.as_str().to_string(),
        generated_password: generated.then_some(password),
    };
    let json = serde_json::to_string_pretty(&output).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}
