use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use edudesk_cli::admin::{AdminAccount, create_admin};
use edudesk_cli::seeder::{self, SeedConfig};
use edudesk_config::{Settings, config_path};
use edudesk_db::{PgPool, ensure_schema, init_db_pool};

#[derive(Parser)]
#[command(name = "edudesk-cli")]
#[command(about = "Edudesk CLI - Administrative tools for Edudesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Display name
        #[arg(long)]
        nickname: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake classes, subjects, teachers and students
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "50")]
        students: usize,

        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "5")]
        teachers: usize,

        /// Number of classes to create
        #[arg(long, default_value = "3")]
        classes: usize,

        /// Number of subjects to create
        #[arg(long, default_value = "6")]
        subjects: usize,
    },
    /// Clear all seeded data (keeps accounts created through the API)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let settings = match Settings::load(Some(config_path().as_path())) {
        Ok(settings) => settings,
        Err(e) => fail("Error loading configuration", e),
    };

    let pool = match connect(&settings).await {
        Ok(pool) => pool,
        Err(e) => fail("Error connecting to database", e),
    };

    let bcrypt_cost = settings.app.bcrypt_cost;

    match cli.command {
        Commands::CreateAdmin {
            name,
            nickname,
            phone,
            email,
            password,
        } => handle_create_admin(&pool, bcrypt_cost, name, nickname, phone, email, password).await,
        Commands::Seed {
            students,
            teachers,
            classes,
            subjects,
        } => {
            let config = SeedConfig::new(students, teachers)
                .with_classes(classes)
                .with_subjects(subjects);
            if let Err(e) = seeder::seed_all(&pool, &config, bcrypt_cost).await {
                fail("Error seeding database", e);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_all(&pool).await {
                fail("Error clearing seeded data", e);
            }
        }
    }
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let pool = init_db_pool(&settings.database).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {context}: {err}");
    std::process::exit(1);
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| fail("Failed to read input", e))
}

async fn handle_create_admin(
    pool: &PgPool,
    bcrypt_cost: u32,
    name: Option<String>,
    nickname: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| prompt("Name"));
    let nickname = nickname.unwrap_or_else(|| prompt("Nickname"));
    let phone = phone.unwrap_or_else(|| prompt("Phone"));
    let email = email.unwrap_or_else(|| prompt("Email address"));
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e))
    });

    let account = AdminAccount {
        name,
        nickname,
        phone,
        email,
        password,
    };

    match create_admin(pool, account, bcrypt_cost).await {
        Ok(user) => {
            println!("\n✅ Administrator created successfully!");
            println!("   Id: {}", user.id);
            println!("   Name: {}", user.name);
            println!("   Email: {}", user.email);
        }
        Err(e) => fail("Error creating administrator", e),
    }
}
