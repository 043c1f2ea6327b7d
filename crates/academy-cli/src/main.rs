use academy_cli::{admin, seeder};
use academy_config::DatabaseConfig;
use academy_db::{PgPool, init_db_pool, run_migrations};
use academy_models::AdminRole;
use academy_models::admins::CreateAdminDto;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "academy-cli")]
#[command(about = "Academy CLI - Administrative tools for the academy API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a new administrator account
    CreateAdmin {
        /// Login username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// `admin` or `super_admin`
        #[arg(short = 'r', long)]
        role: Option<AdminRole>,
    },
    /// Seed reference teachers, classes and admins
    Seed,
    /// Seed fake pending registrations into existing classes
    SeedRegistrations {
        /// Number of registrations to create
        #[arg(short = 'c', long, default_value = "100")]
        count: usize,
    },
    /// Clear all seeded data (keeps admins created with create-admin)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let Some(config) = DatabaseConfig::from_env() else {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::CreateAdmin {
            username,
            email,
            password,
            role,
        } => handle_create_admin(&pool, username, email, password, role).await,
        Commands::Seed => handle_seed(&pool).await,
        Commands::SeedRegistrations { count } => handle_seed_registrations(&pool, count).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_migrate(pool: &PgPool) {
    println!("🗄️  Running migrations...");

    match run_migrations(pool).await {
        Ok(()) => println!("\n✅ Migrations applied successfully!"),
        Err(e) => {
            eprintln!("\n❌ Error running migrations: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt_text(prompt: &str) -> String {
    match Input::<String>::new().with_prompt(prompt).interact_text() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", prompt.to_lowercase(), e);
            std::process::exit(1);
        }
    }
}

fn prompt_role() -> AdminRole {
    let value = match Input::<String>::new()
        .with_prompt("Role (admin/super_admin)")
        .default("admin".to_string())
        .interact_text()
    {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Failed to read role: {}", e);
            std::process::exit(1);
        }
    };

    value.trim().parse().unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    })
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<AdminRole>,
) {
    let username = username.unwrap_or_else(|| prompt_text("Username"));
    let email = email.unwrap_or_else(|| prompt_text("Email address"));

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| {
                eprintln!("❌ Failed to read password: {}", e);
                std::process::exit(1);
            })
    });

    let role = role.unwrap_or_else(prompt_role);

    let dto = CreateAdminDto {
        username: username.clone(),
        email: email.clone(),
        password,
        role,
    };

    match admin::create_admin(pool, dto).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Username: {}", username);
            println!("   Email: {}", email.trim().to_lowercase());
            println!("   Role: {}", role);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool) {
    println!("🌱 Seeding reference data...\n");

    match seeder::seed_reference(pool).await {
        Ok(()) => {
            println!("\n✅ Seeding completed!");
            println!(
                "   Admin logins use the password '{}'",
                seeder::reference::SEED_ADMIN_PASSWORD
            );
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_registrations(pool: &PgPool, count: usize) {
    match seeder::seed_registrations_only(pool, count).await {
        Ok(()) => println!("\n✅ Registrations seeded successfully!"),
        Err(e) => {
            eprintln!("\n❌ Error seeding registrations: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    println!("🧹 Clearing seeded data...\n");

    match seeder::clear_all(pool).await {
        Ok(()) => println!("\n✅ Seeded data cleared!"),
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
}
