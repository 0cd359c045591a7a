use aula_cli::{admin, seeder};
use aula_config::DatabaseConfig;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "aula-cli")]
#[command(about = "Aula CLI - Administrative tools for the Aula API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake courses, groups, teachers and students
    Seed {
        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "8")]
        courses: usize,

        /// Number of groups per course
        #[arg(long, default_value = "2")]
        groups: usize,

        /// Number of teachers
        #[arg(long, default_value = "6")]
        teachers: usize,

        /// Number of students
        #[arg(short = 's', long, default_value = "120")]
        students: usize,

        /// Number of groups each student is enrolled in
        #[arg(long, default_value = "3")]
        enrollments: usize,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, err);
    std::process::exit(1);
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| fail(&format!("Failed to read {}", label.to_lowercase()), e))
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let config = DatabaseConfig::from_env().unwrap_or_else(|e| fail("Invalid configuration", e));
    let pool = aula_db::init_db_pool(&config)
        .await
        .unwrap_or_else(|e| fail("Failed to connect to database", e));

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&pool, first_name, last_name, email, password).await,
        Commands::Seed {
            courses,
            groups,
            teachers,
            students,
            enrollments,
        } => {
            let config = seeder::SeedConfig {
                groups_per_course: groups,
                teachers,
                students,
                enrollments_per_student: enrollments,
                ..seeder::SeedConfig::new(courses)
            };
            if let Err(e) = seeder::seed_all(&pool, &config).await {
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

async fn handle_create_admin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let first_name = first_name.unwrap_or_else(|| prompt("First name"));
    let last_name = last_name.unwrap_or_else(|| prompt("Last name"));
    let email = email.unwrap_or_else(|| prompt("Email"));

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e))
    });

    match admin::create_admin(pool, &first_name, &last_name, &email, &password).await {
        Ok(id) => {
            println!("✅ Admin created successfully!");
            println!("   Id: {}", id);
            println!("   Name: {} {}", first_name, last_name);
            println!("   Email: {}", email);
        }
        Err(e) => fail("Error creating admin", e),
    }
}
