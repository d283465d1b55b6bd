use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use finance_tracker::{
    BudgetMonth, Email, NewBudget, NewTransaction, NewUser, PasswordHash, UserName,
    ValidatedPassword, create_budget, create_default_categories, create_default_settings,
    create_transaction, create_user, initialize_db,
};

/// The email of the seeded demo user.
const DEMO_EMAIL: &str = "demo@example.com";
/// The password of the seeded demo user.
const DEMO_PASSWORD: &str = "password123";

/// A utility for creating a test database for the personal finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let transaction = conn.unchecked_transaction()?;

    println!("Creating demo user {DEMO_EMAIL}...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(DEMO_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        NewUser {
            name: UserName::new_unchecked("Demo User"),
            email: Email::new_unchecked(DEMO_EMAIL),
            password_hash,
        },
        &transaction,
    )?;
    create_default_settings(user.id, &transaction)?;
    let categories = create_default_categories(user.id, &transaction)?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let find_category = |name: &str| {
        categories
            .iter()
            .find(|category| category.name.as_ref() == name)
            .ok_or_else(|| format!("missing default category {name}"))
    };

    let samples: [(&str, f64, i64, &str); 8] = [
        ("Salary", 4200.0, 60, "Monthly salary"),
        ("Salary", 4200.0, 30, "Monthly salary"),
        ("Salary", 4200.0, 0, "Monthly salary"),
        ("Freelance", 650.0, 12, "Logo design"),
        ("Food & Dining", 82.4, 2, "Groceries"),
        ("Food & Dining", 36.0, 9, "Dinner out"),
        ("Transportation", 55.0, 5, "Fuel"),
        ("Bills & Utilities", 120.75, 20, "Electricity"),
    ];

    for (category_name, amount, days_ago, description) in samples {
        let category = find_category(category_name)?;
        let date: Date = today - Duration::days(days_ago);

        create_transaction(
            NewTransaction {
                user_id: user.id,
                category_id: category.id,
                kind: category.kind,
                amount,
                date,
                description: description.to_owned(),
            },
            &transaction,
        )?;
    }

    println!("Creating sample budget...");

    create_budget(
        NewBudget {
            user_id: user.id,
            category_id: find_category("Food & Dining")?.id,
            month: BudgetMonth::from_date(today),
            limit: 400.0,
            alert_threshold: 80,
        },
        &transaction,
    )?;

    transaction.commit()?;

    println!("Success! Sign in as {DEMO_EMAIL} with the password \"{DEMO_PASSWORD}\".");

    Ok(())
}
