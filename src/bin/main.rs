//! Tabula CLI - render schema-checked SQL from the command line
//!
//! Tables are declared in the settings file (`[tables.<name>]`), so no
//! database connection is needed.
//!
//! Usage:
//!   tabula sql --table <name> [options]
//!   tabula tables
//!   tabula url
//!
//! Examples:
//!   tabula sql --table orders --select id --where "total >= 100" --order-by id --sort desc
//!   tabula sql --table orders --aggregate total --aggregate-func sum --group-by customer
//!   tabula sql --table orders --update status=closed --where "id = 7" --dialect mysql --params

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tabula::builder::{OneOrMany, QueryBuilder, QueryParams};
use tabula::config::Settings;
use tabula::filter::{FilterClause, FilterSpec};
use tabula::sql::{Dialect, Literal};
use tabula::SchemaSource;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Tabula - schema-aware SELECT/UPDATE/DELETE construction")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to TABULA_CONFIG, ./tabula.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a statement and print its SQL
    Sql(SqlArgs),

    /// List tables declared in the settings file
    Tables,

    /// Print the connection URL with the password masked
    Url,
}

#[derive(clap::Args)]
struct SqlArgs {
    /// Target table
    #[arg(short, long)]
    table: String,

    /// Columns to project (all columns when omitted)
    #[arg(short, long)]
    select: Vec<String>,

    /// Filter clause: "column operator value"
    #[arg(short = 'w', long = "where")]
    filter: Vec<String>,

    /// Combine filter clauses with OR instead of AND
    #[arg(long)]
    or: bool,

    #[arg(long)]
    group_by: Vec<String>,

    /// Columns to aggregate
    #[arg(long)]
    aggregate: Vec<String>,

    /// Aggregate functions; a single value applies to every aggregate column
    #[arg(long)]
    aggregate_func: Vec<String>,

    #[arg(long)]
    order_by: Vec<String>,

    /// Sort directions; a single value applies to every order-by column
    #[arg(long)]
    sort: Vec<String>,

    #[arg(long)]
    limit: Option<u64>,

    #[arg(long)]
    offset: Option<u64>,

    /// Build an UPDATE with these assignments: column=value
    #[arg(long)]
    update: Vec<String>,

    /// Build a DELETE
    #[arg(long)]
    delete: bool,

    /// SQL dialect (defaults to the settings file, then the connection driver)
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// Print bound parameters as JSON after the SQL
    #[arg(long)]
    params: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TABULA_LOG")
                .unwrap_or_else(|_| "tabula=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Sql(args) => cmd_sql(&settings, args).await,
        Commands::Tables => cmd_tables(&settings).await,
        Commands::Url => cmd_url(&settings),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, tabula::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

async fn cmd_sql(settings: &Settings, args: SqlArgs) -> ExitCode {
    let dialect = match args.dialect {
        Some(d) => d,
        None => match settings.dialect() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let table = args.table.clone();
    let print_params = args.params;
    let params = match query_params(args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let builder = QueryBuilder::new(settings.schema_source());
    let statement = match builder.build(&table, &params).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match statement.to_sql_with_params(dialect) {
        Ok((sql, bound)) => {
            println!("{}", sql);
            if print_params {
                match serde_json::to_string(&bound) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error encoding parameters: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_tables(settings: &Settings) -> ExitCode {
    match settings.schema_source().list_tables().await {
        Ok(tables) if tables.is_empty() => {
            println!("No tables declared.");
            ExitCode::SUCCESS
        }
        Ok(tables) => {
            for table in tables {
                let columns = settings
                    .tables
                    .get(&table)
                    .map(|t| t.columns.len())
                    .unwrap_or_default();
                println!("  {} ({} columns)", table, columns);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_url(settings: &Settings) -> ExitCode {
    match settings.connection_config() {
        Ok(config) => {
            println!("{}", config.masked_url());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn query_params(inputs: SqlArgs) -> Result<QueryParams, String> {
    let clauses = inputs
        .filter
        .iter()
        .map(|c| parse_clause(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut values = BTreeMap::new();
    for assignment in &inputs.update {
        let (column, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected column=value, got '{}'", assignment))?;
        values.insert(column.trim().to_string(), Literal::infer(value));
    }

    Ok(QueryParams {
        select: one_or_many(inputs.select),
        filter: (!clauses.is_empty()).then(|| FilterSpec::Many(clauses)),
        where_boolean: inputs.or.then(|| "or".to_string()),
        group_by: one_or_many(inputs.group_by),
        aggregate: one_or_many(inputs.aggregate),
        aggregate_func: one_or_many(inputs.aggregate_func),
        order_by: one_or_many(inputs.order_by),
        order_by_sort: one_or_many(inputs.sort),
        limit: inputs.limit,
        offset: inputs.offset,
        update: !values.is_empty(),
        delete: inputs.delete,
        values: (!values.is_empty()).then_some(values),
    })
}

/// `"total >= 100"` -> (`total`, `>=`, 100). Words are separated by any
/// run of whitespace; the value may contain spaces.
fn parse_clause(text: &str) -> Result<FilterClause, String> {
    let invalid = || format!("expected \"column operator value\", got '{}'", text);
    let (column, rest) = text
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid)?;
    let (operator, value) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid)?;
    Ok(FilterClause::new(
        column,
        operator,
        Literal::infer(value.trim_start()),
    ))
}

/// A single flag value broadcasts; several are kept as a list.
fn one_or_many(mut values: Vec<String>) -> Option<OneOrMany<String>> {
    match values.len() {
        0 => None,
        1 => values.pop().map(OneOrMany::One),
        _ => Some(OneOrMany::Many(values)),
    }
}
