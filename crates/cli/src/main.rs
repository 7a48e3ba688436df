//! Student Queue CLI - Command-line client for the queue daemon

mod rpc;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rpc::{RpcClient, RpcFailure};
use serde::Deserialize;
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9531";

#[derive(Parser)]
#[command(name = "studentqueue")]
#[command(about = "Student help queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "STUDENTQUEUE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List all queues
    Queues,

    /// Create a queue (requires the admin password)
    Create {
        /// Queue name
        name: String,

        /// Password for the new queue
        #[arg(short, long)]
        password: String,

        /// Admin password
        #[arg(long, env = "STUDENTQUEUE_ADMIN_PASSWORD")]
        admin_password: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Backing table name (defaults to the queue name)
        #[arg(long)]
        table_name: Option<String>,
    },

    /// Delete a queue and all of its requests
    Delete {
        queue: String,

        /// Queue or admin password
        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Rename a queue
    Rename {
        queue: String,
        new_name: String,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Set or clear a queue description
    Describe {
        queue: String,

        /// New description (omit to clear)
        description: Option<String>,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Change a queue password
    Passwd {
        queue: String,
        new_password: String,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Check a queue password
    Login {
        queue: String,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Join a queue
    Add {
        queue: String,

        /// Student id
        #[arg(short, long)]
        id: String,

        /// Student name
        #[arg(short, long)]
        name: String,

        /// Problem description
        #[arg(long)]
        problem: String,
    },

    /// Remove a student from a queue
    Remove {
        queue: String,

        /// Student id
        id: String,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Show the requests waiting in a queue
    List {
        queue: String,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },

    /// Remove every request from a queue
    Reset {
        queue: String,

        #[arg(short, long, env = "STUDENTQUEUE_PASSWORD")]
        password: String,
    },
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    name: String,
    #[tabled(display_with = "display_opt")]
    description: Option<String>,
    waiting: i64,
}

#[derive(Deserialize)]
struct RequestEntry {
    student_id: String,
    name: String,
    description: String,
    timestamp: i64,
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "#")]
    position: usize,
    id: String,
    name: String,
    problem: String,
    joined: String,
}

fn display_opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn request_rows(entries: Vec<RequestEntry>) -> Vec<RequestRow> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| RequestRow {
            position: i + 1,
            id: e.student_id,
            name: e.name,
            problem: e.description,
            joined: format_timestamp(e.timestamp),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RpcClient::new(cli.rpc_url);

    match cli.command {
        Commands::Queues => {
            let result = client.call("queue.list.v1", json!({})).await?;
            let queues: Vec<QueueRow> = serde_json::from_value(result)?;

            if queues.is_empty() {
                println!("{}", "No queues".yellow());
            } else {
                println!("{}", Table::new(queues));
            }
        }

        Commands::Create {
            name,
            password,
            admin_password,
            description,
            table_name,
        } => {
            let params = json!({
                "admin_password": admin_password,
                "name": name,
                "password": password,
                "description": description,
                "table_name": table_name,
            });

            let result = client.call("queue.create.v1", params).await?;
            println!(
                "{} (table {})",
                format!("✓ Queue {} created", name).green().bold(),
                result["table_name"].as_str().unwrap_or(&name)
            );
        }

        Commands::Delete { queue, password } => {
            let params = json!({ "queue": queue, "password": password });
            client.call("queue.delete.v1", params).await?;
            println!("{}", format!("✓ Queue {} deleted", queue).green().bold());
        }

        Commands::Rename {
            queue,
            new_name,
            password,
        } => {
            let params = json!({ "queue": queue, "password": password, "new_name": new_name });
            client.call("queue.rename.v1", params).await?;
            println!(
                "{}",
                format!("✓ Queue {} renamed to {}", queue, new_name).green().bold()
            );
        }

        Commands::Describe {
            queue,
            description,
            password,
        } => {
            let cleared = description.is_none();
            let params = json!({ "queue": queue, "password": password, "description": description });
            client.call("queue.describe.v1", params).await?;
            let verb = if cleared { "cleared" } else { "updated" };
            println!(
                "{}",
                format!("✓ Description of {} {}", queue, verb).green().bold()
            );
        }

        Commands::Passwd {
            queue,
            new_password,
            password,
        } => {
            let params = json!({
                "queue": queue,
                "password": password,
                "new_password": new_password,
            });
            client.call("queue.password.v1", params).await?;
            println!("{}", format!("✓ Password of {} changed", queue).green().bold());
        }

        Commands::Login { queue, password } => {
            let params = json!({ "queue": queue, "password": password });
            let result = client.call("queue.login.v1", params).await?;
            if result["valid"].as_bool().unwrap_or(false) {
                println!("{}", "✓ Password accepted".green().bold());
            } else {
                println!("{}", "✗ Password rejected".red().bold());
                std::process::exit(1);
            }
        }

        Commands::Add {
            queue,
            id,
            name,
            problem,
        } => {
            let params = json!({ "queue": queue, "id": id, "name": name, "problem": problem });
            let result = client.call("request.add.v1", params).await?;
            println!(
                "{}",
                format!("✓ Added to {} at position {}", queue, result["position"])
                    .green()
                    .bold()
            );
        }

        Commands::Remove {
            queue,
            id,
            password,
        } => {
            let params = json!({ "queue": queue, "password": password, "id": id });
            client.call("request.remove.v1", params).await?;
            println!("{}", format!("✓ Removed {} from {}", id, queue).green().bold());
        }

        Commands::List { queue, password } => {
            let params = json!({ "queue": queue, "password": password });
            let result = match client.call("request.list.v1", params).await {
                Ok(result) => result,
                Err(e) => {
                    if let Some(failure) = e.downcast_ref::<RpcFailure>() {
                        if failure.code == rpc::UNAUTHORIZED {
                            println!("{}", "✗ Wrong password".red().bold());
                            std::process::exit(1);
                        }
                    }
                    return Err(e);
                }
            };

            let entries: Vec<RequestEntry> = serde_json::from_value(result["requests"].clone())
                .context("Unexpected request list format")?;

            println!("{}", format!("Queue {}", queue).cyan().bold());
            if entries.is_empty() {
                println!("{}", "No one is waiting".yellow());
            } else {
                println!("{}", Table::new(request_rows(entries)));
            }
        }

        Commands::Reset { queue, password } => {
            let params = json!({ "queue": queue, "password": password });
            let result = client.call("request.reset.v1", params).await?;
            println!(
                "{}",
                format!("✓ Queue {} reset ({} removed)", queue, result["removed"])
                    .green()
                    .bold()
            );
        }
    }

    Ok(())
}
