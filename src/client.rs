use std::net::{IpAddr, Ipv6Addr};
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use anyhow::Context;
use book_catalog::*;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tarpc::{client, context};

/// Command-line client for the book catalog service.
#[derive(Debug, Parser)]
#[command(name = "book-client", version)]
struct Args {
    #[arg(long, default_value_t = IpAddr::V6(Ipv6Addr::LOCALHOST))]
    host: IpAddr,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Per-call deadline in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all books
    List,
    /// Insert a book
    Insert {
        id: i32,
        title: String,
        author: String,
    },
    /// Get a book by its ID
    Get { id: i32 },
    /// Delete a book by its ID
    Delete { id: i32 },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(op: &str, err: CatalogError) -> ExitCode {
    eprintln!("{op} failed with NotFound: {err}");
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let server_addr = (args.host, args.port);

    let transport = tarpc::serde_transport::tcp::connect(server_addr, || {
        tarpc::tokio_serde::formats::Json::default()
    })
    .await
    .with_context(|| format!("failed to connect to {}:{}", args.host, args.port))?;

    let client = BookServiceClient::new(client::Config::default(), transport).spawn();

    let mut ctx = context::current();
    ctx.deadline = SystemTime::now() + Duration::from_secs(args.timeout_secs);

    match args.command {
        Command::List => {
            let list = client.list(ctx).await?;
            println!("Server sent {} book(s).\n", list.books.len());
            print_json(&list)?;
        }
        Command::Insert { id, title, author } => {
            client.insert(ctx, Book::new(id, title, author)).await?;
            println!("Server response: ok");
        }
        Command::Get { id } => match client.get(ctx, BookIdRequest { id }).await? {
            Ok(book) => {
                println!("Server response:");
                print_json(&book)?;
            }
            Err(err) => return Ok(report("GetBook", err)),
        },
        Command::Delete { id } => match client.delete(ctx, BookIdRequest { id }).await? {
            Ok(()) => println!("Server response: ok"),
            Err(err) => return Ok(report("DeleteBook", err)),
        },
    }

    Ok(ExitCode::SUCCESS)
}
