//! Keyprint CLI
//!
//! Capture a keystroke-timing keyprint in the terminal and store or verify
//! it against a remote keyprint service.

use chrono::Utc;
use clap::{Parser, Subcommand};
use keyprint::{
    client::{ApiError, BlockingKeyprintClient, ClientConfig},
    clipboard::{copy_snapshot, SystemClipboard},
    collector::{CaptureEvent, TerminalCollector},
    config::Config,
    core::{KeyprintSnapshot, TypingTracker},
    VERSION,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "keyprint")]
#[command(version = VERSION)]
#[command(about = "Keystroke-timing capture and verification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a typing session and export the keyprint snapshot
    Capture {
        /// Copy the snapshot to the system clipboard
        #[arg(long)]
        copy: bool,

        /// Write the snapshot to this file instead of the export directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Store a captured snapshot for a user
    Store {
        /// User identifier
        #[arg(long, short)]
        user: String,

        /// Snapshot file to send (reads stdin if omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Service base URL (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Verify a captured snapshot against a user's stored keyprint
    Verify {
        /// User identifier
        #[arg(long, short)]
        user: String,

        /// Snapshot file to send (reads stdin if omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Service base URL (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Capture { copy, output } => {
            cmd_capture(copy, output);
        }
        Commands::Store {
            user,
            input,
            base_url,
        } => {
            cmd_store(&user, input, base_url);
        }
        Commands::Verify {
            user,
            input,
            base_url,
        } => {
            cmd_verify(&user, input, base_url);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_capture(copy: bool, output: Option<PathBuf>) {
    println!("Keyprint v{VERSION}");
    println!();
    println!("Type to capture your keyprint. Press Esc (or Ctrl+C) to finish.");
    println!();

    let config = Config::load().unwrap_or_default();

    let mut collector = TerminalCollector::new();
    if let Err(e) = collector.start() {
        eprintln!("Error starting capture: {e}");
        std::process::exit(1);
    }

    let mut tracker = TypingTracker::new();
    let receiver = collector.receiver().clone();

    loop {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(CaptureEvent::Key(key)) => {
                tracker.handle_key_press(key.is_backspace);
            }
            Ok(CaptureEvent::Finished) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Collector disconnected unexpectedly");
                break;
            }
        }
    }

    collector.stop();

    let snapshot = tracker.snapshot();
    if snapshot.is_empty() {
        println!();
        println!("No typing captured.");
        return;
    }

    println!();
    println!("Capture complete:");
    println!("  Keys pressed: {}", tracker.key_count());
    println!("  Duration: {} ms", tracker.duration());
    println!("  Average interval: {} ms", tracker.average_interval());
    println!("  Backspaces: {}", tracker.backspace_count());
    println!("  Anomalous intervals: {:?}", tracker.anomalies());
    println!();
    println!("{}", snapshot.formatted());

    if copy {
        let mut clipboard = SystemClipboard::new();
        if copy_snapshot(&mut clipboard, &snapshot) {
            println!();
            println!("Copied keyprint to clipboard.");
        }
    }

    let export_path = output.unwrap_or_else(|| {
        config.export_path.join(format!(
            "keyprint_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });

    if let Some(parent) = export_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match std::fs::write(&export_path, snapshot.formatted()) {
        Ok(()) => {
            println!();
            println!("Exported keyprint to {export_path:?}");
        }
        Err(e) => {
            eprintln!("Error writing keyprint: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_store(user: &str, input: Option<PathBuf>, base_url: Option<String>) {
    let snapshot = read_snapshot(input);
    let client = build_client(base_url);

    match client.store(user, &snapshot) {
        Ok(response) => {
            println!("Keyprint stored for user '{user}'.");
            println!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
            );
        }
        Err(e) => {
            report_api_error(&e);
            std::process::exit(1);
        }
    }
}

fn cmd_verify(user: &str, input: Option<PathBuf>, base_url: Option<String>) {
    let snapshot = read_snapshot(input);
    let client = build_client(base_url);

    match client.verify(user, &snapshot) {
        Ok(result) => {
            if result.is_match {
                println!("Keyprint MATCHES (similarity: {:.2})", result.similarity);
            } else {
                println!(
                    "Keyprint does NOT match (similarity: {:.2})",
                    result.similarity
                );
            }
        }
        Err(e) => {
            report_api_error(&e);
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Read a snapshot from a file or stdin.
fn read_snapshot(input: Option<PathBuf>) -> KeyprintSnapshot {
    let content = match input {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("Error reading {path:?}: {e}");
            std::process::exit(1);
        }),
        None => {
            use std::io::Read;
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing keyprint snapshot: {e}");
        std::process::exit(1);
    })
}

/// Build a blocking client from the CLI override or the config file.
fn build_client(base_url: Option<String>) -> BlockingKeyprintClient {
    let config = Config::load().unwrap_or_default();
    let base_url = base_url.unwrap_or(config.api_base_url);
    let client_config =
        ClientConfig::new(base_url).with_timeout(Duration::from_secs(config.request_timeout_secs));

    BlockingKeyprintClient::new(client_config).unwrap_or_else(|e| {
        eprintln!("Error creating client: {e}");
        std::process::exit(1);
    })
}

/// Print an API failure, calling out timeouts so the user knows a retry
/// may succeed.
fn report_api_error(error: &ApiError) {
    if error.is_timeout() {
        eprintln!("Request timed out. The keyprint service did not respond; try again.");
    } else {
        eprintln!("Error: {error}");
    }
}
