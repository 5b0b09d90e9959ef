//! # Struk CLI
//!
//! Command-line interface for receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Preview a built-in sample receipt
//! struk demo voucher
//!
//! # Preview a receipt from JSON
//! struk preview receipt.json
//!
//! # Encode to ESC/POS bytes
//! struk encode receipt.json -o receipt.bin
//!
//! # Print over BLE (feature `ble`)
//! struk print receipt.json --name MP-58
//!
//! # Simulate a print without hardware
//! struk print cash --dry-run
//!
//! # List nearby printers (feature `ble`)
//! struk scan
//! ```
//!
//! Receipt arguments accept either a path to a JSON file or the name of a
//! built-in sample (`cash`, `qris`, `voucher`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use struk::{
    PrinterManager, PrinterProfile, ReceiptDocument, StrukError, preview, receipt,
    transport::{MemoryBackend, MemoryPrinter},
};

/// Struk - POS receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "struk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Printer profile (mp58, mp80)
    #[arg(long, global = true, default_value = "mp58", value_parser = PrinterProfile::parse)]
    profile: PrinterProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a text preview of a receipt
    Preview {
        /// Receipt JSON file or sample name
        receipt: String,

        /// Also print the chat-share summary
        #[arg(long)]
        share: bool,
    },

    /// Encode a receipt to ESC/POS bytes
    Encode {
        /// Receipt JSON file or sample name
        receipt: String,

        /// Output file (hex dump to stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print a receipt on a BLE printer
    Print {
        /// Receipt JSON file or sample name
        receipt: String,

        /// Only accept printers whose name starts with this
        #[arg(long)]
        name: Option<String>,

        /// Seconds to scan before choosing a printer
        #[arg(long, default_value = "5")]
        scan_secs: u64,

        /// Bytes per BLE write
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Pause between writes in milliseconds
        #[arg(long)]
        chunk_delay_ms: Option<u64>,

        /// Send to a simulated printer instead of real hardware
        #[arg(long)]
        dry_run: bool,
    },

    /// List nearby printers
    Scan {
        /// Seconds to scan
        #[arg(long, default_value = "5")]
        secs: u64,
    },

    /// Preview a built-in sample receipt (omit to list samples)
    Demo {
        /// Sample name
        name: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "struk=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StrukError> {
    let cli = Cli::parse();
    let profile = cli.profile;

    match cli.command {
        Commands::Preview { receipt, share } => {
            let doc = load_receipt(&receipt)?;
            show_preview(&doc, &profile);
            if share {
                println!();
                println!("{}", receipt::share::share_text(&doc));
            }
        }

        Commands::Encode { receipt, output } => {
            let doc = load_receipt(&receipt)?;
            let bytes = receipt::compose(&doc, &profile).to_bytes();
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    println!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => print_hex(&bytes),
            }
        }

        Commands::Print {
            receipt,
            name,
            scan_secs,
            chunk_size,
            chunk_delay_ms,
            dry_run,
        } => {
            let doc = load_receipt(&receipt)?;
            let mut profile = profile;
            if let Some(size) = chunk_size {
                profile = profile.with_chunk_size(size);
            }
            if let Some(ms) = chunk_delay_ms {
                profile = profile.with_chunk_delay(Duration::from_millis(ms));
            }

            let runtime = tokio::runtime::Runtime::new()?;
            if dry_run {
                runtime.block_on(print_dry_run(&doc, profile))?;
            } else {
                runtime.block_on(print_ble(
                    &doc,
                    profile,
                    name,
                    Duration::from_secs(scan_secs),
                ))?;
            }
        }

        Commands::Scan { secs } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(scan(Duration::from_secs(secs)))?;
        }

        Commands::Demo { name } => {
            let Some(name) = name else {
                println!("Available receipts:");
                for name in receipt::list_receipts() {
                    println!("  {}", name);
                }
                return Ok(());
            };
            let doc = receipt::by_name(&name).ok_or_else(|| {
                StrukError::InvalidReceipt(format!(
                    "Unknown sample '{}'. Run `struk demo` to see available samples.",
                    name
                ))
            })?;
            show_preview(&doc, &profile);
        }
    }

    Ok(())
}

/// Load a receipt from a sample name or a JSON file, and validate it.
fn load_receipt(arg: &str) -> Result<ReceiptDocument, StrukError> {
    let doc = match receipt::by_name(arg) {
        Some(doc) => doc,
        None => {
            let json = std::fs::read_to_string(Path::new(arg))?;
            serde_json::from_str(&json)?
        }
    };
    doc.validate()?;
    Ok(doc)
}

fn show_preview(doc: &ReceiptDocument, profile: &PrinterProfile) {
    let program = receipt::compose(doc, profile);
    let width = profile.columns;
    println!("+{}+", "-".repeat(width));
    for line in preview::render_lines(&program, width) {
        println!("|{:<width$}|", line, width = width);
    }
    println!("+{}+", "-".repeat(width));
}

fn print_hex(bytes: &[u8]) {
    for (i, row) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = row.iter().map(|b| format!("{:02X}", b)).collect();
        let ascii: String = row
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        println!("{:08x}  {:<47}  {}", i * 16, hex.join(" "), ascii);
    }
}

/// Run the full connect/print/disconnect cycle against a simulated printer.
async fn print_dry_run(doc: &ReceiptDocument, profile: PrinterProfile) -> Result<(), StrukError> {
    let printer = Arc::new(MemoryPrinter::new("MP-58 (simulated)"));
    let backend = MemoryBackend::new().with_device(printer.clone());
    let mut manager = PrinterManager::new(backend, profile);

    manager.connect().await?;
    manager.print(doc).await?;
    manager.disconnect().await?;

    let writes = printer.writes();
    println!(
        "Sent {} bytes in {} writes to {}",
        printer.received().len(),
        writes.len(),
        manager.profile().name
    );
    Ok(())
}

#[cfg(feature = "ble")]
async fn print_ble(
    doc: &ReceiptDocument,
    profile: PrinterProfile,
    name: Option<String>,
    scan_window: Duration,
) -> Result<(), StrukError> {
    use struk::transport::BleBackend;

    let mut backend = BleBackend::new().with_scan_window(scan_window);
    if let Some(name) = name {
        backend = backend.with_device_name(name);
    }
    let mut manager = PrinterManager::new(backend, profile);

    manager.connect().await?;
    let printer = manager.device_name().unwrap_or_else(|| "printer".into());
    println!("Connected to {}", printer);

    let result = manager.print(doc).await;
    manager.disconnect().await?;
    result?;

    println!("Printed successfully!");
    Ok(())
}

#[cfg(not(feature = "ble"))]
async fn print_ble(
    _doc: &ReceiptDocument,
    _profile: PrinterProfile,
    _name: Option<String>,
    _scan_window: Duration,
) -> Result<(), StrukError> {
    eprintln!("This build has no BLE support; rebuild with `--features ble` or use --dry-run.");
    Err(StrukError::BluetoothUnavailable)
}

#[cfg(feature = "ble")]
async fn scan(window: Duration) -> Result<(), StrukError> {
    use struk::{DeviceFilter, transport::BleBackend};

    let backend = BleBackend::new().with_scan_window(window);
    let printers = backend.scan(&DeviceFilter::default()).await?;
    if printers.is_empty() {
        println!("No printers found.");
        return Ok(());
    }
    println!("Found {} printer(s):", printers.len());
    for p in printers {
        match p.rssi {
            Some(rssi) => println!("  {}  {}  {} dBm", p.name, p.address, rssi),
            None => println!("  {}  {}", p.name, p.address),
        }
    }
    Ok(())
}

#[cfg(not(feature = "ble"))]
async fn scan(_window: Duration) -> Result<(), StrukError> {
    eprintln!("This build has no BLE support; rebuild with `--features ble`.");
    Err(StrukError::BluetoothUnavailable)
}
