//! Keypad Session
//!
//! This example drives the calculator through a short keypad session.
//!
//! Key concepts:
//! - Keys are parsed from the same labels the keypad shows
//! - Arithmetic runs through a provider; here the local one
//! - Every completed operation lands in the five-entry history ledger
//! - Division by zero is rejected locally and clears itself after a delay
//!
//! Set `KEYCALC_API_BASE_URL` to run the same session against a remote
//! calculator API instead.
//!
//! Run with: cargo run --example keypad_session

use keycalc::builder::CalculatorBuilder;
use keycalc::config::Settings;
use keycalc::core::{relative_time, Phase};
use keycalc::ledger::{HistoryLedger, MemorySnapshotStore};
use keycalc::machine::{Calculator, KEYPAD};
use keycalc::provider::LocalArithmetic;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

async fn run(calculator: &mut Calculator, labels: &[&str]) {
    for label in labels {
        match calculator.press_label(label).await {
            Ok(phase) => println!(
                "  [{label:>2}] {:<16} {:<14} {}",
                calculator.state().display(),
                calculator.state().operation_display(),
                phase.name()
            ),
            Err(e) => println!("  [{label:>2}] {e}"),
        }
    }
}

fn print_keypad() {
    for row in KEYPAD {
        let cells: Vec<String> = row.iter().map(|label| format!("[{label:^3}]")).collect();
        println!("  {}", cells.join(" "));
    }
}

fn print_history(calculator: &Calculator) {
    let now = Utc::now();
    for entry in calculator.ledger().entries() {
        println!(
            "  #{:<3} {:<24} {}",
            entry.id,
            entry.expression,
            relative_time(entry.timestamp, now)
        );
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Keypad Session Example ===\n");
    print_keypad();
    println!();

    let mut calculator = if std::env::var("KEYCALC_API_BASE_URL").is_ok() {
        let settings = Settings::from_env().unwrap_or_default();
        let calculator = CalculatorBuilder::from_settings(&settings)
            .error_clear_after(Duration::from_millis(500))
            .build()
            .expect("settings provide both collaborators");
        let source = calculator.ledger().load().await;
        println!("History loaded from {source:?}\n");
        calculator
    } else {
        let ledger = HistoryLedger::new(5, Arc::new(MemorySnapshotStore::new()));
        CalculatorBuilder::new()
            .arithmetic(Arc::new(LocalArithmetic))
            .ledger(ledger)
            .error_clear_after(Duration::from_millis(500))
            .build()
            .expect("both collaborators are set")
    };

    println!("Chained arithmetic:");
    run(&mut calculator, &["1", "2", "+", "3", "0", "×", "2", "="]).await;

    println!("\nSquare root and power:");
    run(&mut calculator, &["8", "1", "√", "^", "2", "="]).await;

    println!("\nDivision by zero:");
    run(&mut calculator, &["7", "÷", "0", "="]).await;
    if calculator.phase() == Phase::Error {
        calculator.settle_error().await;
        println!("  error cleared, display is {}", calculator.state().display());
    }

    println!("\nEditing keys:");
    run(&mut calculator, &["4", ".", "5", ".", "±", "←", "CE", "9", "−", "1", "="]).await;

    println!("\nRecall the oldest entry and reuse it:");
    if let Some(entry) = calculator.ledger().entries().last().cloned() {
        calculator.recall(&entry);
        run(&mut calculator, &["+", "1", "="]).await;
    }

    println!("\nHistory (most recent first):");
    print_history(&calculator);

    println!("\nKey Takeaways:");
    println!("- One key at a time; a running computation blocks further input");
    println!("- The ledger keeps only the five most recent operations");
    println!("- Local validation errors never reach the provider");
}
