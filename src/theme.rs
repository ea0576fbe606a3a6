/// Terminal presentation: ANSI helpers, banners, rules, and the spinner.
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ANSI color helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const RED: &str = "\x1b[31m";
pub const BOLD_CYAN: &str = "\x1b[1;36m";
pub const BOLD_GREEN: &str = "\x1b[1;32m";

// ---------------------------------------------------------------------------
// Banners and rules
// ---------------------------------------------------------------------------

pub const RULE_WIDTH: usize = 60;

pub fn section_rule() -> String {
    format!("{DIM}{}{RESET}", "━".repeat(RULE_WIDTH))
}

pub fn print_startup_banner(model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "  {BOLD_CYAN}enrich-cli{RESET} {DIM}v{version}{RESET}  {DIM}·{RESET}  {GREEN}anthropic{RESET} {DIM}/{RESET} {GREEN}{model}{RESET}"
    );
    println!("  {BOLD}Lead Enrichment Team{RESET} {DIM}company · individual · activity · summary{RESET}");
    println!("{}", section_rule());
}

pub fn print_completion_banner() {
    println!();
    println!("{}", section_rule());
    println!("  {BOLD_GREEN}Lead enrichment complete.{RESET}");
    println!("{}", section_rule());
    println!();
}

/// Label printed when streamed output switches to a different team member.
pub fn member_rule(member: &str) -> String {
    format!("{DIM}── {RESET}{CYAN}{member}{RESET}{DIM} ──{RESET}")
}

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Small stderr spinner shown until the first streamed token arrives.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(label: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let label = label.to_string();
        let handle = thread::spawn(move || {
            let mut frame = 0usize;
            while flag.load(Ordering::Relaxed) {
                eprint!(
                    "\r{DIM}{} {label}{RESET}",
                    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
                );
                let _ = io::stderr().flush();
                frame += 1;
                thread::sleep(Duration::from_millis(80));
            }
            eprint!("\r{}\r", " ".repeat(label.chars().count() + 2));
            let _ = io::stderr().flush();
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}
