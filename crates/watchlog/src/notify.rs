//! Terminal notifier: the CLI's stand-in for the web app's toasts.

use colored::Colorize;
use watchlog_core::notify::{Notice, Notifier};

pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, level: Notice, message: &str) {
        match level {
            Notice::Info => eprintln!("{} {message}", "→".cyan()),
            Notice::Warning => eprintln!("{} {message}", "!".yellow()),
            Notice::Error => eprintln!("{} {message}", "✗".red()),
        }
    }
}
