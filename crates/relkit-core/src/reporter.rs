//! Reporter trait for dependency injection
//!
//! Orchestration code reports progress through this trait instead of
//! printing directly, so the binaries decide how output looks and tests can
//! run silently.

use relkit_schema::Sha256Digest;

pub trait Reporter: Send + Sync {
    /// Indicates a new phase has started (e.g. "Cloning Homebrew tap").
    fn section(&self, title: &str);

    /// A release asset download has started.
    fn downloading(&self, url: &str);

    /// A release asset has been fully streamed and hashed.
    fn hashed(&self, label: &str, digest: &Sha256Digest);

    /// Show a rewritten file in full (dry runs).
    fn preview(&self, title: &str, content: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn downloading(&self, url: &str) {
        (**self).downloading(url);
    }
    fn hashed(&self, label: &str, digest: &Sha256Digest) {
        (**self).hashed(label, digest);
    }
    fn preview(&self, title: &str, content: &str) {
        (**self).preview(title, content);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
}

const RULER_WIDTH: usize = 60;

/// Plain stdout reporter used by the binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!("{title}");
    }

    fn downloading(&self, url: &str) {
        println!("Downloading: {url}");
    }

    fn hashed(&self, label: &str, digest: &Sha256Digest) {
        println!("{label}: {digest}");
    }

    fn preview(&self, title: &str, content: &str) {
        let ruler = "=".repeat(RULER_WIDTH);
        println!("\n{ruler}");
        println!("UPDATED FILE: {title}");
        println!("{ruler}");
        println!("{content}");
        println!("{ruler}");
    }

    fn info(&self, msg: &str) {
        println!("{msg}");
    }

    fn success(&self, msg: &str) {
        println!("{msg}");
    }

    fn warning(&self, msg: &str) {
        eprintln!("Warning: {msg}");
    }
}

/// A no-op reporter for silent operations (e.g. testing).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &str) {}
    fn hashed(&self, _: &str, _: &Sha256Digest) {}
    fn preview(&self, _: &str, _: &str) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
