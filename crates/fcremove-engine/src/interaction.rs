//! User-facing output and confirmation
//!
//! The engine never prints or reads stdin itself. Progress lines and the
//! yes/no questions asked before deleting auto-generated resources go through
//! this trait, so callers decide how (or whether) to ask.

pub trait Interaction: Send + Sync {
    fn info(&self, message: &str);

    fn success(&self, message: &str);

    fn warn(&self, message: &str);

    fn debug(&self, message: &str);

    /// Ask a yes/no question; `false` unless the user explicitly agrees
    fn confirm(&self, question: &str) -> bool;
}
