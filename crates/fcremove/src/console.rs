//! 端末への出力と確認プロンプト

use colored::Colorize;
use fcremove_engine::Interaction;
use std::io::{BufRead, IsTerminal, Write};

#[derive(Default)]
pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }
}

impl Interaction for Console {
    fn info(&self, message: &str) {
        println!("  {} {}", "ℹ".blue(), message);
    }

    fn success(&self, message: &str) {
        println!("  {} {}", "✓".green(), message);
    }

    fn warn(&self, message: &str) {
        println!("  {} {}", "⚠".yellow(), message.yellow());
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    /// 端末でなければ常に「いいえ」
    fn confirm(&self, question: &str) -> bool {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            println!("  {} {} [y/N]: n (non-interactive)", "?".cyan(), question);
            return false;
        }

        print!("  {} {} [y/N]: ", "?".cyan(), question);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) | Err(_) => false,
            Ok(_) => parse_answer(&input),
        }
    }
}

fn parse_answer(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
