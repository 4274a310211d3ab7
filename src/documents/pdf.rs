// ABOUTME: PDF text extraction via pdf-extract.
// ABOUTME: Parser panics on malformed input are contained silently and reported as parse errors.

use std::panic::{self, UnwindSafe};
use std::sync::Mutex;

use crate::error::{MeetingError, Result};

/// Serializes panic-hook swaps between concurrent extractions.
static HOOK_SWAP: Mutex<()> = Mutex::new(());

/// Run `f`, catching a panic without letting the panic hook print it. The
/// previous hook is reinstalled afterwards, so the terminal UI is never
/// written over.
fn quietly<T>(f: impl FnOnce() -> T + UnwindSafe) -> std::thread::Result<T> {
    let _swap = HOOK_SWAP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(f);
    panic::set_hook(previous);
    outcome
}

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed streams instead of returning Err.
    let outcome = quietly(|| pdf_extract::extract_text_from_mem(bytes));
    match outcome {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(MeetingError::parse("PDF", e)),
        Err(_) => Err(MeetingError::parse("PDF", "parser aborted on malformed input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_are_caught_and_values_pass_through() {
        assert!(quietly(|| -> u8 { panic!("malformed xref") }).is_err());
        assert_eq!(quietly(|| 7).unwrap(), 7);
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = extract_text(b"plain text, no header").unwrap_err();
        assert!(matches!(err, MeetingError::Parse { .. }));
    }
}
