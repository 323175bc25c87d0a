// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::io::Cursor;

use expense_tracker::cli::{Session, SessionSettings};

/// Helper to create a session printing plain "₹" amounts and no prompt
pub fn test_session() -> Session {
    Session::new(SessionSettings::default())
}

/// Run a script of session commands and return everything written to stdout
pub fn run_script(session: &mut Session, script: &str) -> String {
    let mut out = Vec::new();
    session
        .run(Cursor::new(script.as_bytes()), &mut out)
        .expect("session should not fail on in-memory I/O");
    String::from_utf8(out).expect("session output is UTF-8")
}

/// Test fixture: the three expenses used throughout the examples
pub const STANDARD_EXPENSES: &str = "add 250 Food\nadd 75.5 Transport\nadd 40 food\n";
