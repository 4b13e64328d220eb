//! Diagnostics emitted while validating.

use std::io;
use std::sync::{Arc, Mutex};
use tessera_validator::prelude::*;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(level: Level, run: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    captured.text()
}

#[test]
fn top_level_validation_is_logged() {
    let output = capture(Level::DEBUG, || {
        let _ = array().items([number()]).validate(vec!["x"]);
    });
    assert!(output.contains("validation finished"), "{output}");
    assert!(output.contains("valid=false"), "{output}");
    assert!(output.contains("errors=1"), "{output}");
}

#[test]
fn element_removal_is_traced() {
    let options = ValidationOptions::default().with_strip_unknown(true);
    let output = capture(Level::TRACE, || {
        let _ = array()
            .items([number()])
            .validate_with(vec!["x"], &options);
    });
    assert!(output.contains("array element removed"), "{output}");
}

#[test]
fn trace_events_are_filtered_at_debug() {
    let options = ValidationOptions::default().with_strip_unknown(true);
    let output = capture(Level::DEBUG, || {
        let _ = array()
            .items([number()])
            .validate_with(vec!["x"], &options);
    });
    assert!(!output.contains("array element removed"), "{output}");
    assert!(output.contains("valid=true"), "{output}");
}
