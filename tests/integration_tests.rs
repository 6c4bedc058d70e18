//! Integration tests for kickstart-io
//!
//! End-to-end behaviour of the adaptation layer against a scripted console:
//! routing, BOM isolation, write failure reporting, line input and the
//! codec round-trip law.

use kickstart_io::testing::{MockCall, MockConsole};
use kickstart_io::{
    to_native, to_utf8, ConsoleOptions, Error, StreamHandle, StreamRoute, TextCodec, Utf16Codec,
    Utf8Streams, UTF8_BOM,
};
use proptest::prelude::*;

fn console_writes(console: &MockConsole) -> Vec<Vec<u8>> {
    console
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            MockCall::WriteConsole { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

fn raw_writes(console: &MockConsole) -> Vec<Vec<u8>> {
    console
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            MockCall::WriteBytes { bytes, .. } => Some(bytes),
            _ => None,
        })
        .collect()
}

#[test]
fn test_empty_write_is_silent() {
    let console = MockConsole::all_consoles();
    let streams = Utf8Streams::new(&console);
    console.clear_calls();

    assert_eq!(streams.write(MockConsole::STDOUT, b"").unwrap(), 0);
    assert_eq!(streams.write(StreamHandle::from_raw(33), b"").unwrap(), 0);
    streams.output(MockConsole::STDOUT, "").unwrap();
    assert!(console.calls().is_empty());
    assert!(to_native(b"").unwrap().is_empty());
    assert!(to_utf8(&[]).unwrap().is_empty());
}

#[test]
fn test_bom_isolation_on_console() {
    let console = MockConsole::all_consoles();
    let streams = Utf8Streams::new(&console);
    console.clear_calls();

    let mut data = UTF8_BOM.to_vec();
    data.extend_from_slice(b"Hello");
    assert_eq!(streams.write(MockConsole::STDOUT, &data).unwrap(), data.len());
    assert_eq!(console_writes(&console), vec![UTF8_BOM.to_vec(), b"Hello".to_vec()]);
}

#[test]
fn test_bom_isolation_on_passthrough() {
    let console = MockConsole::redirected();
    let streams = Utf8Streams::new(&console);

    let mut data = UTF8_BOM.to_vec();
    data.extend_from_slice(b"Hello");
    streams.write_all(MockConsole::STDOUT, &data).unwrap();
    assert_eq!(raw_writes(&console), vec![UTF8_BOM.to_vec(), b"Hello".to_vec()]);
    assert_eq!(console.output(MockConsole::STDOUT), data);
}

#[test]
fn test_eof_versus_empty_line() {
    let console = MockConsole::redirected();
    let streams = Utf8Streams::new(&console);
    assert_eq!(streams.input_or_eof(MockConsole::STDIN).unwrap(), None);

    let console = MockConsole::redirected();
    let streams = Utf8Streams::new(&console);
    console.push_input(MockConsole::STDIN, b"\n");
    assert_eq!(streams.input_or_eof(MockConsole::STDIN).unwrap(), Some(String::new()));
    assert_eq!(streams.input_or_eof(MockConsole::STDIN).unwrap(), None);
}

#[test]
fn test_partial_line_preserved() {
    let console = MockConsole::all_consoles();
    let streams = Utf8Streams::new(&console);
    console.push_input(MockConsole::STDIN, b"abc");

    assert_eq!(streams.input_or_eof(MockConsole::STDIN).unwrap(), Some("abc".to_string()));
    assert_eq!(streams.input_or_eof(MockConsole::STDIN).unwrap(), None);
    assert!(!streams.has_error(MockConsole::STDIN));
}

#[test]
fn test_classifier_stability() {
    let console = MockConsole::all_consoles();
    let streams = Utf8Streams::new(&console);
    let other = StreamHandle::from_raw(21);

    let first = [
        streams.is_console(MockConsole::STDOUT),
        streams.is_console(other),
    ];
    console.push_input(MockConsole::STDIN, b"line\n");
    streams.output(MockConsole::STDOUT, "some output\n").unwrap();
    streams.input_or_eof(MockConsole::STDIN).unwrap();
    console.set_console(MockConsole::STDOUT, false);
    console.set_console(other, true);

    let second = [
        streams.is_console(MockConsole::STDOUT),
        streams.is_console(other),
    ];
    assert_eq!(first, [true, false]);
    assert_eq!(first, second);
}

#[test]
fn test_short_console_write_reports_failure() {
    let console = MockConsole::all_consoles();
    let streams = Utf8Streams::new(&console);
    console.limit_console_writes(Some(4));

    assert_eq!(streams.write(MockConsole::STDOUT, b"Hello").unwrap(), 0);
    match streams.output(MockConsole::STDOUT, "Hello") {
        Err(Error::WriteFailed {
            written, requested, ..
        }) => {
            assert_eq!(written, 0);
            assert_eq!(requested, 5);
        }
        other => panic!("expected WriteFailed, got {other:?}"),
    }

    console.limit_console_writes(None);
    assert_eq!(streams.write(MockConsole::STDOUT, b"Hello").unwrap(), 5);
}

#[test]
fn test_non_console_routes_bypass_codec() {
    let console = MockConsole::redirected();
    let streams = Utf8Streams::new(&console);
    console.push_input(MockConsole::STDIN, b"q");

    for handle in [MockConsole::STDIN, MockConsole::STDOUT, MockConsole::STDERR] {
        assert_eq!(streams.route_for(handle), StreamRoute::RawPassthrough);
    }

    // Bytes the codec would reject pass through untouched.
    assert_eq!(streams.write(MockConsole::STDOUT, b"\xFF\xFE").unwrap(), 2);
    assert_eq!(streams.read_byte(MockConsole::STDIN).unwrap(), Some(b'q'));
    assert!(console_writes(&console).is_empty());
    assert_eq!(raw_writes(&console), vec![b"\xFF\xFE".to_vec()]);
}

#[test]
fn test_console_route_rejects_ill_formed_text() {
    let console = MockConsole::all_consoles();
    let streams = Utf8Streams::new(&console);

    let err = streams.write(MockConsole::STDOUT, b"ok\xFF").unwrap_err();
    assert!(err.is_fatal());
    assert!(console_writes(&console).is_empty());
}

#[test]
fn test_mixed_routes() {
    let console = MockConsole::redirected();
    console.set_console(MockConsole::STDERR, true);
    let streams = Utf8Streams::with_options(
        &console,
        ConsoleOptions {
            enable_escape_sequences: false,
            ..ConsoleOptions::default()
        },
    );

    streams.output(MockConsole::STDOUT, "to a pipe\n").unwrap();
    streams.output_error_message("to the console\n").unwrap();

    assert_eq!(raw_writes(&console), vec![b"to a pipe\n".to_vec()]);
    assert_eq!(console_writes(&console), vec![b"to the console\n".to_vec()]);
}

proptest! {
    #[test]
    fn prop_round_trip_law(s in "\\PC*") {
        let native = to_native(s.as_bytes()).unwrap();
        prop_assert_eq!(to_utf8(&native).unwrap(), s.as_bytes().to_vec());

        let wide = Utf16Codec::to_native(s.as_bytes()).unwrap();
        prop_assert_eq!(Utf16Codec::to_utf8(&wide).unwrap(), s.as_bytes().to_vec());
    }

    #[test]
    fn prop_console_write_reproduces_text(s in "\\PC{1,40}") {
        let console = MockConsole::all_consoles();
        let streams = Utf8Streams::new(&console);

        prop_assert_eq!(streams.write(MockConsole::STDOUT, s.as_bytes()).unwrap(), s.len());
        prop_assert_eq!(console.output(MockConsole::STDERR), s.as_bytes().to_vec());
    }
}
