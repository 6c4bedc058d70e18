//! Real OS streams: files are always byte passthrough

#![cfg(unix)]

use std::io::{Seek, SeekFrom};

use kickstart_io::{ConsoleOptions, Error, StreamHandle, StreamRoute, Utf8Streams, UTF8_BOM};
use tempfile::tempfile;

fn quiet_options() -> ConsoleOptions {
    ConsoleOptions {
        enable_escape_sequences: false,
        ..ConsoleOptions::default()
    }
}

#[test]
fn test_file_write_then_read_lines() {
    let mut file = tempfile().unwrap();
    let streams = Utf8Streams::system(quiet_options()).unwrap();
    let handle = StreamHandle::of(&file);

    assert!(!streams.is_console(handle));
    assert_eq!(streams.route_for(handle), StreamRoute::RawPassthrough);

    let mut data = UTF8_BOM.to_vec();
    data.extend_from_slice("første linje\n\nπ".as_bytes());
    assert_eq!(streams.write(handle, &data).unwrap(), data.len());

    file.seek(SeekFrom::Start(0)).unwrap();
    let lines: Vec<String> = streams
        .lines(handle)
        .collect::<Result<_, Error>>()
        .unwrap();
    assert_eq!(lines, vec!["\u{FEFF}første linje", "", "π"]);
}

#[test]
fn test_writer_into_file() {
    let mut file = tempfile().unwrap();
    let streams = Utf8Streams::system(quiet_options()).unwrap();
    let handle = StreamHandle::of(&file);

    let mut writer = streams.writer(handle);
    for word in ["Ærlig ", "talt, ", "😀\n"] {
        writer.write_chunk(word.as_bytes()).unwrap();
    }
    writer.finish().unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    assert_eq!(
        streams.input_or_eof(handle).unwrap(),
        Some("Ærlig talt, 😀".to_string())
    );
    assert_eq!(streams.input_or_eof(handle).unwrap(), None);
}

#[test]
fn test_broken_handle_enters_error_state() {
    let streams = Utf8Streams::system(quiet_options()).unwrap();
    let broken = StreamHandle::from_raw(-1);

    assert!(matches!(streams.input_or_eof(broken), Err(Error::Io(_))));
    assert!(streams.has_error(broken));
    assert!(matches!(
        streams.input_or_eof(broken),
        Err(Error::StreamInErrorState(h)) if h == broken
    ));
}

#[test]
fn test_global_instance_is_shared() {
    let first = Utf8Streams::init().unwrap();
    let second = Utf8Streams::init().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(Utf8Streams::global().is_some());
}
