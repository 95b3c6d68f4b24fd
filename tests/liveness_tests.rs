// Liveness scanner tests against real spawned listing commands

use hostmon::error::MonitorError;
use hostmon::liveness::{CommandLister, ProcessLister, ProcessLivenessScanner};
use std::io::Read;

const LISTING: &str = "USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND\\n\
root 1 0.0 0.1 1000 100 ? Ss 09:00 0:01 /sbin/init\\n\
alice 42 1.0 2.0 5000 900 pts/0 S+ 10:00 0:05 /usr/bin/sampler --fast\\n";

fn printf_lister(text: &str) -> CommandLister {
    CommandLister::new("sh", ["-c".to_string(), format!("printf '%b' '{text}'")])
}

#[test]
fn command_lister_streams_stdout() {
    let mut out = String::new();
    printf_lister("a b c\\n")
        .list_processes()
        .unwrap()
        .read_to_string(&mut out)
        .unwrap();
    assert_eq!(out, "a b c\n");
}

#[test]
fn scanner_finds_running_process_from_command_output() {
    let scanner = ProcessLivenessScanner::new(printf_lister(LISTING));
    assert!(scanner.is_running("sampler").unwrap());
    assert!(scanner.is_running("init").unwrap());
    assert!(!scanner.is_running("--fast").unwrap());
    assert!(!scanner.is_running("postgres").unwrap());
}

#[test]
fn scanner_with_empty_output_is_false() {
    let scanner = ProcessLivenessScanner::new(printf_lister(""));
    assert!(!scanner.is_running("anything").unwrap());
}

#[test]
fn scanner_with_short_line_is_malformed() {
    let scanner = ProcessLivenessScanner::new(printf_lister("not a ps line\\n"));
    let err = scanner.is_running("anything").unwrap_err();
    assert!(matches!(err, MonitorError::MalformedRecord(_)));
}

#[test]
fn missing_program_is_not_found() {
    let lister = CommandLister::new("hostmon-no-such-program", Vec::<String>::new());
    let err = lister.list_processes().err().expect("spawn should fail");
    assert!(matches!(err, MonitorError::NotFound(_)));
    assert!(err.to_string().contains("hostmon-no-such-program"));
}

#[test]
fn command_line_is_split_on_whitespace() {
    let lister = CommandLister::from_command_line("  ps   xau ").unwrap();
    assert_eq!(lister.program(), "ps");
    assert!(CommandLister::from_command_line("   ").is_none());
    assert_eq!(CommandLister::default().program(), "ps");
}

#[test]
fn listing_consumer_may_stop_early() {
    // Dropping a partly read listing must not hang on a chatty command.
    let lister = CommandLister::new("sh", ["-c", "yes 'a b c d e f g h i j target'"]);
    let scanner = ProcessLivenessScanner::new(lister);
    assert!(scanner.is_running("target").unwrap());
}
