use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("picocap"))
}

fn push_record(out: &mut Vec<u8>, seconds: u64, frame_length: u32, frame: &[u8]) {
    out.extend_from_slice(b"eth0\0\0\0\0");
    out.extend_from_slice(b"mp00\0\0\0\0");
    out.extend_from_slice(&seconds.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&frame_length.to_le_bytes());
    out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
    out.extend_from_slice(frame);
}

fn udp_dns_frame() -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 1]);
    frame.extend_from_slice(&0x0800u16.to_be_bytes());

    let mut ip = vec![0u8; 20];
    ip[0] = 0x45;
    ip[2..4].copy_from_slice(&48u16.to_be_bytes());
    ip[8] = 64;
    ip[9] = 17;
    ip[12..16].copy_from_slice(&[192, 168, 0, 1]);
    ip[16..20].copy_from_slice(&[192, 168, 0, 2]);
    frame.extend_from_slice(&ip);

    let mut udp = vec![0u8; 8];
    udp[0..2].copy_from_slice(&4000u16.to_be_bytes());
    udp[2..4].copy_from_slice(&53u16.to_be_bytes());
    udp[4..6].copy_from_slice(&28u16.to_be_bytes());
    frame.extend_from_slice(&udp);

    frame.extend_from_slice(&[0u8; 20]);
    frame
}

fn arp_frame() -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 1]);
    frame.extend_from_slice(&0x0806u16.to_be_bytes());
    frame.extend_from_slice(&[0u8; 28]);
    frame
}

fn write_capture(dir: &Path) -> std::path::PathBuf {
    let mut data = Vec::new();
    let dns = udp_dns_frame();
    let arp = arp_frame();
    push_record(&mut data, 1_367_409_600, dns.len() as u32, &dns);
    push_record(&mut data, 1_367_409_610, arp.len() as u32, &arp);

    let path = dir.join("capture.cap");
    fs::write(&path, data).expect("write capture");
    path
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("info").and(contains("walk")).and(contains("size")));
}

#[test]
fn long_version_carries_the_build_stamp() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("picocap").and(contains("commit")).and(contains("built")));
}

#[test]
fn missing_input_fails_with_error() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.cap");

    cmd()
        .arg("info")
        .arg(missing)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:"));
}

#[test]
fn info_reports_packets_and_duration() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    cmd()
        .arg("info")
        .arg(&capture)
        .assert()
        .success()
        .stdout(
            contains("packets: 2")
                .and(contains("duration: 00:00:10.0"))
                .and(contains("2013-05-01")),
        );
}

#[test]
fn info_breakdown_lists_protocols() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    cmd()
        .arg("info")
        .arg(&capture)
        .arg("--breakdown")
        .assert()
        .success()
        .stdout(contains("udp(1)").and(contains("arp: 1")));
}

#[test]
fn info_json_is_parseable() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    let assert = cmd()
        .arg("info")
        .arg(&capture)
        .arg("--json")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["summary"]["packets"], 2);
    assert_eq!(value["summary"]["arp"], 1);
}

#[test]
fn walk_prints_header_chain() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    cmd()
        .arg("walk")
        .arg(&capture)
        .assert()
        .success()
        .stdout(
            contains("eth0:mp00")
                .and(contains("ethernet @ 0"))
                .and(contains("ipv4 @ 14"))
                .and(contains("udp @ 34"))
                .and(contains("dns @ 42")),
        );
}

#[test]
fn walk_respects_packet_limit() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    let assert = cmd()
        .arg("walk")
        .arg(&capture)
        .arg("-p")
        .arg("1")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    assert!(stdout.contains("[1]"));
    assert!(!stdout.contains("[2]"));
}

#[test]
fn size_totals_transport_payloads() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    // DNS datagram carries 20 payload bytes; the ARP frame is unsupported.
    cmd()
        .arg("size")
        .arg(&capture)
        .arg("--level")
        .arg("transport")
        .assert()
        .success()
        .stdout(
            contains("[1] 20")
                .and(contains("unsupported (ARP)"))
                .and(contains("1 unsupported")),
        );
}

#[test]
fn size_rejects_unknown_level() {
    let temp = TempDir::new().expect("tempdir");
    let capture = write_capture(temp.path());

    cmd()
        .arg("size")
        .arg(&capture)
        .arg("--level")
        .arg("bogus")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown level"));
}

#[test]
fn truncated_stream_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    let mut data = Vec::new();
    let dns = udp_dns_frame();
    push_record(&mut data, 0, dns.len() as u32, &dns);
    data.truncate(data.len() - 5);

    let path = temp.path().join("cut.cap");
    fs::write(&path, data).expect("write capture");

    cmd()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error:"));
}
