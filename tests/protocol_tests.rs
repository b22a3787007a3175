//! Wire protocol round trips: parse a request line (plus payload) into a
//! [`Command`], dispatch it against a real [`StripedLru`], and check the
//! reply both as a value and as the exact bytes written back to the wire.

use std::io::Cursor;

use striped_lru_cache::config::StripedLruConfig;
use striped_lru_cache::protocol::{read_command, write_reply, Reply};
use striped_lru_cache::storage::dispatch;
use striped_lru_cache::StripedLru;

fn storage() -> StripedLru<Vec<u8>, Vec<u8>> {
    StripedLru::new(StripedLruConfig { total_budget: 1 << 20, shard_count: 4 }).unwrap()
}

fn round_trip(storage: &StripedLru<Vec<u8>, Vec<u8>>, request: &[u8]) -> Vec<u8> {
    let mut input = Cursor::new(request.to_vec());
    let command = read_command(&mut input).unwrap().expect("a command");
    let reply = dispatch(storage, command);
    let mut out = Vec::new();
    write_reply(&mut out, &reply).unwrap();
    out
}

#[test]
fn set_round_trips_to_stored() {
    let s = storage();
    assert_eq!(round_trip(&s, b"set mykey 0 0 5\r\nhello\r\n"), b"STORED\r\n");
}

#[test]
fn get_after_set_round_trips_the_value_line() {
    let s = storage();
    round_trip(&s, b"set mykey 0 0 5\r\nhello\r\n");
    assert_eq!(round_trip(&s, b"get mykey\r\n"), b"VALUE mykey 0 5\r\nhello\r\nEND\r\n");
}

#[test]
fn get_on_a_missing_key_round_trips_to_bare_end() {
    let s = storage();
    assert_eq!(round_trip(&s, b"get nope\r\n"), b"END\r\n");
}

#[test]
fn get_with_multiple_keys_returns_only_the_present_ones_in_order() {
    let s = storage();
    round_trip(&s, b"set a 0 0 1\r\n1\r\n");
    round_trip(&s, b"set c 0 0 1\r\n3\r\n");
    assert_eq!(round_trip(&s, b"get a b c\r\n"), b"VALUE a 0 1\r\n1\r\nVALUE c 0 1\r\n3\r\nEND\r\n");
}

#[test]
fn add_round_trips_to_not_stored_when_the_key_already_exists() {
    let s = storage();
    round_trip(&s, b"add k 0 0 1\r\n1\r\n");
    assert_eq!(round_trip(&s, b"add k 0 0 1\r\n2\r\n"), b"NOT_STORED\r\n");
}

#[test]
fn replace_round_trips_to_not_stored_when_the_key_is_absent() {
    let s = storage();
    assert_eq!(round_trip(&s, b"replace k 0 0 1\r\n1\r\n"), b"NOT_STORED\r\n");
}

#[test]
fn append_round_trips_to_the_concatenated_value() {
    let s = storage();
    round_trip(&s, b"set k 0 0 3\r\nfoo\r\n");
    assert_eq!(round_trip(&s, b"append k 0 0 3\r\nbar\r\n"), b"STORED\r\n");
    assert_eq!(round_trip(&s, b"get k\r\n"), b"VALUE k 0 6\r\nfoobar\r\nEND\r\n");
}

#[test]
fn delete_round_trips_to_deleted_then_not_found() {
    let s = storage();
    round_trip(&s, b"set k 0 0 1\r\nv\r\n");
    assert_eq!(round_trip(&s, b"delete k\r\n"), b"DELETED\r\n");
    assert_eq!(round_trip(&s, b"delete k\r\n"), b"NOT_FOUND\r\n");
}

#[test]
fn malformed_request_is_reported_without_reaching_dispatch() {
    let mut input = Cursor::new(b"set k 0 0 3\r\nabcXX".to_vec());
    assert!(read_command(&mut input).is_err());
}

#[test]
fn reply_round_trip_matches_value_equality_too() {
    let s = storage();
    let mut input = Cursor::new(b"set k 0 0 1\r\nv\r\n".to_vec());
    let command = read_command(&mut input).unwrap().unwrap();
    assert_eq!(dispatch(&s, command), Reply::Stored);
}
