//! TCP acceptor + per-connection worker loop.
//!
//! Kept thin on purpose: the storage/concurrency core this module calls
//! into is the hard part, not the network layer. Grounded in the
//! read-parse-execute-write loop of
//! `examples/original_source/src/network/st_nonblocking/Connection.cpp`
//! and `.../mt_nonblocking/Connection.cpp`, collapsed to one blocking
//! OS thread per connection instead of an epoll reactor.

use std::io::{BufReader, BufWriter, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use crate::executor::Executor;
use crate::protocol::{read_command, write_reply, ProtocolError, Reply};
use crate::storage::{dispatch, Storage};

/// Accepts connections on `listener` and hands each one to `executor` as a
/// single long-lived task that owns the connection until the peer
/// disconnects or a fatal I/O error occurs. Returns only if `accept`
/// itself fails.
pub fn serve(
    listener: TcpListener,
    storage: Arc<dyn Storage>,
    executor: &Executor,
) -> std::io::Result<()> {
    for stream in listener.incoming() {
        let stream = stream?;
        let storage = Arc::clone(&storage);
        if !executor.execute(move || handle_connection(stream, storage)) {
            tracing::warn!("dropping connection: executor queue full");
        }
    }
    Ok(())
}

fn handle_connection(stream: TcpStream, storage: Arc<dyn Storage>) {
    let peer = stream.peer_addr().ok();
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(stream);

    loop {
        let command = match read_command(&mut reader) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => break,
            Err(ProtocolError::Malformed(reason)) => {
                if reply(&mut writer, &Reply::ClientError(reason)).is_err() {
                    break;
                }
                continue;
            }
            Err(ProtocolError::Io(err)) => {
                tracing::debug!(?peer, %err, "connection ended with I/O error");
                break;
            }
        };

        let outcome = dispatch(storage.as_ref(), command);
        if reply(&mut writer, &outcome).is_err() {
            break;
        }
    }
}

fn reply<W: Write>(writer: &mut W, r: &Reply) -> std::io::Result<()> {
    write_reply(writer, r)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrent::StripedLru;
    use crate::config::StripedLruConfig;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpStream;
    use std::thread;

    #[test]
    fn end_to_end_set_get_over_tcp() {
        let storage: Arc<dyn Storage> = Arc::new(
            StripedLru::<Vec<u8>, Vec<u8>>::new(StripedLruConfig { total_budget: 1 << 20, shard_count: 4 })
                .unwrap(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let serve_storage = Arc::clone(&storage);
        thread::spawn(move || {
            // Single iteration of the accept loop is enough for this test.
            if let Ok((stream, _)) = listener.accept() {
                handle_connection(stream, serve_storage);
            }
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"set foo 0 0 3\r\nbar\r\n").unwrap();
        client.write_all(b"get foo\r\n").unwrap();
        client.write_all(b"delete foo\r\n").unwrap();
        client.write_all(b"get foo\r\n").unwrap();
        drop(client.shutdown(std::net::Shutdown::Write));

        let mut reader = BufReader::new(client);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "STORED\r\n");

        let mut value_line = String::new();
        reader.read_line(&mut value_line).unwrap();
        assert_eq!(value_line, "VALUE foo 0 3\r\n");
        let mut payload = String::new();
        reader.read_line(&mut payload).unwrap();
        assert_eq!(payload, "bar\r\n");
        let mut end_line = String::new();
        reader.read_line(&mut end_line).unwrap();
        assert_eq!(end_line, "END\r\n");

        let mut deleted_line = String::new();
        reader.read_line(&mut deleted_line).unwrap();
        assert_eq!(deleted_line, "DELETED\r\n");

        let mut not_found_get = String::new();
        reader.read_line(&mut not_found_get).unwrap();
        assert_eq!(not_found_get, "END\r\n");
    }
}
