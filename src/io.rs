//! In-memory stream for serving requests without a socket.
use std::io::{self, Cursor, Read, Write};

/// Reads from a fixed input and records everything written to it.
#[derive(Debug, Default)]
pub struct MemoryStream {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl MemoryStream {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: Cursor::new(input.to_vec()),
            output: vec![],
        }
    }
    /// Bytes written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_input_is_read_once() {
        let mut stream = MemoryStream::new(b"GET /ping HTTP/1.1");
        let mut read = String::new();
        stream.read_to_string(&mut read).unwrap();
        assert_eq!(read, "GET /ping HTTP/1.1");
        assert_eq!(stream.read(&mut [0; 8]).unwrap(), 0);
    }

    #[test]
    fn test_output_is_recorded() {
        let mut stream = MemoryStream::default();
        stream.write_all(b"HTTP/1.1 ").unwrap();
        stream.write_all(b"200 OK").unwrap();
        assert_eq!(stream.output(), b"HTTP/1.1 200 OK");
        assert_eq!(stream.into_output(), b"HTTP/1.1 200 OK".to_vec());
    }
}
