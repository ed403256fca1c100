//! Wire trace sink

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Shared writable sink that receives raw wire traffic
///
/// Cloning shares the underlying writer, so every connection a factory
/// builds writes into the same sink. Two values compare equal only when they
/// share a writer.
#[derive(Clone)]
pub struct DebugOutput {
    sink: Arc<Mutex<dyn Write + Send>>,
}

impl DebugOutput {
    /// Wrap a writer
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            sink: Arc::new(Mutex::new(writer)),
        }
    }

    /// Sink writing to the process's standard error
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write a chunk of traffic and flush it
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "debug output lock poisoned"))?;
        sink.write_all(data)?;
        sink.flush()
    }

    /// Whether both values share the same writer
    pub fn same_sink(&self, other: &DebugOutput) -> bool {
        // Compare data pointers only; vtable pointers may differ across codegen units
        std::ptr::eq(
            Arc::as_ptr(&self.sink) as *const (),
            Arc::as_ptr(&other.sink) as *const (),
        )
    }
}

impl PartialEq for DebugOutput {
    fn eq(&self, other: &Self) -> bool {
        self.same_sink(other)
    }
}

impl fmt::Debug for DebugOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugOutput")
            .field("sink", &"<dyn Write>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_all_reaches_writer() {
        let buf = SharedBuf::default();
        let out = DebugOutput::new(buf.clone());
        out.write_all(b"GET / HTTP/1.1\r\n").unwrap();
        assert_eq!(&*buf.0.lock().unwrap(), b"GET / HTTP/1.1\r\n");
    }

    #[test]
    fn test_clones_share_sink() {
        let out = DebugOutput::new(Vec::new());
        let copy = out.clone();
        assert_eq!(out, copy);
        assert_ne!(out, DebugOutput::new(Vec::new()));
    }

    #[test]
    fn test_debug_hides_writer() {
        let out = DebugOutput::stderr();
        assert!(format!("{:?}", out).contains("DebugOutput"));
    }
}
