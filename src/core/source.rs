use std::{
    cell::RefCell,
    fs::File,
    io::{BufReader, BufWriter, Cursor, Read, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::error::TableError;

/// A byte resource that can be opened for reading.
///
/// Opening is scoped: the returned reader owns the underlying handle and
/// releases it when dropped, on every exit path. A `Source` can be opened
/// any number of times; each call acquires the resource afresh, which is
/// what makes file-backed tables restartable.
pub trait Source {
    fn open(&self) -> Result<Box<dyn Read>, TableError>;
}

/// A byte resource that can be opened for writing.
///
/// Same scoping rules as [`Source`]: the returned writer owns the handle
/// and releases it when dropped. Callers flush before dropping.
pub trait Sink {
    fn open(&self) -> Result<Box<dyn Write>, TableError>;
}

/// A source backed by a file path, reopened on every `open` call.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Source for FileSource {
    fn open(&self) -> Result<Box<dyn Read>, TableError> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A sink backed by a file path, truncated on every `open` call.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Sink for FileSink {
    fn open(&self) -> Result<Box<dyn Write>, TableError> {
        let file = File::create(&self.path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// A source over an in-memory byte buffer.
///
/// Useful when the JSON document already lives in memory, and in tests.
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl Source for MemorySource {
    fn open(&self) -> Result<Box<dyn Read>, TableError> {
        Ok(Box::new(Cursor::new(self.bytes.clone())))
    }
}

/// A sink that accumulates bytes in a shared in-memory buffer.
///
/// Cloning the sink shares the buffer, so the written bytes stay readable
/// after the writer has been dropped.
#[derive(Clone, Default)]
pub struct SharedSink {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

struct SharedWriter {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Sink for SharedSink {
    fn open(&self) -> Result<Box<dyn Write>, TableError> {
        Ok(Box::new(SharedWriter {
            buffer: Rc::clone(&self.buffer),
        }))
    }
}
