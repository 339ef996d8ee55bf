use super::dto::WorkflowRequest;
use crate::error::{Result, WorkflowError};
use std::io::{BufRead, BufReader, Read};

/// Reads workflow requests from a JSON-lines source.
///
/// Wraps any `Read` (file, stdin) and yields one parsed request per
/// non-empty line, so large scripts stream without being loaded into memory.
pub struct RequestReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<WorkflowRequest>> {
        self.reader.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(WorkflowError::from)),
            Err(err) => Some(Err(WorkflowError::from(err))),
        })
    }
}
