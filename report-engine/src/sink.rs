//! FILENAME: report-engine/src/sink.rs
//! Where encoded report bytes go: either straight through to any
//! `std::io::Write`, or buffered and shipped to an object store as a
//! multipart upload. Encoding stays strictly above this boundary so either
//! sink can serve it.

use crate::error::WriterError;

/// Minimum part size for the multipart sink, except for the final part.
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// The three-call contract (plus abort) a caller's object-store client must
/// provide. Synchronous and blocking, matching the rest of this crate — see
/// the crate-level concurrency notes in `lib.rs`.
pub trait ObjectStoreClient {
    fn create_multipart_upload(&mut self, bucket: &str, key: &str) -> Result<String, WriterError>;
    fn upload_part(
        &mut self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        body: &[u8],
    ) -> Result<String, WriterError>;
    fn complete_multipart_upload(
        &mut self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[(u32, String)],
    ) -> Result<(), WriterError>;
    fn abort_multipart_upload(&mut self, bucket: &str, key: &str, upload_id: &str) -> Result<(), WriterError>;
}

/// Any sink the writer can drain encoded rows into.
pub trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError>;
    fn close(&mut self) -> Result<(), WriterError>;
}

/// Wraps any `std::io::Write` (a file, a `Vec<u8>`, a socket) with no
/// buffering beyond what the underlying writer does itself.
pub struct WriteSink<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        WriteSink { inner }
    }
}

impl<W: std::io::Write> Sink for WriteSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Buffers encoded rows and ships them to an object store as multipart
/// upload parts once the buffer reaches `MIN_PART_SIZE`. On `close`, the
/// tail (even if smaller than `MIN_PART_SIZE`) is flushed as the final part
/// and the upload is completed. If any part upload or the completion call
/// fails after the upload has been created, `abort_multipart_upload` is
/// issued before the error is returned to the caller — unlike the system
/// this crate supersedes, an upload is never left dangling.
pub struct MultipartSink<C: ObjectStoreClient> {
    client: C,
    bucket: String,
    key: String,
    upload_id: Option<String>,
    buffer: Vec<u8>,
    next_part_number: u32,
    parts: Vec<(u32, String)>,
}

impl<C: ObjectStoreClient> MultipartSink<C> {
    pub fn new(client: C, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        MultipartSink {
            client,
            bucket: bucket.into(),
            key: key.into(),
            upload_id: None,
            buffer: Vec::new(),
            next_part_number: 1,
            parts: Vec::new(),
        }
    }

    fn ensure_started(&mut self) -> Result<String, WriterError> {
        if let Some(id) = &self.upload_id {
            return Ok(id.clone());
        }
        let id = self.client.create_multipart_upload(&self.bucket, &self.key)?;
        self.upload_id = Some(id.clone());
        Ok(id)
    }

    fn flush_part(&mut self, upload_id: &str) -> Result<(), WriterError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let part_number = self.next_part_number;
        match self
            .client
            .upload_part(&self.bucket, &self.key, upload_id, part_number, &self.buffer)
        {
            Ok(e_tag) => {
                log::info!("uploaded part {} for {}/{}", part_number, self.bucket, self.key);
                self.parts.push((part_number, e_tag));
                self.next_part_number += 1;
                self.buffer.clear();
                Ok(())
            }
            Err(e) => {
                log::error!("part {} upload failed for {}/{}: {}", part_number, self.bucket, self.key, e);
                let _ = self.client.abort_multipart_upload(&self.bucket, &self.key, upload_id);
                log::info!("aborted multipart upload {} for {}/{}", upload_id, self.bucket, self.key);
                Err(e)
            }
        }
    }
}

impl<C: ObjectStoreClient> Sink for MultipartSink<C> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        let upload_id = self.ensure_started()?;
        self.buffer.extend_from_slice(bytes);
        if self.buffer.len() >= MIN_PART_SIZE {
            self.flush_part(&upload_id)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        let upload_id = self.ensure_started()?;
        self.flush_part(&upload_id)?;
        match self
            .client
            .complete_multipart_upload(&self.bucket, &self.key, &upload_id, &self.parts)
        {
            Ok(()) => {
                log::info!(
                    "completed multipart upload {} for {}/{} ({} parts)",
                    upload_id,
                    self.bucket,
                    self.key,
                    self.parts.len()
                );
                Ok(())
            }
            Err(e) => {
                log::error!("failed to complete multipart upload {}: {}", upload_id, e);
                let _ = self.client.abort_multipart_upload(&self.bucket, &self.key, &upload_id);
                log::info!("aborted multipart upload {} for {}/{}", upload_id, self.bucket, self.key);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;

    /// An in-memory fake `ObjectStoreClient`, for exercising the multipart
    /// sink's part-numbering, threshold, and completion behavior without a
    /// real object store. Lives next to the sink code rather than in a
    /// separate mocking crate.
    #[derive(Default)]
    pub struct FakeObjectStore {
        pub uploads: HashMap<String, Vec<Vec<u8>>>,
        pub completed: Vec<(String, Vec<(u32, String)>)>,
        pub aborted: Vec<String>,
        pub fail_part: Option<u32>,
    }

    impl ObjectStoreClient for FakeObjectStore {
        fn create_multipart_upload(&mut self, _bucket: &str, _key: &str) -> Result<String, WriterError> {
            let id = format!("upload-{}", self.uploads.len() + 1);
            self.uploads.insert(id.clone(), Vec::new());
            Ok(id)
        }

        fn upload_part(
            &mut self,
            _bucket: &str,
            _key: &str,
            upload_id: &str,
            part_number: u32,
            body: &[u8],
        ) -> Result<String, WriterError> {
            if self.fail_part == Some(part_number) {
                return Err(WriterError::Sink(format!("simulated failure on part {part_number}")));
            }
            self.uploads.get_mut(upload_id).unwrap().push(body.to_vec());
            Ok(format!("etag-{part_number}"))
        }

        fn complete_multipart_upload(
            &mut self,
            _bucket: &str,
            _key: &str,
            upload_id: &str,
            parts: &[(u32, String)],
        ) -> Result<(), WriterError> {
            self.completed.push((upload_id.to_string(), parts.to_vec()));
            Ok(())
        }

        fn abort_multipart_upload(&mut self, _bucket: &str, _key: &str, upload_id: &str) -> Result<(), WriterError> {
            self.aborted.push(upload_id.to_string());
            Ok(())
        }
    }
}
