//! Attachment staging buffer.
//!
//! Holds encoded attachments between selection and the next send attempt.
//! Batches arrive whole (the encoding join in `parley_core::attachments`
//! completes before anything is staged), removal is purely local, and the
//! buffer is drained unconditionally when a send is accepted.

use parley_core::types::Attachment;

#[derive(Debug, Default)]
pub struct StagingBuffer {
    staged: Vec<Attachment>,
}

impl StagingBuffer {
    /// Commits one fully-encoded selection batch.
    pub fn stage_batch(&mut self, batch: Vec<Attachment>) {
        self.staged.extend(batch);
    }

    /// Removes a staged attachment by position. No network access.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        (index < self.staged.len()).then(|| self.staged.remove(index))
    }

    /// Takes everything staged, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.staged)
    }

    pub fn staged(&self) -> &[Attachment] {
        &self.staged
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str) -> Attachment {
        Attachment {
            filename: name.to_string(),
            content_type: "text/plain".to_string(),
            data: "aGVsbG8=".to_string(),
        }
    }

    #[test]
    fn test_batch_commits_whole() {
        let mut buffer = StagingBuffer::default();
        buffer.stage_batch(vec![attachment("a"), attachment("b"), attachment("c")]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_overlapping_batches_append_in_arrival_order() {
        let mut buffer = StagingBuffer::default();
        buffer.stage_batch(vec![attachment("a"), attachment("b")]);
        buffer.stage_batch(vec![attachment("c")]);
        let names: Vec<&str> = buffer.staged().iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_by_position() {
        let mut buffer = StagingBuffer::default();
        buffer.stage_batch(vec![attachment("a"), attachment("b")]);

        let removed = buffer.remove(0).unwrap();
        assert_eq!(removed.filename, "a");
        assert_eq!(buffer.len(), 1);

        assert!(buffer.remove(5).is_none());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut buffer = StagingBuffer::default();
        buffer.stage_batch(vec![attachment("a")]);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }
}
