//! History and lock transitions are visible under their tracing targets.

use core_patch::{Edit, EditBatch};
use core_state::EditorState;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter {
            inner: buffer.clone(),
        })
        .finish();
    with_default(subscriber, f);
    let out = buffer.lock().unwrap().clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn undo_and_redo_are_traced() {
    let logs = capture(|| {
        let mut st = EditorState::new("ab");
        st.insert_char('x');
        st.undo();
        st.redo();
    });
    assert!(logs.contains("state.undo: push_action"), "{logs}");
    assert!(logs.contains("state.undo: undo_pop"), "{logs}");
    assert!(logs.contains("state.undo: redo_pop"), "{logs}");
}

#[test]
fn review_lock_is_traced() {
    let logs = capture(|| {
        let mut st = EditorState::new("ab");
        st.lock_for_review(EditBatch::new(vec![Edit::insert(1, 1, "x")]));
        st.release_lock();
    });
    assert!(logs.contains("state.lock: locked_for_review"), "{logs}");
    assert!(logs.contains("state.lock: lock_released"), "{logs}");
}
