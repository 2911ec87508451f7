//! Diagnostic context written when a run fails

mod common;

use common::{center_waypoint, config, folder, Fixture};
use ellipsekit_program::sim::{SimulatedHost, TreeFaults};
use ellipsekit_program::RingSynchronizer;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

fn failure_line(logs: &str) -> &str {
    logs.lines()
        .find(|line| line.contains("Ring synchronization failed"))
        .expect("no failure log line")
}

#[tokio::test]
async fn test_insert_failure_logs_remaining_children() {
    let (logs, _guard) = capture_logs();
    let fx = Fixture::new().with_children(2);
    let stale = fx.host.tree.children(&fx.center);
    fx.host.tree.set_faults(TreeFaults {
        fail_insert_at: Some(5),
        ..Default::default()
    });
    let sync = fx.synchronizer(&config());

    assert!(sync.apply_center(center_waypoint()).await.is_err());

    let logs = logs.contents();
    let line = failure_line(&logs);
    assert!(line.contains("ERROR"));
    assert!(line.contains(fx.center.as_str()));
    assert!(line.contains("removed="));
    assert!(line.contains(stale[1].as_str()));
    assert!(line.contains("remaining="));
    assert!(line.contains(stale[0].as_str()));

    let children = fx.host.tree.children(&fx.center);
    assert_eq!(children.len(), 1 + 5);
    for child in &children {
        assert!(line.contains(child.as_str()));
    }
}

#[tokio::test]
async fn test_update_failure_logs_untouched_children() {
    let (logs, _guard) = capture_logs();
    let fx = Fixture::new().with_children(3);
    let stale = fx.host.tree.children(&fx.center);
    fx.host.tree.set_faults(TreeFaults {
        fail_updates: true,
        ..Default::default()
    });
    let sync = fx.synchronizer(&config());

    assert!(sync.apply_center(center_waypoint()).await.is_err());

    let logs = logs.contents();
    let line = failure_line(&logs);
    assert!(line.contains("inserted=[]"));
    assert!(line.contains(stale[0].as_str()));
    assert!(line.contains(stale[1].as_str()));
}

#[tokio::test]
async fn test_unresolved_center_logs_no_children() {
    let (logs, _guard) = capture_logs();
    let host = SimulatedHost::new();
    let root = host.tree.add_root(folder());
    let selected = host.tree.insert_child(&root, folder()).unwrap();
    let sync = RingSynchronizer::new(host.api().with_selection(selected.clone()), &config());

    assert!(sync.apply_center(center_waypoint()).await.is_err());

    let logs = logs.contents();
    let line = failure_line(&logs);
    assert!(line.contains("center=None"));
    assert!(line.contains("remaining=None"));
    assert!(line.contains(selected.as_str()));
}
