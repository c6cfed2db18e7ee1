//! Best-effort attempt to bring the Windows Hello dialog to the foreground.
//!
//! When the caller lives on the WSL side, the dialog often opens behind
//! other windows. A background task polls for the dialog and raises it.
//! Nothing here can fail the signing operation.

#[cfg(windows)]
pub mod win32;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const DIALOG_WINDOW_CLASS: &str = "Credential Dialog Xaml Host";
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Minimize,
    Restore,
    ShowDefault,
    Show,
}

/// Window-state changes tried when plain foreground activation is refused,
/// each preceded by its delay.
pub const ESCALATION: [(Duration, ShowCommand); 4] = [
    (Duration::ZERO, ShowCommand::Minimize),
    (Duration::ZERO, ShowCommand::Restore),
    (Duration::from_secs(2), ShowCommand::ShowDefault),
    (Duration::from_secs(2), ShowCommand::Show),
];

/// Access to the desktop's top-level windows.
pub trait DialogWindows: Send + Sync + 'static {
    type Handle: Copy + Debug + Send + 'static;

    fn find(&self, class: &str) -> Option<Self::Handle>;

    /// Returns whether the window was actually activated.
    fn set_foreground(&self, window: Self::Handle) -> bool;

    fn show(&self, window: Self::Handle, cmd: ShowCommand);
}

/// A desktop with no windows to find, for hosts without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDesktop;

impl DialogWindows for NoDesktop {
    type Handle = ();

    fn find(&self, _class: &str) -> Option<()> {
        None
    }

    fn set_foreground(&self, _window: ()) -> bool {
        false
    }

    fn show(&self, _window: (), _cmd: ShowCommand) {}
}

#[cfg(windows)]
pub type SystemDesktop = win32::Win32Desktop;
#[cfg(not(windows))]
pub type SystemDesktop = NoDesktop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Foreground activation succeeded on the first try.
    Focused,
    /// Activation was refused; the escalation sequence ran to the end.
    Escalated,
    /// Stopped before the sequence finished.
    Cancelled,
}

/// Handle on a running focus task. Dropping it aborts the task.
pub struct FocusGuard {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<FocusOutcome>>,
}

impl FocusGuard {
    /// Signal the task to stop and wait for it to wind down.
    pub async fn stop(mut self) -> FocusOutcome {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => task.await.unwrap_or(FocusOutcome::Cancelled),
            None => FocusOutcome::Cancelled,
        }
    }
}

impl Drop for FocusGuard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start raising the dialog window in the background.
pub fn spawn_focus<W: DialogWindows>(desktop: Arc<W>) -> FocusGuard {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        tokio::select! {
            outcome = focus_dialog(desktop.as_ref()) => outcome,
            _ = &mut stop_rx => {
                tracing::debug!("Focus task stopped");
                FocusOutcome::Cancelled
            }
        }
    });

    FocusGuard {
        stop_tx: Some(stop_tx),
        task: Some(task),
    }
}

async fn focus_dialog<W: DialogWindows>(desktop: &W) -> FocusOutcome {
    tracing::debug!(class = DIALOG_WINDOW_CLASS, "Searching for Windows Hello dialog");
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    let window = loop {
        interval.tick().await;
        if let Some(window) = desktop.find(DIALOG_WINDOW_CLASS) {
            break window;
        }
        tracing::trace!("Dialog not found yet");
    };
    tracing::debug!(?window, "Dialog window found");

    if desktop.set_foreground(window) {
        tracing::debug!("SetForegroundWindow succeeded");
        return FocusOutcome::Focused;
    }

    tracing::debug!("SetForegroundWindow refused, escalating");
    for (delay, cmd) in ESCALATION {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        tracing::trace!(?cmd, "ShowWindowAsync");
        desktop.show(window, cmd);
    }
    FocusOutcome::Escalated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Foreground,
        Show(ShowCommand),
    }

    struct FakeDesktop {
        appears_after: usize,
        foreground_ok: bool,
        finds: AtomicUsize,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeDesktop {
        fn new(appears_after: usize, foreground_ok: bool) -> Arc<Self> {
            Arc::new(Self {
                appears_after,
                foreground_ok,
                finds: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DialogWindows for FakeDesktop {
        type Handle = u32;

        fn find(&self, class: &str) -> Option<u32> {
            assert_eq!(class, DIALOG_WINDOW_CLASS);
            let n = self.finds.fetch_add(1, Ordering::SeqCst) + 1;
            (n > self.appears_after).then_some(0x1234)
        }

        fn set_foreground(&self, window: u32) -> bool {
            assert_eq!(window, 0x1234);
            self.calls.lock().unwrap().push(Call::Foreground);
            self.foreground_ok
        }

        fn show(&self, _window: u32, cmd: ShowCommand) {
            self.calls.lock().unwrap().push(Call::Show(cmd));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_focuses_once_window_appears() {
        let desktop = FakeDesktop::new(3, true);
        let guard = spawn_focus(Arc::clone(&desktop));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(guard.stop().await, FocusOutcome::Focused);
        assert_eq!(desktop.finds.load(Ordering::SeqCst), 4);
        assert_eq!(desktop.calls(), vec![Call::Foreground]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escalates_when_foreground_refused() {
        let desktop = FakeDesktop::new(0, false);
        let guard = spawn_focus(Arc::clone(&desktop));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(guard.stop().await, FocusOutcome::Escalated);
        assert_eq!(
            desktop.calls(),
            vec![
                Call::Foreground,
                Call::Show(ShowCommand::Minimize),
                Call::Show(ShowCommand::Restore),
                Call::Show(ShowCommand::ShowDefault),
                Call::Show(ShowCommand::Show),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_polling() {
        let desktop = FakeDesktop::new(usize::MAX, true);
        let guard = spawn_focus(Arc::clone(&desktop));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(guard.stop().await, FocusOutcome::Cancelled);
        let finds = desktop.finds.load(Ordering::SeqCst);
        assert_eq!(finds, 3);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(desktop.finds.load(Ordering::SeqCst), finds);
        assert!(desktop.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_escalation() {
        let desktop = FakeDesktop::new(0, false);
        let guard = spawn_focus(Arc::clone(&desktop));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(guard.stop().await, FocusOutcome::Cancelled);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            desktop.calls(),
            vec![
                Call::Foreground,
                Call::Show(ShowCommand::Minimize),
                Call::Show(ShowCommand::Restore),
            ]
        );
    }
}
