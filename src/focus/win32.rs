use super::{DialogWindows, ShowCommand};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, SW_RESTORE, SW_SHOW, SW_SHOWDEFAULT, SW_SHOWMINIMIZED, SetForegroundWindow,
    ShowWindowAsync,
};
use windows::core::PCWSTR;

/// Raw `HWND` value. `HWND` wraps a pointer and is not `Send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(isize);

impl WindowHandle {
    fn hwnd(self) -> HWND {
        HWND(self.0 as *mut core::ffi::c_void)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Desktop;

impl DialogWindows for Win32Desktop {
    type Handle = WindowHandle;

    fn find(&self, class: &str) -> Option<WindowHandle> {
        let class: Vec<u16> = class.encode_utf16().chain(std::iter::once(0)).collect();
        let hwnd = unsafe { FindWindowW(PCWSTR(class.as_ptr()), PCWSTR::null()) }.ok()?;
        (!hwnd.is_invalid()).then(|| WindowHandle(hwnd.0 as isize))
    }

    fn set_foreground(&self, window: WindowHandle) -> bool {
        unsafe { SetForegroundWindow(window.hwnd()) }.as_bool()
    }

    fn show(&self, window: WindowHandle, cmd: ShowCommand) {
        let cmd = match cmd {
            ShowCommand::Minimize => SW_SHOWMINIMIZED,
            ShowCommand::Restore => SW_RESTORE,
            ShowCommand::ShowDefault => SW_SHOWDEFAULT,
            ShowCommand::Show => SW_SHOW,
        };
        // Only reports whether the window was previously visible.
        let _ = unsafe { ShowWindowAsync(window.hwnd(), cmd) };
    }
}
