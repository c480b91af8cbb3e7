use indicatif::ProgressBar;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);
static VERBOSE_MODE: AtomicBool = AtomicBool::new(false);

thread_local! {
    /// Progress bar currently drawn by the batch driver on this thread, if
    /// any. Lines are printed through it so they do not tear the bar.
    static ACTIVE_PROGRESS: RefCell<Option<ProgressBar>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Configure both switches at once. Quiet wins over verbose.
pub fn init(quiet: bool, verbose: bool) {
    set_quiet_mode(quiet);
    set_verbose_mode(verbose && !quiet);
}

pub fn set_quiet_mode(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose_mode(verbose: bool) {
    VERBOSE_MODE.store(verbose, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

pub fn is_verbose() -> bool {
    VERBOSE_MODE.load(Ordering::Relaxed)
}

pub fn attach_progress(bar: &ProgressBar) {
    ACTIVE_PROGRESS.with(|slot| *slot.borrow_mut() = Some(bar.clone()));
}

pub fn detach_progress() {
    ACTIVE_PROGRESS.with(|slot| *slot.borrow_mut() = None);
}

pub fn has_active_progress() -> bool {
    ACTIVE_PROGRESS.with(|slot| slot.borrow().is_some())
}

#[doc(hidden)]
pub fn emit(stream: Stream, line: String) {
    let bar = ACTIVE_PROGRESS.with(|slot| slot.borrow().clone());
    let print = || match stream {
        Stream::Stdout => println!("{}", line),
        Stream::Stderr => eprintln!("{}", line),
    };
    match bar {
        Some(bar) => bar.suspend(print),
        None => print(),
    }
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if !$crate::logger::is_quiet() {
            $crate::logger::emit($crate::logger::Stream::Stdout, format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::is_verbose() && !$crate::logger::is_quiet() {
            $crate::logger::emit(
                $crate::logger::Stream::Stdout,
                format!("🔍 {}", format!($($arg)*)),
            );
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::emit(
            $crate::logger::Stream::Stderr,
            format!("❌ {}", format!($($arg)*)),
        );
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if !$crate::logger::is_quiet() {
            $crate::logger::emit(
                $crate::logger::Stream::Stderr,
                format!("⚠️  {}", format!($($arg)*)),
            );
        }
    };
}
