//! Default logging setup for the compact collections, annotating each line with the process
//! memory footprint.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

#[cfg(all(target_os = "linux", not(miri)))]
use std::cell::RefCell;
use std::{
    fmt,
    sync::{atomic::AtomicUsize, Mutex},
};

/// An amount of memory in bytes, displayed with a binary unit suffix.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemoryAmount(pub usize);

impl fmt::Debug for MemoryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

impl fmt::Display for MemoryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1000 {
            write!(f, "{:5}B", self.0)
        } else if self.0 < 1000 << 10 {
            write!(f, "{:5.1}K", self.0 as f64 / (1u64 << 10) as f64)
        } else if self.0 < 1000 << 20 {
            write!(f, "{:5.1}M", self.0 as f64 / (1u64 << 20) as f64)
        } else {
            write!(f, "{:5.1}G", self.0 as f64 / (1u64 << 30) as f64)
        }
    }
}

/// Resident memory of the current process.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryUsage {
    /// Currently resident memory.
    pub current: MemoryAmount,
    /// Peak resident memory since process start.
    pub peak: MemoryAmount,
}

#[cfg(all(target_os = "linux", not(miri)))]
struct StatmReader {
    file: std::fs::File,
    buf: Vec<u8>,
    pagesize: usize,
}

#[cfg(all(target_os = "linux", not(miri)))]
thread_local! {
    static STATM: RefCell<Option<StatmReader>> = const { RefCell::new(None) };
}

#[cfg(all(target_os = "linux", not(miri)))]
impl StatmReader {
    fn open() -> Option<Self> {
        Some(StatmReader {
            file: std::fs::File::open("/proc/self/statm").ok()?,
            buf: Vec::new(),
            // SAFETY: standard way to obtain page size
            pagesize: unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize },
        })
    }

    fn resident_bytes(&mut self) -> Option<usize> {
        use std::io::Seek;
        self.file.seek(std::io::SeekFrom::Start(0)).ok()?;
        self.buf.clear();
        std::io::copy(&mut self.file, &mut self.buf).ok()?;

        let rss_pages = std::str::from_utf8(&self.buf)
            .ok()?
            .split_ascii_whitespace()
            .nth(1)?
            .parse::<usize>()
            .ok()?;
        Some(rss_pages * self.pagesize)
    }
}

#[cfg(all(any(target_os = "linux", target_os = "macos"), not(miri)))]
fn max_rss_raw() -> usize {
    // SAFETY: rusage is plain old data so all zeros is valid
    let mut rusage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: getrusage is safe to call as long as it can safely write to the passed pointer
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut rusage) } < 0 {
        return 0;
    }
    rusage.ru_maxrss as usize
}

impl MemoryUsage {
    /// Samples the resident memory of the current process.
    ///
    /// Returns all zeros on platforms where this is not supported.
    pub fn sample() -> Self {
        #[cfg(all(target_os = "linux", not(miri)))]
        {
            let current = STATM.with_borrow_mut(|reader| {
                if reader.is_none() {
                    *reader = StatmReader::open();
                }
                reader
                    .as_mut()
                    .and_then(StatmReader::resident_bytes)
                    .unwrap_or(0)
            });
            MemoryUsage {
                current: MemoryAmount(current),
                // linux reports kilobytes
                peak: MemoryAmount(max_rss_raw() * 1024),
            }
        }
        #[cfg(all(target_os = "macos", not(miri)))]
        {
            // SAFETY: proc_taskallinfo is plain old data so all zeros is valid
            let mut info: libc::proc_taskallinfo = unsafe { std::mem::zeroed() };
            let info_size = std::mem::size_of::<libc::proc_taskallinfo>() as i32;

            // SAFETY: proc_pidinfo is safe to call as long as it can safely write to the passed
            // pointer and is given the correct storage size for the passed pointer
            let written = unsafe {
                libc::proc_pidinfo(
                    libc::getpid(),
                    libc::PROC_PIDTASKALLINFO,
                    0,
                    ((&mut info) as *mut libc::proc_taskallinfo).cast::<libc::c_void>(),
                    info_size,
                )
            };
            let current = if written < info_size {
                0
            } else {
                info.ptinfo.pti_resident_size as usize
            };
            MemoryUsage {
                current: MemoryAmount(current),
                // macos reports bytes
                peak: MemoryAmount(max_rss_raw()),
            }
        }
        #[cfg(any(miri, not(any(target_os = "linux", target_os = "macos"))))]
        {
            MemoryUsage::default()
        }
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (peak {})", self.current, self.peak)
    }
}

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const MEMORY_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue)));
const MEMORY_NEW_PEAK_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));
const MEMORY_PEAK_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

/// Installs the default logger, reading the filter from `COMPACT_LOG` (default `info`) and
/// the color choice from `COMPACT_LOG_STYLE`.
///
/// Every time the log target changes a header line with the target is emitted. Each line
/// starts with the elapsed time and the current and peak resident memory, the peak is
/// highlighted when it grew since the previous line.
///
/// Calling this again after a logger was installed has no effect, so tests can call it
/// unconditionally.
pub fn setup() {
    let start_time = std::time::Instant::now();
    let peak = AtomicUsize::new(MemoryUsage::sample().peak.0);

    let last_target = Mutex::new(String::new());

    let result = env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("COMPACT_LOG", "info")
            .write_style("COMPACT_LOG_STYLE"),
    )
    .format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();
        let target = record.target();

        let MemoryUsage { current, peak: max } = MemoryUsage::sample();

        let new_peak = peak.fetch_max(max.0, std::sync::atomic::Ordering::Relaxed) < max.0;
        let peak_style = if new_peak {
            MEMORY_NEW_PEAK_STYLE
        } else {
            MEMORY_PEAK_STYLE
        };

        let prefix = format!(
            "{} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!("{style}{current}{style:#}", style = MEMORY_STYLE),
            format_args!("{style}{max}{style:#}", style = peak_style),
        );

        let mut last_target = last_target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if target != *last_target {
            last_target.clear();
            last_target.push_str(target);

            writeln!(
                buf,
                "{prefix} {}",
                format_args!("{style}{target}{style:#}", style = TARGET_STYLE)
            )?;
        }
        writeln!(
            buf,
            "{prefix} {} {}",
            format_args!(
                "{style}{level}{style:#}",
                style = buf.default_level_style(level),
            ),
            record.args(),
        )
    })
    .try_init();

    if result.is_err() {
        log::trace!("logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_amount_units() {
        assert_eq!(MemoryAmount(512).to_string(), "  512B");
        assert_eq!(MemoryAmount(2048).to_string(), "  2.0K");
        assert_eq!(MemoryAmount(3 << 20).to_string(), "  3.0M");
        assert_eq!(MemoryAmount(5 << 30).to_string(), "  5.0G");
    }

    #[test]
    fn test_setup_twice() {
        setup();
        setup();
        log::info!("memory after setup: {}", MemoryUsage::sample());
    }
}
