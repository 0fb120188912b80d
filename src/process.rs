//! Local process identity and liveness probing.

use chrono::{DateTime, Utc};

/// Name of this machine as recorded in markers, or "unknown".
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Whether a process with `pid` is running on this machine.
///
/// Returns `None` when the platform offers no probe; callers then fall back
/// to an age-based judgement.
#[cfg(unix)]
pub fn is_process_alive(pid: u32) -> Option<bool> {
    // kill(0, 0) targets our own process group and negative values target
    // other groups, neither of which identifies a single holder.
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return Some(false);
    };
    if pid <= 0 {
        return Some(false);
    }

    // SAFETY: signal 0 delivers nothing; kill() only performs the existence
    // and permission checks. `pid` is > 0, so it names a single process.
    let rc = unsafe { libc::kill(pid, 0) };
    if rc == 0 {
        return Some(true);
    }

    // EPERM: the process exists but belongs to another user.
    Some(std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM))
}

#[cfg(not(unix))]
pub fn is_process_alive(_pid: u32) -> Option<bool> {
    None
}

/// When the process currently running as `pid` was started.
///
/// Reads `starttime` from `/proc/<pid>/stat` (clock ticks after boot) and
/// `btime` from `/proc/stat`. `btime` is truncated to whole seconds, so the
/// result may be up to a second early. Returns `None` when unavailable.
#[cfg(target_os = "linux")]
pub fn process_started_at(pid: u32) -> Option<DateTime<Utc>> {
    let stat = std::fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    let start_ticks = parse_start_ticks(&stat)?;

    let boot = std::fs::read_to_string("/proc/stat").ok()?;
    let boot_secs = boot
        .lines()
        .find_map(|line| line.strip_prefix("btime "))
        .and_then(|v| v.trim().parse::<i64>().ok())?;

    // SAFETY: sysconf has no preconditions and only reads a configuration value.
    let ticks_per_sec = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks_per_sec <= 0 {
        return None;
    }
    let ticks_per_sec = ticks_per_sec as u64;

    let secs = i64::try_from(start_ticks / ticks_per_sec).ok()?;
    let millis = ((start_ticks % ticks_per_sec) * 1000 / ticks_per_sec) as i64;

    DateTime::<Utc>::from_timestamp(boot_secs.checked_add(secs)?, 0)
        .map(|at| at + chrono::Duration::milliseconds(millis))
}

#[cfg(not(target_os = "linux"))]
pub fn process_started_at(_pid: u32) -> Option<DateTime<Utc>> {
    None
}

/// Field 22 (`starttime`) of a `/proc/<pid>/stat` line.
///
/// The command name (field 2) is parenthesised and may contain spaces or
/// parentheses, so fields are counted from the last `)`.
#[cfg(target_os = "linux")]
fn parse_start_ticks(stat: &str) -> Option<u64> {
    let after_comm = &stat[stat.rfind(')')? + 1..];
    // after_comm starts at field 3 (state); starttime is 19 fields later.
    after_comm.split_whitespace().nth(19)?.parse().ok()
}
