use std::process::Command;

use crate::protocol::Limits;

/// Caps CPU time and address space of the child spawned by `cmd`.
///
/// CPU time is rounded up to whole seconds, the granularity of
/// `RLIMIT_CPU`. A wall-clock timeout still has to be enforced by the
/// caller since a blocked process consumes no CPU.
#[cfg(unix)]
#[allow(unsafe_code)]
pub fn apply_limits(cmd: &mut Command, limits: &Limits) {
    use std::io;
    use std::os::unix::process::CommandExt;

    let cpu_secs = limits.cpu_ms.map(|ms| ms.div_ceil(1000) as libc::rlim_t);
    let mem_bytes = limits
        .mem_mb
        .map(|mb| mb.saturating_mul(1024 * 1024) as libc::rlim_t);
    if cpu_secs.is_none() && mem_bytes.is_none() {
        return;
    }
    // Safety: the closure runs in the forked child before `exec`. It only
    // reads values copied into it and calls `setrlimit`, which is
    // async-signal-safe.
    unsafe {
        cmd.pre_exec(move || {
            if let Some(secs) = cpu_secs {
                let lim = libc::rlimit {
                    rlim_cur: secs,
                    rlim_max: secs,
                };
                if libc::setrlimit(libc::RLIMIT_CPU, &lim) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            if let Some(bytes) = mem_bytes {
                let lim = libc::rlimit {
                    rlim_cur: bytes,
                    rlim_max: bytes,
                };
                if libc::setrlimit(libc::RLIMIT_AS, &lim) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            Ok(())
        });
    }
}

#[cfg(not(unix))]
pub fn apply_limits(_cmd: &mut Command, _limits: &Limits) {}
