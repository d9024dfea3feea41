//! Platform confinement for facts.
//!
//! A `Confinement` is checked against `HostInfo` before a fact builds or runs
//! anything. It lives apart from the probes so their parse logic can be
//! exercised on any platform.

/// Kernel name of the platform the Munki facts target.
pub const DARWIN: &str = "Darwin";

/// Attributes of the host a fact is being resolved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub kernel: String,
}

impl HostInfo {
    pub fn new(kernel: impl Into<String>) -> Self {
        Self {
            kernel: kernel.into(),
        }
    }

    /// Host info for the platform this binary was built for.
    pub fn current() -> Self {
        Self::new(kernel_for_os(std::env::consts::OS))
    }
}

/// Map a Rust target OS name to the kernel name `uname -s` reports.
pub fn kernel_for_os(os: &str) -> &str {
    match os {
        "macos" => DARWIN,
        "linux" | "android" => "Linux",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        "dragonfly" => "DragonFly",
        "solaris" | "illumos" => "SunOS",
        other => other,
    }
}

/// Predicate deciding whether a fact applies to a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confinement {
    /// Applies everywhere.
    None,
    /// Applies only when the host kernel matches, ignoring ASCII case.
    Kernel(&'static str),
}

impl Confinement {
    pub fn kernel(name: &'static str) -> Self {
        Self::Kernel(name)
    }

    pub fn allows(&self, host: &HostInfo) -> bool {
        match self {
            Self::None => true,
            Self::Kernel(name) => host.kernel.eq_ignore_ascii_case(name),
        }
    }
}
