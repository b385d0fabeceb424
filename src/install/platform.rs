//! Host platform detection

use std::fmt;

use crate::install::error::InstallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::MacOs => "macos",
            Os::Windows => "windows",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
    Arm,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Arm => "arm",
        }
    }
}

/// Operating system and CPU architecture a tool is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detects the platform this process runs on
    pub fn current() -> Result<Self, InstallError> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps `std::env::consts` style names to a platform
    pub fn from_parts(os: &str, arch: &str) -> Result<Self, InstallError> {
        let unsupported = || InstallError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };

        let os = match os {
            "linux" => Os::Linux,
            "macos" | "darwin" => Os::MacOs,
            "windows" => Os::Windows,
            _ => return Err(unsupported()),
        };
        let arch = match arch {
            "x86_64" | "amd64" => Arch::X86_64,
            "aarch64" | "arm64" => Arch::Aarch64,
            "arm" | "armv7" => Arch::Arm,
            _ => return Err(unsupported()),
        };

        Ok(Self { os, arch })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
