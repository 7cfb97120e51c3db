use std::str::FromStr;

use crate::error::InstallError;

use super::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Os {
    Mac,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arch {
    Arm64,
    Amd64,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Mac => "mac",
            Os::Linux => "linux",
        }
    }

    /// Maps a host or formula OS name onto a supported OS.
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mac" | "macos" | "darwin" | "osx" => Some(Os::Mac),
            "linux" => Some(Os::Linux),
            _ => None,
        }
    }
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::Amd64 => "amd64",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" => Some(Arch::Arm64),
            "amd64" | "x86_64" | "x64" => Some(Arch::Amd64),
            _ => None,
        }
    }
}

/// One of the supported (os, arch) pairs an artifact can be published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlatformKey {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformKey {
    pub const ALL: [PlatformKey; 4] = [
        PlatformKey::new(Os::Mac, Arch::Arm64),
        PlatformKey::new(Os::Mac, Arch::Amd64),
        PlatformKey::new(Os::Linux, Arch::Arm64),
        PlatformKey::new(Os::Linux, Arch::Amd64),
    ];

    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Narrows a detected host platform to a supported key.
    pub fn from_platform(platform: &Platform) -> Result<Self, InstallError> {
        match (Os::parse(&platform.os), Arch::parse(&platform.arch)) {
            (Some(os), Some(arch)) => Ok(Self::new(os, arch)),
            _ => Err(InstallError::UnsupportedPlatform {
                os: platform.os.clone(),
                arch: platform.arch.clone(),
            }),
        }
    }
}

impl std::fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = anyhow::Error;

    /// Parses the `<os>-<arch>` form used as formula artifact keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, arch) = s
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid platform '{}', expected <os>-<arch>", s))?;

        let os = Os::parse(os).ok_or_else(|| anyhow::anyhow!("Unknown OS '{}' in '{}'", os, s))?;
        let arch = Arch::parse(arch)
            .ok_or_else(|| anyhow::anyhow!("Unknown architecture '{}' in '{}'", arch, s))?;

        Ok(Self::new(os, arch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_platform_host_spellings() {
        let cases = [
            ("macos", "aarch64", PlatformKey::new(Os::Mac, Arch::Arm64)),
            ("macos", "x86_64", PlatformKey::new(Os::Mac, Arch::Amd64)),
            ("linux", "aarch64", PlatformKey::new(Os::Linux, Arch::Arm64)),
            ("linux", "x86_64", PlatformKey::new(Os::Linux, Arch::Amd64)),
        ];

        for (os, arch, expected) in cases {
            let key = PlatformKey::from_platform(&Platform::new(os, arch)).unwrap();
            assert_eq!(key, expected, "{}/{}", os, arch);
        }
    }

    #[test]
    fn test_from_platform_unsupported() {
        for (os, arch) in [
            ("windows", "x86_64"),
            ("linux", "x86"),
            ("freebsd", "aarch64"),
            ("linux", "riscv64"),
        ] {
            let err = PlatformKey::from_platform(&Platform::new(os, arch)).unwrap_err();
            assert_eq!(
                err,
                InstallError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_display_and_parse() {
        for key in PlatformKey::ALL {
            let text = key.to_string();
            assert_eq!(text.parse::<PlatformKey>().unwrap(), key);
        }
        assert_eq!(
            PlatformKey::new(Os::Mac, Arch::Arm64).to_string(),
            "mac-arm64"
        );
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "macos-aarch64".parse::<PlatformKey>().unwrap(),
            PlatformKey::new(Os::Mac, Arch::Arm64)
        );
        assert_eq!(
            "linux-x86_64".parse::<PlatformKey>().unwrap(),
            PlatformKey::new(Os::Linux, Arch::Amd64)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!("linux".parse::<PlatformKey>().is_err());
        assert!("windows-amd64".parse::<PlatformKey>().is_err());
        assert!("linux-mips".parse::<PlatformKey>().is_err());
        assert!("".parse::<PlatformKey>().is_err());
    }

    #[test]
    fn test_all_keys_distinct() {
        let mut keys = PlatformKey::ALL.to_vec();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }
}
