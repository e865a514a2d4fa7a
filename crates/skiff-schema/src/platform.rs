/// Target operating system and CPU architecture of a bundle.
///
/// Platforms are only ever supplied by callers; nothing in this workspace
/// reads the host platform implicitly. [`Platform::current`] is offered for
/// the caller that wants the host as its default target.
///
/// # Example
///
/// ```
/// use skiff_schema::Platform;
///
/// let p: Platform = "linux-x86_64".parse().unwrap();
/// assert_eq!(p, Platform::LinuxX86_64);
/// assert!(!p.is_windows());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    LinuxAarch64,
    LinuxArmv7l,
    LinuxPowerpc64le,
    LinuxS390x,
    LinuxX86_64,
    MacosAarch64,
    MacosX86_64,
    WindowsAarch64,
    WindowsX86_64,
}

impl Platform {
    pub const ALL: [Platform; 9] = [
        Self::LinuxAarch64,
        Self::LinuxArmv7l,
        Self::LinuxPowerpc64le,
        Self::LinuxS390x,
        Self::LinuxX86_64,
        Self::MacosAarch64,
        Self::MacosX86_64,
        Self::WindowsAarch64,
        Self::WindowsX86_64,
    ];

    /// The platform this binary was compiled for, if it is a supported target.
    pub fn current() -> Option<Self> {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        Self::ALL.into_iter().find(|p| p.os() == os && p.rust_arch() == arch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinuxAarch64 => "linux-aarch64",
            Self::LinuxArmv7l => "linux-armv7l",
            Self::LinuxPowerpc64le => "linux-powerpc64le",
            Self::LinuxS390x => "linux-s390x",
            Self::LinuxX86_64 => "linux-x86_64",
            Self::MacosAarch64 => "macos-aarch64",
            Self::MacosX86_64 => "macos-x86_64",
            Self::WindowsAarch64 => "windows-aarch64",
            Self::WindowsX86_64 => "windows-x86_64",
        }
    }

    /// Operating system name as reported by `std::env::consts::OS`.
    pub fn os(&self) -> &'static str {
        match self {
            Self::LinuxAarch64
            | Self::LinuxArmv7l
            | Self::LinuxPowerpc64le
            | Self::LinuxS390x
            | Self::LinuxX86_64 => "linux",
            Self::MacosAarch64 | Self::MacosX86_64 => "macos",
            Self::WindowsAarch64 | Self::WindowsX86_64 => "windows",
        }
    }

    /// Architecture name as reported by `std::env::consts::ARCH`.
    pub fn rust_arch(&self) -> &'static str {
        match self {
            Self::LinuxAarch64 | Self::MacosAarch64 | Self::WindowsAarch64 => "aarch64",
            Self::LinuxArmv7l => "arm",
            Self::LinuxPowerpc64le => "powerpc64",
            Self::LinuxS390x => "s390x",
            Self::LinuxX86_64 | Self::MacosX86_64 | Self::WindowsX86_64 => "x86_64",
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os() == "windows"
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for Platform {
    type Error = crate::SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Platform {
    type Err = crate::SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| crate::SchemaError::UnknownPlatform(s.to_owned()))
    }
}
