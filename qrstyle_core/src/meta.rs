/// Version of a QR code, which determines its size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8"))]
pub struct Version(u8);

impl Version {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(40);

    /// Construct a new version given its number. Valid version numbers are in the range 1..=40.
    /// # Example
    /// ```
    /// use qrstyle_core::Version;
    /// assert!(Version::new(1).is_some());
    /// assert!(Version::new(0).is_none());
    /// assert!(Version::new(50).is_none());
    /// ```
    pub const fn new(number: u8) -> Option<Self> {
        match number {
            1..=40 => Some(Self(number)),
            _ => None,
        }
    }

    /// Get the version number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Width of the symbol in modules, without any quiet zone.
    /// # Example
    /// ```
    /// use qrstyle_core::Version;
    /// assert_eq!(Version::new(1).unwrap().width(), 21);
    /// assert_eq!(Version::new(4).unwrap().width(), 33);
    /// ```
    pub fn width(self) -> usize {
        17 + self.0 as usize * 4
    }

    /// Get the next higher version, if it exists.
    /// # Example
    /// ```
    /// use qrstyle_core::Version;
    /// assert_eq!(Version::new(10).unwrap().incr(), Version::new(11));
    /// assert_eq!(Version::MAX.incr(), None);
    /// ```
    pub fn incr(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Get the next lower version, if it exists.
    pub fn decr(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        value.number()
    }
}

impl TryFrom<u8> for Version {
    type Error = VersionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(VersionError::OutOfRange(value))
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let number: u8 = s
            .parse()
            .map_err(|_| VersionError::NotANumber(s.to_owned()))?;
        Self::try_from(number)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("invalid version {0}, expected a number in 1..=40")]
    OutOfRange(u8),
    #[error("invalid version '{0}', expected a number in 1..=40")]
    NotANumber(String),
}

/// Error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum Ecl {
    /// Low: 7% recovery rate.
    L,
    /// Medium: 15% recovery rate.
    M,
    /// Quartile: 25% recovery rate.
    Q,
    /// High: 30% recovery rate.
    H,
}

impl Ecl {
    /// Get the next higher ECL, if it exists.
    /// # Example
    /// ```
    /// use qrstyle_core::Ecl;
    /// assert_eq!(Ecl::L.incr(), Some(Ecl::M));
    /// assert_eq!(Ecl::H.incr(), None)
    /// ```
    pub fn incr(self) -> Option<Self> {
        match self {
            Self::L => Some(Self::M),
            Self::M => Some(Self::Q),
            Self::Q => Some(Self::H),
            Self::H => None,
        }
    }

    /// Get the next lower ECL, if it exists.
    /// # Example
    /// ```
    /// use qrstyle_core::Ecl;
    /// assert_eq!(Ecl::M.decr(), Some(Ecl::L));
    /// assert_eq!(Ecl::L.decr(), None)
    /// ```
    pub fn decr(self) -> Option<Self> {
        match self {
            Self::L => None,
            Self::M => Some(Self::L),
            Self::Q => Some(Self::M),
            Self::H => Some(Self::Q),
        }
    }

    /// Approximate share of the symbol, in percent, that can be obscured while keeping it decodable.
    pub fn recovery_percent(self) -> u8 {
        match self {
            Self::L => 7,
            Self::M => 15,
            Self::Q => 25,
            Self::H => 30,
        }
    }
}

impl std::fmt::Display for Ecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
