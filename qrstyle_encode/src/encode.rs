use std::ops::{Bound, RangeBounds, RangeInclusive};

use qrcode::bits::Bits;
use qrcode::types::QrError;
use tracing::debug;

use qrstyle_core::{Ecl, Module, ModuleGrid, QrCode, Version};

/// Encoder for a QR code. The symbol itself is produced by the [qrcode] crate; the encoder only resolves which
/// [Version] and [Ecl] to ask for.
#[derive(Debug, Clone)]
pub struct Encoder {
    constraints: Constraints,
}

impl Encoder {
    /// Construct a new, unconstrained encoder.
    pub fn new() -> Self {
        Self {
            constraints: Default::default(),
        }
    }

    /// Encode `data`.
    /// # Example
    /// ```
    /// use qrstyle_core::{Ecl, Version};
    /// use qrstyle_encode::Encoder;
    /// let code = Encoder::new()
    ///     .with_version_in(Version::new(4).unwrap()..)
    ///     .with_ecl(Ecl::H)
    ///     .encode("https://example.com/")
    ///     .unwrap();
    /// assert_eq!(code.version().number(), 4);
    /// assert_eq!(code.grid().size(), 33);
    /// ```
    pub fn encode<T: AsRef<[u8]>>(&self, data: T) -> Result<QrCode, EncodingError> {
        let data = data.as_ref();
        let (version, ecl) = self.resolve_constraints(data)?;
        debug!(%version, %ecl, len = data.len(), "resolved encoding parameters");
        let code = qrcode::QrCode::with_version(data, qr_version(version), qr_ecl(ecl))
            .map_err(EncodingError::Rejected)?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| Module::from(color == qrcode::Color::Dark));
        let grid = ModuleGrid::from_row_major(width, modules)
            .unwrap_or_else(|| unreachable!("qrcode yields exactly width * width modules"));
        QrCode::new(grid, version, ecl)
            .ok_or_else(|| unreachable!("qrcode yields a symbol of the requested version"))
    }

    /// Transform a range of any type to an inclusive range, given the absolute minimum and maximum values as well as
    /// functions to increment and decrement values.
    fn any_range_to_inclusive<T, R, I, D>(
        range: R,
        abs_min: T,
        abs_max: T,
        incr: I,
        decr: D,
    ) -> RangeInclusive<T>
    where
        T: Clone + Copy,
        R: RangeBounds<T>,
        I: FnOnce(T) -> Option<T>,
        D: FnOnce(T) -> Option<T>,
    {
        let min = match range.start_bound() {
            Bound::Included(&min) => min,
            Bound::Excluded(&min) => incr(min).unwrap_or(abs_max),
            Bound::Unbounded => abs_min,
        };
        let max = match range.end_bound() {
            Bound::Included(&max) => max,
            Bound::Excluded(&max) => decr(max).unwrap_or(abs_min),
            Bound::Unbounded => abs_max,
        };
        min..=max
    }

    /// Get the range of allowed [Version]s.
    pub fn allowed_versions(&self) -> &RangeInclusive<Version> {
        &self.constraints.version
    }

    /// Constrain to the specified `version`.
    pub fn with_version(mut self, version: Version) -> Self {
        self.constraints.version = version..=version;
        self
    }

    /// Constrain [Version] to be inside `range`.
    pub fn with_version_in<T: RangeBounds<Version>>(mut self, range: T) -> Self {
        self.constraints.version = Self::any_range_to_inclusive(
            range,
            Version::MIN,
            Version::MAX,
            Version::incr,
            Version::decr,
        );
        self
    }

    /// Get the range of allowed [Ecl]s.
    pub fn allowed_ecls(&self) -> &RangeInclusive<Ecl> {
        &self.constraints.ecl
    }

    /// Constrain to the specified `ecl`.
    pub fn with_ecl(mut self, ecl: Ecl) -> Self {
        self.constraints.ecl = ecl..=ecl;
        self
    }

    /// Constrain [Ecl] to be inside `range`.
    pub fn with_ecl_in<T: RangeBounds<Ecl>>(mut self, range: T) -> Self {
        self.constraints.ecl =
            Self::any_range_to_inclusive(range, Ecl::L, Ecl::H, Ecl::incr, Ecl::decr);
        self
    }

    /// Resolve the constraints and decide the [Version] and [Ecl].
    fn resolve_constraints(&self, data: &[u8]) -> Result<(Version, Ecl), EncodingError> {
        let (vmin, vmax) = (
            *self.constraints.version.start(),
            *self.constraints.version.end(),
        );
        let (emin, emax) = (*self.constraints.ecl.start(), *self.constraints.ecl.end());
        // Binary search the most conservative version to encode the data, which fits more data the higher it is.
        let (mut lo, mut hi) = (vmin.number(), vmax.number());
        let mut version = None;
        while lo <= hi {
            let mid = Version::new((lo + hi) / 2)
                .unwrap_or_else(|| unreachable!("midpoint of two versions is a version"));
            if fits(data, mid, emin)? {
                version = Some(mid);
                hi = mid.number() - 1;
            } else {
                lo = mid.number() + 1;
            }
        }
        let Some(version) = version else {
            return Err(EncodingError::DataTooBig(data.len(), vmax, emin));
        };
        // Version has been chosen, choose the highest possible ECL.
        let mut ecl = emax;
        while ecl > emin && !fits(data, version, ecl)? {
            let Some(lower) = ecl.decr() else {
                break;
            };
            ecl = lower;
        }
        Ok((version, ecl))
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct Constraints {
    ecl: RangeInclusive<Ecl>,
    version: RangeInclusive<Version>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            ecl: Ecl::L..=Ecl::H,
            version: Version::MIN..=Version::MAX,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("cannot encode {0} B of data with best case version {1} and ECL {2} according to the constraints")]
    DataTooBig(usize, Version, Ecl),
    #[error("the encoder rejected the data")]
    Rejected(#[source] QrError),
}

/// Check whether `data` fits a symbol of `version` at level `ecl` without building the symbol.
fn fits(data: &[u8], version: Version, ecl: Ecl) -> Result<bool, EncodingError> {
    let mut bits = Bits::new(qr_version(version));
    let pushed = bits
        .push_optimal_data(data)
        .and_then(|()| bits.push_terminator(qr_ecl(ecl)));
    match pushed {
        Ok(()) => Ok(true),
        Err(QrError::DataTooLong) => Ok(false),
        Err(err) => Err(EncodingError::Rejected(err)),
    }
}

fn qr_version(version: Version) -> qrcode::Version {
    qrcode::Version::Normal(version.number() as i16)
}

fn qr_ecl(ecl: Ecl) -> qrcode::EcLevel {
    match ecl {
        Ecl::L => qrcode::EcLevel::L,
        Ecl::M => qrcode::EcLevel::M,
        Ecl::Q => qrcode::EcLevel::Q,
        Ecl::H => qrcode::EcLevel::H,
    }
}
