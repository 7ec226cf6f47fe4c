//! Locker quota reporting.

use serde::Serialize;

/// What the metric prefixes mean when rendering sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuotaUnits {
    /// 1 MB = 1000 KB
    Decimal,
    /// 1 MB = 1024 KB
    Binary,
}

impl QuotaUnits {
    pub const fn factor(self) -> u64 {
        match self {
            Self::Decimal => 1000,
            Self::Binary => 1024,
        }
    }
}

/// Usage and limit of a locker, both in KB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockerQuota {
    pub usage: u64,
    /// `0` means unlimited.
    pub maximum: u64,
    pub units: QuotaUnits,
}

impl LockerQuota {
    pub const fn new(usage: u64, maximum: u64, units: QuotaUnits) -> Self {
        Self {
            usage,
            maximum,
            units,
        }
    }

    /// Whole percent of the quota in use; unlimited quotas report 0.
    pub fn percentage(&self) -> u64 {
        if self.maximum == 0 {
            return 0;
        }
        let pct = u128::from(self.usage) * 100 / u128::from(self.maximum);
        u64::try_from(pct).unwrap_or(u64::MAX)
    }

    /// Render a KB amount with the largest fitting suffix, e.g. `1.5 MB`.
    pub fn format_size(&self, kb: u64) -> String {
        const SUFFIXES: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];
        #[allow(clippy::cast_precision_loss)]
        let mut value = kb as f64;
        #[allow(clippy::cast_precision_loss)]
        let factor = self.units.factor() as f64;
        let mut suffix = SUFFIXES[0];
        for &next in &SUFFIXES[1..] {
            if value < factor {
                break;
            }
            value /= factor;
            suffix = next;
        }
        format!("{value:.1} {suffix}")
    }
}

impl std::fmt::Display for LockerQuota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.maximum == 0 {
            return write!(f, "{} used (no limit)", self.format_size(self.usage));
        }
        write!(
            f,
            "{} of {} used ({}%)",
            self.format_size(self.usage),
            self.format_size(self.maximum),
            self.percentage()
        )
    }
}
