use std::{
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

/// One input column of the regression models.
///
/// The eight far-infrared line luminosities are in `log10(Lsun)`. The redshift
/// column holds `log10(1 + z)` and is always the last feature, which the mock
/// generator relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum Feature {
    /// [O III] 52 µm.
    OIII52 = 0,
    /// [N III] 57 µm.
    NIII57 = 1,
    /// [O I] 63 µm.
    OI63 = 2,
    /// [O III] 88 µm.
    OIII88 = 3,
    /// [N II] 122 µm.
    NII122 = 4,
    /// [O I] 145 µm.
    OI145 = 5,
    /// [C II] 158 µm.
    CII158 = 6,
    /// [N II] 205 µm.
    NII205 = 7,
    /// `log10(1 + z)`.
    LogOnePlusZ = 8,
}

impl Feature {
    /// Number of model input columns (9).
    pub const LEN: usize = 9;

    /// All features in model column order.
    pub const ALL: [Self; Self::LEN] = [
        Self::OIII52,
        Self::NIII57,
        Self::OI63,
        Self::OIII88,
        Self::NII122,
        Self::OI145,
        Self::CII158,
        Self::NII205,
        Self::LogOnePlusZ,
    ];

    /// The eight emission-line features, without redshift.
    pub const LINES: [Self; 8] = [
        Self::OIII52,
        Self::NIII57,
        Self::OI63,
        Self::OIII88,
        Self::NII122,
        Self::OI145,
        Self::CII158,
        Self::NII205,
    ];

    /// Column index of this feature in a [`FeatureValues`] row.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_redshift(self) -> bool {
        matches!(self, Self::LogOnePlusZ)
    }

    /// Column name used in input and reference tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_model::Feature;
    ///
    /// assert_eq!(Feature::CII158.column_name(), "Lum_CII_158");
    /// assert_eq!(Feature::LogOnePlusZ.column_name(), "log(1+z)");
    /// ```
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::OIII52 => "Lum_OIII_52",
            Self::NIII57 => "Lum_NIII_57",
            Self::OI63 => "Lum_OI_63",
            Self::OIII88 => "Lum_OIII_88",
            Self::NII122 => "Lum_NII_122",
            Self::OI145 => "Lum_OI_145",
            Self::CII158 => "Lum_CII_158",
            Self::NII205 => "Lum_NII_205",
            Self::LogOnePlusZ => "log(1+z)",
        }
    }

    /// Looks up a feature by its column name (exact match).
    #[must_use]
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Converts a raw redshift into the `log10(1 + z)` model feature.
///
/// # Examples
///
/// ```
/// use diagism_model::feature::log_one_plus_z;
///
/// assert_eq!(log_one_plus_z(0.0), 0.0);
/// assert!((log_one_plus_z(0.47) - 0.1673).abs() < 1e-4);
/// ```
#[must_use]
pub fn log_one_plus_z(z: f64) -> f64 {
    (1.0 + z).log10()
}

/// One value per [`Feature`], in model column order.
///
/// Missing values are stored as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureValues([f64; Feature::LEN]);

impl Default for FeatureValues {
    fn default() -> Self {
        Self::missing()
    }
}

impl FeatureValues {
    /// A row where every feature is missing.
    #[must_use]
    pub const fn missing() -> Self {
        Self([f64::NAN; Feature::LEN])
    }

    #[must_use]
    pub const fn from_array(values: [f64; Feature::LEN]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> f64,
    {
        Self(std::array::from_fn(f))
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; Feature::LEN] {
        &self.0
    }

    #[must_use]
    pub const fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the value of `feature`, or `None` when it is missing.
    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<f64> {
        let value = self[feature];
        (!value.is_nan()).then_some(value)
    }

    #[must_use]
    pub fn is_observed(&self, feature: Feature) -> bool {
        self.get(feature).is_some()
    }

    /// Iterates over the observed emission-line features and their values.
    ///
    /// Redshift is never included.
    pub fn observed_lines(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::LINES
            .into_iter()
            .filter_map(|feature| self.get(feature).map(|value| (feature, value)))
    }
}

impl Index<Feature> for FeatureValues {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

impl IndexMut<Feature> for FeatureValues {
    fn index_mut(&mut self, feature: Feature) -> &mut f64 {
        &mut self.0[feature.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redshift_is_last_column() {
        assert_eq!(Feature::LogOnePlusZ.index(), Feature::LEN - 1);
        assert!(Feature::LINES.iter().all(|f| !f.is_redshift()));
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_column_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_column_name(feature.column_name()), Some(feature));
        }
        assert_eq!(Feature::from_column_name("Lum_CO_10"), None);
    }

    #[test]
    fn test_observed_lines_skip_missing_and_redshift() {
        let mut row = FeatureValues::missing();
        row[Feature::OIII88] = 6.0;
        row[Feature::CII158] = 6.5;
        row[Feature::LogOnePlusZ] = 0.3;

        let observed: Vec<_> = row.observed_lines().collect();
        assert_eq!(
            observed,
            vec![(Feature::OIII88, 6.0), (Feature::CII158, 6.5)]
        );
        assert!(row.is_observed(Feature::LogOnePlusZ));
        assert!(!row.is_observed(Feature::OI63));
    }
}
