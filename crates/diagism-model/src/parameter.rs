use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A physical ISM parameter that a trained pipeline can predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum PhysicalParameter {
    /// Star formation rate.
    Sfr,
    /// Interstellar radiation field.
    Isrf,
    /// Gas-phase metallicity.
    Metallicity,
    /// Thermal pressure.
    Pressure,
    /// Neutral cloud density.
    Density,
    /// Neutral cloud size.
    NeutralCloudSize,
    /// Gas mass.
    GasMass,
    /// Stellar mass.
    StellarMass,
}

impl PhysicalParameter {
    pub const ALL: [Self; 8] = [
        Self::Sfr,
        Self::Isrf,
        Self::Metallicity,
        Self::Pressure,
        Self::Density,
        Self::NeutralCloudSize,
        Self::GasMass,
        Self::StellarMass,
    ];

    /// Human-readable name, as written in result headers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sfr => "SFR",
            Self::Isrf => "ISRF",
            Self::Metallicity => "Metallicity",
            Self::Pressure => "Pressure",
            Self::Density => "Density",
            Self::NeutralCloudSize => "Neutral cloud size",
            Self::GasMass => "Gas Mass",
            Self::StellarMass => "Stellar Mass",
        }
    }

    /// Column holding this parameter in the reference dataset and the
    /// hyperparameter table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Sfr => "SFR",
            Self::Isrf => "ISRF",
            Self::Metallicity => "ZGal",
            Self::Pressure => "Pressure",
            Self::Density => "nH_cloud",
            Self::NeutralCloudSize => "R_cloud",
            Self::GasMass => "M_gas",
            Self::StellarMass => "M_star",
        }
    }

    /// `LaTeX` column labels used by tables exported from the simulation pipeline.
    const fn latex_column(self) -> Option<&'static str> {
        match self {
            Self::Density => Some(r"n$(\mathrm{H})_{\mathrm{cloud}}$"),
            Self::NeutralCloudSize => Some(r"R$_{\mathrm{cloud}}$"),
            Self::GasMass => Some(r"M$_{\mathrm{gas}}$"),
            Self::StellarMass => Some(r"M$_{\mathrm{\ast}}$"),
            Self::Sfr | Self::Isrf | Self::Metallicity | Self::Pressure => None,
        }
    }

    /// Whether a table column refers to this parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_model::PhysicalParameter;
    ///
    /// assert!(PhysicalParameter::Metallicity.matches_column("ZGal"));
    /// assert!(PhysicalParameter::GasMass.matches_column(r"M$_{\mathrm{gas}}$"));
    /// assert!(!PhysicalParameter::GasMass.matches_column("M_star"));
    /// ```
    #[must_use]
    pub fn matches_column(self, column: &str) -> bool {
        let column = column.trim();
        column == self.column() || self.latex_column() == Some(column)
    }

    /// Physical unit of predictions.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Sfr => "Msun/yr",
            Self::Isrf => "Habing",
            Self::Metallicity => "Z/Zsun",
            Self::Pressure => "K/cm^3",
            Self::Density => "cm^-3",
            Self::NeutralCloudSize => "pc",
            Self::GasMass | Self::StellarMass => "Msun",
        }
    }
}

impl fmt::Display for PhysicalParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown physical parameter '{name}'")]
pub struct ParseParameterError {
    #[error(not(source))]
    pub name: String,
}

/// Parses a parameter from its name or its column, ignoring case, spaces,
/// hyphens and underscores (`"gas-mass"`, `"Gas Mass"` and `"M_gas"` all work).
impl FromStr for PhysicalParameter {
    type Err = ParseParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn normalize(s: &str) -> String {
            s.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect()
        }
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|p| normalize(p.name()) == wanted || normalize(p.column()) == wanted)
            .ok_or_else(|| ParseParameterError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name_and_column() {
        assert_eq!("SFR".parse::<PhysicalParameter>().unwrap(), PhysicalParameter::Sfr);
        assert_eq!(
            "neutral-cloud-size".parse::<PhysicalParameter>().unwrap(),
            PhysicalParameter::NeutralCloudSize
        );
        assert_eq!(
            "Stellar Mass".parse::<PhysicalParameter>().unwrap(),
            PhysicalParameter::StellarMass
        );
        assert_eq!(
            "zgal".parse::<PhysicalParameter>().unwrap(),
            PhysicalParameter::Metallicity
        );
    }

    #[test]
    fn test_parse_unknown_parameter() {
        let err = "temperature".parse::<PhysicalParameter>().unwrap_err();
        assert_eq!(err.to_string(), "unknown physical parameter 'temperature'");
    }

    #[test]
    fn test_names_and_columns_are_unique() {
        for (i, a) in PhysicalParameter::ALL.iter().enumerate() {
            for b in &PhysicalParameter::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
                assert_ne!(a.column(), b.column());
            }
        }
    }
}
