use std::{fmt, str::FromStr};

use fp::prime::{PrimeError, ValidPrime};
use serde::{Deserialize, Serialize};

/// The number of unknowns in each of the families `A` and `B` when none is specified.
pub const DEFAULT_UNKNOWNS: usize = 50;

/// The base field of the coefficient ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldSpec {
    Rationals,
    Prime(ValidPrime),
}

impl FieldSpec {
    pub fn characteristic(self) -> u32 {
        match self {
            Self::Rationals => 0,
            Self::Prime(p) => p.as_u32(),
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rationals => write!(f, "QQ"),
            Self::Prime(p) => write!(f, "GF({p})"),
        }
    }
}

impl FromStr for FieldSpec {
    type Err = ConfigError;

    /// Accepts `QQ`, `Q`, `GF(p)` or a bare prime `p`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "QQ" | "Q" => Ok(Self::Rationals),
            _ => {
                let p = s
                    .strip_prefix("GF(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .unwrap_or(s);
                if p.is_empty() || !p.trim().bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ConfigError::UnknownField(s.to_string()));
                }
                Ok(Self::Prime(p.parse()?))
            }
        }
    }
}

impl TryFrom<String> for FieldSpec {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldSpec> for String {
    fn from(field: FieldSpec) -> Self {
        field.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    TooFewVertices(usize),
    UnknownField(String),
    InvalidPrime(PrimeError),
    Malformed(String),
    FieldMismatch { expected: FieldSpec, found: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewVertices(n) => {
                write!(f, "The complete graph needs at least 2 vertices, got {n}")
            }
            Self::UnknownField(s) => write!(f, "Unknown field: {s}"),
            Self::InvalidPrime(e) => write!(f, "Invalid field characteristic: {e}"),
            Self::Malformed(s) => write!(
                f,
                "Malformed resolution spec {s:?}, expected n_vertices,ring_degree[@field]"
            ),
            Self::FieldMismatch { expected, found } => write!(
                f,
                "Configuration asks for {expected} but the field has characteristic {found}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPrime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PrimeError> for ConfigError {
    fn from(e: PrimeError) -> Self {
        Self::InvalidPrime(e)
    }
}

/// Everything that determines a [`Resolution`](crate::resolution::Resolution).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// The number of vertices of the complete graph.
    pub n_vertices: usize,
    /// The internal degree in which basis elements are enumerated.
    pub ring_degree: i32,
    #[serde(default = "default_field")]
    pub field: FieldSpec,
    /// The requested size of each of the unknown families. See [`Self::family_size`].
    #[serde(default = "default_unknowns")]
    pub unknowns: usize,
}

fn default_field() -> FieldSpec {
    FieldSpec::Rationals
}

fn default_unknowns() -> usize {
    DEFAULT_UNKNOWNS
}

impl ResolutionConfig {
    pub fn new(n_vertices: usize, ring_degree: i32, field: FieldSpec) -> Result<Self, ConfigError> {
        let config = Self {
            n_vertices,
            ring_degree,
            field,
            unknowns: DEFAULT_UNKNOWNS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_unknowns(mut self, unknowns: usize) -> Self {
        self.unknowns = unknowns;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_vertices < 2 {
            return Err(ConfigError::TooFewVertices(self.n_vertices));
        }
        Ok(())
    }

    /// The number of unknowns in each family. The product uses indices up to `n + 1`, so this is
    /// never less than `n + 2`.
    pub fn family_size(&self) -> usize {
        std::cmp::max(self.n_vertices + 2, self.unknowns)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Display for ResolutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}@{}", self.n_vertices, self.ring_degree, self.field)
    }
}

impl FromStr for ResolutionConfig {
    type Err = ConfigError;

    /// Parses specs of the form `n_vertices,ring_degree@field`, where the field defaults to `QQ`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (degrees, field) = match spec.split_once('@') {
            Some((degrees, field)) => (degrees, field.parse()?),
            None => (spec, FieldSpec::Rationals),
        };
        let malformed = || ConfigError::Malformed(spec.to_string());
        let (n, d) = degrees.split_once(',').ok_or_else(malformed)?;
        let n_vertices = n.trim().parse().map_err(|_| malformed())?;
        let ring_degree = d.trim().parse().map_err(|_| malformed())?;
        Self::new(n_vertices, ring_degree, field)
    }
}

impl TryFrom<&str> for ResolutionConfig {
    type Error = ConfigError;

    fn try_from(spec: &str) -> Result<Self, Self::Error> {
        spec.parse()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use expect_test::expect;
    use rstest::rstest;

    #[rstest]
    #[case("5,5", 5, 5, FieldSpec::Rationals)]
    #[case("4, 7@QQ", 4, 7, FieldSpec::Rationals)]
    #[case("3,2@GF(3)", 3, 2, FieldSpec::Prime(ValidPrime::new(3)))]
    #[case("6,-1@101", 6, -1, FieldSpec::Prime(ValidPrime::new(101)))]
    fn parse_spec(
        #[case] spec: &str,
        #[case] n_vertices: usize,
        #[case] ring_degree: i32,
        #[case] field: FieldSpec,
    ) {
        let config = ResolutionConfig::try_from(spec).unwrap();
        assert_eq!(config.n_vertices, n_vertices);
        assert_eq!(config.ring_degree, ring_degree);
        assert_eq!(config.field, field);
        assert_eq!(config.unknowns, DEFAULT_UNKNOWNS);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "1,3".parse::<ResolutionConfig>(),
            Err(ConfigError::TooFewVertices(1))
        );
        assert_eq!(
            "5".parse::<ResolutionConfig>(),
            Err(ConfigError::Malformed("5".to_string()))
        );
        assert_eq!(
            "5,5@RR".parse::<ResolutionConfig>(),
            Err(ConfigError::UnknownField("RR".to_string()))
        );
        assert_eq!(
            "5,5@GF(4)".parse::<ResolutionConfig>(),
            Err(ConfigError::InvalidPrime(PrimeError::InvalidPrime(4)))
        );
        expect![[r#"Invalid field characteristic: 4 is not a valid prime"#]]
            .assert_eq(&"5,5@GF(4)".parse::<ResolutionConfig>().unwrap_err().to_string());
    }

    #[test]
    fn family_size_covers_vertices() {
        let config = ResolutionConfig::new(5, 5, FieldSpec::Rationals).unwrap();
        assert_eq!(config.family_size(), DEFAULT_UNKNOWNS);
        assert_eq!(config.clone().with_unknowns(3).family_size(), 7);
        expect![[r#"5,5@QQ"#]].assert_eq(&config.to_string());
    }

    #[test]
    fn json() {
        let config = ResolutionConfig::from_json(
            r#"{"n_vertices": 4, "ring_degree": 6, "field": "GF(5)", "unknowns": 8}"#,
        )
        .unwrap();
        assert_eq!(config.field, FieldSpec::Prime(ValidPrime::new(5)));
        assert_eq!(config.unknowns, 8);

        let default = ResolutionConfig::from_json(r#"{"n_vertices": 4, "ring_degree": 6}"#).unwrap();
        assert_eq!(default.field, FieldSpec::Rationals);
        assert_eq!(default.unknowns, DEFAULT_UNKNOWNS);

        let roundtrip = serde_json::to_string(&config).unwrap();
        expect![[r#"{"n_vertices":4,"ring_degree":6,"field":"GF(5)","unknowns":8}"#]]
            .assert_eq(&roundtrip);

        assert!(ResolutionConfig::from_json(r#"{"n_vertices": 1, "ring_degree": 6}"#).is_err());
        assert!(ResolutionConfig::from_json(r#"{"n_vertices": 4, "ring_degree": 6, "field": "GF(6)"}"#).is_err());
    }
}
