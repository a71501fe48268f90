//! Dataset definition structures

use crate::config::cli_convert::parse_count;
use crate::dataset::{dataset_file_name, ByteWidth};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One dataset to generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset name, the file is `<name>_uint<bits>`
    pub name: String,
    /// Exact number of keys (accepts "200M"-style strings in TOML)
    #[serde(deserialize_with = "deserialize_count")]
    pub amount: u64,
    /// Element width in bytes (1, 2, 4, or 8)
    #[serde(default)]
    pub bytes_per_number: ByteWidth,
    /// Key distribution
    pub distribution: DistributionType,
    /// Seed for randomized distributions
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DatasetConfig {
    /// File name derived from name and width
    pub fn file_name(&self) -> String {
        dataset_file_name(&self.name, self.bytes_per_number)
    }

    /// Destination path inside `dir`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// Key distribution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionType {
    /// Consecutive keys
    Dense {
        #[serde(default = "default_start")]
        start: u64,
    },
    /// Consecutive keys with random deletes
    Gapped {
        #[serde(default = "default_start")]
        start: u64,
        #[serde(default = "default_delete_probability")]
        delete_probability: f64,
    },
    /// Non-decreasing keys with random repeats
    Duplicated {
        #[serde(default = "default_start")]
        start: u64,
        #[serde(default = "default_duplicate_chance")]
        duplicate_chance: f64,
    },
    /// Independent uniform draws from `[low, high)`, `high = None` means through u64::MAX
    Uniform {
        #[serde(default)]
        low: u64,
        #[serde(default)]
        high: Option<u64>,
    },
}

fn default_start() -> u64 {
    1
}

fn default_delete_probability() -> f64 {
    0.05
}

fn default_duplicate_chance() -> f64 {
    0.4
}

impl Default for DistributionType {
    fn default() -> Self {
        Self::Dense {
            start: default_start(),
        }
    }
}

impl DistributionType {
    /// Short distribution name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dense { .. } => "dense",
            Self::Gapped { .. } => "gapped",
            Self::Duplicated { .. } => "duplicated",
            Self::Uniform { .. } => "uniform",
        }
    }

    /// Whether the seed changes the output
    pub fn is_randomized(&self) -> bool {
        !matches!(self, Self::Dense { .. })
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Dense { start } => write!(f, "dense (start={})", start),
            Self::Gapped {
                start,
                delete_probability,
            } => write!(
                f,
                "gapped (start={}, delete_probability={})",
                start, delete_probability
            ),
            Self::Duplicated {
                start,
                duplicate_chance,
            } => write!(
                f,
                "duplicated (start={}, duplicate_chance={})",
                start, duplicate_chance
            ),
            Self::Uniform { low, high: Some(high) } => {
                write!(f, "uniform [{}, {})", low, high)
            }
            Self::Uniform { low, high: None } => write!(f, "uniform [{}, 2^64)", low),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountRepr {
    Number(u64),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match CountRepr::deserialize(deserializer)? {
        CountRepr::Number(n) => Ok(n),
        CountRepr::Text(s) => parse_count(&s).map_err(serde::de::Error::custom),
    }
}

/// The batch of benchmark datasets the key generator was originally written for
///
/// All 64-bit; `debug` is a small duplicated set for quick checks.
pub fn paper_preset() -> Vec<DatasetConfig> {
    let dataset = |name: &str, amount: u64, distribution: DistributionType| DatasetConfig {
        name: name.to_string(),
        amount,
        bytes_per_number: ByteWidth::Eight,
        distribution,
        seed: None,
    };

    vec![
        dataset(
            "debug",
            1_000_000,
            DistributionType::Duplicated {
                start: 1,
                duplicate_chance: 0.4,
            },
        ),
        dataset(
            "uniform_200M",
            200_000_000,
            DistributionType::Uniform { low: 0, high: None },
        ),
        dataset(
            "consecutive_200M",
            200_000_000,
            DistributionType::Dense { start: 1000 },
        ),
        dataset(
            "consecutive_100M",
            100_000_000,
            DistributionType::Dense { start: 1000 },
        ),
        dataset(
            "gapped_1permill_200M",
            200_000_000,
            DistributionType::Gapped {
                start: 10000,
                delete_probability: 0.001,
            },
        ),
        dataset(
            "gapped_1percent_200M",
            200_000_000,
            DistributionType::Gapped {
                start: 10000,
                delete_probability: 0.01,
            },
        ),
        dataset(
            "gapped_10percent_200M",
            200_000_000,
            DistributionType::Gapped {
                start: 10000,
                delete_probability: 0.1,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_defaults_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            distribution: DistributionType,
        }

        let holder: Holder = ::toml::from_str(
            r#"
[distribution]
type = "gapped"
"#,
        )
        .unwrap();
        assert_eq!(
            holder.distribution,
            DistributionType::Gapped {
                start: 1,
                delete_probability: 0.05
            }
        );

        let holder: Holder = ::toml::from_str(
            r#"
[distribution]
type = "uniform"
high = 100
"#,
        )
        .unwrap();
        assert_eq!(
            holder.distribution,
            DistributionType::Uniform {
                low: 0,
                high: Some(100)
            }
        );
    }

    #[test]
    fn test_dataset_amount_accepts_suffix() {
        let ds: DatasetConfig = ::toml::from_str(
            r#"
name = "big"
amount = "200M"

[distribution]
type = "dense"
"#,
        )
        .unwrap();
        assert_eq!(ds.amount, 200_000_000);
        assert_eq!(ds.bytes_per_number, ByteWidth::Eight);
        assert_eq!(ds.file_name(), "big_uint64");
    }

    #[test]
    fn test_dataset_path_in() {
        let ds = DatasetConfig {
            name: "keys".to_string(),
            amount: 10,
            bytes_per_number: ByteWidth::Four,
            distribution: DistributionType::default(),
            seed: None,
        };
        assert_eq!(ds.path_in(Path::new("/data")), PathBuf::from("/data/keys_uint32"));
    }

    #[test]
    fn test_distribution_display() {
        assert_eq!(DistributionType::Dense { start: 3 }.to_string(), "dense (start=3)");
        assert_eq!(
            DistributionType::Uniform { low: 0, high: None }.to_string(),
            "uniform [0, 2^64)"
        );
        assert_eq!(DistributionType::default().label(), "dense");
        assert!(!DistributionType::default().is_randomized());
    }

    #[test]
    fn test_paper_preset() {
        let preset = paper_preset();
        assert_eq!(preset.len(), 7);
        assert!(preset.iter().all(|d| d.bytes_per_number == ByteWidth::Eight));
        assert_eq!(preset[2].file_name(), "consecutive_200M_uint64");
    }
}
