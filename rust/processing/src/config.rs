// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing configuration loaded from environment variables.

use crate::{Error, Result};
use resqml_lite_geometry::Partition;

/// Multi-worker partitioning of grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// Index of this rendering worker.
    pub worker_index: u32,
    /// Number of rendering workers sharing each grid.
    pub worker_count: u32,
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            worker_index: std::env::var("RESQML_WORKER_INDEX")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .unwrap_or(0),
            worker_count: std::env::var("RESQML_WORKER_COUNT")
                .unwrap_or_else(|_| "1".into())
                .parse()
                .unwrap_or(1),
        }
    }

    /// Single worker owning every cell.
    pub fn single() -> Self {
        Self {
            worker_index: 0,
            worker_count: 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.partition().map(|_| ())
    }

    /// Contiguous-range partition for this worker.
    pub fn partition(&self) -> Result<Partition> {
        Partition::new(self.worker_index, self.worker_count).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "worker index {} is not below worker count {}",
                self.worker_index, self.worker_count
            ))
        })
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ProcessingConfig::single().validate().is_ok());
        let zero = ProcessingConfig {
            worker_index: 0,
            worker_count: 0,
        };
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));
        let past_end = ProcessingConfig {
            worker_index: 3,
            worker_count: 3,
        };
        assert!(past_end.validate().is_err());
    }

    #[test]
    fn test_partition() {
        let config = ProcessingConfig {
            worker_index: 1,
            worker_count: 4,
        };
        assert_eq!(config.partition().unwrap().range(8), 2..4);
    }
}
