//! Fixed table of target depths shared by all vertical resampling.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Standard target depths in meters, surface to abyss (136 levels).
const STANDARD_DEPTHS: [f32; 136] = [
    3.1657474, 5.4649634, 7.9203773, 10.536604, 13.318384, 16.270586, 19.39821, 22.706392,
    26.2004, 29.885643, 33.767673, 37.852192, 42.14504, 46.65221, 51.37986, 56.334286,
    61.521957, 66.94949, 72.62369, 78.5515, 84.74004, 91.19663, 97.92873, 104.94398,
    112.250206, 119.85543, 127.76784, 135.9958, 144.5479, 153.43285, 162.65962, 172.23735,
    182.17535, 192.48314, 203.17044, 214.24716, 225.7234, 237.60947, 249.91585, 262.65323,
    275.83252, 289.46478, 303.5613, 318.13354, 333.19315, 348.75195, 364.82196, 381.41544,
    398.5447, 416.22232, 434.46106, 453.27377, 472.6735, 492.67346, 513.287, 534.5276,
    556.4089, 578.9446, 602.1486, 626.0349, 650.61755, 675.9107, 701.92865, 728.6856,
    756.19604, 784.4743, 813.53485, 843.39215, 874.06067, 905.5548, 937.8891, 971.0779,
    1005.1355, 1040.0763, 1075.9143, 1112.6637, 1150.3384, 1188.9521, 1228.5188, 1269.0518,
    1310.5642, 1353.0693, 1396.58, 1441.1086, 1486.6678, 1533.2694, 1580.9252, 1629.6466,
    1679.4448, 1730.3303, 1782.3136, 1835.4045, 1889.6127, 1944.9471, 2001.4166, 2059.029,
    2117.7925, 2177.714, 2238.8003, 2301.0576, 2364.4917, 2429.1077, 2494.9102, 2561.903,
    2630.0898, 2699.4736, 2770.0566, 2841.8408, 2914.827, 2989.0159, 3064.4075, 3141.0015,
    3218.7961, 3297.7903, 3377.9814, 3459.3662, 3541.942, 3625.7039, 3710.6475, 3796.768,
    3884.0596, 3972.516, 4062.1304, 4152.896, 4244.804, 4337.8477, 4432.0176, 4527.304,
    4623.6987, 4721.1914, 4819.771, 4919.4272, 5020.1494, 5121.926, 5224.7446, 5328.5938,
];

/// Strictly increasing sequence of target depths in meters.
///
/// The same table must be used to resample a volume and to extract its
/// bottom, surface and column products; the table is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct DepthTable {
    levels: Vec<f32>,
}

impl DepthTable {
    /// Build a table, rejecting empty, non-finite or non-increasing input.
    pub fn new(levels: Vec<f32>) -> GridResult<Self> {
        if levels.is_empty() {
            return Err(GridError::Empty("depth table"));
        }
        for (index, level) in levels.iter().enumerate() {
            if !level.is_finite() {
                return Err(GridError::NonFinite {
                    axis: "depth table",
                    index,
                });
            }
        }
        for (index, pair) in levels.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(GridError::NotIncreasing {
                    axis: "depth table",
                    index: index + 1,
                    previous: pair[0] as f64,
                    value: pair[1] as f64,
                });
            }
        }
        Ok(Self { levels })
    }

    /// The standard 136-level table used for every archived ocean product.
    pub fn standard() -> Self {
        Self {
            levels: STANDARD_DEPTHS.to_vec(),
        }
    }

    /// Depth levels, shallowest first.
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of leading levels that are at or above `depth`.
    ///
    /// For a water column whose bottom lies at `depth`, this is the size of
    /// the resolvable prefix of the table. Non-finite depths resolve nothing.
    #[inline]
    pub fn count_within(&self, depth: f64) -> usize {
        if !depth.is_finite() {
            return 0;
        }
        self.levels.partition_point(|&level| level as f64 <= depth)
    }
}

impl Default for DepthTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<f32>> for DepthTable {
    type Error = GridError;

    fn try_from(levels: Vec<f32>) -> GridResult<Self> {
        Self::new(levels)
    }
}

impl From<DepthTable> for Vec<f32> {
    fn from(table: DepthTable) -> Self {
        table.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = DepthTable::standard();
        assert_eq!(table.len(), 136);
        assert!(DepthTable::new(table.levels().to_vec()).is_ok());
        assert!((table.levels()[0] - 3.1657474).abs() < 1e-6);
        assert!((table.levels()[135] - 5328.5938).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(DepthTable::new(vec![]), Err(GridError::Empty("depth table")));
        assert!(matches!(
            DepthTable::new(vec![10.0, 10.0]),
            Err(GridError::NotIncreasing { index: 1, .. })
        ));
        assert!(matches!(
            DepthTable::new(vec![10.0, 5.0, 20.0]),
            Err(GridError::NotIncreasing { index: 1, .. })
        ));
        assert!(matches!(
            DepthTable::new(vec![1.0, f32::NAN]),
            Err(GridError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn test_count_within() {
        let table = DepthTable::new(vec![10.0, 60.0, 200.0]).unwrap();
        assert_eq!(table.count_within(5.0), 0);
        assert_eq!(table.count_within(10.0), 1);
        assert_eq!(table.count_within(100.0), 2);
        assert_eq!(table.count_within(200.0), 3);
        assert_eq!(table.count_within(1.0e6), 3);
        assert_eq!(table.count_within(f64::NAN), 0);
    }

    #[test]
    fn test_serde_validates() {
        let table: DepthTable = serde_json::from_str("[1.0, 2.0, 4.0]").unwrap();
        assert_eq!(table.levels(), &[1.0, 2.0, 4.0]);
        assert!(serde_json::from_str::<DepthTable>("[4.0, 2.0]").is_err());
    }
}
