use super::features::HBondFeature;
use super::hbond::HBondQuadruple;
use crate::core::models::residue::Residue;
use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;
use std::f64::consts::PI;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

pub const COMPONENT_COUNT: usize = 7;

/// Components whose covariance determinant is below this magnitude are treated as
/// degenerate and contribute no density.
pub const MIN_COVARIANCE_DETERMINANT: f64 = 5e-4;

/// One trivariate Gaussian of the hydrogen-bond mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureComponent {
    pub weight: f64,
    pub mean: Vector3<f64>,
    pub inv_covariance: Matrix3<f64>,
    pub cov_determinant: f64,
    /// Whether the component models true hydrogen bonds.
    pub is_hbond: bool,
}

impl MixtureComponent {
    /// Weighted density of the component at `x`, or zero for a degenerate component
    /// or a NaN exponent.
    pub fn density(&self, x: &Vector3<f64>) -> f64 {
        let diff = x - self.mean;
        let mahalanobis = diff.dot(&(self.inv_covariance * diff));
        let raw = (-0.5 * mahalanobis).exp();
        if raw.is_nan() || self.cov_determinant.abs() < MIN_COVARIANCE_DETERMINANT {
            return 0.0;
        }
        self.weight * raw / ((2.0 * PI).powf(1.5) * self.cov_determinant.abs().sqrt())
    }
}

/// Total and hydrogen-bond densities of a feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureDensity {
    pub total: f64,
    pub hbond: f64,
}

impl MixtureDensity {
    /// Fraction of the density owed to hydrogen-bond components. NaN when the total
    /// density is zero.
    pub fn posterior(&self) -> f64 {
        if self.total == 0.0 {
            f64::NAN
        } else {
            self.hbond / self.total
        }
    }
}

/// The seven-component Gaussian mixture that classifies hydrogen-bond geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureModel {
    components: [MixtureComponent; COMPONENT_COUNT],
}

struct RawComponent {
    weight: f64,
    is_hbond: bool,
    mean: [f64; 3],
    inv_covariance: [[f64; 3]; 3],
    cov_determinant: f64,
}

impl RawComponent {
    fn build(&self) -> MixtureComponent {
        let m = &self.inv_covariance;
        MixtureComponent {
            weight: self.weight,
            mean: Vector3::from(self.mean),
            inv_covariance: Matrix3::new(
                m[0][0], m[0][1], m[0][2], //
                m[1][0], m[1][1], m[1][2], //
                m[2][0], m[2][1], m[2][2],
            ),
            cov_determinant: self.cov_determinant,
            is_hbond: self.is_hbond,
        }
    }
}

const BUILTIN_COMPONENTS: [RawComponent; COMPONENT_COUNT] = [
    RawComponent {
        weight: 0.30,
        is_hbond: true,
        mean: [1.00, 2.90, 2.20],
        inv_covariance: [
            [2.8259, -0.3571, 0.2484],
            [-0.3571, 3.0976, -0.9471],
            [0.2484, -0.9471, 3.0743],
        ],
        cov_determinant: 0.0417338,
    },
    RawComponent {
        weight: 0.15,
        is_hbond: true,
        mean: [2.00, 2.30, 1.60],
        inv_covariance: [
            [2.926, 0.4347, 0.2675],
            [0.4347, 2.2415, -0.5045],
            [0.2675, -0.5045, 2.2013],
        ],
        cov_determinant: 0.076928,
    },
    RawComponent {
        weight: 0.20,
        is_hbond: false,
        mean: [3.40, 1.20, 0.90],
        inv_covariance: [
            [4.0678, 0.2825, 0.2825],
            [0.2825, 2.9131, -0.5591],
            [0.2825, -0.5591, 2.9131],
        ],
        cov_determinant: 0.0305856,
    },
    RawComponent {
        weight: 0.12,
        is_hbond: false,
        mean: [2.60, 0.50, 0.50],
        inv_covariance: [
            [2.7849, -0.1709, 0.0214],
            [-0.1709, 4.1026, -0.5128],
            [0.0214, -0.5128, 2.8419],
        ],
        cov_determinant: 0.03159,
    },
    RawComponent {
        weight: 0.08,
        is_hbond: false,
        mean: [3.00, 2.00, 0.20],
        inv_covariance: [
            [4.0408, -0.0292, -0.4082],
            [-0.0292, 2.0616, 0.2915],
            [-0.4082, 0.2915, 4.0816],
        ],
        cov_determinant: 0.0300125,
    },
    RawComponent {
        weight: 0.10,
        is_hbond: true,
        mean: [0.20, 3.40, 2.80],
        inv_covariance: [
            [4.1029, -0.5377, -0.2221],
            [-0.5377, 4.6289, -1.5663],
            [-0.2221, -1.5663, 4.5704],
        ],
        cov_determinant: 0.0133672,
    },
    RawComponent {
        weight: 0.05,
        is_hbond: false,
        mean: [1.50, 0.30, 2.00],
        inv_covariance: [
            [2.8059, -0.0169, 0.2813],
            [-0.0169, 4.0101, -0.1688],
            [0.2813, -0.1688, 2.8129],
        ],
        cov_determinant: 0.031995,
    },
];

/// One row of a mixture CSV file.
#[derive(Debug, Deserialize)]
struct ComponentRow {
    weight: f64,
    is_hbond: u8,
    mean_x1: f64,
    mean_x2: f64,
    mean_x3: f64,
    inv_cov_11: f64,
    inv_cov_12: f64,
    inv_cov_13: f64,
    inv_cov_21: f64,
    inv_cov_22: f64,
    inv_cov_23: f64,
    inv_cov_31: f64,
    inv_cov_32: f64,
    inv_cov_33: f64,
    cov_determinant: f64,
}

impl From<ComponentRow> for MixtureComponent {
    fn from(row: ComponentRow) -> Self {
        MixtureComponent {
            weight: row.weight,
            mean: Vector3::new(row.mean_x1, row.mean_x2, row.mean_x3),
            inv_covariance: Matrix3::new(
                row.inv_cov_11, row.inv_cov_12, row.inv_cov_13, //
                row.inv_cov_21, row.inv_cov_22, row.inv_cov_23, //
                row.inv_cov_31, row.inv_cov_32, row.inv_cov_33,
            ),
            cov_determinant: row.cov_determinant,
            is_hbond: row.is_hbond != 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Expected 7 mixture components in '{path}', found {found}")]
    ComponentCount { path: String, found: usize },
}

impl MixtureModel {
    pub fn new(components: [MixtureComponent; COMPONENT_COUNT]) -> Self {
        Self { components }
    }

    /// The built-in process-wide table.
    pub fn builtin() -> &'static MixtureModel {
        static BUILTIN: OnceLock<MixtureModel> = OnceLock::new();
        BUILTIN.get_or_init(|| MixtureModel {
            components: BUILTIN_COMPONENTS.each_ref().map(RawComponent::build),
        })
    }

    /// Loads a calibrated table from CSV. The file must hold exactly seven rows.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ModelLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut components = Vec::with_capacity(COMPONENT_COUNT);
        for result in reader.deserialize::<ComponentRow>() {
            let row = result.map_err(|e| ModelLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            components.push(MixtureComponent::from(row));
        }

        let found = components.len();
        let components: [MixtureComponent; COMPONENT_COUNT] = components
            .try_into()
            .map_err(|_| ModelLoadError::ComponentCount {
                path: path_str,
                found,
            })?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[MixtureComponent; COMPONENT_COUNT] {
        &self.components
    }

    pub fn density(&self, feature: &HBondFeature) -> MixtureDensity {
        let x = feature.as_vector();
        self.components
            .iter()
            .fold(MixtureDensity { total: 0.0, hbond: 0.0 }, |acc, component| {
                let d = component.density(&x);
                MixtureDensity {
                    total: acc.total + d,
                    hbond: if component.is_hbond { acc.hbond + d } else { acc.hbond },
                }
            })
    }

    /// Evaluates caller-supplied features: the posterior hydrogen-bond probability
    /// when `posterior` is set, otherwise the total density.
    pub fn evaluate(&self, feature: &HBondFeature, posterior: bool) -> f64 {
        let density = self.density(feature);
        if posterior {
            density.posterior()
        } else {
            density.total
        }
    }

    /// Extracts the features of `quadruple` and returns their posterior. `None` means
    /// an atom was missing; NaN means the geometry carries no density at all.
    pub fn score(
        &self,
        donor_residue: &Residue,
        quadruple: &HBondQuadruple,
        acceptor_residue: &Residue,
    ) -> Option<f64> {
        let feature = HBondFeature::extract(donor_residue, quadruple, acceptor_residue)?;
        Some(self.evaluate(&feature, true))
    }
}

impl Default for MixtureModel {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TOLERANCE: f64 = 1e-6;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn feature_at_mean(component: &MixtureComponent) -> HBondFeature {
        HBondFeature::new(component.mean.x, component.mean.y, component.mean.z)
    }

    #[test]
    fn builtin_weights_sum_to_one() {
        let sum: f64 = MixtureModel::builtin()
            .components()
            .iter()
            .map(|c| c.weight)
            .sum();
        assert!(f64_approx_equal(sum, 1.0));
    }

    #[test]
    fn builtin_inverse_covariances_are_symmetric() {
        for component in MixtureModel::builtin().components() {
            let m = component.inv_covariance;
            assert!((m - m.transpose()).norm() < 1e-12);
            assert!(component.cov_determinant.abs() >= MIN_COVARIANCE_DETERMINANT);
        }
    }

    #[test]
    fn component_zero_dominates_at_its_own_mean() {
        let model = MixtureModel::builtin();
        let first = &model.components()[0];
        assert!(first.is_hbond);
        let x = first.mean;
        let densities: Vec<f64> = model.components().iter().map(|c| c.density(&x)).collect();
        let max = densities.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(densities[0], max);

        let posterior = model.evaluate(&feature_at_mean(first), true);
        assert!(posterior > 0.999);
        assert!(posterior <= 1.0);
        let total = model.evaluate(&feature_at_mean(first), false);
        assert!((total - 0.104).abs() < 1e-3);
    }

    #[test]
    fn posterior_stays_within_unit_interval() {
        let model = MixtureModel::builtin();
        for x1 in [-1.0, 0.5, 2.0, 3.5, 5.0] {
            for x2 in [-1.0, 0.0, 1.5, 3.0] {
                for x3 in [-2.0, 0.0, 1.0, 2.5, 4.0] {
                    let feature = HBondFeature::new(x1, x2, x3);
                    let density = model.density(&feature);
                    if density.total > 0.0 {
                        let p = density.posterior();
                        assert!((0.0..=1.0).contains(&p), "{:?} -> {}", feature, p);
                    }
                }
            }
        }
    }

    #[test]
    fn non_bond_basin_has_low_posterior() {
        let model = MixtureModel::builtin();
        let non_bond = &model.components()[2];
        assert!(!non_bond.is_hbond);
        assert!(model.evaluate(&feature_at_mean(non_bond), true) < 0.05);
    }

    #[test]
    fn far_features_have_zero_density_and_nan_posterior() {
        let model = MixtureModel::builtin();
        let feature = HBondFeature::new(1e3, -1e3, 1e3);
        assert_eq!(model.evaluate(&feature, false), 0.0);
        assert!(model.evaluate(&feature, true).is_nan());
    }

    #[test]
    fn nan_features_contribute_no_density() {
        let model = MixtureModel::builtin();
        let feature = HBondFeature::new(f64::NAN, 1.0, 1.0);
        assert_eq!(model.evaluate(&feature, false), 0.0);
    }

    #[test]
    fn degenerate_components_are_skipped() {
        let mut components = *MixtureModel::builtin().components();
        components[0].cov_determinant = 1e-5;
        let model = MixtureModel::new(components);
        let x = components[0].mean;
        assert_eq!(components[0].density(&x), 0.0);
        assert!(model.evaluate(&feature_at_mean(&components[0]), false) > 0.0);
    }

    fn csv_from(model: &MixtureModel, rows: usize) -> String {
        let mut text = String::from(
            "weight,is_hbond,mean_x1,mean_x2,mean_x3,inv_cov_11,inv_cov_12,inv_cov_13,\
             inv_cov_21,inv_cov_22,inv_cov_23,inv_cov_31,inv_cov_32,inv_cov_33,cov_determinant\n",
        );
        for c in model.components().iter().take(rows) {
            let m = &c.inv_covariance;
            text.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                c.weight,
                u8::from(c.is_hbond),
                c.mean.x,
                c.mean.y,
                c.mean.z,
                m[(0, 0)],
                m[(0, 1)],
                m[(0, 2)],
                m[(1, 0)],
                m[(1, 1)],
                m[(1, 2)],
                m[(2, 0)],
                m[(2, 1)],
                m[(2, 2)],
                c.cov_determinant
            ));
        }
        text
    }

    #[test]
    fn load_reads_a_seven_row_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixture.csv");
        fs::write(&path, csv_from(MixtureModel::builtin(), COMPONENT_COUNT)).unwrap();

        let model = MixtureModel::load(&path).unwrap();
        assert_eq!(&model, MixtureModel::builtin());
    }

    #[test]
    fn load_rejects_wrong_component_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, csv_from(MixtureModel::builtin(), 5)).unwrap();

        let result = MixtureModel::load(&path);
        assert!(matches!(
            result,
            Err(ModelLoadError::ComponentCount { found: 5, .. })
        ));
    }

    #[test]
    fn load_rejects_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "weight,is_hbond\n0.5,yes\n").unwrap();
        assert!(matches!(
            MixtureModel::load(&path),
            Err(ModelLoadError::Csv { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = MixtureModel::load(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(ModelLoadError::Io { .. })));
    }
}
