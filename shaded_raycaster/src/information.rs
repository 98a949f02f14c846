//! Viewpoint information measures built from the results of the two passes.
//!
//! For every viewpoint `v` the first pass gives the projected volume `a(v)`,
//! the second pass the distribution `p(o|v)` of the seen volume over voxels `o`.
//! `p(v) = a(v) / sum(a)` and `p(o) = sum_v p(v) p(o|v)`.

use log::debug;
use rayon::prelude::*;

/// Results collected over a set of viewpoints.
#[derive(Debug, Default)]
pub struct ViewpointInformation {
    projected_volumes: Vec<f32>,
    object_probabilities: Vec<Vec<f32>>,
}

/// Measures derived from [`ViewpointInformation`].
#[derive(Debug, Clone)]
pub struct InformationReport {
    pub viewpoint_probabilities: Vec<f32>,
    /// Viewpoint mutual information, one per viewpoint
    pub vmi: Vec<f32>,
    /// Voxel mutual information, one per voxel
    pub vomi: Vec<f32>,
    pub max_vomi: f32,
}

impl ViewpointInformation {
    pub fn new() -> ViewpointInformation {
        ViewpointInformation::default()
    }

    /// Store results of both passes for one viewpoint
    pub fn add_viewpoint(&mut self, projected_volume: f32, object_probabilities: Vec<f32>) {
        self.projected_volumes.push(projected_volume);
        self.object_probabilities.push(object_probabilities);
    }

    pub fn viewpoints(&self) -> usize {
        self.projected_volumes.len()
    }

    pub fn compute(&self) -> InformationReport {
        let p_v = viewpoint_probabilities(&self.projected_volumes);
        let p_o = object_probabilities(&p_v, &self.object_probabilities);

        let vmi = self
            .object_probabilities
            .iter()
            .map(|p_ov| viewpoint_mutual_information(p_ov, &p_o))
            .collect();
        let vomi = voxel_mutual_information(&p_v, &self.object_probabilities, &p_o);
        let max_vomi = vomi.iter().copied().fold(0.0, f32::max);

        debug!(
            "Information over {} viewpoints, max VoMI {max_vomi}",
            self.viewpoints()
        );

        InformationReport {
            viewpoint_probabilities: p_v,
            vmi,
            vomi,
            max_vomi,
        }
    }
}

/// `p(v)`, uniform when nothing was seen from any viewpoint
pub fn viewpoint_probabilities(projected_volumes: &[f32]) -> Vec<f32> {
    let total: f32 = projected_volumes.iter().sum();
    if total > 0.0 {
        projected_volumes.iter().map(|a| a / total).collect()
    } else {
        let n = projected_volumes.len() as f32;
        vec![1.0 / n; projected_volumes.len()]
    }
}

/// `p(o)` as mixture of the per-viewpoint distributions
pub fn object_probabilities(p_v: &[f32], p_o_given_v: &[Vec<f32>]) -> Vec<f32> {
    let len = p_o_given_v.iter().map(Vec::len).max().unwrap_or(0);
    let mut p_o = vec![0.0; len];
    for (p, p_ov) in p_v.iter().zip(p_o_given_v) {
        p_o.iter_mut().zip(p_ov).for_each(|(o, c)| *o += p * c);
    }
    p_o
}

/// `I(v;O) = sum_o p(o|v) log2(p(o|v) / p(o))`
pub fn viewpoint_mutual_information(p_o_given_v: &[f32], p_o: &[f32]) -> f32 {
    p_o_given_v
        .iter()
        .zip(p_o)
        .filter(|&(&c, &o)| c > 0.0 && o > 0.0)
        .map(|(&c, &o)| c * (c / o).log2())
        .sum()
}

/// `I(o;V) = sum_v p(v|o) log2(p(v|o) / p(v))` with `p(v|o) = p(v) p(o|v) / p(o)`
pub fn voxel_mutual_information(p_v: &[f32], p_o_given_v: &[Vec<f32>], p_o: &[f32]) -> Vec<f32> {
    p_o.par_iter()
        .enumerate()
        .map(|(o, &p_obj)| {
            if p_obj <= 0.0 {
                return 0.0;
            }
            p_v.iter()
                .zip(p_o_given_v)
                .map(|(&p_view, p_ov)| {
                    let c = p_ov.get(o).copied().unwrap_or(0.0);
                    let p_vo = p_view * c / p_obj;
                    if p_vo > 0.0 && p_view > 0.0 {
                        p_vo * (p_vo / p_view).log2()
                    } else {
                        0.0
                    }
                })
                .sum()
        })
        .collect()
}
