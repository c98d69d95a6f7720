// Shared fixtures for the force kernel tests.
//
// `Case` holds the flat inputs of a batch of frames and knows how to edit them per atom and per
// descriptor component. `reference_forces` is a deliberately naive re-derivation of the
// accumulation on raw flat offsets, used as an independent oracle.

#![allow(dead_code)]

use descriptor_force::jacobian::{CoordBlock, ROW_WIDTH};
use descriptor_force::{
    FoldBoundary, ForceKernel, ProdForce, ProdForceConfig, ProdForceError, ProdForceInputs, Tensor,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Helpers: float comparison, logging
// ============================================================================

pub fn assert_approx_eq(actual: f64, expected: f64, tol: f64, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff < tol,
        "{msg}: expected {expected}, got {actual} (diff={diff}, tol={tol})"
    );
}

pub fn assert_forces_approx_eq(actual: &[f64], expected: &[f64], tol: f64, label: &str) {
    assert_eq!(actual.len(), expected.len(), "{label}: length mismatch");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert_approx_eq(a, e, tol, &format!("{label}: force[{i}]"));
    }
}

pub fn init_logging() {
    logging::Logger::new(vec!["descriptor_force"])
        .with_level(log::LevelFilter::Debug)
        .init();
}

// ============================================================================
// Case: flat inputs for a batch of frames
// ============================================================================

#[derive(Debug, Clone)]
pub struct Case {
    pub nframes: usize,
    pub nloc: usize,
    pub nall: usize,
    pub ndescrpt: usize,
    pub n_a_sel: usize,
    pub n_r_sel: usize,
    pub net_deriv: Vec<f64>,
    pub in_deriv: Vec<f64>,
    pub nlist: Vec<i32>,
    pub axis: Vec<i32>,
}

pub struct CaseTensors<T> {
    pub net_deriv: Tensor<T>,
    pub in_deriv: Tensor<T>,
    pub nlist: Tensor<i32>,
    pub axis: Tensor<i32>,
    pub natoms: Tensor<i32>,
}

impl<T> CaseTensors<T> {
    pub fn inputs(&self) -> ProdForceInputs<'_, T> {
        ProdForceInputs {
            net_deriv: &self.net_deriv,
            in_deriv: &self.in_deriv,
            nlist: &self.nlist,
            axis: &self.axis,
            natoms: &self.natoms,
        }
    }
}

fn block_offset(block: CoordBlock) -> usize {
    match block {
        CoordBlock::Center => 0,
        CoordBlock::Axis0 => 3,
        CoordBlock::Axis1 => 6,
        CoordBlock::Generic => 9,
    }
}

impl Case {
    /// All gradients and derivatives zero, every neighbor slot empty, no axis neighbors.
    pub fn empty(
        nframes: usize,
        nloc: usize,
        nall: usize,
        ndescrpt: usize,
        n_a_sel: usize,
        n_r_sel: usize,
    ) -> Self {
        let nnei = n_a_sel + n_r_sel;
        let axis = [0, -1, 0, -1].repeat(nframes * nloc);
        Self {
            nframes,
            nloc,
            nall,
            ndescrpt,
            n_a_sel,
            n_r_sel,
            net_deriv: vec![0.0; nframes * nloc * ndescrpt],
            in_deriv: vec![0.0; nframes * nloc * ndescrpt * ROW_WIDTH],
            nlist: vec![-1; nframes * nloc * nnei],
            axis,
        }
    }

    pub fn nnei(&self) -> usize {
        self.n_a_sel + self.n_r_sel
    }

    pub fn config(&self) -> ProdForceConfig {
        ProdForceConfig::new(self.n_a_sel, self.n_r_sel)
    }

    pub fn set_grad(&mut self, frame: usize, atom: usize, comp: usize, value: f64) {
        let idx = (frame * self.nloc + atom) * self.ndescrpt + comp;
        self.net_deriv[idx] = value;
    }

    pub fn set_block(
        &mut self,
        frame: usize,
        atom: usize,
        comp: usize,
        block: CoordBlock,
        value: [f64; 3],
    ) {
        let base = ((frame * self.nloc + atom) * self.ndescrpt + comp) * ROW_WIDTH
            + block_offset(block);
        self.in_deriv[base..base + 3].copy_from_slice(&value);
    }

    /// Sets `block` to `value` for every descriptor component of one atom.
    pub fn fill_block(&mut self, frame: usize, atom: usize, block: CoordBlock, value: [f64; 3]) {
        for comp in 0..self.ndescrpt {
            self.set_block(frame, atom, comp, block, value);
        }
    }

    pub fn set_neighbors(&mut self, frame: usize, atom: usize, neighbors: &[i32]) {
        let nnei = self.nnei();
        assert_eq!(neighbors.len(), nnei);
        let base = (frame * self.nloc + atom) * nnei;
        self.nlist[base..base + nnei].copy_from_slice(neighbors);
    }

    pub fn set_axis(&mut self, frame: usize, atom: usize, record: [i32; 4]) {
        let base = (frame * self.nloc + atom) * 4;
        self.axis[base..base + 4].copy_from_slice(&record);
    }

    pub fn tensors(&self) -> CaseTensors<f64> {
        self.tensors_with(|v| v)
    }

    pub fn tensors_f32(&self) -> CaseTensors<f32> {
        self.tensors_with(|v| v as f32)
    }

    fn tensors_with<T>(&self, convert: impl Fn(f64) -> T) -> CaseTensors<T> {
        let nnei = self.nnei();
        CaseTensors {
            net_deriv: Tensor::from_vec(
                &[self.nframes, self.nloc * self.ndescrpt],
                self.net_deriv.iter().map(|&v| convert(v)).collect(),
            )
            .unwrap(),
            in_deriv: Tensor::from_vec(
                &[self.nframes, self.nloc * self.ndescrpt * ROW_WIDTH],
                self.in_deriv.iter().map(|&v| convert(v)).collect(),
            )
            .unwrap(),
            nlist: Tensor::from_vec(&[self.nframes, self.nloc * nnei], self.nlist.clone())
                .unwrap(),
            axis: Tensor::from_vec(&[self.nframes, self.nloc * 4], self.axis.clone()).unwrap(),
            natoms: Tensor::vector(vec![self.nloc as i32, self.nall as i32, self.nloc as i32]),
        }
    }

    /// Runs the kernel in double precision.
    pub fn run(&self, config: ProdForceConfig) -> Result<Tensor<f64>, ProdForceError> {
        let tensors = self.tensors();
        ProdForce::new(config)?.compute_forces(&tensors.inputs())
    }

    /// Runs the kernel with the default configuration for this case.
    pub fn run_default(&self) -> Vec<f64> {
        self.run(self.config())
            .unwrap_or_else(|e| panic!("kernel rejected a valid case: {e}"))
            .into_vec()
    }

    /// Force on `atom` of `frame` from a flat force buffer.
    pub fn force_on(&self, force: &[f64], frame: usize, atom: usize) -> [f64; 3] {
        let base = frame * 3 * self.nall + atom * 3;
        [force[base], force[base + 1], force[base + 2]]
    }
}

// ============================================================================
// Random cases
// ============================================================================

/// Random gradients and derivatives in [-1, 1), random neighbor lists with empty slots and
/// ghost indices, random axis records. `nall > nloc` so legacy folding is always valid.
pub fn random_case(
    seed: u64,
    nframes: usize,
    nloc: usize,
    nall: usize,
    n_a_sel: usize,
    n_r_sel: usize,
) -> Case {
    assert!(nall > nloc);
    let mut rng = StdRng::seed_from_u64(seed);
    let ndescrpt = 4 * n_a_sel + n_r_sel;
    let mut case = Case::empty(nframes, nloc, nall, ndescrpt, n_a_sel, n_r_sel);

    for v in case.net_deriv.iter_mut() {
        *v = rng.gen_range(-1.0..1.0);
    }
    for v in case.in_deriv.iter_mut() {
        *v = rng.gen_range(-1.0..1.0);
    }
    for v in case.nlist.iter_mut() {
        *v = if rng.gen_bool(0.2) {
            -1
        } else {
            rng.gen_range(0..(3 * nall) as i32)
        };
    }
    for frame in 0..nframes {
        for atom in 0..nloc {
            let mut record = [0; 4];
            for pair in 0..2 {
                let radial = n_r_sel > 0 && (n_a_sel == 0 || rng.gen_bool(0.5));
                record[2 * pair] = radial as i32;
                let sel = if radial { n_r_sel } else { n_a_sel };
                record[2 * pair + 1] = rng.gen_range(0..sel.max(1) as i32);
            }
            case.set_axis(frame, atom, record);
        }
    }
    case
}

// ============================================================================
// Reference: direct flat-offset accumulation
// ============================================================================

pub fn reference_forces(case: &Case, fold: FoldBoundary) -> Vec<f64> {
    let nloc = case.nloc;
    let nall = case.nall;
    let nd = case.ndescrpt;
    let nnei = case.nnei();
    let n_a_sel = case.n_a_sel as i64;
    let mut force = vec![0.0; case.nframes * 3 * nall];

    for kk in 0..case.nframes {
        let force_iter = kk * nall * 3;
        let net_iter = kk * nloc * nd;
        let in_iter = kk * nloc * nd * 12;
        let nlist_iter = kk * nloc * nnei;
        let axis_iter = kk * nloc * 4;

        for ii in 0..nloc {
            for aa in 0..nd {
                for dd in 0..3 {
                    force[force_iter + ii * 3 + dd] -= case.net_deriv[net_iter + ii * nd + aa]
                        * case.in_deriv[in_iter + ii * nd * 12 + aa * 12 + dd];
                }
            }

            let mut axis_0 = case.axis[axis_iter + ii * 4 + 1] as i64;
            let mut axis_1 = case.axis[axis_iter + ii * 4 + 3] as i64;
            if case.axis[axis_iter + ii * 4] == 1 {
                axis_0 += n_a_sel;
            }
            if case.axis[axis_iter + ii * 4 + 2] == 1 {
                axis_1 += n_a_sel;
            }

            for jj in 0..nnei {
                let mut j_idx = case.nlist[nlist_iter + ii * nnei + jj] as i64;
                if j_idx < 0 {
                    continue;
                }
                let folds = match fold {
                    FoldBoundary::Legacy => j_idx > nloc as i64,
                    FoldBoundary::Strict => j_idx >= nloc as i64,
                };
                if folds {
                    j_idx %= nloc as i64;
                }
                let j_idx = j_idx as usize;
                let jj_i = jj as i64;

                let (offset, start, end) = if jj_i == axis_0 {
                    (3, 0, nd)
                } else if jj_i == axis_1 {
                    (6, 0, nd)
                } else if jj < case.n_a_sel {
                    (9, jj * 4, jj * 4 + 4)
                } else {
                    let start = case.n_a_sel * 4 + (jj - case.n_a_sel);
                    (9, start, start + 1)
                };
                for aa in start..end {
                    for dd in 0..3 {
                        force[force_iter + j_idx * 3 + dd] -= case.net_deriv
                            [net_iter + ii * nd + aa]
                            * case.in_deriv[in_iter + ii * nd * 12 + aa * 12 + offset + dd];
                    }
                }
            }
        }
    }
    force
}
