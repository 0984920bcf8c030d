// src/parallel.rs
//
// Per-cell dispatch over a box of a ScalarField3D.
//
// A kernel receives (i, j, k) and a mutable reference to *its own* output cell.
// There is no ordering guarantee and no way to touch other output cells, so a
// kernel may only read neighbours from other (already ghost-synced) fields.
//
// Backends:
//   Serial : plain k/j/i loops.
//   Rayon  : parallelise over contiguous x-rows of the allocation (par_chunks_mut),
//            which gives good parallelism for thin films (small nz).
//
// Selection:
//   MAGFE_EXEC=serial|rayon   (default rayon)

use std::str::FromStr;

use rayon::prelude::*;

use crate::box3::Box3i;
use crate::field::ScalarField3D;

/// Apply a per-cell kernel over an index box, writing one output cell per call.
pub trait ParallelFor {
    fn for_each_cell<F>(&self, out: &mut ScalarField3D, bx: Box3i, kernel: F)
    where
        F: Fn(isize, isize, isize, &mut f64) + Sync + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Executor {
    Serial,
    #[default]
    Rayon,
}

impl FromStr for Executor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" | "seq" | "single" => Ok(Self::Serial),
            "rayon" | "par" | "parallel" | "threads" => Ok(Self::Rayon),
            other => Err(format!("unknown exec backend '{other}' (expected serial|rayon)")),
        }
    }
}

impl Executor {
    /// Read `MAGFE_EXEC`; falls back to the default backend.
    pub fn from_env() -> Self {
        std::env::var("MAGFE_EXEC")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl ParallelFor for Executor {
    fn for_each_cell<F>(&self, out: &mut ScalarField3D, bx: Box3i, kernel: F)
    where
        F: Fn(isize, isize, isize, &mut f64) + Sync + Send,
    {
        if bx.is_empty() {
            return;
        }
        debug_assert!(
            out.grown_box().intersect(bx) == Some(bx),
            "box {:?} exceeds allocation {:?}",
            bx,
            out.grown_box()
        );

        match self {
            Executor::Serial => {
                for k in bx.lo[2]..bx.hi[2] {
                    for j in bx.lo[1]..bx.hi[1] {
                        for i in bx.lo[0]..bx.hi[0] {
                            kernel(i, j, k, out.get_mut(i, j, k));
                        }
                    }
                }
            }
            Executor::Rayon => {
                let g = out.n_ghost() as isize;
                let sx = out.row_len();
                let sy = out.rows_per_plane();
                let (i0, i1) = ((bx.lo[0] + g) as usize, (bx.hi[0] + g) as usize);

                out.data
                    .par_chunks_mut(sx)
                    .enumerate()
                    .for_each(|(row_idx, row)| {
                        let j = (row_idx % sy) as isize - g;
                        let k = (row_idx / sy) as isize - g;
                        if j < bx.lo[1] || j >= bx.hi[1] || k < bx.lo[2] || k >= bx.hi[2] {
                            return;
                        }
                        for (off, cell) in row[i0..i1].iter_mut().enumerate() {
                            kernel(bx.lo[0] + off as isize, j, k, cell);
                        }
                    });
            }
        }
    }
}
