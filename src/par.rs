use rayon::prelude::*;
use std::sync::OnceLock;

const PAR_THRESHOLD_ENV: &str = "SIM_PAR_THRESHOLD";
const PAR_THRESHOLD_DEFAULT: usize = 262_144;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        let threshold = std::env::var(PAR_THRESHOLD_ENV)
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT);
        log::debug!("parallel sweeps above {threshold} values");
        threshold
    })
}

pub(crate) fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

pub(crate) fn for_each_row(
    out: &mut [f32],
    stride: usize,
    parallel: bool,
    f: impl Fn(usize, &mut [f32]) + Sync,
) {
    if parallel {
        out.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(i, row)| f(i, row));
    } else {
        for (i, row) in out.chunks_mut(stride).enumerate() {
            f(i, row);
        }
    }
}
