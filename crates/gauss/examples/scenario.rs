//! Solves the reference 3x3 system with each worker pool size and prints the solutions.
//!
//! Run with `RUST_LOG=trace` to watch the elimination rounds.

use gauss::{norm::residual_rms, Gauss, LSolver};
use nalgebra::DVector;

fn main() {
    env_logger::init();

    let problem = sample_problems::reference_3x3();
    println!("A = {}", problem.a);
    println!("b = {}", problem.b);

    for threads in [1, 2, 4] {
        let mut x = DVector::zeros(problem.dim());
        match Gauss::new(threads).solve(&problem.a, &mut x, &problem.b) {
            Ok(()) => println!(
                "{} threads: x = {}, residual = {:.3e}",
                threads,
                x.transpose(),
                residual_rms(&problem.a, &x, &problem.b)
            ),
            Err(e) => println!("{} threads: {}", threads, e),
        }
    }

    let singular = sample_problems::zero_row(3);
    let mut x = DVector::zeros(singular.dim());
    if let Err(e) = Gauss::default().solve(&singular.a, &mut x, &singular.b) {
        println!("singular system: {} (x = {})", e, x.transpose());
    }
}
