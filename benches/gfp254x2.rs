mod util;
use util::core_cycles;

use gfpair::field::{GFp254, GFp254x2};

fn rand_elem(z: u64) -> GFp254x2 {
    GFp254x2::from_gfp254(
        GFp254::from_w64le(z, z.wrapping_mul(3),
            z.wrapping_mul(5), z.wrapping_mul(7)),
        GFp254::from_w64le(z.wrapping_mul(11), z.wrapping_mul(13),
            z.wrapping_mul(17), z.wrapping_mul(19)))
}

fn bench_gfp254x2_add() {
    let mut x = rand_elem(core_cycles());
    let mut y = x + GFp254x2::ONE;
    let mut tt = [0; 10];
    for i in 0..10 {
        let begin = core_cycles();
        for _ in 0..1000 {
            x += y;
            y += x;
            x += y;
            y += x;
            x += y;
            y += x;
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    println!("GFp254x2 add:         {:11.2}  ({})", (tt[4] as f64) / 6000.0, x.encode()[0]);
}

fn bench_gfp254x2_mul() {
    let mut x = rand_elem(core_cycles());
    let mut y = x + GFp254x2::ONE;
    let mut tt = [0; 10];
    for i in 0..10 {
        let begin = core_cycles();
        for _ in 0..1000 {
            x *= y;
            y *= x;
            x *= y;
            y *= x;
            x *= y;
            y *= x;
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    println!("GFp254x2 mul:         {:11.2}  ({})", (tt[4] as f64) / 6000.0, x.encode()[0]);
}

fn bench_gfp254x2_square() {
    let mut x = rand_elem(core_cycles());
    let mut tt = [0; 10];
    for i in 0..10 {
        let begin = core_cycles();
        x = x.xsquare(6000);
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    println!("GFp254x2 square:      {:11.2}  ({})", (tt[4] as f64) / 6000.0, x.encode()[0]);
}

fn bench_gfp254x2_invert() {
    let mut x = rand_elem(core_cycles());
    let mut tt = [0; 10];
    for i in 0..10 {
        let begin = core_cycles();
        for _ in 0..100 {
            x = x.invert() + GFp254x2::ONE;
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    println!("GFp254x2 invert:      {:11.2}  ({})", (tt[4] as f64) / 100.0, x.encode()[0]);
}

fn bench_gfp254x2_sqrt() {
    let mut x = rand_elem(core_cycles());
    let mut tt = [0; 10];
    for i in 0..10 {
        let begin = core_cycles();
        for _ in 0..100 {
            let (x2, _) = x.sqrt();
            x = x2 + GFp254x2::NQR;
        }
        let end = core_cycles();
        tt[i] = end.wrapping_sub(begin);
    }
    tt.sort();
    println!("GFp254x2 sqrt:        {:11.2}  ({})", (tt[4] as f64) / 100.0, x.encode()[0]);
}

fn main() {
    bench_gfp254x2_add();
    bench_gfp254x2_mul();
    bench_gfp254x2_square();
    bench_gfp254x2_invert();
    bench_gfp254x2_sqrt();
}
