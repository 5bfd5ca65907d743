use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scanfill::{flood_fill, flood_fill_with, FillOptions, GenericBuffer, RowAccessor, SweepOrder};

fn maze(w: u32, h: u32) -> Vec<u8> {
    let mut data = vec![0u8; (w * h) as usize];
    for y in (1..h).step_by(2) {
        for x in 0..w {
            if (x + y * 7) % 13 != 0 {
                data[(y * w + x) as usize] = 1;
            }
        }
    }
    data
}

fn bench_uniform(c: &mut Criterion) {
    let (w, h) = (1024u32, 1024u32);
    let data = vec![0u32; (w * h) as usize];
    let rb = RowAccessor::packed(&data, w, h).unwrap();
    c.bench_function("flood_fill_uniform_1024_rgb32", |b| {
        b.iter(|| {
            let mut n = 0;
            flood_fill(&rb, black_box(512), black_box(512), |_, _, _| n += 1).unwrap();
            n
        })
    });
}

fn bench_maze(c: &mut Criterion) {
    let (w, h) = (512u32, 512u32);
    let data = maze(w, h);
    let rb = RowAccessor::packed(&data, w, h).unwrap();
    for (name, order) in [
        ("flood_fill_maze_512_backtrack", SweepOrder::Backtrack),
        ("flood_fill_maze_512_linear", SweepOrder::Linear),
    ] {
        let options = FillOptions::new().sweep(order);
        c.bench_function(name, |b| {
            b.iter(|| flood_fill_with(&rb, 0, h as i32 - 1, &options, |_, _, _| {}).unwrap())
        });
    }
}

fn bench_generic(c: &mut Criterion) {
    let (w, h) = (512u32, 512u32);
    let data = maze(w, h);
    let gb = GenericBuffer::new(w, h, |x, y| u32::from(data[(y as u32 * w + x as u32) as usize]));
    c.bench_function("flood_fill_maze_512_generic", |b| {
        b.iter(|| flood_fill(&gb, 0, 0, |_, _, _| {}).unwrap())
    });
}

criterion_group!(benches, bench_uniform, bench_maze, bench_generic);
criterion_main!(benches);
